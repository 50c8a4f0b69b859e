//! A JSON dialect with inline `(ClassName)` casts, read and written against a
//! runtime type model.
//!
//! ```
//! use jsoncast::{CastingLevel, ClassDef, Definition, Model, Obj, Reflector};
//!
//! #[derive(Debug, Clone, PartialEq, Default)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let mut model = Model::basic("geometry");
//! let int = model.lookup("int")?;
//! let builder = Reflector::<Point>::new()
//!     .default_constructor()
//!     .setter("setX", |p: &mut Point, x: i32| p.x = x)
//!     .setter("setY", |p: &mut Point, y: i32| p.y = y)
//!     .getter("getX", |p: &Point| p.x)
//!     .getter("getY", |p: &Point| p.y);
//! let mut point = ClassDef::new("Point", builder.finish());
//! point.add_field("x", &int).add_field("y", &int);
//! model.add(point);
//! let definition = Definition::new(model, CastingLevel::Never)?;
//!
//! let text = "{\"x\": 1, y: 2}";
//! let Obj(parsed) = jsoncast::from_str::<Obj<Point>>(text, &definition, Some("Point"))?;
//! assert_eq!(parsed, Point { x: 1, y: 2 });
//!
//! let text = jsoncast::to_string(&jsoncast::Value::object(parsed), &definition, Some("Point"))?;
//! assert_eq!(text, "{\n  \"x\": 1,\n  \"y\": 2\n}");
//! # Ok::<(), jsoncast::Error>(())
//! ```

pub mod builder;
pub mod constants;
pub mod decode;
pub mod encode;
pub mod error;
pub mod item;
pub mod model;
pub mod num;
pub mod options;
pub mod parallel;
pub mod text;
pub mod value;

use std::io::{BufRead, Write};
use std::path::Path;

pub use crate::builder::{
    Builder, EnumByNameBuilder, MapBuilder, NamedVariant, ParamKind, PrimitiveBuilder,
    PrimitiveKind, ReflectBuilder, Reflector,
};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::item::{Item, ItemIter, ListItem, ObjectItem, ValueItem};
pub use crate::model::{
    ClassDef, CollectionShape, Definition, Field, InterfaceDef, MapDef, Model, TypeDef,
    Validation,
};
pub use crate::options::{CastingLevel, Charset, DebugLevel, ParseOptions, WriteOptions};
pub use crate::value::{FromValue, Instance, MapValue, Obj, ObjectValue, Value};

pub fn parse_str(input: &str, definition: &Definition, root: Option<&str>) -> Result<Item> {
    parse_str_with_options(input, definition, root, &ParseOptions::default())
}

pub fn parse_str_with_options(
    input: &str,
    definition: &Definition,
    root: Option<&str>,
    options: &ParseOptions,
) -> Result<Item> {
    decode::from_str(input, definition.model(), definition.root(root)?, options)
}

pub fn parse_reader<R: BufRead>(
    reader: R,
    definition: &Definition,
    root: Option<&str>,
    options: &ParseOptions,
) -> Result<Item> {
    decode::from_reader(reader, definition.model(), definition.root(root)?, options)
}

pub fn parse_file<P: AsRef<Path>>(
    path: P,
    definition: &Definition,
    root: Option<&str>,
    options: &ParseOptions,
) -> Result<Item> {
    decode::from_path(path.as_ref(), definition.model(), definition.root(root)?, options)
}

/// Parses and builds a document into its value.
pub fn build_str(input: &str, definition: &Definition, root: Option<&str>) -> Result<Value> {
    definition.build(&parse_str(input, definition, root)?)
}

/// Parses, builds and converts a document. Use [`Obj`] for model classes.
pub fn from_str<T: FromValue>(
    input: &str,
    definition: &Definition,
    root: Option<&str>,
) -> Result<T> {
    T::from_value(build_str(input, definition, root)?)
}

pub fn from_reader<T: FromValue, R: BufRead>(
    reader: R,
    definition: &Definition,
    root: Option<&str>,
    options: &ParseOptions,
) -> Result<T> {
    T::from_value(definition.build(&parse_reader(reader, definition, root, options)?)?)
}

pub fn from_file<T: FromValue, P: AsRef<Path>>(
    path: P,
    definition: &Definition,
    root: Option<&str>,
    options: &ParseOptions,
) -> Result<T> {
    T::from_value(definition.build(&parse_file(path, definition, root, options)?)?)
}

pub fn to_string(value: &Value, definition: &Definition, root: Option<&str>) -> Result<String> {
    to_string_with_options(value, definition, root, &WriteOptions::default())
}

pub fn to_string_with_options(
    value: &Value,
    definition: &Definition,
    root: Option<&str>,
    options: &WriteOptions,
) -> Result<String> {
    encode::to_string(value, definition, definition.root(root)?.as_ref(), options)
}

/// Serialized bytes in the configured charset.
pub fn to_vec_with_options(
    value: &Value,
    definition: &Definition,
    root: Option<&str>,
    options: &WriteOptions,
) -> Result<Vec<u8>> {
    encode::to_vec(value, definition, definition.root(root)?.as_ref(), options)
}

pub fn to_writer<W: Write>(
    writer: W,
    value: &Value,
    definition: &Definition,
    root: Option<&str>,
    options: &WriteOptions,
) -> Result<()> {
    encode::to_writer(writer, value, definition, definition.root(root)?.as_ref(), options)
}

pub fn to_file<P: AsRef<Path>>(
    path: P,
    value: &Value,
    definition: &Definition,
    root: Option<&str>,
    options: &WriteOptions,
) -> Result<()> {
    encode::to_path(path.as_ref(), value, definition, definition.root(root)?.as_ref(), options)
}
