pub mod enumeration;
pub mod map;
pub mod primitive;
pub mod reflect;

use std::any::TypeId;
use std::fmt;

use crate::constants::{GETTER_PREFIX, SETTER_PREFIX};
use crate::item::{Item, ItemIter};
use crate::model::{Model, TypeDef};
use crate::value::Value;
use crate::{Error, Result};

pub use enumeration::{EnumByNameBuilder, NamedVariant};
pub use map::MapBuilder;
pub use primitive::{PrimitiveBuilder, PrimitiveKind};
pub use reflect::{ParamKind, ReflectBuilder, Reflector};

/// Construction strategy of one class: item to value, and value back to
/// dialect text for the writer.
pub trait Builder: Send + Sync + fmt::Debug {
    fn build(&self, ty: &TypeDef, item: &Item, model: &Model) -> Result<Value>;

    fn build_list(&self, _ty: &TypeDef, items: ItemIter<'_>, model: &Model) -> Result<Value> {
        build_each(items, model).map(Value::List)
    }

    fn build_array(&self, _ty: &TypeDef, items: ItemIter<'_>, model: &Model) -> Result<Value> {
        build_each(items, model).map(Value::Array)
    }

    fn is_primitive(&self) -> bool {
        true
    }

    /// Dialect rendering of a primitive value.
    fn to_dialect(&self, value: &Value) -> Result<String>;

    fn as_collection<'v>(&self, value: &'v Value) -> Result<&'v [Value]> {
        value.as_slice().ok_or_else(|| {
            Error::write(format!("Expected a list or array, found {}.", value.kind_name()))
        })
    }

    fn getter_prefix(&self) -> &str {
        GETTER_PREFIX
    }

    fn setter_prefix(&self) -> &str {
        SETTER_PREFIX
    }

    /// Runtime type of the instances this builder produces, if it is a
    /// domain type the writer must recognise.
    fn instance_type(&self) -> Option<TypeId> {
        None
    }

    /// Reads a field through the named getter. `None` when no such getter is
    /// registered.
    fn read_field(&self, _getter: &str, _value: &Value) -> Option<Value> {
        None
    }
}

/// Builds every item with its own associated class.
pub fn build_each(items: ItemIter<'_>, model: &Model) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(items.len());
    for item in items {
        values.push(item.build_instance(model)?);
    }
    Ok(values)
}
