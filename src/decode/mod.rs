pub mod parser;
pub mod reader;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use crate::item::Item;
use crate::model::{Model, TypeDef};
use crate::options::ParseOptions;
use crate::Result;

pub use parser::Parser;
pub use reader::StreamReader;

/// Parses a document from any buffered reader into an item tree.
pub fn from_reader<R: BufRead>(
    input: R,
    model: &Model,
    root: Option<Arc<TypeDef>>,
    options: &ParseOptions,
) -> Result<Item> {
    let reader = StreamReader::new(input, options.debug_level);
    Parser::new(model, reader).parse_document(root)
}

pub fn from_str(
    input: &str,
    model: &Model,
    root: Option<Arc<TypeDef>>,
    options: &ParseOptions,
) -> Result<Item> {
    from_reader(input.as_bytes(), model, root, options)
}

pub fn from_path(
    path: &Path,
    model: &Model,
    root: Option<Arc<TypeDef>>,
    options: &ParseOptions,
) -> Result<Item> {
    let file = File::open(path)?;
    from_reader(BufReader::new(file), model, root, options)
}
