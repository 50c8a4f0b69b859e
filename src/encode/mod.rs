mod object;
mod writer;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use crate::model::{Definition, TypeDef};
use crate::options::WriteOptions;
use crate::value::Value;
use crate::Result;

use object::{Context, RootObjectWriter};
use writer::Writer;

/// Serializes a constructed value (or a homogeneous list of them) to
/// dialect text.
pub fn to_string(
    value: &Value,
    definition: &Definition,
    root: Option<&Arc<TypeDef>>,
    options: &WriteOptions,
) -> Result<String> {
    let ctx = Context {
        model: definition.model(),
        casting_level: definition.casting_level(),
    };
    let mut out = Writer::new(options.indent);
    RootObjectWriter::new(ctx).write(&mut out, value, root)?;
    Ok(out.finish())
}

/// Like [`to_string`], encoded in the configured charset.
pub fn to_vec(
    value: &Value,
    definition: &Definition,
    root: Option<&Arc<TypeDef>>,
    options: &WriteOptions,
) -> Result<Vec<u8>> {
    let text = to_string(value, definition, root, options)?;
    Ok(options.charset.encode(&text))
}

pub fn to_writer<W: Write>(
    mut writer: W,
    value: &Value,
    definition: &Definition,
    root: Option<&Arc<TypeDef>>,
    options: &WriteOptions,
) -> Result<()> {
    let bytes = to_vec(value, definition, root, options)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

pub fn to_path(
    path: &Path,
    value: &Value,
    definition: &Definition,
    root: Option<&Arc<TypeDef>>,
    options: &WriteOptions,
) -> Result<()> {
    let file = File::create(path)?;
    to_writer(BufWriter::new(file), value, definition, root, options)
}
