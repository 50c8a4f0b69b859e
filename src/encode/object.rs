use std::sync::Arc;

use crate::constants::NULL_LITERAL;
use crate::model::{Field, Model, TypeDef};
use crate::options::CastingLevel;
use crate::value::Value;
use crate::{Error, Result};

use super::writer::Writer;

#[derive(Clone, Copy)]
pub(crate) struct Context<'a> {
    pub model: &'a Model,
    pub casting_level: CastingLevel,
}

impl<'a> Context<'a> {
    fn resolve(&self, value: &Value) -> Result<&'a Arc<TypeDef>> {
        self.model.class_for_value(value).ok_or_else(|| {
            let name = match value {
                Value::Object(object) => object.type_name(),
                other => other.kind_name(),
            };
            Error::write(format!("No description found for {name}."))
        })
    }

    fn check_permitted(&self, class: &TypeDef, declared: Option<&Arc<TypeDef>>) -> Result<()> {
        match declared {
            Some(declared) if !declared.contains(class) => Err(Error::write(format!(
                "Item has the class '{}', but the root should have been '{}'.",
                class.name(),
                declared.name()
            ))),
            _ => Ok(()),
        }
    }

    // Without a declared type only `Always` marks the value.
    fn needs_cast(&self, declared: Option<&Arc<TypeDef>>) -> bool {
        match declared {
            Some(declared) => declared.needs_cast(self.casting_level),
            None => self.casting_level == CastingLevel::Always,
        }
    }
}

/// Writes one instance as `{ "field": value, ... }`, walking the fields of
/// its runtime class in declaration order.
pub(crate) struct ObjectWriter<'a> {
    ctx: Context<'a>,
}

impl<'a> ObjectWriter<'a> {
    pub fn new(ctx: Context<'a>) -> Self {
        Self { ctx }
    }

    pub fn write(
        &self,
        out: &mut Writer,
        value: &Value,
        declared: Option<&Arc<TypeDef>>,
        depth: usize,
    ) -> Result<()> {
        if value.is_null() {
            out.write_str(NULL_LITERAL);
            return Ok(());
        }
        if let Some(declared) = declared.filter(|ty| ty.is_primitive()) {
            out.write_str(&declared.to_dialect(value)?);
            return Ok(());
        }
        let class = self.ctx.resolve(value)?;
        self.ctx.check_permitted(class, declared)?;
        if self.ctx.needs_cast(declared) {
            out.write_cast(class.name());
        }
        if class.is_primitive() {
            out.write_str(&class.to_dialect(value)?);
            return Ok(());
        }
        self.write_body(out, class, value, depth)
    }

    /// Writes the braces and fields of `value` laid out as `class`.
    pub fn write_body(
        &self,
        out: &mut Writer,
        class: &TypeDef,
        value: &Value,
        depth: usize,
    ) -> Result<()> {
        let skipping_nulls = class.is_skipping_nulls();
        let mut fields: Vec<(Field, Value)> = Vec::new();
        for key in class.keys_for_write(value) {
            let Some(field) = class.field(&key) else {
                continue;
            };
            let attr = class.get_attr(&field, value);
            if attr.is_null() && skipping_nulls {
                continue;
            }
            fields.push((field.into_owned(), attr));
        }

        out.write_char('{');
        if fields.is_empty() {
            out.write_char('}');
            return Ok(());
        }
        out.write_newline();
        for (index, (field, attr)) in fields.iter().enumerate() {
            if index > 0 {
                out.write_str(",\n");
            }
            out.write_indent(depth + 1);
            out.write_key(field.name());
            self.write_attr(out, field, attr, depth + 1)?;
        }
        out.write_newline();
        out.write_indent(depth);
        out.write_char('}');
        Ok(())
    }

    fn write_attr(
        &self,
        out: &mut Writer,
        field: &Field,
        attr: &Value,
        depth: usize,
    ) -> Result<()> {
        if attr.is_null() {
            out.write_str(NULL_LITERAL);
            return Ok(());
        }
        let field_type = self.ctx.model.lookup(field.type_name())?;
        if field.is_as_list_or_array() {
            let values = field_type.as_collection(attr)?;
            return ListWriter::new(self.ctx).write(out, values, Some(&field_type), depth);
        }
        if field_type.is_primitive() {
            out.write_str(&field_type.to_dialect(attr)?);
            return Ok(());
        }
        self.write(out, attr, Some(&field_type), depth)
    }
}

/// Writes a sequence as `[ ... ]`: primitives inline, everything else one
/// element per line.
pub(crate) struct ListWriter<'a> {
    ctx: Context<'a>,
}

impl<'a> ListWriter<'a> {
    pub fn new(ctx: Context<'a>) -> Self {
        Self { ctx }
    }

    pub fn write(
        &self,
        out: &mut Writer,
        values: &[Value],
        item_type: Option<&Arc<TypeDef>>,
        depth: usize,
    ) -> Result<()> {
        if values.is_empty() {
            out.write_str("[]");
            return Ok(());
        }
        match item_type {
            Some(item_type) if item_type.is_primitive() => {
                self.write_inline(out, values, item_type, depth)
            }
            _ => self.write_lines(out, values, item_type, depth),
        }
    }

    fn write_inline(
        &self,
        out: &mut Writer,
        values: &[Value],
        item_type: &Arc<TypeDef>,
        depth: usize,
    ) -> Result<()> {
        out.write_char('[');
        for (index, value) in values.iter().enumerate() {
            if index > 0 {
                out.write_str(", ");
            }
            match value {
                Value::Null => out.write_str(NULL_LITERAL),
                Value::List(inner) | Value::Array(inner) => {
                    self.write(out, inner, Some(item_type), depth)?
                }
                other => out.write_str(&item_type.to_dialect(other)?),
            }
        }
        out.write_char(']');
        Ok(())
    }

    fn write_lines(
        &self,
        out: &mut Writer,
        values: &[Value],
        item_type: Option<&Arc<TypeDef>>,
        depth: usize,
    ) -> Result<()> {
        let objects = ObjectWriter::new(self.ctx);
        out.write_char('[');
        for (index, value) in values.iter().enumerate() {
            out.write_str(if index > 0 { ",\n" } else { "\n" });
            out.write_indent(depth + 1);
            match value {
                Value::List(inner) | Value::Array(inner) => {
                    self.write(out, inner, item_type, depth + 1)?
                }
                other => objects.write(out, other, item_type, depth + 1)?,
            }
        }
        out.write_newline();
        out.write_indent(depth);
        out.write_char(']');
        Ok(())
    }
}

/// Entry writer for a whole document. A top-level sequence is laid out one
/// element per line, every element using the class of the first one.
pub(crate) struct RootObjectWriter<'a> {
    ctx: Context<'a>,
}

impl<'a> RootObjectWriter<'a> {
    pub fn new(ctx: Context<'a>) -> Self {
        Self { ctx }
    }

    pub fn write(
        &self,
        out: &mut Writer,
        value: &Value,
        root: Option<&Arc<TypeDef>>,
    ) -> Result<()> {
        match value {
            Value::List(values) | Value::Array(values) => self.write_sequence(out, values, root),
            other => ObjectWriter::new(self.ctx).write(out, other, root, 0),
        }
    }

    fn write_sequence(
        &self,
        out: &mut Writer,
        values: &[Value],
        root: Option<&Arc<TypeDef>>,
    ) -> Result<()> {
        if root.is_some_and(|root| root.is_primitive()) {
            return ListWriter::new(self.ctx).write(out, values, root, 0);
        }
        let Some(first) = values.iter().find(|value| !value.is_null()) else {
            return ListWriter::new(self.ctx).write(out, values, root, 0);
        };
        let class = self.ctx.resolve(first)?;
        self.ctx.check_permitted(class, root)?;
        if class.is_primitive() {
            return ListWriter::new(self.ctx).write(out, values, Some(class), 0);
        }
        let objects = ObjectWriter::new(self.ctx);
        let cast = self.ctx.needs_cast(root);
        out.write_str("[\n");
        for (index, value) in values.iter().enumerate() {
            if index > 0 {
                out.write_str(",\n");
            }
            out.write_indent(1);
            if value.is_null() {
                out.write_str(NULL_LITERAL);
                continue;
            }
            if cast {
                out.write_cast(class.name());
            }
            objects.write_body(out, class, value, 1)?;
        }
        out.write_str("\n]");
        Ok(())
    }
}
