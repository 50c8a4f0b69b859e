use std::io::BufRead;
use std::sync::Arc;

use tracing::{info, warn};

use crate::constants::{is_null_literal, STRING};
use crate::item::{Item, ListItem, ObjectItem, ValueItem};
use crate::model::{direct_class, Field, Model, TypeDef};
use crate::{Error, Result};

use super::reader::StreamReader;

const REPLACEMENT: char = '\u{FFFD}';

/// A `key: value` pair whose value is still being read.
struct PendingParam<'f> {
    key: String,
    field: Option<&'f Field>,
    field_type: Option<Arc<TypeDef>>,
    cast: Option<Arc<TypeDef>>,
    value: Option<Item>,
    text: String,
}

impl PendingParam<'_> {
    /// Class for a nested string or object: the cast, else the field type
    /// when it is directly constructible.
    fn class(&self) -> Option<Arc<TypeDef>> {
        self.cast.clone().or_else(|| direct_class(self.field_type.as_ref()))
    }
}

/// Recursive-descent parser producing an [`Item`] tree.
///
/// There is no tokenizer: every sub-parser dispatches on the raw characters
/// handed out by the [`StreamReader`], and the meaning of `,` or `(` depends
/// on which sub-parser is active.
pub struct Parser<'m, R> {
    model: &'m Model,
    reader: StreamReader<R>,
    string_class: Option<Arc<TypeDef>>,
}

impl<'m, R: BufRead> Parser<'m, R> {
    pub fn new(model: &'m Model, reader: StreamReader<R>) -> Self {
        Self {
            model,
            reader,
            string_class: model.get_class(STRING).cloned(),
        }
    }

    pub fn line(&self) -> usize {
        self.reader.line()
    }

    /// Parses one document. Content after the first complete value is
    /// ignored.
    pub fn parse_document(mut self, root: Option<Arc<TypeDef>>) -> Result<Item> {
        self.parse_root(root)
    }

    fn fault(&self, message: impl AsRef<str>) -> Error {
        Error::parse_at(message, self.reader.line())
    }

    fn parse_root(&mut self, root: Option<Arc<TypeDef>>) -> Result<Item> {
        let mut cast = direct_class(root.as_ref());
        let mut text = String::new();
        while self.reader.has_next()? {
            match self.reader.next()? {
                '{' => return self.parse_object(cast),
                '[' => return self.parse_list(cast.or(root), true),
                '"' => return self.parse_string(cast),
                '(' => cast = Some(self.parse_cast(root.as_ref())?),
                ch => text.push(ch),
            }
        }
        Ok(Item::Value(ValueItem::new(text.trim(), cast)))
    }

    fn parse_object(&mut self, class: Option<Arc<TypeDef>>) -> Result<Item> {
        let mut object = ObjectItem::new(class.clone());
        while let Some(key) = self.read_key()? {
            let field = class.as_deref().and_then(|class| class.field(&key));
            if field.is_none() && self.reader.debug_level().satisfies_warning() {
                warn!(
                    key = %key,
                    class = class.as_deref().map_or("null", TypeDef::name),
                    line = self.reader.line(),
                    "field not found"
                );
            }
            if self.read_param(&mut object, key, field.as_deref())? {
                return Ok(Item::Object(object));
            }
        }
        Ok(Item::Object(object))
    }

    /// Reads up to the `:` after a key. `None` means the object closed.
    fn read_key(&mut self) -> Result<Option<String>> {
        let mut text = String::new();
        while self.reader.has_next()? {
            match self.reader.next()? {
                '}' => return Ok(None),
                ':' => return Ok(Some(text.trim().to_string())),
                '"' => {
                    let key = self.read_string()?;
                    while self.reader.has_next()? {
                        if self.reader.next()? == ':' {
                            return Ok(Some(key));
                        }
                    }
                    break;
                }
                ch => text.push(ch),
            }
        }
        Err(self.fault("End of file without end of object."))
    }

    /// Reads one value and stores it under `key`. Returns `true` when the
    /// value was terminated by the closing brace.
    fn read_param(
        &mut self,
        object: &mut ObjectItem,
        key: String,
        field: Option<&Field>,
    ) -> Result<bool> {
        let field_type = field.and_then(|field| self.model.get(field.type_name())).cloned();
        let mut param = PendingParam {
            key,
            field,
            field_type,
            cast: None,
            value: None,
            text: String::new(),
        };
        while self.reader.has_next()? {
            match self.reader.next()? {
                '"' => {
                    self.check_double(&param)?;
                    param.value = Some(self.parse_string(param.class())?);
                }
                '[' => {
                    self.check_double(&param)?;
                    if param.field.is_some_and(|field| !field.is_as_list_or_array()) {
                        let key = &param.key;
                        return Err(self.fault(format!("Field {key} is not a list nor array.")));
                    }
                    let ty = param.cast.clone().or_else(|| param.field_type.clone());
                    let as_list = param.field.map_or(true, Field::is_as_list);
                    param.value = Some(self.parse_list(ty, as_list)?);
                }
                '{' => {
                    self.check_double(&param)?;
                    param.value = Some(self.parse_object(param.class())?);
                }
                '(' => param.cast = Some(self.parse_cast(param.field_type.as_ref())?),
                ',' => {
                    self.append_param(object, param);
                    return Ok(false);
                }
                '}' => {
                    self.append_param(object, param);
                    return Ok(true);
                }
                ch => param.text.push(ch),
            }
        }
        Err(self.fault("End of file without end of object."))
    }

    fn check_double(&self, param: &PendingParam<'_>) -> Result<()> {
        if param.value.is_some() {
            let key = &param.key;
            return Err(self.fault(format!(
                "Double param '{key}' value. Mostly because a \" is missing and string remains open."
            )));
        }
        Ok(())
    }

    fn append_param(&self, object: &mut ObjectItem, param: PendingParam<'_>) {
        let debug_level = self.reader.debug_level();
        let shaped = param.field.is_some_and(Field::is_as_list_or_array);
        let item = match param.value {
            Some(item) => item,
            None => {
                let text = param.text.trim();
                let class = if shaped && is_null_literal(text) {
                    None
                } else {
                    param.cast.or_else(|| direct_class(param.field_type.as_ref()))
                };
                Item::Value(ValueItem::new(text, class))
            }
        };
        let key = param.key;
        let untyped_null = matches!(
            &item,
            Item::Value(value) if value.is_null_literal() && value.class().is_none()
        );
        let item = match param.field {
            Some(field) if shaped && !item.is_list() && !untyped_null => {
                if debug_level.satisfies_warning() {
                    warn!(
                        key = %key,
                        class = %item.print_class_name(),
                        line = self.reader.line(),
                        "single value wrapped into a list"
                    );
                }
                Item::List(ListItem::new(vec![item], field.is_as_list(), param.field_type))
            }
            _ => item,
        };
        if debug_level.satisfies_info() {
            info!(
                key = %key,
                class = %item.print_class_name(),
                value = %item.describe(),
                "param set"
            );
        }
        object.put_param(key, item);
    }

    fn parse_list(&mut self, ty: Option<Arc<TypeDef>>, as_list: bool) -> Result<Item> {
        let mut cast = direct_class(ty.as_ref());
        let mut items = Vec::new();
        let mut current: Option<Item> = None;
        let mut text = String::new();
        while self.reader.has_next()? {
            match self.reader.next()? {
                ']' => {
                    self.push_element(&mut items, current.take(), &text, cast.as_ref())?;
                    return Ok(Item::List(ListItem::new(items, as_list, ty)));
                }
                ',' => {
                    self.push_element(&mut items, current.take(), &text, cast.as_ref())?;
                    text.clear();
                }
                '(' => cast = Some(self.parse_cast(ty.as_ref())?),
                '{' => current = Some(self.parse_object(cast.clone())?),
                '"' => current = Some(self.parse_string(cast.clone())?),
                '[' => {
                    let inner = cast.clone().or_else(|| ty.clone());
                    current = Some(self.parse_list(inner, as_list)?);
                }
                ch => text.push(ch),
            }
        }
        Err(self.fault("End of file without end of list."))
    }

    fn push_element(
        &self,
        items: &mut Vec<Item>,
        current: Option<Item>,
        text: &str,
        cast: Option<&Arc<TypeDef>>,
    ) -> Result<()> {
        if let Some(item) = current {
            items.push(item);
            return Ok(());
        }
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        let class = if is_null_literal(text) {
            None
        } else {
            let class = cast
                .ok_or_else(|| self.fault(format!("No class for list element '{text}'.")))?;
            Some(Arc::clone(class))
        };
        items.push(Item::Value(ValueItem::new(text, class)));
        Ok(())
    }

    fn parse_string(&mut self, class: Option<Arc<TypeDef>>) -> Result<Item> {
        let text = self.read_string()?;
        let class = class.or_else(|| self.string_class.clone());
        Ok(Item::Value(ValueItem::quoted(text, class)))
    }

    /// Reads the rest of a quoted string, resolving escapes. The opening
    /// quote has already been consumed.
    fn read_string(&mut self) -> Result<String> {
        let mut out = String::new();
        let mut high: Option<u16> = None;
        while self.reader.has_next()? {
            let ch = self.reader.next()?;
            if ch == '\\' {
                let escaped = self.reader.next()?;
                if escaped == 'u' {
                    let unit = self.read_code_unit()?;
                    push_code_unit(&mut out, &mut high, unit);
                    continue;
                }
                flush_surrogate(&mut out, &mut high);
                match escaped {
                    '"' => out.push('"'),
                    '\\' => out.push('\\'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'b' => out.push('\u{8}'),
                    'f' => out.push('\u{c}'),
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                }
                continue;
            }
            flush_surrogate(&mut out, &mut high);
            if ch == '"' {
                return Ok(out);
            }
            out.push(ch);
        }
        Err(self.fault("End of file without end of string."))
    }

    fn read_code_unit(&mut self) -> Result<u16> {
        let hex = self.reader.next_n(4)?;
        u16::from_str_radix(&hex, 16)
            .map_err(|_| self.fault(format!("Invalid unicode escape '\\u{hex}'.")))
    }

    /// Reads a cast name up to `)` and resolves it. The result must be
    /// permitted by `enclosing` when that is known.
    fn parse_cast(&mut self, enclosing: Option<&Arc<TypeDef>>) -> Result<Arc<TypeDef>> {
        let mut name = String::new();
        while self.reader.has_next()? {
            let ch = self.reader.next()?;
            if ch == ')' {
                return self.resolve_cast(name.trim(), enclosing);
            }
            name.push(ch);
        }
        Err(self.fault("End of file without end of cast."))
    }

    fn resolve_cast(&self, name: &str, enclosing: Option<&Arc<TypeDef>>) -> Result<Arc<TypeDef>> {
        let found = if name.is_empty() {
            None
        } else {
            self.model
                .get_class(name)
                .or_else(|| self.model.find_ends_with(name))
        };
        let class = found.ok_or_else(|| self.fault(format!("Class '{name}' not found.")))?;
        if let Some(enclosing) = enclosing {
            if !enclosing.contains(class) {
                return Err(self.fault(format!(
                    "Class '{}' not allowed in '{}'.",
                    class.name(),
                    enclosing.name()
                )));
            }
        }
        if self.reader.debug_level().satisfies_info() {
            info!(cast = name, class = %class.name(), line = self.reader.line(), "cast resolved");
        }
        Ok(Arc::clone(class))
    }
}

fn push_code_unit(out: &mut String, high: &mut Option<u16>, unit: u16) {
    match unit {
        0xD800..=0xDBFF => {
            flush_surrogate(out, high);
            *high = Some(unit);
        }
        0xDC00..=0xDFFF => match high.take() {
            Some(lead) => {
                let code =
                    0x10000 + ((u32::from(lead) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
                out.push(char::from_u32(code).unwrap_or(REPLACEMENT));
            }
            None => out.push(REPLACEMENT),
        },
        _ => {
            flush_surrogate(out, high);
            out.push(char::from_u32(u32::from(unit)).unwrap_or(REPLACEMENT));
        }
    }
}

// A lead surrogate without its trail.
fn flush_surrogate(out: &mut String, high: &mut Option<u16>) {
    if high.take().is_some() {
        out.push(REPLACEMENT);
    }
}
