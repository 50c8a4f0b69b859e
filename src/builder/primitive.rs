use std::ops::Neg;
use std::str::FromStr;

use crate::constants::{is_null_literal, BOOLEAN_GETTER_PREFIX, GETTER_PREFIX};
use crate::item::{Item, ItemIter};
use crate::model::{Model, TypeDef};
use crate::num::number::{format_f32, format_f64, format_i32, format_i64};
use crate::text::string::quote;
use crate::value::Value;
use crate::{Error, Result};

use super::Builder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    Bool,
    Int,
    Long,
    Float,
    Double,
}

/// Builder for the scalar classes. Nullable builders turn an absent or
/// `null` payload into `Null`; the others fall back to `false`, `0` or NaN.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveBuilder {
    kind: PrimitiveKind,
    nullable: bool,
}

impl PrimitiveBuilder {
    pub fn new(kind: PrimitiveKind, nullable: bool) -> Self {
        Self { kind, nullable }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    fn sentinel(&self) -> Value {
        if self.nullable {
            return Value::Null;
        }
        match self.kind {
            PrimitiveKind::String => Value::Null,
            PrimitiveKind::Bool => Value::Bool(false),
            PrimitiveKind::Int => Value::Int(0),
            PrimitiveKind::Long => Value::Long(0),
            PrimitiveKind::Float => Value::Float(f32::NAN),
            PrimitiveKind::Double => Value::Double(f64::NAN),
        }
    }

    /// Converts one item payload.
    pub fn convert(&self, item: &Item) -> Result<Value> {
        let Item::Value(value) = item else {
            return match item {
                Item::List(list) => list_payload(list.items(), self),
                _ => Ok(self.sentinel()),
            };
        };
        if self.kind == PrimitiveKind::String {
            if value.is_null_literal() {
                return Ok(Value::Null);
            }
            return Ok(Value::String(value.value().to_string()));
        }
        let text = value.value().trim();
        if is_null_literal(text) {
            return Ok(self.sentinel());
        }
        self.parse_text(text)
    }

    fn parse_text(&self, text: &str) -> Result<Value> {
        let fault =
            |kind: &str| Error::conversion(format!("For input string: \"{text}\" as {kind}."));
        match self.kind {
            PrimitiveKind::String => Ok(Value::String(text.to_string())),
            PrimitiveKind::Bool => Ok(Value::Bool(text.eq_ignore_ascii_case("true"))),
            PrimitiveKind::Int => text.parse().map(Value::Int).map_err(|_| fault("Integer")),
            PrimitiveKind::Long => text.parse().map(Value::Long).map_err(|_| fault("Long")),
            PrimitiveKind::Float => parse_float(text, f32::NAN, f32::INFINITY)
                .map(Value::Float)
                .ok_or_else(|| fault("Float")),
            PrimitiveKind::Double => parse_float(text, f64::NAN, f64::INFINITY)
                .map(Value::Double)
                .ok_or_else(|| fault("Double")),
        }
    }
}

fn list_payload(items: &[Item], builder: &PrimitiveBuilder) -> Result<Value> {
    let mut values = Vec::with_capacity(items.len());
    for item in items {
        values.push(builder.convert(item)?);
    }
    Ok(Value::List(values))
}

// Accepts the non-finite spellings and `f`/`d` suffixes.
fn parse_float<F>(text: &str, nan: F, infinity: F) -> Option<F>
where
    F: FromStr + Neg<Output = F>,
{
    match text {
        "NaN" => Some(nan),
        "Infinity" | "+Infinity" => Some(infinity),
        "-Infinity" => Some(-infinity),
        _ => text
            .strip_suffix(&['f', 'F', 'd', 'D'][..])
            .unwrap_or(text)
            .parse()
            .ok(),
    }
}

impl Builder for PrimitiveBuilder {
    fn build(&self, _ty: &TypeDef, item: &Item, _model: &Model) -> Result<Value> {
        self.convert(item)
    }

    fn build_list(&self, _ty: &TypeDef, items: ItemIter<'_>, _model: &Model) -> Result<Value> {
        items.map(|item| self.convert(item)).collect::<Result<_>>().map(Value::List)
    }

    fn build_array(&self, _ty: &TypeDef, items: ItemIter<'_>, _model: &Model) -> Result<Value> {
        items.map(|item| self.convert(item)).collect::<Result<_>>().map(Value::Array)
    }

    fn to_dialect(&self, value: &Value) -> Result<String> {
        let text = match (self.kind, value) {
            (PrimitiveKind::String, Value::String(text)) => quote(text),
            (PrimitiveKind::Bool, Value::Bool(flag)) => flag.to_string(),
            (PrimitiveKind::Int | PrimitiveKind::Long, Value::Int(number)) => format_i32(*number),
            (PrimitiveKind::Int | PrimitiveKind::Long, Value::Long(number)) => format_i64(*number),
            (PrimitiveKind::Float | PrimitiveKind::Double, Value::Float(number)) => {
                format_f32(*number)
            }
            (PrimitiveKind::Float | PrimitiveKind::Double, Value::Double(number)) => {
                format_f64(*number)
            }
            (PrimitiveKind::String, Value::Null) => "null".to_string(),
            (PrimitiveKind::String, other) => quote(&other.to_string()),
            _ => "null".to_string(),
        };
        Ok(text)
    }

    fn getter_prefix(&self) -> &str {
        if self.kind == PrimitiveKind::Bool {
            BOOLEAN_GETTER_PREFIX
        } else {
            GETTER_PREFIX
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ListItem, ValueItem};

    fn bare(text: &str) -> Item {
        Item::Value(ValueItem::new(text, None))
    }

    #[rstest::rstest]
    #[case(PrimitiveKind::Int, true, "42", Value::Int(42))]
    #[case(PrimitiveKind::Int, false, "null", Value::Int(0))]
    #[case(PrimitiveKind::Int, true, "null", Value::Null)]
    #[case(PrimitiveKind::Long, false, " -7 ", Value::Long(-7))]
    #[case(PrimitiveKind::Bool, false, "TRUE", Value::Bool(true))]
    #[case(PrimitiveKind::Bool, false, "yes", Value::Bool(false))]
    #[case(PrimitiveKind::Bool, true, "null", Value::Null)]
    #[case(PrimitiveKind::Double, true, "2.5", Value::Double(2.5))]
    #[case(PrimitiveKind::Float, true, "1e2", Value::Float(100.0))]
    fn test_convert(
        #[case] kind: PrimitiveKind,
        #[case] nullable: bool,
        #[case] text: &str,
        #[case] expected: Value,
    ) {
        let builder = PrimitiveBuilder::new(kind, nullable);
        assert_eq!(builder.convert(&bare(text)).unwrap(), expected);
    }

    #[rstest::rstest]
    fn test_non_nullable_float_sentinel_is_nan() {
        let builder = PrimitiveBuilder::new(PrimitiveKind::Double, false);
        let value = builder.convert(&bare("null")).unwrap();
        assert!(value.as_f64().unwrap().is_nan());
    }

    #[rstest::rstest]
    fn test_numeric_failure_is_conversion_fault() {
        let builder = PrimitiveBuilder::new(PrimitiveKind::Int, false);
        let err = builder.convert(&bare("4x")).unwrap_err();
        assert_eq!(err.kind, crate::ErrorKind::Conversion);
        assert!(err.message.contains("4x"));
    }

    #[rstest::rstest]
    fn test_quoted_null_stays_a_string() {
        let builder = PrimitiveBuilder::new(PrimitiveKind::String, true);
        let quoted = Item::Value(ValueItem::quoted("null", None));
        assert_eq!(builder.convert(&quoted).unwrap(), Value::from("null"));
        assert_eq!(builder.convert(&bare("null")).unwrap(), Value::Null);
    }

    #[rstest::rstest]
    fn test_nested_list_converts_each_element() {
        let builder = PrimitiveBuilder::new(PrimitiveKind::Int, false);
        let inner = Item::List(ListItem::new(vec![bare("1"), bare("2")], true, None));
        assert_eq!(
            builder.convert(&inner).unwrap(),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[rstest::rstest]
    #[case(PrimitiveKind::String, Value::from("a\"b"), "\"a\\\"b\"")]
    #[case(PrimitiveKind::Int, Value::Int(5), "5")]
    #[case(PrimitiveKind::Double, Value::Double(f64::NAN), "NaN")]
    #[case(PrimitiveKind::Bool, Value::Bool(true), "true")]
    #[case(PrimitiveKind::Int, Value::from("x"), "null")]
    fn test_to_dialect(#[case] kind: PrimitiveKind, #[case] value: Value, #[case] expected: &str) {
        let builder = PrimitiveBuilder::new(kind, true);
        assert_eq!(builder.to_dialect(&value).unwrap(), expected);
    }

    #[rstest::rstest]
    fn test_boolean_getter_prefix() {
        assert_eq!(PrimitiveBuilder::new(PrimitiveKind::Bool, false).getter_prefix(), "is");
        assert_eq!(PrimitiveBuilder::new(PrimitiveKind::Int, false).getter_prefix(), "get");
    }
}
