use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;
use tracing::warn;

use crate::item::{Item, ItemIter};
use crate::model::{Model, TypeDef};
use crate::text::string::quote;
use crate::value::{Instance, Value};
use crate::{Error, Result};

use super::Builder;

/// Enumerations addressed by constant name in documents.
pub trait NamedVariant: Sized {
    fn by_name(name: &str) -> Option<Self>;

    fn name(&self) -> &str;
}

type Factory = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;
type Namer = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

#[derive(Clone)]
pub struct EnumByNameBuilder {
    enum_name: SmolStr,
    factory: Option<Factory>,
    namer: Option<Namer>,
    instance_type: Option<TypeId>,
}

impl EnumByNameBuilder {
    pub fn of<T>(enum_name: impl Into<SmolStr>) -> Self
    where
        T: NamedVariant + Instance,
    {
        Self {
            enum_name: enum_name.into(),
            factory: Some(Arc::new(|name: &str| T::by_name(name).map(Value::object))),
            namer: Some(Arc::new(|value: &Value| {
                value.downcast_ref::<T>().map(|variant| variant.name().to_string())
            })),
            instance_type: Some(TypeId::of::<T>()),
        }
    }

    /// Builder for an enumeration that has no lookup registered; building
    /// with it is a fault.
    pub fn unbound(enum_name: impl Into<SmolStr>) -> Self {
        Self {
            enum_name: enum_name.into(),
            factory: None,
            namer: None,
            instance_type: None,
        }
    }

    fn from_item(&self, item: &Item) -> Result<Value> {
        let raw = match item {
            Item::Value(value) if !value.is_null_literal() && !value.value().is_empty() => {
                value.value()
            }
            _ => return Ok(Value::Null),
        };
        let factory = self.factory.as_ref().ok_or_else(|| {
            Error::build(format!(
                "Factory by_name(&str) of enum {} not found.",
                self.enum_name
            ))
        })?;
        match factory(raw) {
            Some(value) => Ok(value),
            None => {
                warn!(enumeration = %self.enum_name, value = raw, "enum constant not found");
                Ok(Value::Null)
            }
        }
    }
}

impl fmt::Debug for EnumByNameBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumByNameBuilder")
            .field("enum_name", &self.enum_name)
            .field("bound", &self.factory.is_some())
            .finish()
    }
}

impl Builder for EnumByNameBuilder {
    fn build(&self, _ty: &TypeDef, item: &Item, _model: &Model) -> Result<Value> {
        self.from_item(item)
    }

    fn build_list(&self, _ty: &TypeDef, items: ItemIter<'_>, _model: &Model) -> Result<Value> {
        items.map(|item| self.from_item(item)).collect::<Result<_>>().map(Value::List)
    }

    fn build_array(&self, _ty: &TypeDef, items: ItemIter<'_>, _model: &Model) -> Result<Value> {
        items.map(|item| self.from_item(item)).collect::<Result<_>>().map(Value::Array)
    }

    fn to_dialect(&self, value: &Value) -> Result<String> {
        if value.is_null() {
            return Ok("null".to_string());
        }
        self.namer
            .as_ref()
            .and_then(|namer| namer(value))
            .map(|name| quote(&name))
            .ok_or_else(|| {
                Error::write(format!(
                    "{} is not a constant of enum {}.",
                    value.kind_name(),
                    self.enum_name
                ))
            })
    }

    fn instance_type(&self) -> Option<TypeId> {
        self.instance_type
    }
}
