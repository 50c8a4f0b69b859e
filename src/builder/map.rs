use smol_str::SmolStr;

use crate::item::{Item, ItemIter};
use crate::model::{Model, TypeDef};
use crate::value::{MapValue, Value};
use crate::{Error, Result};

use super::Builder;

/// Builds [`MapValue`] instances for a map-collection class.
#[derive(Debug, Clone)]
pub struct MapBuilder {
    class: SmolStr,
}

impl MapBuilder {
    pub fn new(class: impl Into<SmolStr>) -> Self {
        Self {
            class: class.into(),
        }
    }

    fn build_map(&self, ty: &TypeDef, item: &Item, model: &Model) -> Result<Value> {
        if !matches!(ty, TypeDef::Map(_)) {
            return Err(Error::build(format!(
                "{} is not a map collection.",
                ty.name()
            )));
        }
        let object = match item {
            Item::Object(object) => object,
            Item::Value(value) if value.is_null_literal() => return Ok(Value::Null),
            other => {
                return Err(Error::build(format!(
                    "Map collection {} expects an object, found {}.",
                    self.class,
                    other.print_class_name()
                )))
            }
        };
        let mut map = MapValue::new(self.class.clone());
        for key in object.keys() {
            if let Some(param) = object.param(key) {
                map.insert(key, param.build_instance(model)?);
            }
        }
        Ok(Value::Map(map))
    }

    fn build_maps(&self, ty: &TypeDef, items: ItemIter<'_>, model: &Model) -> Result<Vec<Value>> {
        items.map(|item| self.build_map(ty, item, model)).collect()
    }
}

impl Builder for MapBuilder {
    fn build(&self, ty: &TypeDef, item: &Item, model: &Model) -> Result<Value> {
        self.build_map(ty, item, model)
    }

    fn build_list(&self, ty: &TypeDef, items: ItemIter<'_>, model: &Model) -> Result<Value> {
        self.build_maps(ty, items, model).map(Value::List)
    }

    fn build_array(&self, ty: &TypeDef, items: ItemIter<'_>, model: &Model) -> Result<Value> {
        self.build_maps(ty, items, model).map(Value::Array)
    }

    fn is_primitive(&self) -> bool {
        false
    }

    fn to_dialect(&self, _value: &Value) -> Result<String> {
        Err(Error::write(format!(
            "Map collection {} cannot be written as a single value.",
            self.class
        )))
    }
}
