pub mod field;
pub mod types;

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::builder::{EnumByNameBuilder, NamedVariant, PrimitiveBuilder, PrimitiveKind};
use crate::constants::{
    BOOLEAN, BOOLEAN_PRIMITIVE, DOUBLE, DOUBLE_PRIMITIVE, FLOAT, FLOAT_PRIMITIVE, INT, INTEGER,
    LONG, LONG_PRIMITIVE, STRING,
};
use crate::item::Item;
use crate::options::CastingLevel;
use crate::value::{Instance, Value};
use crate::{Error, Result};

pub use field::{CollectionShape, Field, Validation};
pub use types::{direct_class, ClassDef, InterfaceDef, MapDef, TypeDef};

/// Registry of named types, kept in registration order.
#[derive(Debug, Default)]
pub struct Model {
    name: SmolStr,
    types: IndexMap<SmolStr, Arc<TypeDef>>,
    by_instance: HashMap<TypeId, SmolStr>,
}

impl Model {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            types: IndexMap::new(),
            by_instance: HashMap::new(),
        }
    }

    /// Model with the primitive classes already registered.
    pub fn basic(name: impl Into<SmolStr>) -> Self {
        let mut model = Self::new(name);
        model.add_basic_model();
        model
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a type, replacing any type of the same name.
    pub fn add(&mut self, ty: impl Into<TypeDef>) -> Arc<TypeDef> {
        let ty = Arc::new(ty.into());
        let name = SmolStr::from(ty.name());
        if let Some(instance_type) = ty.instance_type() {
            self.by_instance.insert(instance_type, name.clone());
        }
        if let Some(previous) = self.types.insert(name, Arc::clone(&ty)) {
            self.forget_instance(&previous, ty.instance_type());
        }
        ty
    }

    fn forget_instance(&mut self, previous: &TypeDef, keep: Option<TypeId>) {
        if let Some(instance_type) = previous.instance_type() {
            if Some(instance_type) != keep {
                self.by_instance.remove(&instance_type);
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<TypeDef>> {
        let removed = self.types.shift_remove(name)?;
        self.forget_instance(&removed, None);
        Some(removed)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<TypeDef>> {
        self.types.get(name)
    }

    /// Like [`Model::get`] but reports an unknown name as a model fault.
    pub fn lookup(&self, name: &str) -> Result<Arc<TypeDef>> {
        self.get(name)
            .cloned()
            .ok_or_else(|| Error::model(format!("Type name {name} not found.")))
    }

    /// A directly constructible type (class or map collection) by exact name.
    pub fn get_class(&self, name: &str) -> Option<&Arc<TypeDef>> {
        self.get(name).filter(|ty| ty.is_direct())
    }

    /// First class, in registration order, whose name ends with `suffix`.
    pub fn find_ends_with(&self, suffix: &str) -> Option<&Arc<TypeDef>> {
        self.types
            .values()
            .find(|ty| ty.is_direct() && ty.name().ends_with(suffix))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeDef>> {
        self.types.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(SmolStr::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn add_basic_model(&mut self) {
        let primitives = [
            (STRING, PrimitiveKind::String, true),
            (INTEGER, PrimitiveKind::Int, true),
            (LONG, PrimitiveKind::Long, true),
            (FLOAT, PrimitiveKind::Float, true),
            (DOUBLE, PrimitiveKind::Double, true),
            (BOOLEAN, PrimitiveKind::Bool, true),
            (INT, PrimitiveKind::Int, false),
            (LONG_PRIMITIVE, PrimitiveKind::Long, false),
            (FLOAT_PRIMITIVE, PrimitiveKind::Float, false),
            (DOUBLE_PRIMITIVE, PrimitiveKind::Double, false),
            (BOOLEAN_PRIMITIVE, PrimitiveKind::Bool, false),
        ];
        for (name, kind, nullable) in primitives {
            self.add(ClassDef::new(name, PrimitiveBuilder::new(kind, nullable)));
        }
    }

    pub fn add_enum_by_name<T>(&mut self, name: &str) -> Arc<TypeDef>
    where
        T: NamedVariant + Instance,
    {
        self.add(ClassDef::new(name, EnumByNameBuilder::of::<T>(name)))
    }

    /// Class registered for the runtime type of `value`.
    pub fn class_for_value(&self, value: &Value) -> Option<&Arc<TypeDef>> {
        let name = match value {
            Value::Object(object) => self.by_instance.get(&object.instance_type())?.as_str(),
            Value::Map(map) => map.class(),
            Value::String(_) => STRING,
            Value::Bool(_) => BOOLEAN,
            Value::Int(_) => INTEGER,
            Value::Long(_) => LONG,
            Value::Float(_) => FLOAT,
            Value::Double(_) => DOUBLE,
            Value::Null | Value::List(_) | Value::Array(_) => return None,
        };
        self.get(name)
    }

    /// Checks that every type name referenced by a field, interface member or
    /// map item class is registered.
    pub fn validate(&self) -> Result<()> {
        for ty in self.types.values() {
            for (owner, type_name) in ty.references() {
                if !self.types.contains_key(type_name) {
                    return Err(Error::model(format!(
                        "Type {type_name} referenced by {}.{owner} is not registered.",
                        ty.name()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// A frozen model together with the write-side casting policy. Cheap to
/// clone and shareable across threads.
#[derive(Debug, Clone)]
pub struct Definition {
    model: Arc<Model>,
    casting_level: CastingLevel,
}

impl Definition {
    pub fn new(model: Model, casting_level: CastingLevel) -> Result<Self> {
        model.validate()?;
        Ok(Self {
            model: Arc::new(model),
            casting_level,
        })
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn casting_level(&self) -> CastingLevel {
        self.casting_level
    }

    /// Same frozen model under another casting policy.
    pub fn with_casting_level(&self, casting_level: CastingLevel) -> Self {
        Self {
            model: Arc::clone(&self.model),
            casting_level,
        }
    }

    pub fn root(&self, name: Option<&str>) -> Result<Option<Arc<TypeDef>>> {
        name.map(|name| self.model.lookup(name)).transpose()
    }

    pub fn build(&self, item: &Item) -> Result<Value> {
        item.build_instance(&self.model)
    }
}
