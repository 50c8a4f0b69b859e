use std::any::TypeId;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use smol_str::SmolStr;
use tracing::warn;

use crate::builder::{build_each, Builder, MapBuilder};
use crate::item::{Item, ItemIter};
use crate::options::CastingLevel;
use crate::value::Value;
use crate::{Error, Result};

use super::field::{CollectionShape, Field, Validation};
use super::Model;

/// A registered schema node.
#[derive(Debug)]
pub enum TypeDef {
    Class(ClassDef),
    Interface(InterfaceDef),
    Map(MapDef),
}

#[derive(Debug, Clone)]
pub struct ClassDef {
    name: SmolStr,
    keys: Vec<SmolStr>,
    fields: HashMap<SmolStr, Field>,
    builder: Option<Arc<dyn Builder>>,
    skipping_nulls: bool,
}

/// Permitted set of classes for a polymorphic position.
#[derive(Debug, Clone)]
pub struct InterfaceDef {
    name: SmolStr,
    members: Vec<SmolStr>,
    builder: Option<Arc<dyn Builder>>,
}

/// String-keyed homogeneous map; every key is a valid field.
#[derive(Debug, Clone)]
pub struct MapDef {
    base: ClassDef,
    item_class: SmolStr,
    shape: CollectionShape,
}

impl ClassDef {
    pub fn new(name: impl Into<SmolStr>, builder: impl Builder + 'static) -> Self {
        Self::with_builder(name, Some(Arc::new(builder)))
    }

    /// A class whose items build to `Null`.
    pub fn without_builder(name: impl Into<SmolStr>) -> Self {
        Self::with_builder(name, None)
    }

    fn with_builder(name: impl Into<SmolStr>, builder: Option<Arc<dyn Builder>>) -> Self {
        Self {
            name: name.into(),
            keys: Vec::new(),
            fields: HashMap::new(),
            builder,
            skipping_nulls: false,
        }
    }

    pub fn skip_nulls(mut self, skipping_nulls: bool) -> Self {
        self.skipping_nulls = skipping_nulls;
        self
    }

    pub fn set_skipping_nulls(&mut self, skipping_nulls: bool) {
        self.skipping_nulls = skipping_nulls;
    }

    pub fn is_skipping_nulls(&self) -> bool {
        self.skipping_nulls
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn builder(&self) -> Option<&Arc<dyn Builder>> {
        self.builder.as_ref()
    }

    /// Adds or replaces a field. A replaced field keeps its position.
    pub fn add(&mut self, field: Field) -> &mut Self {
        let key = SmolStr::from(field.name());
        if self.fields.insert(key.clone(), field).is_none() {
            self.keys.push(key);
        }
        self
    }

    fn field_for(&self, name: &str, ty: &TypeDef) -> Field {
        Field::with_prefixes(name, ty.name(), ty.getter_prefix(), ty.setter_prefix())
    }

    pub fn add_field(&mut self, name: &str, ty: &TypeDef) -> &mut Self {
        let field = self.field_for(name, ty);
        self.add(field)
    }

    pub fn add_collection(
        &mut self,
        name: &str,
        ty: &TypeDef,
        shape: CollectionShape,
    ) -> &mut Self {
        let field = self.field_for(name, ty).with_shape(shape);
        self.add(field)
    }

    pub fn add_validated(&mut self, name: &str, ty: &TypeDef, validation: Validation) -> &mut Self {
        let field = self.field_for(name, ty).with_validation(validation);
        self.add(field)
    }

    pub fn add_cparam(&mut self, name: &str, ty: &TypeDef) -> &mut Self {
        let field = self.field_for(name, ty).constructor_param();
        self.add(field)
    }

    pub fn add_cparam_collection(
        &mut self,
        name: &str,
        ty: &TypeDef,
        shape: CollectionShape,
    ) -> &mut Self {
        let field = self.field_for(name, ty).with_shape(shape).constructor_param();
        self.add(field)
    }

    /// Field referring to a type by name, for types not registered yet
    /// (including this class itself). Uses `get`/`set` accessors.
    pub fn add_field_named(
        &mut self,
        name: &str,
        type_name: &str,
        shape: CollectionShape,
    ) -> &mut Self {
        self.add(Field::new(name, type_name).with_shape(shape))
    }

    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Field> {
        self.keys.retain(|existing| existing != key);
        self.fields.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(SmolStr::as_str)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.keys.iter().filter_map(|key| self.fields.get(key))
    }

    pub fn add_from_superclass(&mut self, parent: &ClassDef) -> &mut Self {
        for field in parent.fields() {
            self.add(field.clone());
        }
        self
    }
}

impl InterfaceDef {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            builder: None,
        }
    }

    pub fn with_builder(mut self, builder: impl Builder + 'static) -> Self {
        self.builder = Some(Arc::new(builder));
        self
    }

    pub fn member(mut self, class: &TypeDef) -> Self {
        self.add_member(class.name());
        self
    }

    pub fn add_member(&mut self, class_name: &str) -> &mut Self {
        if !self.contains_name(class_name) {
            self.members.push(SmolStr::from(class_name));
        }
        self
    }

    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(SmolStr::as_str)
    }

    pub fn contains_name(&self, class_name: &str) -> bool {
        self.members.iter().any(|member| member == class_name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl MapDef {
    pub fn new(name: impl Into<SmolStr>, item_class: &TypeDef, shape: CollectionShape) -> Self {
        Self::named(name, item_class.name(), shape)
    }

    pub fn named(name: impl Into<SmolStr>, item_class: &str, shape: CollectionShape) -> Self {
        let name = name.into();
        Self {
            base: ClassDef::new(name.clone(), MapBuilder::new(name)),
            item_class: SmolStr::from(item_class),
            shape,
        }
    }

    pub fn skip_nulls(mut self, skipping_nulls: bool) -> Self {
        self.base.skipping_nulls = skipping_nulls;
        self
    }

    pub fn item_class(&self) -> &str {
        &self.item_class
    }

    pub fn shape(&self) -> CollectionShape {
        self.shape
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// Synthesized descriptor for any key.
    pub fn field(&self, key: &str) -> Field {
        Field::with_prefixes(key, self.item_class.as_str(), "", "").with_shape(self.shape)
    }
}

impl TypeDef {
    pub fn name(&self) -> &str {
        match self {
            TypeDef::Class(class) => class.name(),
            TypeDef::Interface(interface) => interface.name(),
            TypeDef::Map(map) => map.name(),
        }
    }

    /// Classes and maps can be instantiated directly; interfaces need a cast.
    pub fn is_direct(&self) -> bool {
        !matches!(self, TypeDef::Interface(_))
    }

    pub fn contains(&self, check: &TypeDef) -> bool {
        match self {
            TypeDef::Class(class) => check.is_direct() && class.name() == check.name(),
            TypeDef::Interface(interface) => interface.contains_name(check.name()),
            TypeDef::Map(_) => matches!(check, TypeDef::Map(_)),
        }
    }

    pub fn as_class(&self) -> Option<&ClassDef> {
        match self {
            TypeDef::Class(class) => Some(class),
            TypeDef::Map(map) => Some(&map.base),
            TypeDef::Interface(_) => None,
        }
    }

    fn builder(&self) -> Option<&Arc<dyn Builder>> {
        match self {
            TypeDef::Class(class) => class.builder.as_ref(),
            TypeDef::Interface(interface) => interface.builder.as_ref(),
            TypeDef::Map(map) => map.base.builder.as_ref(),
        }
    }

    pub fn build(&self, item: &Item, model: &Model) -> Result<Value> {
        match self {
            TypeDef::Interface(interface) => Err(Error::build(format!(
                "Interface {} cannot build an instance without a cast.",
                interface.name()
            ))),
            _ => match self.builder() {
                Some(builder) => builder.build(self, item, model),
                None => Ok(Value::Null),
            },
        }
    }

    pub fn build_collection(
        &self,
        items: ItemIter<'_>,
        as_list: bool,
        model: &Model,
    ) -> Result<Value> {
        match self.builder() {
            Some(builder) if as_list => builder.build_list(self, items, model),
            Some(builder) => builder.build_array(self, items, model),
            None if matches!(self, TypeDef::Interface(_)) => {
                let values = build_each(items, model)?;
                Ok(if as_list {
                    Value::List(values)
                } else {
                    Value::Array(values)
                })
            }
            None => Ok(Value::Null),
        }
    }

    pub fn is_primitive(&self) -> bool {
        match self {
            TypeDef::Class(class) => class.builder.as_ref().map_or(true, |b| b.is_primitive()),
            TypeDef::Interface(_) | TypeDef::Map(_) => false,
        }
    }

    pub fn to_dialect(&self, value: &Value) -> Result<String> {
        match self {
            TypeDef::Map(map) => Err(Error::write(format!(
                "Map collection {} cannot be written as a single value.",
                map.name()
            ))),
            _ => match self.builder() {
                Some(builder) => builder.to_dialect(value),
                None => Ok(value.to_string()),
            },
        }
    }

    pub fn as_collection<'v>(&self, value: &'v Value) -> Result<&'v [Value]> {
        match self.builder() {
            Some(builder) => builder.as_collection(value),
            None => value.as_slice().ok_or_else(|| {
                Error::write(format!(
                    "Expected a list or array for {}, found {}.",
                    self.name(),
                    value.kind_name()
                ))
            }),
        }
    }

    pub fn needs_cast(&self, level: CastingLevel) -> bool {
        match self {
            TypeDef::Interface(_) => level != CastingLevel::Never,
            TypeDef::Class(_) | TypeDef::Map(_) => level == CastingLevel::Always,
        }
    }

    pub fn getter_prefix(&self) -> &str {
        self.builder().map_or(crate::constants::GETTER_PREFIX, |b| b.getter_prefix())
    }

    pub fn setter_prefix(&self) -> &str {
        self.builder().map_or(crate::constants::SETTER_PREFIX, |b| b.setter_prefix())
    }

    pub fn instance_type(&self) -> Option<TypeId> {
        match self {
            TypeDef::Class(class) => class.builder.as_ref().and_then(|b| b.instance_type()),
            TypeDef::Interface(_) | TypeDef::Map(_) => None,
        }
    }

    pub fn is_skipping_nulls(&self) -> bool {
        self.as_class().is_some_and(ClassDef::is_skipping_nulls)
    }

    pub fn field(&self, key: &str) -> Option<Cow<'_, Field>> {
        match self {
            TypeDef::Class(class) => class.field(key).map(Cow::Borrowed),
            TypeDef::Map(map) => Some(Cow::Owned(map.field(key))),
            TypeDef::Interface(_) => None,
        }
    }

    /// Keys the writer walks for `value`: declared fields, or the entries of
    /// a map instance.
    pub fn keys_for_write(&self, value: &Value) -> Vec<String> {
        match self {
            TypeDef::Class(class) => class.keys().map(str::to_string).collect(),
            TypeDef::Map(_) => value
                .as_map()
                .map(|map| map.keys().map(str::to_string).collect())
                .unwrap_or_default(),
            TypeDef::Interface(_) => Vec::new(),
        }
    }

    pub fn get_attr(&self, field: &Field, value: &Value) -> Value {
        match self {
            TypeDef::Map(_) => value
                .as_map()
                .and_then(|map| map.get(field.name()))
                .cloned()
                .unwrap_or_default(),
            TypeDef::Class(class) => {
                let read = class
                    .builder
                    .as_ref()
                    .and_then(|builder| builder.read_field(field.getter(), value));
                read.unwrap_or_else(|| {
                    warn!(class = %class.name(), getter = %field.getter(), "getter not found");
                    Value::Null
                })
            }
            TypeDef::Interface(_) => Value::Null,
        }
    }

    /// Type names this definition refers to.
    pub(crate) fn references(&self) -> Vec<(&str, &str)> {
        match self {
            TypeDef::Class(class) => class
                .fields()
                .map(|field| (field.name(), field.type_name()))
                .collect(),
            TypeDef::Interface(interface) => interface
                .members()
                .map(|member| ("member", member))
                .collect(),
            TypeDef::Map(map) => {
                let mut refs: Vec<(&str, &str)> = map
                    .base
                    .fields()
                    .map(|field| (field.name(), field.type_name()))
                    .collect();
                refs.push(("item class", map.item_class()));
                refs
            }
        }
    }
}

impl From<ClassDef> for TypeDef {
    fn from(class: ClassDef) -> Self {
        TypeDef::Class(class)
    }
}

impl From<InterfaceDef> for TypeDef {
    fn from(interface: InterfaceDef) -> Self {
        TypeDef::Interface(interface)
    }
}

impl From<MapDef> for TypeDef {
    fn from(map: MapDef) -> Self {
        TypeDef::Map(map)
    }
}

/// The type itself when it is directly constructible.
pub fn direct_class(ty: Option<&Arc<TypeDef>>) -> Option<Arc<TypeDef>> {
    ty.filter(|ty| ty.is_direct()).cloned()
}
