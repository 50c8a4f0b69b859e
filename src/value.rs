use std::any::{type_name, Any, TypeId};
use std::fmt;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::builder::ParamKind;
use crate::num::number::{format_f32, format_f64};
use crate::{Error, Result};

/// A constructed application object stored inside a [`Value`].
///
/// Blanket-implemented for every `Clone + PartialEq + Debug` type that can be
/// shared across threads, so domain structs need no extra impls.
pub trait Instance: Any + Send + Sync + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn clone_box(&self) -> Box<dyn Instance>;
    fn eq_dyn(&self, other: &dyn Instance) -> bool;
    fn type_name(&self) -> &'static str;
}

impl<T> Instance for T
where
    T: Any + Send + Sync + fmt::Debug + Clone + PartialEq,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_box(&self) -> Box<dyn Instance> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn Instance) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

pub struct ObjectValue(Box<dyn Instance>);

impl ObjectValue {
    pub fn new<T: Instance>(value: T) -> Self {
        Self(Box::new(value))
    }

    pub fn instance_type(&self) -> TypeId {
        (*self.0).as_any().type_id()
    }

    pub fn type_name(&self) -> &'static str {
        (*self.0).type_name()
    }

    pub fn is<T: Any>(&self) -> bool {
        (*self.0).as_any().is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.0).as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        (*self.0).as_any_mut().downcast_mut::<T>()
    }

    pub fn downcast<T: Any>(self) -> Result<T> {
        let found = self.type_name();
        self.0
            .into_any()
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| {
                Error::conversion(format!(
                    "Expected an instance of {}, found {found}.",
                    type_name::<T>()
                ))
            })
    }
}

impl Clone for ObjectValue {
    fn clone(&self) -> Self {
        Self((*self.0).clone_box())
    }
}

impl PartialEq for ObjectValue {
    fn eq(&self, other: &Self) -> bool {
        (*self.0).eq_dyn(&*other.0)
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// String-keyed homogeneous map built by a map-collection class.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapValue {
    class: SmolStr,
    entries: IndexMap<String, Value>,
}

impl MapValue {
    pub fn new(class: impl Into<SmolStr>) -> Self {
        Self {
            class: class.into(),
            entries: IndexMap::new(),
        }
    }

    /// Name of the map-collection class this instance belongs to.
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    List(Vec<Value>),
    Array(Vec<Value>),
    Map(MapValue),
    Object(ObjectValue),
}

impl Value {
    pub fn object<T: Instance>(value: T) -> Self {
        Value::Object(ObjectValue::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(i64::from(*value)),
            Value::Long(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(f64::from(*value)),
            Value::Double(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// Elements of a list or array.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_object().and_then(ObjectValue::downcast_ref::<T>)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "Boolean",
            Value::Int(_) => "Integer",
            Value::Long(_) => "Long",
            Value::Float(_) => "Float",
            Value::Double(_) => "Double",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Array(_) => "Array",
            Value::Map(_) => "Map",
            Value::Object(object) => object.type_name(),
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    f.write_str("[")?;
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        fmt::Display::fmt(item, f)?;
    }
    f.write_str("]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Long(value) => write!(f, "{value}"),
            Value::Float(value) => f.write_str(&format_f32(*value)),
            Value::Double(value) => f.write_str(&format_f64(*value)),
            Value::String(value) => f.write_str(value),
            Value::List(items) | Value::Array(items) => write_seq(f, items),
            Value::Map(map) => {
                f.write_str("{")?;
                for (idx, (key, value)) in map.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}={value}")?;
                }
                f.write_str("}")
            }
            Value::Object(object) => write!(f, "{object:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<MapValue> for Value {
    fn from(value: MapValue) -> Self {
        Value::Map(value)
    }
}

impl From<ObjectValue> for Value {
    fn from(value: ObjectValue) -> Self {
        Value::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

/// Typed wrapper marking a domain object inside accessor signatures.
#[derive(Debug, Clone, PartialEq)]
pub struct Obj<T>(pub T);

impl<T> Obj<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Instance> From<Obj<T>> for Value {
    fn from(value: Obj<T>) -> Self {
        Value::object(value.0)
    }
}

/// Conversion from a built [`Value`] into an accessor argument type.
pub trait FromValue: Sized {
    /// Shape used to match constructor signatures.
    fn kind() -> ParamKind;

    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch(expected: &str, found: &Value) -> Error {
    Error::conversion(format!(
        "Expected {expected}, found {}.",
        found.kind_name()
    ))
}

impl FromValue for Value {
    fn kind() -> ParamKind {
        ParamKind::Any
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn kind() -> ParamKind {
        ParamKind::Bool
    }

    fn from_value(value: Value) -> Result<Self> {
        value.as_bool().ok_or_else(|| mismatch("Boolean", &value))
    }
}

impl FromValue for i32 {
    fn kind() -> ParamKind {
        ParamKind::Int
    }

    fn from_value(value: Value) -> Result<Self> {
        value.as_i32().ok_or_else(|| mismatch("Integer", &value))
    }
}

impl FromValue for i64 {
    fn kind() -> ParamKind {
        ParamKind::Long
    }

    fn from_value(value: Value) -> Result<Self> {
        value.as_i64().ok_or_else(|| mismatch("Long", &value))
    }
}

impl FromValue for f32 {
    fn kind() -> ParamKind {
        ParamKind::Float
    }

    fn from_value(value: Value) -> Result<Self> {
        value.as_f32().ok_or_else(|| mismatch("Float", &value))
    }
}

impl FromValue for f64 {
    fn kind() -> ParamKind {
        ParamKind::Double
    }

    fn from_value(value: Value) -> Result<Self> {
        value.as_f64().ok_or_else(|| mismatch("Double", &value))
    }
}

impl FromValue for String {
    fn kind() -> ParamKind {
        ParamKind::Str
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(text) => Ok(text),
            other => Err(mismatch("String", &other)),
        }
    }
}

impl FromValue for MapValue {
    fn kind() -> ParamKind {
        ParamKind::Map
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Map(map) => Ok(map),
            other => Err(mismatch("Map", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn kind() -> ParamKind {
        ParamKind::Seq
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(items) | Value::Array(items) => {
                items.into_iter().map(T::from_value).collect()
            }
            other => Err(mismatch("List", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn kind() -> ParamKind {
        ParamKind::Nullable(Box::new(T::kind()))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: Instance> FromValue for Obj<T> {
    fn kind() -> ParamKind {
        ParamKind::Object(TypeId::of::<T>())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(object) => object.downcast::<T>().map(Obj),
            other => Err(mismatch(type_name::<T>(), &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Point {
        x: i32,
    }

    #[rstest::rstest]
    fn test_object_value_downcast_and_eq() {
        let a = Value::object(Point { x: 1 });
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, Value::object(Point { x: 2 }));
        assert_eq!(a.downcast_ref::<Point>(), Some(&Point { x: 1 }));
        assert!(a.downcast_ref::<String>().is_none());
    }

    #[rstest::rstest]
    fn test_downcast_mismatch_is_conversion_fault() {
        let object = ObjectValue::new(Point { x: 3 });
        let err = object.downcast::<String>().unwrap_err();
        assert!(err.is_build());
        assert!(err.message.contains("Point"));
    }

    #[rstest::rstest]
    fn test_from_value_primitives() {
        assert_eq!(i32::from_value(Value::Int(4)).unwrap(), 4);
        assert_eq!(i64::from_value(Value::Int(4)).unwrap(), 4);
        assert!(i32::from_value(Value::String("4".into())).is_err());
        assert_eq!(Option::<i32>::from_value(Value::Null).unwrap(), None);
        assert_eq!(
            Vec::<String>::from_value(Value::Array(vec!["a".into(), "b".into()])).unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[rstest::rstest]
    fn test_obj_round_trips_through_value() {
        let value: Value = Obj(Point { x: 9 }).into();
        let back = Obj::<Point>::from_value(value).unwrap();
        assert_eq!(back.into_inner(), Point { x: 9 });
    }

    #[rstest::rstest]
    fn test_display_matches_dialect_text() {
        assert_eq!(Value::Double(2.0).to_string(), "2.0");
        assert_eq!(Value::from(vec![1, 2]).to_string(), "[1, 2]");
        assert_eq!(Value::from(Option::<String>::None).to_string(), "null");
        let mut map = MapValue::new("Ports");
        map.insert("http", 80);
        assert_eq!(Value::Map(map).to_string(), "{http=80}");
    }
}
