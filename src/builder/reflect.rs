use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::item::Item;
use crate::model::{ClassDef, Field, Model, TypeDef};
use crate::value::{FromValue, Instance, Value};
use crate::{Error, Result};

use super::Builder;

/// Shape of one constructor argument. `Nullable` also accepts `Null`, which
/// makes `Option<T>` parameters match absent values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    Bool,
    Int,
    Long,
    Float,
    Double,
    Str,
    Seq,
    Map,
    Object(TypeId),
    Nullable(Box<ParamKind>),
    Any,
}

impl ParamKind {
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ParamKind::Any, _) | (ParamKind::Nullable(_), Value::Null) => true,
            (ParamKind::Nullable(inner), value) => inner.accepts(value),
            (ParamKind::Bool, Value::Bool(_))
            | (ParamKind::Int, Value::Int(_))
            | (ParamKind::Long, Value::Long(_))
            | (ParamKind::Float, Value::Float(_))
            | (ParamKind::Double, Value::Double(_))
            | (ParamKind::Str, Value::String(_))
            | (ParamKind::Seq, Value::List(_) | Value::Array(_))
            | (ParamKind::Map, Value::Map(_)) => true,
            (ParamKind::Object(expected), Value::Object(object)) => {
                object.instance_type() == *expected
            }
            _ => false,
        }
    }
}

type Make = Arc<dyn Fn(Vec<Value>) -> Result<Value> + Send + Sync>;
type Setter = Arc<dyn Fn(&mut Value, Value) -> Result<()> + Send + Sync>;
type Getter = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

#[derive(Clone)]
struct Constructor {
    params: Vec<ParamKind>,
    make: Make,
}

impl Constructor {
    fn matches(&self, args: &[Value]) -> bool {
        self.params.len() == args.len()
            && self.params.iter().zip(args).all(|(kind, arg)| kind.accepts(arg))
    }
}

/// Builds domain objects from accessor tables registered per class.
#[derive(Clone)]
pub struct ReflectBuilder {
    type_name: SmolStr,
    instance_type: TypeId,
    constructors: Vec<Constructor>,
    setters: HashMap<SmolStr, Setter>,
    getters: HashMap<SmolStr, Getter>,
}

impl fmt::Debug for ReflectBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut setters: Vec<_> = self.setters.keys().collect();
        setters.sort();
        let mut getters: Vec<_> = self.getters.keys().collect();
        getters.sort();
        f.debug_struct("ReflectBuilder")
            .field("type_name", &self.type_name)
            .field(
                "constructors",
                &self.constructors.iter().map(|c| &c.params).collect::<Vec<_>>(),
            )
            .field("setters", &setters)
            .field("getters", &getters)
            .finish()
    }
}

fn simple_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

fn next_arg(args: &mut std::vec::IntoIter<Value>) -> Result<Value> {
    args.next()
        .ok_or_else(|| Error::build("Constructor called with too few arguments."))
}

fn target_mut<T: Instance>(target: &mut Value) -> Result<&mut T> {
    let found = match target {
        Value::Object(object) => object.downcast_mut::<T>(),
        _ => None,
    };
    found.ok_or_else(|| Error::build(format!("Target is not an instance of {}.", type_name::<T>())))
}

impl ReflectBuilder {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    fn setter_fault(class: &ClassDef, field: &Field, param: &Item) -> String {
        format!(
            "{}.{}({} {})",
            class.name(),
            field.setter(),
            param.print_class_name(),
            field.name()
        )
    }

    fn create_instance(&self, class: &ClassDef, item: &Item, model: &Model) -> Result<Value> {
        let params: SmallVec<[&Field; 4]> =
            class.fields().filter(|f| f.is_constructor_param()).collect();
        let mut args = Vec::with_capacity(params.len());
        for field in &params {
            match item.param(field.name()) {
                Some(param) => args.push(param.build_instance(model)?),
                None if class.is_skipping_nulls() => args.push(Value::Null),
                None => {
                    return Err(Error::build(format!(
                        "Item '{}' not found but is necessary for the constructor of class {}.",
                        field.name(),
                        class.name()
                    )))
                }
            }
        }
        let Some(constructor) = self.constructors.iter().find(|c| c.matches(&args)) else {
            return Err(self.missing_constructor(&params));
        };
        (constructor.make)(args).map_err(|err| {
            Error::build(format!(
                "Calling the constructor of {} failed: {}",
                self.type_name, err.message
            ))
        })
    }

    fn missing_constructor(&self, params: &[&Field]) -> Error {
        if params.is_empty() {
            return Error::build(format!(
                "Constructor of {} without params not found.",
                self.type_name
            ));
        }
        let names: Vec<&str> = params.iter().map(|f| f.name()).collect();
        Error::build(format!(
            "Constructor of {} with {} params ({}) not found.",
            self.type_name,
            params.len(),
            names.join(", ")
        ))
    }
}

impl Builder for ReflectBuilder {
    fn build(&self, ty: &TypeDef, item: &Item, model: &Model) -> Result<Value> {
        let class = ty
            .as_class()
            .ok_or_else(|| Error::build(format!("{} is not a class.", ty.name())))?;
        if let Item::Value(value) = item {
            if value.is_null_literal() {
                return Ok(Value::Null);
            }
        }
        let mut instance = self.create_instance(class, item, model)?;
        for field in class.fields() {
            if field.is_constructor_param() {
                continue;
            }
            let Some(param) = item.param(field.name()) else {
                continue;
            };
            let built = param.build_instance(model)?;
            let Some(setter) = self.setters.get(field.setter()) else {
                return Err(Error::build(format!(
                    "Method not found: {}",
                    Self::setter_fault(class, field, param)
                )));
            };
            let expected = field.validation().is_active().then(|| built.clone());
            setter(&mut instance, built).map_err(|err| {
                Error::build(format!(
                    "Exception invoking {}: {}",
                    Self::setter_fault(class, field, param),
                    err.message
                ))
            })?;
            let (Some(expected), Some(getter)) = (expected, self.getters.get(field.getter())) else {
                continue;
            };
            let target = getter(&instance).unwrap_or_default();
            if !field.validation().validate(&expected, &target) {
                return Err(Error::build(format!(
                    "ValidationException invoking {}: Expected '{expected}', found '{target}'",
                    Self::setter_fault(class, field, param)
                )));
            }
        }
        Ok(instance)
    }

    fn is_primitive(&self) -> bool {
        false
    }

    fn to_dialect(&self, value: &Value) -> Result<String> {
        Err(Error::write(format!(
            "{} of {} cannot be written as a single value.",
            value.kind_name(),
            self.type_name
        )))
    }

    fn instance_type(&self) -> Option<TypeId> {
        Some(self.instance_type)
    }

    fn read_field(&self, getter: &str, value: &Value) -> Option<Value> {
        self.getters.get(getter).and_then(|read| read(value))
    }
}

/// Typed registration front for [`ReflectBuilder`].
///
/// ```
/// use jsoncast::builder::Reflector;
///
/// #[derive(Debug, Clone, PartialEq, Default)]
/// struct Person {
///     name: String,
/// }
///
/// let builder = Reflector::<Person>::new()
///     .default_constructor()
///     .setter("setName", |p: &mut Person, name: String| p.name = name)
///     .getter("getName", |p: &Person| p.name.clone())
///     .finish();
/// assert_eq!(builder.type_name(), "Person");
/// ```
pub struct Reflector<T> {
    inner: ReflectBuilder,
    marker: PhantomData<fn() -> T>,
}

impl<T: Instance> Default for Reflector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Instance> Reflector<T> {
    pub fn new() -> Self {
        Self {
            inner: ReflectBuilder {
                type_name: SmolStr::from(simple_name(type_name::<T>())),
                instance_type: TypeId::of::<T>(),
                constructors: Vec::new(),
                setters: HashMap::new(),
                getters: HashMap::new(),
            },
            marker: PhantomData,
        }
    }

    pub fn default_constructor(self) -> Self
    where
        T: Default,
    {
        self.constructor(Vec::new(), |_| Ok(T::default()))
    }

    /// Registers a constructor taking arguments of the given kinds, in
    /// field declaration order.
    pub fn constructor<F>(mut self, params: Vec<ParamKind>, make: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<T> + Send + Sync + 'static,
    {
        self.inner.constructors.push(Constructor {
            params,
            make: Arc::new(move |args: Vec<Value>| make(args).map(Value::object)),
        });
        self
    }

    pub fn constructor1<A, F>(self, make: F) -> Self
    where
        A: FromValue,
        F: Fn(A) -> T + Send + Sync + 'static,
    {
        self.constructor(vec![A::kind()], move |args| {
            let mut args = args.into_iter();
            Ok(make(A::from_value(next_arg(&mut args)?)?))
        })
    }

    pub fn constructor2<A, B, F>(self, make: F) -> Self
    where
        A: FromValue,
        B: FromValue,
        F: Fn(A, B) -> T + Send + Sync + 'static,
    {
        self.constructor(vec![A::kind(), B::kind()], move |args| {
            let mut args = args.into_iter();
            let a = A::from_value(next_arg(&mut args)?)?;
            let b = B::from_value(next_arg(&mut args)?)?;
            Ok(make(a, b))
        })
    }

    pub fn constructor3<A, B, C, F>(self, make: F) -> Self
    where
        A: FromValue,
        B: FromValue,
        C: FromValue,
        F: Fn(A, B, C) -> T + Send + Sync + 'static,
    {
        self.constructor(vec![A::kind(), B::kind(), C::kind()], move |args| {
            let mut args = args.into_iter();
            let a = A::from_value(next_arg(&mut args)?)?;
            let b = B::from_value(next_arg(&mut args)?)?;
            let c = C::from_value(next_arg(&mut args)?)?;
            Ok(make(a, b, c))
        })
    }

    pub fn setter<V, F>(self, name: &str, set: F) -> Self
    where
        V: FromValue,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.try_setter(name, move |target: &mut T, value: V| {
            set(target, value);
            Ok(())
        })
    }

    /// Setter that may reject the value.
    pub fn try_setter<V, F>(mut self, name: &str, set: F) -> Self
    where
        V: FromValue,
        F: Fn(&mut T, V) -> Result<()> + Send + Sync + 'static,
    {
        let erased: Setter = Arc::new(move |target: &mut Value, value: Value| {
            let value = V::from_value(value)?;
            set(target_mut::<T>(target)?, value)
        });
        self.inner.setters.insert(SmolStr::from(name), erased);
        self
    }

    pub fn getter<V, F>(mut self, name: &str, get: F) -> Self
    where
        V: Into<Value>,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        let erased: Getter =
            Arc::new(move |value: &Value| {
                value.downcast_ref::<T>().map(|target| get(target).into())
            });
        self.inner.getters.insert(SmolStr::from(name), erased);
        self
    }

    pub fn finish(self) -> ReflectBuilder {
        self.inner
    }
}

impl<T: Instance> From<Reflector<T>> for ReflectBuilder {
    fn from(reflector: Reflector<T>) -> Self {
        reflector.finish()
    }
}
