use smol_str::SmolStr;

use crate::constants::{GETTER_PREFIX, SETTER_PREFIX};
use crate::text::string::capitalize;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectionShape {
    #[default]
    None,
    List,
    Array,
}

impl CollectionShape {
    pub fn is_list_or_array(self) -> bool {
        !matches!(self, CollectionShape::None)
    }
}

/// Post-set check that re-reads a field through its getter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validation {
    #[default]
    None,
    Equals,
    /// The value read back must end with the value that was set.
    EndsWith,
}

impl Validation {
    pub fn is_active(self) -> bool {
        !matches!(self, Validation::None)
    }

    pub fn validate(self, from_document: &Value, target: &Value) -> bool {
        match self {
            Validation::None => true,
            Validation::Equals => match (from_document, target) {
                (Value::Float(a), Value::Float(b)) if a.is_nan() && b.is_nan() => true,
                (Value::Double(a), Value::Double(b)) if a.is_nan() && b.is_nan() => true,
                _ => from_document == target,
            },
            Validation::EndsWith => target
                .to_string()
                .ends_with(&from_document.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: SmolStr,
    type_name: SmolStr,
    shape: CollectionShape,
    getter: SmolStr,
    setter: SmolStr,
    validation: Validation,
    constructor_param: bool,
}

impl Field {
    /// Field with the default `get`/`set` accessor names.
    pub fn new(name: impl Into<SmolStr>, type_name: impl Into<SmolStr>) -> Self {
        Self::with_prefixes(name, type_name, GETTER_PREFIX, SETTER_PREFIX)
    }

    pub(crate) fn with_prefixes(
        name: impl Into<SmolStr>,
        type_name: impl Into<SmolStr>,
        getter_prefix: &str,
        setter_prefix: &str,
    ) -> Self {
        let name = name.into();
        let norm = capitalize(&name);
        Self {
            getter: SmolStr::from(format!("{getter_prefix}{norm}")),
            setter: SmolStr::from(format!("{setter_prefix}{norm}")),
            name,
            type_name: type_name.into(),
            shape: CollectionShape::None,
            validation: Validation::None,
            constructor_param: false,
        }
    }

    pub fn with_shape(mut self, shape: CollectionShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_accessors(
        mut self,
        getter: impl Into<SmolStr>,
        setter: impl Into<SmolStr>,
    ) -> Self {
        self.getter = getter.into();
        self.setter = setter.into();
        self
    }

    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Binds the field to a constructor argument instead of a setter.
    pub fn constructor_param(mut self) -> Self {
        self.constructor_param = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn shape(&self) -> CollectionShape {
        self.shape
    }

    pub fn is_as_list(&self) -> bool {
        self.shape == CollectionShape::List
    }

    pub fn is_as_list_or_array(&self) -> bool {
        self.shape.is_list_or_array()
    }

    pub fn getter(&self) -> &str {
        &self.getter
    }

    pub fn setter(&self) -> &str {
        &self.setter
    }

    pub fn validation(&self) -> Validation {
        self.validation
    }

    pub fn is_constructor_param(&self) -> bool {
        self.constructor_param
    }
}
