pub const NULL_LITERAL: &str = "null";

pub const DEFAULT_INDENT: usize = 2;

pub const GETTER_PREFIX: &str = "get";
pub const SETTER_PREFIX: &str = "set";
pub const BOOLEAN_GETTER_PREFIX: &str = "is";

pub const STRING: &str = "String";
pub const INTEGER: &str = "Integer";
pub const LONG: &str = "Long";
pub const FLOAT: &str = "Float";
pub const DOUBLE: &str = "Double";
pub const BOOLEAN: &str = "Boolean";
pub const INT: &str = "int";
pub const LONG_PRIMITIVE: &str = "long";
pub const FLOAT_PRIMITIVE: &str = "float";
pub const DOUBLE_PRIMITIVE: &str = "double";
pub const BOOLEAN_PRIMITIVE: &str = "boolean";

#[inline]
pub fn is_null_literal(text: &str) -> bool {
    text == NULL_LITERAL
}
