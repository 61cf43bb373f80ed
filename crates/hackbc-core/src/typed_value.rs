//! Literal values known at compile time.
//!
//! Used for user-attribute arguments, which the definition emitters read
//! before a body is assembled.

use ordered_float::OrderedFloat;

/// A compile-time constant value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypedValue {
    /// `null`
    Null,
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// Floating-point literal.
    Double(OrderedFloat<f64>),
    /// String literal.
    String(String),
    /// Vector of values.
    Vec(Vec<TypedValue>),
}

impl TypedValue {
    /// Shorthand for a string value.
    pub fn string(s: impl Into<String>) -> Self {
        TypedValue::String(s.into())
    }

    /// Shorthand for a floating-point value.
    pub fn double(d: f64) -> Self {
        TypedValue::Double(OrderedFloat(d))
    }

    /// The string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            TypedValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Name of the value's type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            TypedValue::Null => "null",
            TypedValue::Bool(_) => "bool",
            TypedValue::Int(_) => "int",
            TypedValue::Double(_) => "float",
            TypedValue::String(_) => "string",
            TypedValue::Vec(_) => "vec",
        }
    }
}
