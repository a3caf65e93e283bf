//! Runtime values and their type tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime type tag.
///
/// Type equality is nominal: two types are equal only when their tags are.
/// There is no subtyping and no implicit conversion between tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Unit,
    Integer,
    FloatingPoint,
    String,
    Boolean,
}

impl Type {
    /// All type tags, in declaration order.
    pub const ALL: [Type; 5] = [
        Type::Unit,
        Type::Integer,
        Type::FloatingPoint,
        Type::String,
        Type::Boolean,
    ];

    /// Human-readable name of the tag.
    pub fn name(self) -> &'static str {
        match self {
            Self::Unit => "Unit",
            Self::Integer => "Integer",
            Self::FloatingPoint => "FloatingPoint",
            Self::String => "String",
            Self::Boolean => "Boolean",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A runtime value.
///
/// The type tag is derived from the variant, so a value can never be
/// separated from its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Unit,
    Integer(i64),
    FloatingPoint(f64),
    String(String),
    Boolean(bool),
}

impl Value {
    /// The type tag paired with this value.
    pub fn ty(&self) -> Type {
        match self {
            Self::Unit => Type::Unit,
            Self::Integer(_) => Type::Integer,
            Self::FloatingPoint(_) => Type::FloatingPoint,
            Self::String(_) => Type::String,
            Self::Boolean(_) => Type::Boolean,
        }
    }

    /// The boolean payload, if this is a `Boolean`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether this is a numeric value equal to zero (`0`, `0.0` or `-0.0`).
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Integer(n) => *n == 0,
            Self::FloatingPoint(x) => *x == 0.0,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => write!(f, "Unit"),
            Self::Integer(n) => write!(f, "{n}"),
            // `{:?}` keeps the decimal point on whole numbers: 3.0, not 3
            Self::FloatingPoint(x) => write!(f, "{x:?}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::FloatingPoint(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}
