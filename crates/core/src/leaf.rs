//! Typed scalar leaves
//!
//! A [`Leaf`] is the unit of storage: one scalar attached to one label.
//! JSON `null` has no leaf form; a null is stored as the absence of a node.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// Largest integer magnitude an `f64` represents exactly (2^53)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Discriminant of a [`Leaf`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafKind {
    /// UTF-8 string
    String,
    /// IEEE-754 double
    Number,
    /// Boolean
    Bool,
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafKind::String => write!(f, "string"),
            LeafKind::Number => write!(f, "number"),
            LeafKind::Bool => write!(f, "bool"),
        }
    }
}

/// A scalar value stored under a label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Leaf {
    /// String leaf
    String(String),
    /// Numeric leaf; integers and floats share this kind
    Number(f64),
    /// Boolean leaf
    Bool(bool),
}

impl Leaf {
    /// Get the leaf kind
    pub fn kind(&self) -> LeafKind {
        match self {
            Leaf::String(_) => LeafKind::String,
            Leaf::Number(_) => LeafKind::Number,
            Leaf::Bool(_) => LeafKind::Bool,
        }
    }

    /// Convert a JSON scalar into a leaf
    ///
    /// Returns `None` for `null`, arrays and objects. Numbers that have no
    /// `f64` form fall back to their string rendering.
    pub fn from_json(value: &Value) -> Option<Leaf> {
        match value {
            Value::Null | Value::Array(_) | Value::Object(_) => None,
            Value::Bool(b) => Some(Leaf::Bool(*b)),
            Value::Number(n) => Some(match n.as_f64() {
                Some(f) => Leaf::Number(f),
                None => Leaf::String(n.to_string()),
            }),
            Value::String(s) => Some(Leaf::String(s.clone())),
        }
    }

    /// Convert the leaf back into a JSON scalar
    ///
    /// Integral numbers within the exactly-representable range come back as
    /// JSON integers, so `1` survives a round trip as `1` and not `1.0`.
    /// `-0.0` stays a float to keep its sign. JSON has no NaN or infinity,
    /// so a non-finite number renders as its string form.
    pub fn to_json(&self) -> Value {
        match self {
            Leaf::String(s) => Value::String(s.clone()),
            Leaf::Bool(b) => Value::Bool(*b),
            Leaf::Number(f) => {
                let negative_zero = *f == 0.0 && f.is_sign_negative();
                if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER && !negative_zero {
                    Value::from(*f as i64)
                } else {
                    match Number::from_f64(*f) {
                        Some(n) => Value::Number(n),
                        None => Value::String(f.to_string()),
                    }
                }
            }
        }
    }

    /// Get the string value, if this is a string leaf
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Leaf::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the numeric value, if this is a number leaf
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Leaf::Number(f) => Some(*f),
            _ => None,
        }
    }

    /// Get the boolean value, if this is a bool leaf
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Leaf::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<&str> for Leaf {
    fn from(s: &str) -> Self {
        Leaf::String(s.to_string())
    }
}

impl From<String> for Leaf {
    fn from(s: String) -> Self {
        Leaf::String(s)
    }
}

/// Non-finite values become string leaves (`"NaN"`, `"inf"`, `"-inf"`),
/// the same fallback [`Leaf::from_json`] uses for numbers without an `f64`.
impl From<f64> for Leaf {
    fn from(f: f64) -> Self {
        if f.is_finite() {
            Leaf::Number(f)
        } else {
            Leaf::String(f.to_string())
        }
    }
}

impl From<i64> for Leaf {
    fn from(i: i64) -> Self {
        Leaf::Number(i as f64)
    }
}

impl From<bool> for Leaf {
    fn from(b: bool) -> Self {
        Leaf::Bool(b)
    }
}
