//! Field values recovered from model output

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A single field value inside a [`crate::Record`]
///
/// Model output is loosely typed: the same field may arrive as a string in one
/// response and a bare number in the next. Each variant captures one of those
/// shapes so normalization can match on it exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A string value
    Text(String),

    /// An integral number that fits in `i64`
    Integer(i64),

    /// A floating-point number (also used for integers beyond `i64`)
    Float(f64),

    /// A boolean
    Bool(bool),

    /// JSON `null`
    Null,

    /// A nested array or object, carried through untouched
    Composite(Value),
}

impl FieldValue {
    /// Short type name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Null => "null",
            FieldValue::Composite(Value::Array(_)) => "array",
            FieldValue::Composite(_) => "object",
        }
    }

    /// Borrow the value as text, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the value as a float, if it is a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Canonical text form of a numeric value
    ///
    /// Integers print as digits (`12345`), floats use the shortest
    /// round-tripping form and always keep a fractional part (`5000.0`).
    /// Returns `None` for non-numeric values.
    pub fn numeric_text(&self) -> Option<String> {
        match self {
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(
                serde_json::Number::from_f64(*f)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| f.to_string()),
            ),
            _ => None,
        }
    }

    /// Coerce the value to a finite float
    ///
    /// Numbers convert directly, text is trimmed and parsed, booleans map to
    /// `1.0`/`0.0`. Null, composite values and anything non-finite yield `None`.
    pub fn coerce_f64(&self) -> Option<f64> {
        let value = match self {
            FieldValue::Integer(i) => *i as f64,
            FieldValue::Float(f) => *f,
            FieldValue::Text(s) => s.trim().parse::<f64>().ok()?,
            FieldValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            FieldValue::Null | FieldValue::Composite(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Convert back into a JSON value
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Integer(i) => Value::from(*i),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Null => Value::Null,
            FieldValue::Composite(v) => v.clone(),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => FieldValue::Text(s),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Null => FieldValue::Null,
            composite @ (Value::Array(_) | Value::Object(_)) => FieldValue::Composite(composite),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Integer(i) => serializer.serialize_i64(*i),
            FieldValue::Float(f) => serializer.serialize_f64(*f),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::Composite(v) => v.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(FieldValue::from)
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(_) | FieldValue::Float(_) => {
                f.write_str(&self.numeric_text().unwrap_or_default())
            }
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => f.write_str("null"),
            FieldValue::Composite(v) => write!(f, "{}", v),
        }
    }
}
