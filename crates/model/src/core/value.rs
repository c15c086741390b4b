use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell value as delivered by the remote API.
///
/// The API is schemaless, so cells are kept as the scalar JSON shape they
/// arrived in. Numbers keep their literal text from the response body.
/// Anything non-scalar is preserved verbatim as `Json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Number(serde_json::Number),
    String(String),
    Boolean(bool),
    Json(serde_json::Value),
    Null,
}

impl Value {
    pub fn as_string(&self) -> Option<String> {
        match self {
            Value::Number(n) => Some(n.to_string()),
            Value::String(v) => Some(v.clone()),
            Value::Boolean(v) => Some(v.to_string()),
            Value::Json(v) => Some(v.to_string()),
            Value::Null => None,
        }
    }

    /// Text written into a delimited-text cell. Nulls become empty cells.
    pub fn to_cell(&self) -> String {
        self.as_string().unwrap_or_default()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn size_bytes(&self) -> usize {
        match self {
            Value::Number(n) => n.to_string().len(),
            Value::String(s) => s.len(),
            Value::Boolean(_) => std::mem::size_of::<bool>(),
            Value::Json(v) => serde_json::to_string(v).map_or(0, |s| s.len()),
            Value::Null => 0,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Number(n) => Value::Number(n),
            other @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Value::Json(other)
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            other => write!(f, "{}", other.to_cell()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldValue {
    pub name: String,
    pub value: Value,
}

impl FieldValue {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        FieldValue {
            name: name.into(),
            value,
        }
    }
}
