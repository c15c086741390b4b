use crate::{
    core::value::{FieldValue, Value},
    error::ModelError,
};
use serde::{Deserialize, Serialize};

/// One flat record returned by the remote API.
///
/// Field order is the order the keys appeared in the response body; the
/// header of an encoded page is taken from that order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub field_values: Vec<FieldValue>,
}

impl Record {
    pub fn new(field_values: Vec<FieldValue>) -> Self {
        Record { field_values }
    }

    pub fn from_json_object(
        object: serde_json::Map<String, serde_json::Value>,
    ) -> Record {
        let field_values = object
            .into_iter()
            .map(|(name, value)| FieldValue::new(name, Value::from(value)))
            .collect();
        Record { field_values }
    }

    pub fn from_json(value: serde_json::Value) -> Result<Record, ModelError> {
        match value {
            serde_json::Value::Object(object) => Ok(Record::from_json_object(object)),
            other => Err(ModelError::NotAnObject(json_kind(&other).to_string())),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.field_values.iter().find(|f| f.name == field)
    }

    pub fn get_value(&self, field: &str) -> Value {
        self.get(field)
            .map(|f| f.value.clone())
            .unwrap_or(Value::Null)
    }

    /// Removes `field` if present, keeping the order of the remaining fields.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        let idx = self.field_values.iter().position(|f| f.name == field)?;
        Some(self.field_values.remove(idx).value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.field_values.iter().map(|f| f.name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.field_values.iter().map(|f| &f.value)
    }

    /// True when this record has exactly `header` as its keys, in that order.
    pub fn matches_header(&self, header: &[String]) -> bool {
        self.field_values.len() == header.len()
            && self.keys().zip(header).all(|(k, h)| k == h)
    }

    pub fn len(&self) -> usize {
        self.field_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_values.is_empty()
    }

    pub fn size_bytes(&self) -> usize {
        self.field_values
            .iter()
            .map(|f| f.name.len() + f.value.size_bytes())
            .sum()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
