//! Value types held in the environment table.
//!
//! A table value is either the operator's raw string, untouched, or a
//! [`StructuredValue`] recovered from a JSON-like expression. Both serialize to
//! the JSON shape the template engine consumes.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Number, Value};

/// A parsed JSON-like value. Mirrors JSON types; numbers keep their
/// `serde_json` representation so integers inside containers stay integers.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<StructuredValue>),
    /// Key-value pairs in source order. Keys are unique.
    Object(Vec<(String, StructuredValue)>),
}

impl StructuredValue {
    /// Look up a key of an object. Returns `None` for every other variant.
    pub fn get(&self, key: &str) -> Option<&StructuredValue> {
        match self {
            StructuredValue::Object(fields) => {
                fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    /// Index into an array. Returns `None` for every other variant.
    pub fn index(&self, idx: usize) -> Option<&StructuredValue> {
        match self {
            StructuredValue::Array(items) => items.get(idx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StructuredValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[StructuredValue]> {
        match self {
            StructuredValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Serialize back to compact JSON text.
    pub fn to_json_string(&self) -> String {
        Value::from(self.clone()).to_string()
    }
}

impl From<Value> for StructuredValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => StructuredValue::Null,
            Value::Bool(b) => StructuredValue::Bool(b),
            Value::Number(n) => StructuredValue::Number(n),
            Value::String(s) => StructuredValue::String(s),
            Value::Array(items) => {
                StructuredValue::Array(items.into_iter().map(StructuredValue::from).collect())
            }
            Value::Object(map) => StructuredValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, StructuredValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<StructuredValue> for Value {
    fn from(value: StructuredValue) -> Self {
        match value {
            StructuredValue::Null => Value::Null,
            StructuredValue::Bool(b) => Value::Bool(b),
            StructuredValue::Number(n) => Value::Number(n),
            StructuredValue::String(s) => Value::String(s),
            StructuredValue::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            StructuredValue::Object(fields) => {
                Value::Object(fields.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl Serialize for StructuredValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StructuredValue::Null => serializer.serialize_unit(),
            StructuredValue::Bool(b) => serializer.serialize_bool(*b),
            StructuredValue::Number(n) => n.serialize(serializer),
            StructuredValue::String(s) => serializer.serialize_str(s),
            StructuredValue::Array(items) => items.serialize(serializer),
            StructuredValue::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

/// One entry of the environment table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnvValue {
    /// The raw variable value, kept verbatim.
    Plain(String),
    /// A value recovered from JSON or JSON-like text.
    Structured(StructuredValue),
}

impl EnvValue {
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            EnvValue::Plain(s) => Some(s),
            EnvValue::Structured(_) => None,
        }
    }

    pub fn as_structured(&self) -> Option<&StructuredValue> {
        match self {
            EnvValue::Plain(_) => None,
            EnvValue::Structured(v) => Some(v),
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, EnvValue::Structured(_))
    }
}
