//! Document value model
//!
//! This module defines:
//! - [`DocumentValue`]: the recursive tree stored and retrieved for every entity
//! - [`Number`]: a numeric leaf that remembers its width (32/64 bit, integer/float)
//!
//! ## Width Rules
//!
//! - A number keeps the width it was created with. `I32(1) != I64(1)`.
//! - Parsing JSON picks the narrowest integer width that holds the value
//!   (i32 when it fits, otherwise i64). Non-integral numbers become `F64`.
//! - Integers that do not fit in i64 are rejected rather than silently
//!   turned into floats.
//!
//! ## JSON
//!
//! `DocumentValue` implements `Serialize`/`Deserialize`. Serialization writes
//! each number with its own width; non-finite floats follow serde_json and
//! come out as `null`.

use serde::de;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use thiserror::Error;

/// Object members, ordered by key so conversions are deterministic
pub type Object = BTreeMap<String, DocumentValue>;

/// Numeric leaf with a preserved width
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// 32-bit signed integer
    I32(i32),
    /// 64-bit signed integer
    I64(i64),
    /// 32-bit float
    F32(f32),
    /// 64-bit float
    F64(f64),
}

impl Number {
    /// True for `I32` and `I64`
    pub fn is_integral(&self) -> bool {
        matches!(self, Number::I32(_) | Number::I64(_))
    }

    /// True for `F32` and `F64`
    pub fn is_floating(&self) -> bool {
        !self.is_integral()
    }

    /// Width in bits (32 or 64)
    pub fn width(&self) -> u8 {
        match self {
            Number::I32(_) | Number::F32(_) => 32,
            Number::I64(_) | Number::F64(_) => 64,
        }
    }

    /// Integer value, widened to i64. `None` for floats.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::I32(i) => Some(i64::from(*i)),
            Number::I64(i) => Some(*i),
            Number::F32(_) | Number::F64(_) => None,
        }
    }

    /// Numeric value as f64 (lossy for large i64)
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::I32(i) => f64::from(*i),
            Number::I64(i) => *i as f64,
            Number::F32(f) => f64::from(*f),
            Number::F64(f) => *f,
        }
    }

    /// Narrowest integer representation of `value`
    pub fn integer(value: i64) -> Self {
        match i32::try_from(value) {
            Ok(narrow) => Number::I32(narrow),
            Err(_) => Number::I64(value),
        }
    }
}

/// A generic tree-shaped document
///
/// Independent of any wire or storage format. Object keys are unique by
/// construction (map keys).
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentValue {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Number with preserved width
    Number(Number),
    /// UTF-8 string
    String(String),
    /// Ordered sequence of values
    Array(Vec<DocumentValue>),
    /// String-keyed members
    Object(Object),
}

/// Failure to turn wire bytes into a [`DocumentValue`]
#[derive(Debug, Error)]
pub enum ValueParseError {
    /// Input is not well-formed JSON
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON integer outside the i64 range
    #[error("integer out of range: {0}")]
    IntegerOutOfRange(String),
}

impl DocumentValue {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            DocumentValue::Null => "null",
            DocumentValue::Bool(_) => "bool",
            DocumentValue::Number(_) => "number",
            DocumentValue::String(_) => "string",
            DocumentValue::Array(_) => "array",
            DocumentValue::Object(_) => "object",
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, DocumentValue::Null)
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DocumentValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the number if this is a Number value
    pub fn as_number(&self) -> Option<Number> {
        match self {
            DocumentValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocumentValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as slice if this is an Array value
    pub fn as_array(&self) -> Option<&[DocumentValue]> {
        match self {
            DocumentValue::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get the members if this is an Object value
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            DocumentValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Parse a JSON document from raw bytes (a request body)
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ValueParseError> {
        let json: JsonValue = serde_json::from_slice(bytes)?;
        Self::from_json(&json)
    }

    /// Convert a parsed JSON tree
    pub fn from_json(json: &JsonValue) -> Result<Self, ValueParseError> {
        Ok(match json {
            JsonValue::Null => DocumentValue::Null,
            JsonValue::Bool(b) => DocumentValue::Bool(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    DocumentValue::Number(Number::integer(i))
                } else if n.is_u64() {
                    return Err(ValueParseError::IntegerOutOfRange(n.to_string()));
                } else {
                    // Only non-integral numbers are left once i64/u64 are ruled out
                    DocumentValue::Number(Number::F64(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            JsonValue::String(s) => DocumentValue::String(s.clone()),
            JsonValue::Array(items) => DocumentValue::Array(
                items
                    .iter()
                    .map(Self::from_json)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            JsonValue::Object(members) => DocumentValue::Object(
                members
                    .iter()
                    .map(|(k, v)| Self::from_json(v).map(|v| (k.clone(), v)))
                    .collect::<Result<Object, _>>()?,
            ),
        })
    }

    /// Convert to a `serde_json` tree
    pub fn to_json(&self) -> JsonValue {
        match self {
            DocumentValue::Null => JsonValue::Null,
            DocumentValue::Bool(b) => JsonValue::Bool(*b),
            DocumentValue::Number(n) => match n {
                Number::I32(i) => JsonValue::from(*i),
                Number::I64(i) => JsonValue::from(*i),
                Number::F32(f) => JsonValue::from(f64::from(*f)),
                Number::F64(f) => JsonValue::from(*f),
            },
            DocumentValue::String(s) => JsonValue::String(s.clone()),
            DocumentValue::Array(items) => {
                JsonValue::Array(items.iter().map(DocumentValue::to_json).collect())
            }
            DocumentValue::Object(members) => JsonValue::Object(
                members
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Serialize to a compact JSON string
    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }
}

// ============================================================================
// Serde
// ============================================================================

impl Serialize for DocumentValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DocumentValue::Null => serializer.serialize_unit(),
            DocumentValue::Bool(b) => serializer.serialize_bool(*b),
            DocumentValue::Number(Number::I32(i)) => serializer.serialize_i32(*i),
            DocumentValue::Number(Number::I64(i)) => serializer.serialize_i64(*i),
            DocumentValue::Number(Number::F32(f)) => serializer.serialize_f32(*f),
            DocumentValue::Number(Number::F64(f)) => serializer.serialize_f64(*f),
            DocumentValue::String(s) => serializer.serialize_str(s),
            DocumentValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            DocumentValue::Object(members) => {
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for (k, v) in members {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for DocumentValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json = JsonValue::deserialize(deserializer)?;
        DocumentValue::from_json(&json).map_err(de::Error::custom)
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<Number> for DocumentValue {
    fn from(n: Number) -> Self {
        DocumentValue::Number(n)
    }
}

impl From<bool> for DocumentValue {
    fn from(b: bool) -> Self {
        DocumentValue::Bool(b)
    }
}

impl From<i32> for DocumentValue {
    fn from(i: i32) -> Self {
        DocumentValue::Number(Number::I32(i))
    }
}

impl From<i64> for DocumentValue {
    fn from(i: i64) -> Self {
        DocumentValue::Number(Number::I64(i))
    }
}

impl From<f32> for DocumentValue {
    fn from(f: f32) -> Self {
        DocumentValue::Number(Number::F32(f))
    }
}

impl From<f64> for DocumentValue {
    fn from(f: f64) -> Self {
        DocumentValue::Number(Number::F64(f))
    }
}

impl From<&str> for DocumentValue {
    fn from(s: &str) -> Self {
        DocumentValue::String(s.to_string())
    }
}

impl From<String> for DocumentValue {
    fn from(s: String) -> Self {
        DocumentValue::String(s)
    }
}

impl From<Vec<DocumentValue>> for DocumentValue {
    fn from(items: Vec<DocumentValue>) -> Self {
        DocumentValue::Array(items)
    }
}

impl From<Object> for DocumentValue {
    fn from(members: Object) -> Self {
        DocumentValue::Object(members)
    }
}
