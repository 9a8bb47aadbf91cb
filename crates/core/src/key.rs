//! Typed entity keys and key-path parsing
//!
//! A key path is a slash-delimited string holding one value per key
//! attribute, in schema order:
//!
//! ```text
//! entity type "reading", key [sensor: string, seq: integer]
//!
//!   "boiler-3/1024"  →  { sensor: "boiler-3", seq: 1024 }
//!   "boiler-3"       →  InvalidKeyPath (1 segment, 2 expected)
//!   "boiler-3/x"     →  InvalidAttributeValue (seq)
//! ```
//!
//! String segments are used verbatim. There is no escaping, so a string
//! attribute can never contain `/`.

use std::collections::BTreeMap;
use std::fmt;

use crate::entity::{AttributeDescriptor, AttributeType, EntityTypeDescriptor};
use crate::error::{Error, Result};

/// Key attribute value carrying exactly its declared type
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Value of an `integer` attribute
    Integer(i64),
    /// Value of a `float` attribute
    Float(f32),
    /// Value of a `string` attribute
    String(String),
}

impl TypedValue {
    /// The attribute type this value belongs to
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            TypedValue::Integer(_) => AttributeType::Integer,
            TypedValue::Float(_) => AttributeType::FloatingPoint,
            TypedValue::String(_) => AttributeType::String,
        }
    }

    /// Parse one segment under a declared attribute type
    ///
    /// # Errors
    ///
    /// `InvalidAttributeValue` if the segment is empty or does not parse.
    pub fn parse(attribute: &AttributeDescriptor, segment: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidAttributeValue {
            attribute: attribute.name.clone(),
            value: segment.to_string(),
            reason: reason.to_string(),
        };

        if segment.is_empty() {
            return Err(invalid("empty segment"));
        }

        match attribute.attribute_type {
            AttributeType::Integer => segment
                .parse::<i64>()
                .map(TypedValue::Integer)
                .map_err(|e| invalid(&e.to_string())),
            AttributeType::FloatingPoint => {
                let value = segment
                    .parse::<f32>()
                    .map_err(|e| invalid(&e.to_string()))?;
                // NaN never compares equal, so it could never address a document
                if !value.is_finite() {
                    return Err(invalid("not a finite number"));
                }
                Ok(TypedValue::Float(value))
            }
            AttributeType::String => Ok(TypedValue::String(segment.to_string())),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Integer(i) => write!(f, "{}", i),
            TypedValue::Float(x) => write!(f, "{}", x),
            TypedValue::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TypedValue {
    fn from(i: i64) -> Self {
        TypedValue::Integer(i)
    }
}

impl From<f32> for TypedValue {
    fn from(f: f32) -> Self {
        TypedValue::Float(f)
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::String(s.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        TypedValue::String(s)
    }
}

/// Attribute name → typed value
///
/// Complete (one entry per key attribute) when produced by [`parse_key_path`]
/// and when handed to a `put`. A partial key is only meaningful as a `get`
/// filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityKey {
    values: BTreeMap<String, TypedValue>,
}

impl EntityKey {
    /// Create an empty key (an unconstrained filter)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute value, returning the previous one
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<TypedValue>) -> Option<TypedValue> {
        self.values.insert(name.into(), value.into())
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Value for an attribute
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.values.get(name)
    }

    /// Number of attributes present
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no attribute is present
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Attributes in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True if every descriptor attribute is present with its declared type
    pub fn is_complete_for(&self, descriptor: &EntityTypeDescriptor) -> bool {
        descriptor.key().iter().all(|attribute| {
            self.get(&attribute.name)
                .map_or(false, |v| v.attribute_type() == attribute.attribute_type)
        })
    }
}

impl<K: Into<String>, V: Into<TypedValue>> FromIterator<(K, V)> for EntityKey {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut key = EntityKey::new();
        for (k, v) in iter {
            key.insert(k, v);
        }
        key
    }
}

/// Parse a key path into a complete [`EntityKey`]
///
/// The path must contain exactly `key_len - 1` separators. Segments are
/// matched positionally and parsed per declared type; the first bad
/// segment aborts parsing.
///
/// # Errors
///
/// - `InvalidKeyPath` if the segment count differs from the key length
/// - `InvalidAttributeValue` for an empty or unparsable segment
pub fn parse_key_path(path: &str, descriptor: &EntityTypeDescriptor) -> Result<EntityKey> {
    let segments = path.matches('/').count() + 1;
    if segments != descriptor.key_len() {
        return Err(Error::InvalidKeyPath {
            path: path.to_string(),
            expected: descriptor.key_len(),
            actual: segments,
        });
    }

    let mut key = EntityKey::new();
    for (attribute, segment) in descriptor.key().iter().zip(path.split('/')) {
        let value = TypedValue::parse(attribute, segment)?;
        key.insert(attribute.name.clone(), value);
    }
    Ok(key)
}

/// Parse an exact-match filter of the form `name=value&name=value`
///
/// Values follow the same per-type rules as key path segments. Names that
/// are not key attributes of `descriptor` are skipped. An empty query is
/// an empty (unconstrained) filter.
///
/// # Errors
///
/// `InvalidAttributeValue` for a pair without `=`, or a value that does
/// not parse under its attribute's type.
pub fn parse_filter(query: &str, descriptor: &EntityTypeDescriptor) -> Result<EntityKey> {
    let mut filter = EntityKey::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (name, raw) = pair.split_once('=').ok_or_else(|| Error::InvalidAttributeValue {
            attribute: pair.to_string(),
            value: String::new(),
            reason: "expected name=value".to_string(),
        })?;

        if let Some(attribute) = descriptor.attribute(name) {
            filter.insert(name, TypedValue::parse(attribute, raw)?);
        }
    }
    Ok(filter)
}
