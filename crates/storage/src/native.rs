//! Native document model of the backing database
//!
//! This is the value tree a document database speaks: it distinguishes
//! 32-bit and 64-bit integers, has a single double type, and carries
//! database-only types (object ids, binary, datetimes) that have no
//! [`DocumentValue`](docvault_core::DocumentValue) counterpart.
//!
//! Documents keep field insertion order, and equality is order-sensitive,
//! the same way embedded-document equality works in document databases.

use std::fmt;
use uuid::Uuid;

/// 12-byte opaque identifier minted by the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Mint a fresh random identifier
    pub fn new() -> Self {
        let random = Uuid::new_v4();
        let mut bytes = [0u8; 12];
        bytes.copy_from_slice(&random.as_bytes()[..12]);
        Self(bytes)
    }

    /// Wrap raw bytes
    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Raw bytes
    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// A native value
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    /// Null
    Null,
    /// Boolean
    Bool(bool),
    /// 32-bit signed integer
    Int32(i32),
    /// 64-bit signed integer
    Int64(i64),
    /// 64-bit float
    Double(f64),
    /// UTF-8 string
    String(String),
    /// Array
    Array(Vec<NativeValue>),
    /// Embedded document
    Document(NativeDocument),
    /// Database-assigned identifier
    ObjectId(ObjectId),
    /// Raw bytes
    Binary(Vec<u8>),
    /// Milliseconds since the Unix epoch
    DateTime(i64),
    /// Any other driver type, kept only by name
    Unsupported {
        /// Driver-reported type name
        type_name: String,
    },
}

impl NativeValue {
    /// Get the type name as a string
    pub fn type_name(&self) -> &str {
        match self {
            NativeValue::Null => "null",
            NativeValue::Bool(_) => "bool",
            NativeValue::Int32(_) => "int32",
            NativeValue::Int64(_) => "int64",
            NativeValue::Double(_) => "double",
            NativeValue::String(_) => "string",
            NativeValue::Array(_) => "array",
            NativeValue::Document(_) => "document",
            NativeValue::ObjectId(_) => "objectId",
            NativeValue::Binary(_) => "binary",
            NativeValue::DateTime(_) => "datetime",
            NativeValue::Unsupported { type_name } => type_name,
        }
    }

    /// Get the embedded document if this is one
    pub fn as_document(&self) -> Option<&NativeDocument> {
        match self {
            NativeValue::Document(d) => Some(d),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NativeValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for NativeValue {
    fn from(s: &str) -> Self {
        NativeValue::String(s.to_string())
    }
}

impl From<String> for NativeValue {
    fn from(s: String) -> Self {
        NativeValue::String(s)
    }
}

impl From<i32> for NativeValue {
    fn from(i: i32) -> Self {
        NativeValue::Int32(i)
    }
}

impl From<i64> for NativeValue {
    fn from(i: i64) -> Self {
        NativeValue::Int64(i)
    }
}

impl From<f64> for NativeValue {
    fn from(f: f64) -> Self {
        NativeValue::Double(f)
    }
}

impl From<bool> for NativeValue {
    fn from(b: bool) -> Self {
        NativeValue::Bool(b)
    }
}

impl From<ObjectId> for NativeValue {
    fn from(id: ObjectId) -> Self {
        NativeValue::ObjectId(id)
    }
}

impl From<NativeDocument> for NativeValue {
    fn from(d: NativeDocument) -> Self {
        NativeValue::Document(d)
    }
}

/// Ordered field list with unique names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NativeDocument {
    fields: Vec<(String, NativeValue)>,
}

impl NativeDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a top-level field; replaces in place or appends
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<NativeValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<NativeValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Top-level field
    pub fn get(&self, name: &str) -> Option<&NativeValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// True if a top-level field exists
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Field reached through a dotted path (`order_id.id`)
    pub fn get_path(&self, path: &str) -> Option<&NativeValue> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut current = self.get(first)?;
        for part in parts {
            current = current.as_document()?.get(part)?;
        }
        Some(current)
    }

    /// Set a field through a dotted path, creating intermediate documents
    ///
    /// Returns `false` (and changes nothing) if an intermediate field exists
    /// but is not a document.
    pub fn set_path(&mut self, path: &str, value: NativeValue) -> bool {
        match path.split_once('.') {
            None => {
                self.insert(path, value);
                true
            }
            Some((head, rest)) => {
                if !self.contains_key(head) {
                    self.insert(head, NativeDocument::new());
                }
                match self.fields.iter_mut().find(|(k, _)| k == head) {
                    Some((_, NativeValue::Document(child))) => child.set_path(rest, value),
                    _ => false,
                }
            }
        }
    }

    /// Fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NativeValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of top-level fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if there are no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, NativeValue)> for NativeDocument {
    fn from_iter<I: IntoIterator<Item = (K, NativeValue)>>(iter: I) -> Self {
        let mut doc = NativeDocument::new();
        for (k, v) in iter {
            doc.insert(k, v);
        }
        doc
    }
}
