//! Entity types and the registry that holds them
//!
//! An entity type is a named schema declaring the ordered, typed composite
//! key for one class of documents. The registry is built once at startup
//! and shared read-only (behind an `Arc`) for the life of the process.
//!
//! ## Invariants
//!
//! - Key attribute names are pairwise distinct within an entity type.
//!   Violations fail at construction, never lazily at use.
//! - A key has at least one attribute.
//! - Attribute order is significant: it is the positional mapping used by
//!   key paths (`"42/eu"` → first attribute `42`, second attribute `eu`).

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::config::EntityTypeConfig;
use crate::error::{Error, Result};

/// Declared type of a key attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    /// Base-10 signed 64-bit integer
    #[serde(rename = "integer")]
    Integer,
    /// 32-bit float
    #[serde(rename = "float")]
    FloatingPoint,
    /// Verbatim string
    #[serde(rename = "string")]
    String,
}

impl AttributeType {
    /// Configuration tag for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::Integer => "integer",
            AttributeType::FloatingPoint => "float",
            AttributeType::String => "string",
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attribute of a composite key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    /// Attribute name, unique within its entity type
    pub name: String,
    /// Declared type
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
}

impl AttributeDescriptor {
    /// Create a descriptor
    pub fn new(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attribute_type,
        }
    }
}

/// Entity-type and attribute names end up as stored field names
/// (`<type>_id.<attribute>`), where `.` separates path components and a
/// leading `$` marks an operator.
fn check_field_name(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() || name.contains('.') || name.starts_with('$') {
        return Err(Error::configuration(format!(
            "invalid {} name '{}': must be non-empty, without '.' and not start with '$'",
            kind, name
        )));
    }
    Ok(())
}

/// Schema of one entity type: its ordered composite key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityTypeDescriptor {
    key: Vec<AttributeDescriptor>,
}

impl EntityTypeDescriptor {
    /// Build a descriptor, rejecting duplicate or missing key attributes
    ///
    /// # Errors
    ///
    /// - `DuplicateKeyAttribute` if two attributes share a name
    /// - `Configuration` if `key` is empty or an attribute name is not a
    ///   valid stored field name
    pub fn new(key: Vec<AttributeDescriptor>) -> Result<Self> {
        if key.is_empty() {
            return Err(Error::configuration(
                "entity type key must declare at least one attribute",
            ));
        }

        let mut seen = HashSet::with_capacity(key.len());
        for attribute in &key {
            check_field_name("key attribute", &attribute.name)?;
            if !seen.insert(attribute.name.as_str()) {
                return Err(Error::DuplicateKeyAttribute {
                    attribute: attribute.name.clone(),
                });
            }
        }

        Ok(Self { key })
    }

    /// Key attributes in declaration order
    pub fn key(&self) -> &[AttributeDescriptor] {
        &self.key
    }

    /// Number of key attributes
    pub fn key_len(&self) -> usize {
        self.key.len()
    }

    /// Find a key attribute by name
    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.key.iter().find(|a| a.name == name)
    }
}

/// Entity-type name → descriptor
///
/// Read-only after startup. Share it with `Arc<EntityTypeRegistry>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityTypeRegistry {
    types: BTreeMap<String, EntityTypeDescriptor>,
}

impl EntityTypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity type
    ///
    /// # Errors
    ///
    /// - `DuplicateKeyAttribute` if `key` repeats an attribute name
    /// - `Configuration` if `key` is empty, `name` is already registered,
    ///   or a name is not a valid stored field name
    pub fn register(&mut self, name: impl Into<String>, key: Vec<AttributeDescriptor>) -> Result<()> {
        let name = name.into();
        check_field_name("entity type", &name)?;
        if self.types.contains_key(&name) {
            return Err(Error::configuration(format!(
                "entity type '{}' registered twice",
                name
            )));
        }
        let descriptor = EntityTypeDescriptor::new(key)?;
        self.types.insert(name, descriptor);
        Ok(())
    }

    /// Look up an entity type by name
    pub fn lookup(&self, name: &str) -> Option<&EntityTypeDescriptor> {
        self.types.get(name)
    }

    /// True if `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered entity-type names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Number of registered entity types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Build a registry from typed entity-type configuration
    ///
    /// All-or-nothing: the first bad entry fails the whole load, and any
    /// schema error is reported as `Configuration`.
    pub fn from_config(entity_types: &BTreeMap<String, EntityTypeConfig>) -> Result<Self> {
        let mut registry = Self::new();
        for (name, config) in entity_types {
            registry
                .register(name.clone(), config.key.clone())
                .map_err(|e| match e {
                    Error::Configuration { .. } => e,
                    other => Error::configuration(format!(
                        "invalid entity type '{}': {}",
                        name, other
                    )),
                })?;
        }
        Ok(registry)
    }

    /// Build a registry from the raw `entity_types` configuration document
    ///
    /// Shape: `{ <name>: { "key": [ { "name": .., "type": .. }, .. ] } }`.
    /// Missing fields, unknown type tags and wrong JSON shapes are all
    /// `Configuration` errors.
    pub fn from_document(document: &JsonValue) -> Result<Self> {
        let entity_types: BTreeMap<String, EntityTypeConfig> =
            serde_json::from_value(document.clone()).map_err(|e| {
                Error::configuration(format!("invalid entity type configuration: {}", e))
            })?;
        Self::from_config(&entity_types)
    }
}
