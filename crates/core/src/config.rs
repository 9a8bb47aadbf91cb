//! Service configuration (`config.json`)
//!
//! One JSON document declares the entity types and the storages that back
//! them:
//!
//! ```json
//! {
//!   "entity_types": {
//!     "order": { "key": [ { "name": "id", "type": "integer" } ] }
//!   },
//!   "storages": {
//!     "main": {
//!       "type": "memory",
//!       "uri": "memory://localhost/shop",
//!       "collections": { "order": "orders" }
//!     }
//!   }
//! }
//! ```
//!
//! Every failure while reading or validating the document is a
//! `Configuration` error; the process is expected not to start.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::entity::{AttributeDescriptor, EntityTypeRegistry};
use crate::error::{Error, Result};

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Name of the storage entry the service runs against
pub const MAIN_STORAGE: &str = "main";

/// Configuration of one entity type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTypeConfig {
    /// Ordered composite key
    pub key: Vec<AttributeDescriptor>,
}

/// Configuration of one storage backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend tag; must match the backend that opens it
    #[serde(rename = "type")]
    pub storage_type: String,
    /// Connection target; must name a database
    pub uri: String,
    /// Entity-type name → collection name
    pub collections: BTreeMap<String, String>,
}

/// Whole configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Entity-type schemas
    pub entity_types: BTreeMap<String, EntityTypeConfig>,
    /// Named storages; `main` is required
    pub storages: BTreeMap<String, StorageConfig>,
}

impl Config {
    /// Parse a configuration document from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the text is not a well-formed document.
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::configuration(format!("invalid configuration document: {}", e)))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&content)
    }

    /// Build the entity-type registry declared by this document
    pub fn registry(&self) -> Result<EntityTypeRegistry> {
        EntityTypeRegistry::from_config(&self.entity_types)
    }

    /// The `main` storage entry
    pub fn main_storage(&self) -> Result<&StorageConfig> {
        self.storages
            .get(MAIN_STORAGE)
            .ok_or_else(|| Error::configuration("no 'main' storage configured"))
    }
}
