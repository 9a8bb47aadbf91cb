//! The request orchestrator.
//!
//! [`DocumentController`] validates the entity type, drives key parsing and
//! body decoding, calls the [`Storage`] capability, and folds every expected
//! failure into an [`Outcome`]. Only unexpected failures surface as `Err`.
//!
//! | Situation | Outcome |
//! |-----------|---------|
//! | unknown entity type | `NotFound` |
//! | bad key path or filter (either kind) | `NotFound` |
//! | GET finds nothing | `NotFound` |
//! | PUT for an unknown user | `NotFound` |
//! | PUT body is not a JSON document | `BadRequest` |
//! | GET finds more than one document | `Err(Data)` |

use std::sync::Arc;

use docvault_core::{
    parse_filter, parse_key_path, DocumentValue, EntityTypeDescriptor, EntityTypeRegistry, Error,
    Result, Storage,
};
use tracing::debug;

use crate::Outcome;

/// Stateless dispatcher from requests to the storage capability.
///
/// `DocumentController` is `Send + Sync` and is shared across request
/// threads behind an `Arc`.
pub struct DocumentController {
    storage: Arc<dyn Storage>,
    registry: Arc<EntityTypeRegistry>,
}

impl DocumentController {
    /// Create a controller over a storage backend and the registry it serves.
    pub fn new(storage: Arc<dyn Storage>, registry: Arc<EntityTypeRegistry>) -> Self {
        Self { storage, registry }
    }

    /// The entity types this controller accepts.
    pub fn registry(&self) -> &EntityTypeRegistry {
        &self.registry
    }

    fn descriptor(&self, entity_type: &str) -> Option<&EntityTypeDescriptor> {
        let descriptor = self.registry.lookup(entity_type);
        if descriptor.is_none() {
            debug!(target: "docvault::controller", entity_type, "unknown entity type");
        }
        descriptor
    }

    /// Fetch the single document addressed by `key_path`.
    pub fn handle_get(&self, username: &str, entity_type: &str, key_path: &str) -> Result<Outcome> {
        let Some(descriptor) = self.descriptor(entity_type) else {
            return Ok(Outcome::NotFound);
        };

        let key = match parse_key_path(key_path, descriptor) {
            Ok(key) => key,
            Err(e) if e.is_key_error() => {
                debug!(target: "docvault::controller", key_path, error = %e, "rejected key");
                return Ok(Outcome::NotFound);
            }
            Err(e) => return Err(e),
        };

        let mut documents = self.storage.get(username, entity_type, &key)?;
        match documents.len() {
            0 => Ok(Outcome::NotFound),
            1 => Ok(documents
                .pop()
                .map_or(Outcome::NotFound, Outcome::Document)),
            n => Err(Error::data(format!(
                "key '{}' of entity type '{}' matches {} documents",
                key_path, entity_type, n
            ))),
        }
    }

    /// Store `body` as the document addressed by `key_path`.
    ///
    /// The key is validated before the body is decoded.
    pub fn handle_put(
        &self,
        username: &str,
        entity_type: &str,
        key_path: &str,
        body: &[u8],
    ) -> Result<Outcome> {
        let Some(descriptor) = self.descriptor(entity_type) else {
            return Ok(Outcome::NotFound);
        };

        let key = match parse_key_path(key_path, descriptor) {
            Ok(key) => key,
            Err(e) if e.is_key_error() => {
                debug!(target: "docvault::controller", key_path, error = %e, "rejected key");
                return Ok(Outcome::NotFound);
            }
            Err(e) => return Err(e),
        };

        let value = match DocumentValue::from_json_slice(body) {
            Ok(value) => value,
            Err(e) => {
                return Ok(Outcome::BadRequest {
                    reason: e.to_string(),
                })
            }
        };

        match self.storage.put(username, entity_type, &key, &value) {
            Ok(()) => Ok(Outcome::Stored),
            Err(Error::UserNotFound { username }) => {
                debug!(target: "docvault::controller", %username, "put for unknown user");
                Ok(Outcome::NotFound)
            }
            Err(e) => Err(e),
        }
    }

    /// Every document of `entity_type` owned by `username` that matches the
    /// `name=value&...` filter. An empty filter lists everything.
    pub fn handle_list(&self, username: &str, entity_type: &str, filter: &str) -> Result<Outcome> {
        let Some(descriptor) = self.descriptor(entity_type) else {
            return Ok(Outcome::NotFound);
        };

        let filter = match parse_filter(filter, descriptor) {
            Ok(filter) => filter,
            Err(e) if e.is_key_error() => return Ok(Outcome::NotFound),
            Err(e) => return Err(e),
        };

        let documents = self.storage.get(username, entity_type, &filter)?;
        Ok(Outcome::Documents(documents))
    }
}

impl std::fmt::Debug for DocumentController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentController")
            .field("entity_types", &self.registry.len())
            .finish()
    }
}
