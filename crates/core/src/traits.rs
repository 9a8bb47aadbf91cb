//! Core trait for the storage abstraction
//!
//! The orchestrator talks to persistence only through [`Storage`]. Backend
//! adapters implement it; nothing above this trait sees a backend's native
//! document types, which is also what lets tests plug in a double.

use crate::error::Result;
use crate::key::EntityKey;
use crate::value::DocumentValue;

/// Per-user, per-entity-type document storage
///
/// Thread safety: all methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
pub trait Storage: Send + Sync {
    /// Fetch the documents of `username` matching `filter`
    ///
    /// `filter` may be partial. Attributes that are not key attributes of
    /// `entity_type` are ignored. An unknown username yields an empty
    /// result, not an error. No ordering is guaranteed.
    ///
    /// # Errors
    ///
    /// - `Data` if a stored record is missing its payload or holds a native
    ///   value with no document counterpart
    /// - `InvalidArgument` if `entity_type` is not registered
    fn get(
        &self,
        username: &str,
        entity_type: &str,
        filter: &EntityKey,
    ) -> Result<Vec<DocumentValue>>;

    /// Create or overwrite the document at (`username`, `entity_type`, `key`)
    ///
    /// `key` must be complete for `entity_type`. The write is a single
    /// atomic upsert: concurrent writers to one key leave exactly one
    /// document.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if `username` does not resolve; nothing is written
    /// - `InvalidArgument` if `key` is incomplete or `entity_type` unknown
    /// - `Operation` if the backing store rejects the write
    fn put(
        &self,
        username: &str,
        entity_type: &str,
        key: &EntityKey,
        value: &DocumentValue,
    ) -> Result<()>;
}
