//! The document-database capability
//!
//! [`DocumentDatabase`] is the narrow surface the store needs from a backing
//! database: enumerate databases, check/create collections, find by
//! exact-match filter, and an atomic find-and-upsert. [`Connector`] opens
//! one from a [`ConnectionUri`].
//!
//! Filters are native documents whose field names may be dotted paths
//! (`order_id.id`); every field must equal the stored value.

use std::sync::Arc;

use docvault_core::Result;

use crate::native::NativeDocument;
use crate::uri::ConnectionUri;

/// Opens sessions to one kind of backing database
pub trait Connector {
    /// Tag that a storage configuration must carry to use this connector
    fn storage_type(&self) -> &str;

    /// Connect to the server named by `uri`
    ///
    /// # Errors
    ///
    /// `Connection` if no session can be established.
    fn connect(&self, uri: &ConnectionUri) -> Result<Arc<dyn DocumentDatabase>>;
}

/// A live, shareable session to a document database
///
/// Implementations must support concurrent use from many threads.
pub trait DocumentDatabase: Send + Sync {
    /// Names of the databases on the server
    ///
    /// # Errors
    ///
    /// `Connection` if the server cannot be queried.
    fn list_databases(&self) -> Result<Vec<String>>;

    /// True if `database` exists on the server
    fn database_exists(&self, database: &str) -> Result<bool> {
        Ok(self.list_databases()?.iter().any(|name| name == database))
    }

    /// True if `collection` exists in `database`
    fn has_collection(&self, database: &str, collection: &str) -> Result<bool>;

    /// Create `collection` in `database`
    ///
    /// # Errors
    ///
    /// `Operation` if the server refuses.
    fn create_collection(&self, database: &str, collection: &str) -> Result<()>;

    /// First document matching `filter`
    fn find_one(
        &self,
        database: &str,
        collection: &str,
        filter: &NativeDocument,
    ) -> Result<Option<NativeDocument>>;

    /// Every document matching `filter`, in server order
    fn find(
        &self,
        database: &str,
        collection: &str,
        filter: &NativeDocument,
    ) -> Result<Vec<NativeDocument>>;

    /// Atomically set the `set` fields on the document matching `filter`,
    /// inserting a new document built from `filter` + `set` if none matches
    ///
    /// # Errors
    ///
    /// `Operation` if the write fails.
    fn find_and_upsert(
        &self,
        database: &str,
        collection: &str,
        filter: &NativeDocument,
        set: &NativeDocument,
    ) -> Result<()>;
}
