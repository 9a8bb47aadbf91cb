//! Embedded in-process document database
//!
//! A [`MemoryServer`] behaves like a small document-database server: it
//! holds named databases, each with named collections of native documents,
//! and answers exact-match finds and atomic find-and-upserts.
//!
//! # Design
//!
//! - DashMap: database name → database, sharded, lock-free reads
//! - Per-collection `RwLock`: finds share the lock, upserts take it
//!   exclusively, so match-then-write is one indivisible step
//! - Clones share state: every `connect` hands back a view of the same server
//!
//! # Administration
//!
//! The store never creates users or databases. Embedders and tests seed
//! them with [`MemoryServer::create_database`] and
//! [`MemoryServer::insert_user`]. [`MemoryServer::set_online`] and
//! [`MemoryServer::set_fail_writes`] simulate an unreachable server and a
//! rejecting one.

use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use docvault_core::{Error, Result};

use crate::database::{Connector, DocumentDatabase};
use crate::native::{NativeDocument, NativeValue, ObjectId};
use crate::store::{USERS_COLLECTION, USER_NAME_FIELD};
use crate::uri::ConnectionUri;

/// Storage type tag served by [`MemoryServer`]
pub const STORAGE_TYPE: &str = "memory";

type Collection = Arc<RwLock<Vec<NativeDocument>>>;

#[derive(Default)]
struct Database {
    collections: RwLock<HashMap<String, Collection>>,
}

struct ServerState {
    databases: DashMap<String, Arc<Database>>,
    online: AtomicBool,
    fail_writes: AtomicBool,
}

/// Shared handle to an embedded document-database server
#[derive(Clone)]
pub struct MemoryServer {
    state: Arc<ServerState>,
}

impl Default for MemoryServer {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryServer {
    /// Start an empty, reachable server
    pub fn new() -> Self {
        Self {
            state: Arc::new(ServerState {
                databases: DashMap::new(),
                online: AtomicBool::new(true),
                fail_writes: AtomicBool::new(false),
            }),
        }
    }

    /// Create a database if it does not exist yet
    pub fn create_database(&self, name: &str) {
        self.state.databases.entry(name.to_string()).or_default();
    }

    /// Insert a user record and return its identifier
    ///
    /// Creates the database and the users collection when missing.
    pub fn insert_user(&self, database: &str, username: &str) -> ObjectId {
        let id = ObjectId::new();
        let record = NativeDocument::new()
            .with("_id", id)
            .with(USER_NAME_FIELD, username);
        self.collection_or_create(database, USERS_COLLECTION)
            .write()
            .push(record);
        id
    }

    /// Insert a raw document, bypassing every invariant the store keeps
    pub fn insert_raw(&self, database: &str, collection: &str, document: NativeDocument) {
        self.collection_or_create(database, collection)
            .write()
            .push(document);
    }

    /// Number of documents in a collection (0 if it does not exist)
    pub fn count(&self, database: &str, collection: &str) -> usize {
        match self.collection(database, collection) {
            Some(collection) => {
                let documents = collection.read();
                documents.len()
            }
            None => 0,
        }
    }

    /// Make `connect` succeed or fail
    pub fn set_online(&self, online: bool) {
        self.state.online.store(online, Ordering::SeqCst);
    }

    /// Make every write fail with an `Operation` error
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn database(&self, name: &str) -> Option<Arc<Database>> {
        self.state.databases.get(name).map(|db| Arc::clone(db.value()))
    }

    fn collection(&self, database: &str, collection: &str) -> Option<Collection> {
        self.database(database)?
            .collections
            .read()
            .get(collection)
            .cloned()
    }

    fn collection_or_create(&self, database: &str, collection: &str) -> Collection {
        let db = Arc::clone(
            self.state
                .databases
                .entry(database.to_string())
                .or_default()
                .value(),
        );
        let mut collections = db.collections.write();
        Arc::clone(collections.entry(collection.to_string()).or_default())
    }

    fn check_writable(&self) -> Result<()> {
        if self.state.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::operation("server rejected the write"));
        }
        Ok(())
    }
}

fn matches(document: &NativeDocument, filter: &NativeDocument) -> bool {
    filter
        .iter()
        .all(|(path, expected)| document.get_path(path) == Some(expected))
}

fn set_fields(document: &mut NativeDocument, fields: &NativeDocument) -> Result<()> {
    for (path, value) in fields.iter() {
        if !document.set_path(path, value.clone()) {
            return Err(Error::operation(format!(
                "cannot set '{}': a parent field is not a document",
                path
            )));
        }
    }
    Ok(())
}

impl Connector for MemoryServer {
    fn storage_type(&self) -> &str {
        STORAGE_TYPE
    }

    fn connect(&self, uri: &ConnectionUri) -> Result<Arc<dyn DocumentDatabase>> {
        if !self.state.online.load(Ordering::SeqCst) {
            return Err(Error::connection(format!("server at {} is unreachable", uri)));
        }
        debug!(target: "docvault::memory", uri = %uri, "connected");
        Ok(Arc::new(self.clone()))
    }
}

impl DocumentDatabase for MemoryServer {
    fn list_databases(&self) -> Result<Vec<String>> {
        if !self.state.online.load(Ordering::SeqCst) {
            return Err(Error::connection("server is unreachable"));
        }
        Ok(self
            .state
            .databases
            .iter()
            .map(|entry| entry.key().clone())
            .collect())
    }

    fn has_collection(&self, database: &str, collection: &str) -> Result<bool> {
        Ok(self.collection(database, collection).is_some())
    }

    fn create_collection(&self, database: &str, collection: &str) -> Result<()> {
        self.check_writable()?;
        let db = self
            .database(database)
            .ok_or_else(|| Error::operation(format!("database '{}' does not exist", database)))?;
        let mut collections = db.collections.write();
        if collections.contains_key(collection) {
            return Err(Error::operation(format!(
                "collection '{}' already exists",
                collection
            )));
        }
        collections.insert(collection.to_string(), Collection::default());
        debug!(target: "docvault::memory", database, collection, "collection created");
        Ok(())
    }

    fn find_one(
        &self,
        database: &str,
        collection: &str,
        filter: &NativeDocument,
    ) -> Result<Option<NativeDocument>> {
        let Some(collection) = self.collection(database, collection) else {
            return Ok(None);
        };
        let documents = collection.read();
        let found = documents.iter().find(|doc| matches(doc, filter)).cloned();
        Ok(found)
    }

    fn find(
        &self,
        database: &str,
        collection: &str,
        filter: &NativeDocument,
    ) -> Result<Vec<NativeDocument>> {
        let Some(collection) = self.collection(database, collection) else {
            return Ok(Vec::new());
        };
        let documents = collection.read();
        let found: Vec<NativeDocument> = documents
            .iter()
            .filter(|doc| matches(doc, filter))
            .cloned()
            .collect();
        Ok(found)
    }

    fn find_and_upsert(
        &self,
        database: &str,
        collection: &str,
        filter: &NativeDocument,
        set: &NativeDocument,
    ) -> Result<()> {
        self.check_writable()?;
        let collection = self.collection_or_create(database, collection);
        let mut documents = collection.write();

        if let Some(existing) = documents.iter_mut().find(|doc| matches(doc, filter)) {
            return set_fields(existing, set);
        }

        let mut created = NativeDocument::new().with("_id", ObjectId::new());
        set_fields(&mut created, filter)?;
        set_fields(&mut created, set)?;
        documents.push(created);
        Ok(())
    }
}

impl std::fmt::Debug for MemoryServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryServer")
            .field("databases", &self.state.databases.len())
            .field("online", &self.state.online.load(Ordering::SeqCst))
            .finish()
    }
}
