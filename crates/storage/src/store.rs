//! Document store: user-scoped get/put over a document database
//!
//! Persisted record shape, one collection per entity type:
//!
//! ```text
//! { _id, user_id: <users._id>, <entity_type>_id: { <attr>: <typed>, ... }, data: <document> }
//! ```
//!
//! plus a reserved `users` collection mapping `user_name` → `_id`.
//!
//! ## Opening
//!
//! [`DocumentStore::open`] runs the startup checks in order and fails fast:
//!
//! 1. storage type tag matches the connector
//! 2. URI parses and names a database
//! 3. connect
//! 4. the database exists
//! 5. the collection map covers exactly the registered entity types
//! 6. `users` and every mapped collection exist (created when absent)

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

use docvault_core::{
    DocumentValue, EntityKey, EntityTypeDescriptor, EntityTypeRegistry, Error, Result, Storage,
    StorageConfig,
};

use crate::codec::{encode_key, from_native, to_native, typed_to_native};
use crate::database::{Connector, DocumentDatabase};
use crate::native::{NativeDocument, NativeValue};
use crate::uri::ConnectionUri;

/// Reserved collection holding user records
pub const USERS_COLLECTION: &str = "users";
/// Username field of a user record
pub const USER_NAME_FIELD: &str = "user_name";
/// Identifier field of a user record
pub const USER_RECORD_ID_FIELD: &str = "_id";
/// Owner field of an entity record
pub const USER_ID_FIELD: &str = "user_id";
/// Payload field of an entity record
pub const DATA_FIELD: &str = "data";

/// Entity-type name → collection name
pub type CollectionMap = BTreeMap<String, String>;

/// Name of the key sub-document for an entity type
pub fn key_field(entity_type: &str) -> String {
    format!("{}_id", entity_type)
}

/// Storage backed by a [`DocumentDatabase`]
pub struct DocumentStore {
    database: Arc<dyn DocumentDatabase>,
    database_name: String,
    collections: CollectionMap,
    registry: Arc<EntityTypeRegistry>,
}

impl DocumentStore {
    /// Validate configuration, connect, and bootstrap collections
    ///
    /// # Errors
    ///
    /// - `Configuration` for a type mismatch, a URI without database, a
    ///   missing database, or a collection map that does not match the
    ///   registry
    /// - `Connection` if the server cannot be reached
    /// - `Operation` if a collection cannot be created
    pub fn open(
        config: &StorageConfig,
        registry: Arc<EntityTypeRegistry>,
        connector: &dyn Connector,
    ) -> Result<Self> {
        if config.storage_type != connector.storage_type() {
            return Err(Error::configuration(format!(
                "storage type mismatch: configured '{}', backend serves '{}'",
                config.storage_type,
                connector.storage_type()
            )));
        }

        let uri = ConnectionUri::parse(&config.uri)?;
        let database_name = uri.require_database()?.to_string();

        let database = connector.connect(&uri)?;
        if !database.database_exists(&database_name)? {
            return Err(Error::configuration(format!(
                "database '{}' does not exist",
                database_name
            )));
        }
        let collections = validate_collections(&config.collections, &registry)?;
        info!(target: "docvault::store", uri = %uri, "connected to document database");

        let store = Self {
            database,
            database_name,
            collections,
            registry,
        };
        store.ensure_collection(USERS_COLLECTION)?;
        for collection in store.collections.values() {
            store.ensure_collection(collection)?;
        }
        Ok(store)
    }

    /// Database every operation runs against
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Collection backing an entity type
    pub fn collection_for(&self, entity_type: &str) -> Option<&str> {
        self.collections.get(entity_type).map(String::as_str)
    }

    fn ensure_collection(&self, collection: &str) -> Result<()> {
        let exists = self
            .database
            .has_collection(&self.database_name, collection)
            .map_err(as_operation)?;
        if !exists {
            self.database
                .create_collection(&self.database_name, collection)
                .map_err(|e| {
                    Error::operation(format!(
                        "failed to create collection '{}': {}",
                        collection, e
                    ))
                })?;
            info!(target: "docvault::store", collection, "created collection");
        }
        Ok(())
    }

    fn entity(&self, entity_type: &str) -> Result<(&EntityTypeDescriptor, &str)> {
        let descriptor = self.registry.lookup(entity_type).ok_or_else(|| {
            Error::invalid_argument(format!("unknown entity type '{}'", entity_type))
        })?;
        let collection = self.collection_for(entity_type).ok_or_else(|| {
            Error::invalid_argument(format!(
                "no collection mapped for entity type '{}'",
                entity_type
            ))
        })?;
        Ok((descriptor, collection))
    }

    fn resolve_user(&self, username: &str) -> Result<Option<NativeValue>> {
        let filter = NativeDocument::new().with(USER_NAME_FIELD, username);
        let record = self
            .database
            .find_one(&self.database_name, USERS_COLLECTION, &filter)?;

        match record {
            None => Ok(None),
            Some(record) => record
                .get(USER_RECORD_ID_FIELD)
                .cloned()
                .map(Some)
                .ok_or_else(|| Error::data(format!("user record '{}' has no _id", username))),
        }
    }
}

fn as_operation(e: Error) -> Error {
    match e {
        Error::Operation { .. } => e,
        other => Error::operation(other.to_string()),
    }
}

fn validate_collections(
    configured: &BTreeMap<String, String>,
    registry: &EntityTypeRegistry,
) -> Result<CollectionMap> {
    let mut names = HashSet::new();
    for (entity_type, collection) in configured {
        if !registry.contains(entity_type) {
            return Err(Error::configuration(format!(
                "collection '{}' is mapped to unknown entity type '{}'",
                collection, entity_type
            )));
        }
        if collection.is_empty() || collection == USERS_COLLECTION {
            return Err(Error::configuration(format!(
                "entity type '{}' cannot use collection name '{}'",
                entity_type, collection
            )));
        }
        if !names.insert(collection.as_str()) {
            return Err(Error::configuration(format!(
                "collection '{}' is mapped to more than one entity type",
                collection
            )));
        }
    }

    if let Some(unmapped) = registry.names().find(|name| !configured.contains_key(*name)) {
        return Err(Error::configuration(format!(
            "entity type '{}' has no associated collection",
            unmapped
        )));
    }

    Ok(configured.clone())
}

impl Storage for DocumentStore {
    fn get(
        &self,
        username: &str,
        entity_type: &str,
        filter: &EntityKey,
    ) -> Result<Vec<DocumentValue>> {
        let (descriptor, collection) = self.entity(entity_type)?;

        let Some(user_id) = self.resolve_user(username)? else {
            debug!(target: "docvault::store", username, entity_type, "get for unknown user");
            return Ok(Vec::new());
        };

        let key_field = key_field(entity_type);
        let mut native_filter = NativeDocument::new().with(USER_ID_FIELD, user_id);
        for (name, value) in filter.iter() {
            if descriptor.attribute(name).is_some() {
                native_filter.insert(format!("{}.{}", key_field, name), typed_to_native(value));
            }
        }

        let records = self
            .database
            .find(&self.database_name, collection, &native_filter)?;

        let mut documents = Vec::with_capacity(records.len());
        for record in &records {
            let data = record.get(DATA_FIELD).ok_or_else(|| {
                Error::data(format!(
                    "record in collection '{}' has no '{}' field",
                    collection, DATA_FIELD
                ))
            })?;
            documents.push(from_native(data)?);
        }

        debug!(
            target: "docvault::store",
            username,
            entity_type,
            found = documents.len(),
            "get"
        );
        Ok(documents)
    }

    fn put(
        &self,
        username: &str,
        entity_type: &str,
        key: &EntityKey,
        value: &DocumentValue,
    ) -> Result<()> {
        let (descriptor, collection) = self.entity(entity_type)?;
        let encoded_key = encode_key(key, descriptor)?;

        let user_id = self
            .resolve_user(username)?
            .ok_or_else(|| Error::UserNotFound {
                username: username.to_string(),
            })?;

        let filter = NativeDocument::new()
            .with(USER_ID_FIELD, user_id)
            .with(key_field(entity_type), encoded_key);
        let set = NativeDocument::new().with(DATA_FIELD, to_native(value));

        self.database
            .find_and_upsert(&self.database_name, collection, &filter, &set)
            .map_err(|e| Error::operation(format!("upsert into '{}' failed: {}", collection, e)))?;

        debug!(target: "docvault::store", username, entity_type, "put");
        Ok(())
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("database_name", &self.database_name)
            .field("collections", &self.collections)
            .finish()
    }
}
