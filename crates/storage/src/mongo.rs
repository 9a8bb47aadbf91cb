//! MongoDB backend (feature `mongodb`)
//!
//! Maps the [`DocumentDatabase`] surface onto the synchronous driver.
//! BSON types the native tree has no variant for (decimals, regexes,
//! timestamps, ...) come back as [`NativeValue::Unsupported`].

use std::sync::Arc;

use mongodb::bson::{oid, spec::BinarySubtype, Binary, Bson, Document};
use mongodb::options::FindOneAndUpdateOptions;
use mongodb::sync::Client;
use tracing::debug;

use docvault_core::{Error, Result};

use crate::database::{Connector, DocumentDatabase};
use crate::native::{NativeDocument, NativeValue, ObjectId};
use crate::uri::ConnectionUri;

/// Storage type tag served by [`MongoConnector`]
pub const STORAGE_TYPE: &str = "mongodb";

/// Connects to MongoDB servers
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoConnector;

impl Connector for MongoConnector {
    fn storage_type(&self) -> &str {
        STORAGE_TYPE
    }

    fn connect(&self, uri: &ConnectionUri) -> Result<Arc<dyn DocumentDatabase>> {
        let client = Client::with_uri_str(uri.as_str())
            .map_err(|e| Error::connection(format!("cannot connect to {}: {}", uri, e)))?;
        debug!(target: "docvault::mongo", uri = %uri, "client created");
        Ok(Arc::new(MongoDatabase { client }))
    }
}

/// A driver client shared by every request
#[derive(Debug, Clone)]
pub struct MongoDatabase {
    client: Client,
}

impl MongoDatabase {
    fn collection(&self, database: &str, collection: &str) -> mongodb::sync::Collection<Document> {
        self.client.database(database).collection(collection)
    }
}

impl DocumentDatabase for MongoDatabase {
    fn list_databases(&self) -> Result<Vec<String>> {
        self.client
            .list_database_names(None, None)
            .map_err(|e| Error::connection(format!("cannot list databases: {}", e)))
    }

    fn has_collection(&self, database: &str, collection: &str) -> Result<bool> {
        let names = self
            .client
            .database(database)
            .list_collection_names(None)
            .map_err(|e| Error::operation(format!("cannot list collections: {}", e)))?;
        Ok(names.iter().any(|name| name == collection))
    }

    fn create_collection(&self, database: &str, collection: &str) -> Result<()> {
        self.client
            .database(database)
            .create_collection(collection, None)
            .map_err(|e| Error::operation(e.to_string()))
    }

    fn find_one(
        &self,
        database: &str,
        collection: &str,
        filter: &NativeDocument,
    ) -> Result<Option<NativeDocument>> {
        let found = self
            .collection(database, collection)
            .find_one(to_bson_document(filter)?, None)
            .map_err(|e| Error::operation(format!("find_one failed: {}", e)))?;
        Ok(found.as_ref().map(from_bson_document))
    }

    fn find(
        &self,
        database: &str,
        collection: &str,
        filter: &NativeDocument,
    ) -> Result<Vec<NativeDocument>> {
        let cursor = self
            .collection(database, collection)
            .find(to_bson_document(filter)?, None)
            .map_err(|e| Error::operation(format!("find failed: {}", e)))?;

        let mut documents = Vec::new();
        for document in cursor {
            let document = document.map_err(|e| Error::operation(format!("cursor failed: {}", e)))?;
            documents.push(from_bson_document(&document));
        }
        Ok(documents)
    }

    fn find_and_upsert(
        &self,
        database: &str,
        collection: &str,
        filter: &NativeDocument,
        set: &NativeDocument,
    ) -> Result<()> {
        let mut update = Document::new();
        update.insert("$set", to_bson_document(set)?);
        let options = FindOneAndUpdateOptions::builder().upsert(true).build();

        self.collection(database, collection)
            .find_one_and_update(to_bson_document(filter)?, update, options)
            .map_err(|e| Error::operation(e.to_string()))?;
        Ok(())
    }
}

/// Native value to BSON
///
/// # Errors
///
/// `InvalidArgument` for [`NativeValue::Unsupported`], which only exists on
/// the read side and has no value to write back.
fn to_bson(value: &NativeValue) -> Result<Bson> {
    Ok(match value {
        NativeValue::Null => Bson::Null,
        NativeValue::Bool(b) => Bson::Boolean(*b),
        NativeValue::Int32(i) => Bson::Int32(*i),
        NativeValue::Int64(i) => Bson::Int64(*i),
        NativeValue::Double(f) => Bson::Double(*f),
        NativeValue::String(s) => Bson::String(s.clone()),
        NativeValue::Array(items) => {
            Bson::Array(items.iter().map(to_bson).collect::<Result<Vec<_>>>()?)
        }
        NativeValue::Document(doc) => Bson::Document(to_bson_document(doc)?),
        NativeValue::ObjectId(id) => Bson::ObjectId(oid::ObjectId::from_bytes(id.bytes())),
        NativeValue::Binary(bytes) => Bson::Binary(Binary {
            subtype: BinarySubtype::Generic,
            bytes: bytes.clone(),
        }),
        NativeValue::DateTime(millis) => {
            Bson::DateTime(mongodb::bson::DateTime::from_millis(*millis))
        }
        NativeValue::Unsupported { type_name } => {
            return Err(Error::invalid_argument(format!(
                "cannot write unsupported native type '{}'",
                type_name
            )))
        }
    })
}

fn to_bson_document(doc: &NativeDocument) -> Result<Document> {
    let mut out = Document::new();
    for (name, value) in doc.iter() {
        out.insert(name, to_bson(value)?);
    }
    Ok(out)
}

fn from_bson(value: &Bson) -> NativeValue {
    match value {
        Bson::Null => NativeValue::Null,
        Bson::Boolean(b) => NativeValue::Bool(*b),
        Bson::Int32(i) => NativeValue::Int32(*i),
        Bson::Int64(i) => NativeValue::Int64(*i),
        Bson::Double(f) => NativeValue::Double(*f),
        Bson::String(s) => NativeValue::String(s.clone()),
        Bson::Array(items) => NativeValue::Array(items.iter().map(from_bson).collect()),
        Bson::Document(doc) => NativeValue::Document(from_bson_document(doc)),
        Bson::ObjectId(id) => NativeValue::ObjectId(ObjectId::from_bytes(id.bytes())),
        Bson::Binary(binary) => NativeValue::Binary(binary.bytes.clone()),
        Bson::DateTime(dt) => NativeValue::DateTime(dt.timestamp_millis()),
        other => NativeValue::Unsupported {
            type_name: format!("{:?}", other.element_type()),
        },
    }
}

fn from_bson_document(doc: &Document) -> NativeDocument {
    doc.iter()
        .map(|(name, value)| (name.as_str(), from_bson(value)))
        .collect()
}
