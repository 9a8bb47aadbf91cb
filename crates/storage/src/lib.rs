//! Storage layer for docvault
//!
//! This crate implements the document store and its backends:
//! - DocumentStore: user-scoped get/put over a document database
//! - DocumentDatabase / Connector: the backing-database capability
//! - NativeValue / NativeDocument: the backend's ordered document tree
//! - codec: DocumentValue <-> native conversion and key encoding
//! - MemoryServer: embedded in-process backend (storage type "memory")
//! - MongoConnector: MongoDB backend (feature `mongodb`)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod database;
pub mod memory;
#[cfg(feature = "mongodb")]
pub mod mongo;
pub mod native;
pub mod store;
pub mod uri;

pub use codec::{encode_key, from_native, to_native};
pub use database::{Connector, DocumentDatabase};
pub use memory::MemoryServer;
#[cfg(feature = "mongodb")]
pub use mongo::{MongoConnector, MongoDatabase};
pub use native::{NativeDocument, NativeValue, ObjectId};
pub use store::{CollectionMap, DocumentStore, USERS_COLLECTION};
pub use uri::ConnectionUri;
