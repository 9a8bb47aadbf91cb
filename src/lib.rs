//! docvault - per-user, per-entity-type document store
//!
//! Documents are addressed by (username, entity type, composite key). Each
//! entity type declares a typed composite key in configuration; a key path
//! such as `boiler/7` is parsed against it and used to scope reads and
//! writes in a backing document database.
//!
//! # Quick Start
//!
//! ```ignore
//! use docvault::{open, Config, MemoryServer};
//! use docvault::transport::{dispatch, Request};
//!
//! let server = MemoryServer::new();
//! server.insert_user("shop", "alice");
//!
//! let controller = open(&Config::from_file("config.json".as_ref())?, &server)?;
//! dispatch(&controller, &Request::put("/alice/order/42", r#"{"total": 9.5}"#));
//! let response = dispatch(&controller, &Request::get("/alice/order/42"));
//! ```
//!
//! # Architecture
//!
//! - `docvault-core`: values, entity types, key parsing, config, errors
//! - `docvault-storage`: the document store and its backends
//! - `docvault-executor`: request orchestration and routing

pub use docvault_core::{
    parse_filter, parse_key_path, AttributeDescriptor, AttributeType, Config, DocumentValue,
    EntityKey, EntityTypeDescriptor, EntityTypeRegistry, Error, Number, Object, Result, Storage,
    StorageConfig, TypedValue,
};
pub use docvault_executor::{open, open_path, transport, DocumentController, Outcome};
#[cfg(feature = "mongodb")]
pub use docvault_storage::MongoConnector;
pub use docvault_storage::{Connector, DocumentDatabase, DocumentStore, MemoryServer};
