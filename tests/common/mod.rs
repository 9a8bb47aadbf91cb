//! Shared test utilities for all integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from any suite's
//! main.rs.

#![allow(dead_code)]

use std::sync::Arc;

pub use docvault::{
    AttributeDescriptor, AttributeType, Config, DocumentController, DocumentStore, DocumentValue,
    EntityKey, EntityTypeRegistry, Error, MemoryServer, Storage, StorageConfig,
};

/// Database every fixture uses
pub const DATABASE: &str = "shop";

/// Configuration with `order` (integer `id`) and `reading` (string `sensor`,
/// float `celsius`, integer `seq`)
pub const CONFIG: &str = r#"{
    "entity_types": {
        "order": { "key": [ { "name": "id", "type": "integer" } ] },
        "reading": {
            "key": [
                { "name": "sensor", "type": "string" },
                { "name": "celsius", "type": "float" },
                { "name": "seq", "type": "integer" }
            ]
        }
    },
    "storages": {
        "main": {
            "type": "memory",
            "uri": "memory://localhost:27017/shop",
            "collections": { "order": "orders", "reading": "readings" }
        }
    }
}"#;

pub fn config() -> Config {
    Config::from_json_str(CONFIG).unwrap()
}

pub fn registry() -> Arc<EntityTypeRegistry> {
    Arc::new(config().registry().unwrap())
}

/// A reachable server holding the `shop` database and the given users
pub fn server_with_users(users: &[&str]) -> MemoryServer {
    let server = MemoryServer::new();
    server.create_database(DATABASE);
    for user in users {
        server.insert_user(DATABASE, user);
    }
    server
}

/// Store opened against a fresh server
pub fn open_store(users: &[&str]) -> (MemoryServer, DocumentStore) {
    let server = server_with_users(users);
    let config = config();
    let store = DocumentStore::open(config.main_storage().unwrap(), registry(), &server).unwrap();
    (server, store)
}

/// Controller opened against a fresh server
pub fn open_controller(users: &[&str]) -> (MemoryServer, DocumentController) {
    let server = server_with_users(users);
    let controller = docvault::open(&config(), &server).unwrap();
    (server, controller)
}

pub fn order_key(id: i64) -> EntityKey {
    EntityKey::new().with("id", id)
}

pub fn json(text: &str) -> DocumentValue {
    DocumentValue::from_json_slice(text.as_bytes()).unwrap()
}
