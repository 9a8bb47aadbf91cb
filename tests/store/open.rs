//! Startup validation.

use crate::common::*;
use std::sync::Arc;

fn storage(uri: &str, collections: &[(&str, &str)]) -> StorageConfig {
    StorageConfig {
        storage_type: "memory".to_string(),
        uri: uri.to_string(),
        collections: collections
            .iter()
            .map(|(t, c)| (t.to_string(), c.to_string()))
            .collect(),
    }
}

#[test]
fn bootstraps_users_and_entity_collections() {
    let (server, store) = open_store(&[]);
    assert_eq!(store.database_name(), DATABASE);
    assert_eq!(store.collection_for("reading"), Some("readings"));
    assert_eq!(server.count(DATABASE, "users"), 0);

    // reopening finds every collection in place
    let config = config();
    assert!(DocumentStore::open(config.main_storage().unwrap(), registry(), &server).is_ok());
}

#[test]
fn uri_must_name_database() {
    let server = server_with_users(&[]);
    let config = storage(
        "memory://localhost:27017",
        &[("order", "orders"), ("reading", "readings")],
    );
    let err = DocumentStore::open(&config, registry(), &server).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn database_must_exist() {
    let server = server_with_users(&[]);
    let config = storage(
        "memory://localhost/elsewhere",
        &[("order", "orders"), ("reading", "readings")],
    );
    let err = DocumentStore::open(&config, registry(), &server).unwrap_err();
    assert!(err.to_string().contains("elsewhere"));
}

#[test]
fn every_entity_type_needs_a_collection() {
    let server = server_with_users(&[]);
    let config = storage("memory://localhost/shop", &[("order", "orders")]);
    let err = DocumentStore::open(&config, registry(), &server).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn unknown_entity_type_in_collections() {
    let server = server_with_users(&[]);
    let config = storage(
        "memory://localhost/shop",
        &[("order", "orders"), ("reading", "readings"), ("invoice", "invoices")],
    );
    assert!(DocumentStore::open(&config, registry(), &server).is_err());
}

#[test]
fn unreachable_server_is_connection_error() {
    let server = server_with_users(&[]);
    server.set_online(false);
    let config = config();
    let err = DocumentStore::open(config.main_storage().unwrap(), registry(), &server).unwrap_err();
    assert!(matches!(err, Error::Connection { .. }));
}

#[test]
fn empty_registry_needs_only_users() {
    let server = server_with_users(&[]);
    let store = DocumentStore::open(
        &storage("memory://localhost/shop", &[]),
        Arc::new(EntityTypeRegistry::new()),
        &server,
    )
    .unwrap();
    assert_eq!(store.collection_for("order"), None);
}

#[test]
fn opens_from_config_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join(docvault_core::CONFIG_FILE_NAME);
    std::fs::write(&path, CONFIG).unwrap();

    let server = server_with_users(&["alice"]);
    let config = Config::from_file(&path).unwrap();
    let store = DocumentStore::open(
        config.main_storage().unwrap(),
        Arc::new(config.registry().unwrap()),
        &server,
    )
    .unwrap();
    assert_eq!(store.collection_for("order"), Some("orders"));
}
