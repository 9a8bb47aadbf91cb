//! Stored-record invariants.

use crate::common::*;
use docvault_storage::{NativeDocument, NativeValue, ObjectId};

fn alice_id(server: &MemoryServer) -> NativeValue {
    use docvault::DocumentDatabase;
    let user = server
        .find_one(DATABASE, "users", &NativeDocument::new().with("user_name", "alice"))
        .unwrap()
        .unwrap();
    user.get("_id").cloned().unwrap()
}

#[test]
fn record_without_payload_is_data_error() {
    let (server, store) = open_store(&["alice"]);
    server.insert_raw(
        DATABASE,
        "orders",
        NativeDocument::new()
            .with("user_id", alice_id(&server))
            .with("order_id", NativeDocument::new().with("id", 7i64)),
    );

    let err = store.get("alice", "order", &order_key(7)).unwrap_err();
    assert!(matches!(err, Error::Data { .. }));
}

#[test]
fn payload_with_foreign_type_is_data_error() {
    let (server, store) = open_store(&["alice"]);
    server.insert_raw(
        DATABASE,
        "orders",
        NativeDocument::new()
            .with("user_id", alice_id(&server))
            .with("order_id", NativeDocument::new().with("id", 7i64))
            .with(
                "data",
                NativeDocument::new().with("owner", ObjectId::new()),
            ),
    );

    let err = store.get("alice", "order", &order_key(7)).unwrap_err();
    assert!(matches!(err, Error::Data { .. }));
}

#[test]
fn user_record_without_id_is_data_error() {
    let server = server_with_users(&[]);
    server.insert_raw(DATABASE, "users", NativeDocument::new().with("user_name", "ghost"));
    let config = config();
    let store = DocumentStore::open(config.main_storage().unwrap(), registry(), &server).unwrap();

    let err = store.get("ghost", "order", &order_key(1)).unwrap_err();
    assert!(matches!(err, Error::Data { .. }));
}

#[test]
fn integer_widths_survive_storage() {
    let (_server, store) = open_store(&["alice"]);
    let value = json(r#"{"small": 1, "large": 9007199254740993, "ratio": 0.25}"#);
    store.put("alice", "order", &order_key(1), &value).unwrap();
    assert_eq!(store.get("alice", "order", &order_key(1)).unwrap(), vec![value]);
}

#[test]
fn rejected_write_is_operation_error() {
    let (server, store) = open_store(&["alice"]);
    server.set_fail_writes(true);
    let err = store.put("alice", "order", &order_key(1), &json("{}")).unwrap_err();
    assert!(matches!(err, Error::Operation { .. }));
}
