//! User scoping of get and put.

use crate::common::*;

#[test]
fn put_then_get_returns_last_written_value() {
    let (_server, store) = open_store(&["alice"]);
    let key = order_key(42);

    store.put("alice", "order", &key, &json(r#"{"total": 1}"#)).unwrap();
    store.put("alice", "order", &key, &json(r#"{"total": 2}"#)).unwrap();

    assert_eq!(store.get("alice", "order", &key).unwrap(), vec![json(r#"{"total": 2}"#)]);
}

#[test]
fn users_do_not_see_each_other() {
    let (_server, store) = open_store(&["alice", "bob"]);
    let key = order_key(42);
    store.put("alice", "order", &key, &json(r#""alice's""#)).unwrap();
    store.put("bob", "order", &key, &json(r#""bob's""#)).unwrap();

    assert_eq!(store.get("alice", "order", &key).unwrap(), vec![json(r#""alice's""#)]);
    assert_eq!(store.get("bob", "order", &key).unwrap(), vec![json(r#""bob's""#)]);
}

#[test]
fn unknown_user_reads_nothing_and_writes_nothing() {
    let (server, store) = open_store(&["alice"]);

    assert!(store.get("mallory", "order", &order_key(1)).unwrap().is_empty());

    let err = store
        .put("mallory", "order", &order_key(1), &json("{}"))
        .unwrap_err();
    assert!(matches!(err, Error::UserNotFound { .. }));
    assert_eq!(server.count(DATABASE, "orders"), 0);
    assert_eq!(server.count(DATABASE, "users"), 1);
}

#[test]
fn entity_types_are_separate() {
    let (server, store) = open_store(&["alice"]);
    store.put("alice", "order", &order_key(1), &json("1")).unwrap();

    let reading = EntityKey::new()
        .with("sensor", "boiler")
        .with("celsius", 21.5f32)
        .with("seq", 1i64);
    store.put("alice", "reading", &reading, &json("2")).unwrap();

    assert_eq!(server.count(DATABASE, "orders"), 1);
    assert_eq!(server.count(DATABASE, "readings"), 1);
    assert_eq!(store.get("alice", "reading", &reading).unwrap(), vec![json("2")]);
}

#[test]
fn partial_filter_matches_in_store_order() {
    let (_server, store) = open_store(&["alice"]);
    for (sensor, seq) in [("boiler", 1i64), ("pump", 1), ("boiler", 2)] {
        let key = EntityKey::new()
            .with("sensor", sensor)
            .with("celsius", 20.0f32)
            .with("seq", seq);
        store.put("alice", "reading", &key, &DocumentValue::from(seq)).unwrap();
    }

    let found = store
        .get("alice", "reading", &EntityKey::new().with("sensor", "boiler"))
        .unwrap();
    assert_eq!(found, vec![DocumentValue::from(1i64), DocumentValue::from(2i64)]);
}
