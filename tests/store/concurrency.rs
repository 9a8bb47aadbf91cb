//! Concurrent writers.

use crate::common::*;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn concurrent_puts_leave_one_document() {
    let (server, store) = open_store(&["alice"]);
    let store = Arc::new(store);
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store
                    .put("alice", "order", &order_key(1), &DocumentValue::from(i as i64))
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(server.count(DATABASE, "orders"), 1);
    let found = store.get("alice", "order", &order_key(1)).unwrap();
    assert_eq!(found.len(), 1);
    let written = found[0].as_number().and_then(|n| n.as_i64()).unwrap();
    assert!((0..threads as i64).contains(&written));
}

#[test]
fn concurrent_puts_to_distinct_keys() {
    let (server, store) = open_store(&["alice", "bob"]);
    let store = Arc::new(store);

    let handles: Vec<_> = ["alice", "bob"]
        .into_iter()
        .flat_map(|user| (0..25i64).map(move |id| (user, id)))
        .map(|(user, id)| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store
                    .put(user, "order", &order_key(id), &DocumentValue::from(id))
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(server.count(DATABASE, "orders"), 50);
}
