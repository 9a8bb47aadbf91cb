//! Key-path acceptance through the controller.

use crate::common::*;
use docvault::Outcome;

#[test]
fn integer_key_paths() {
    let (_server, c) = open_controller(&["alice"]);
    assert_eq!(c.handle_put("alice", "order", "42", b"1").unwrap(), Outcome::Stored);
    assert_eq!(
        c.handle_get("alice", "order", "42").unwrap(),
        Outcome::Document(json("1"))
    );
    assert_eq!(c.handle_get("alice", "order", "42/7").unwrap(), Outcome::NotFound);
    assert_eq!(c.handle_get("alice", "order", "abc").unwrap(), Outcome::NotFound);
    assert_eq!(c.handle_put("alice", "order", "abc", b"1").unwrap(), Outcome::NotFound);
}

#[test]
fn composite_key_paths() {
    let (_server, c) = open_controller(&["alice"]);
    assert_eq!(
        c.handle_put("alice", "reading", "boiler/21.5/3", b"{}").unwrap(),
        Outcome::Stored
    );
    assert_eq!(
        c.handle_get("alice", "reading", "boiler/21.5/3").unwrap(),
        Outcome::Document(json("{}"))
    );

    for bad in ["boiler/21.5", "boiler/21.5/3/4", "boiler//3", "boiler/warm/3", "boiler/21.5/3.0"] {
        assert_eq!(
            c.handle_get("alice", "reading", bad).unwrap(),
            Outcome::NotFound,
            "{bad}"
        );
    }
}

#[test]
fn float_segments_match_by_value() {
    let (_server, c) = open_controller(&["alice"]);
    c.handle_put("alice", "reading", "boiler/21.50/3", b"1").unwrap();
    assert_eq!(
        c.handle_get("alice", "reading", "boiler/21.5/3").unwrap(),
        Outcome::Document(json("1"))
    );
}
