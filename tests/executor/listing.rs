//! Listing with exact-match filters.

use crate::common::*;
use docvault::transport::{dispatch, Request};
use docvault::Outcome;

fn seed(c: &DocumentController) {
    for (path, body) in [
        ("boiler/20/1", "1"),
        ("boiler/20/2", "2"),
        ("pump/20/1", "3"),
    ] {
        assert_eq!(c.handle_put("alice", "reading", path, body.as_bytes()).unwrap(), Outcome::Stored);
    }
}

#[test]
fn filter_on_key_attributes() {
    let (_server, c) = open_controller(&["alice"]);
    seed(&c);

    let response = dispatch(&c, &Request::get("/alice/reading?sensor=boiler"));
    assert_eq!(response.status.code(), 200);
    assert_eq!(response.body.as_deref(), Some("[1,2]"));

    let response = dispatch(&c, &Request::get("/alice/reading?seq=1"));
    assert_eq!(response.body.as_deref(), Some("[1,3]"));

    let response = dispatch(&c, &Request::get("/alice/reading?sensor=pump&celsius=20"));
    assert_eq!(response.body.as_deref(), Some("[3]"));
}

#[test]
fn unknown_filter_attributes_are_ignored() {
    let (_server, c) = open_controller(&["alice"]);
    seed(&c);

    let response = dispatch(&c, &Request::get("/alice/reading?colour=red&sensor=pump"));
    assert_eq!(response.body.as_deref(), Some("[3]"));
}

#[test]
fn empty_listing_is_empty_array() {
    let (_server, c) = open_controller(&["alice"]);
    let response = dispatch(&c, &Request::get("/alice/order"));
    assert_eq!(response.status.code(), 200);
    assert_eq!(response.body.as_deref(), Some("[]"));

    let stranger = dispatch(&c, &Request::get("/nobody/reading"));
    assert_eq!(stranger.body.as_deref(), Some("[]"));
}

#[test]
fn unparsable_filter_is_404() {
    let (_server, c) = open_controller(&["alice"]);
    assert_eq!(dispatch(&c, &Request::get("/alice/reading?seq=one")).status.code(), 404);
}
