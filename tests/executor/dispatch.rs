//! Route dispatch and status codes.

use crate::common::*;
use docvault::transport::{dispatch, Method, Request, Status};

fn body_json(body: Option<&str>) -> serde_json::Value {
    serde_json::from_str(body.unwrap()).unwrap()
}

#[test]
fn alice_stores_and_bob_cannot_read() {
    let (_server, c) = open_controller(&["alice", "bob"]);
    let sent = r#"{"total": 9.5, "items": [1, 2, 3]}"#;

    let put = dispatch(&c, &Request::put("/alice/order/42", sent));
    assert_eq!(put.status.code(), 204);

    let get = dispatch(&c, &Request::get("/alice/order/42"));
    assert_eq!(get.status.code(), 200);
    assert_eq!(get.content_type(), Some("application/json"));
    assert_eq!(
        body_json(get.body.as_deref()),
        serde_json::from_str::<serde_json::Value>(sent).unwrap()
    );

    let bob = dispatch(&c, &Request::get("/bob/order/42"));
    assert_eq!(bob.status.code(), 404);
}

#[test]
fn put_for_unknown_user_is_404() {
    let (server, c) = open_controller(&["alice"]);
    let response = dispatch(&c, &Request::put("/mallory/order/1", "{}"));
    assert_eq!(response.status, Status::NotFound);
    assert_eq!(server.count(DATABASE, "orders"), 0);
}

#[test]
fn put_with_wrong_segment_count_is_404() {
    let (server, c) = open_controller(&["alice"]);
    let response = dispatch(&c, &Request::put("/alice/order/42/7", "{}"));
    assert_eq!(response.status, Status::NotFound);
    assert_eq!(server.count(DATABASE, "orders"), 0);
}

#[test]
fn bad_body_is_400() {
    let (_server, c) = open_controller(&["alice"]);
    for body in ["", "{", "[1, 2", "{\"a\": 1} trailing"] {
        let response = dispatch(&c, &Request::put("/alice/order/1", body));
        assert_eq!(response.status.code(), 400, "{body:?}");
        assert!(body_json(response.body.as_deref())["error"].is_string());
    }
}

#[test]
fn unknown_entity_type_is_404() {
    let (_server, c) = open_controller(&["alice"]);
    assert_eq!(dispatch(&c, &Request::get("/alice/invoice/1")).status.code(), 404);
    assert_eq!(dispatch(&c, &Request::put("/alice/invoice/1", "{}")).status.code(), 404);
}

#[test]
fn unsupported_method_is_405() {
    let (_server, c) = open_controller(&["alice"]);
    let request = Request {
        method: Method::parse("PATCH"),
        target: "/alice/order/1".to_string(),
        body: b"{}".to_vec(),
    };
    assert_eq!(dispatch(&c, &request).status, Status::MethodNotAllowed);
}

#[test]
fn backend_failure_is_500() {
    let (server, c) = open_controller(&["alice"]);
    server.set_fail_writes(true);
    let response = dispatch(&c, &Request::put("/alice/order/1", "{}"));
    assert_eq!(response.status, Status::InternalError);
    assert_eq!(response.body, None);
}

#[test]
fn scalar_and_nested_documents_round_trip() {
    let (_server, c) = open_controller(&["alice"]);
    for (id, sent) in [
        (1, "null"),
        (2, "true"),
        (3, "\"text\""),
        (4, "-17"),
        (5, "[]"),
        (6, r#"{"a": {"b": {"c": [1.5, null, {}]}}}"#),
    ] {
        let target = format!("/alice/order/{id}");
        assert_eq!(dispatch(&c, &Request::put(target.clone(), sent)).status.code(), 204);
        let get = dispatch(&c, &Request::get(target));
        assert_eq!(
            body_json(get.body.as_deref()),
            serde_json::from_str::<serde_json::Value>(sent).unwrap()
        );
    }
}

#[test]
fn dotted_key_attribute_is_rejected_at_startup() {
    let config = Config::from_json_str(
        r#"{
            "entity_types": { "order": { "key": [ { "name": "ref.id", "type": "integer" } ] } },
            "storages": { "main": { "type": "memory", "uri": "memory://localhost/shop",
                                    "collections": { "order": "orders" } } }
        }"#,
    )
    .unwrap();
    let server = server_with_users(&["alice"]);

    let err = docvault::open(&config, &server).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    assert_eq!(server.count(DATABASE, "orders"), 0);
}
