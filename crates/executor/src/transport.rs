//! HTTP-style request routing.
//!
//! Routes have the shape `/<username>/<entity_type>[/<key_path>][?<filter>]`.
//! The key path keeps its slashes, so `/alice/reading/boiler/7` addresses
//! key path `boiler/7`. A GET without a key path lists, a PUT without one
//! addresses nothing.
//!
//! No socket server lives here: embedders translate their framework's
//! request into a [`Request`] and write the [`Response`] back.

use std::fmt;

use docvault_core::DocumentValue;
use serde_json::json;
use tracing::{debug, warn};

use crate::{DocumentController, Outcome};

/// Content type of every response body
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Request method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// Read
    Get,
    /// Create or replace
    Put,
    /// Anything else; always rejected
    Other(String),
}

impl Method {
    /// Parse a method token (case-insensitive)
    pub fn parse(token: &str) -> Self {
        if token.eq_ignore_ascii_case("GET") {
            Method::Get
        } else if token.eq_ignore_ascii_case("PUT") {
            Method::Put
        } else {
            Method::Other(token.to_string())
        }
    }
}

/// An inbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Method
    pub method: Method,
    /// Path plus optional query string
    pub target: String,
    /// Raw body (ignored for GET)
    pub body: Vec<u8>,
}

impl Request {
    /// Build a GET request
    pub fn get(target: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            target: target.into(),
            body: Vec::new(),
        }
    }

    /// Build a PUT request
    pub fn put(target: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method: Method::Put,
            target: target.into(),
            body: body.into(),
        }
    }
}

/// Response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// 200
    Ok,
    /// 204
    NoContent,
    /// 400
    BadRequest,
    /// 404
    NotFound,
    /// 405
    MethodNotAllowed,
    /// 500
    InternalError,
}

impl Status {
    /// Numeric HTTP status code
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::NoContent => 204,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::MethodNotAllowed => 405,
            Status::InternalError => 500,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// An outbound response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status
    pub status: Status,
    /// JSON body, if any
    pub body: Option<String>,
}

impl Response {
    fn empty(status: Status) -> Self {
        Self { status, body: None }
    }

    fn json(status: Status, body: String) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    /// `application/json` when a body is present
    pub fn content_type(&self) -> Option<&'static str> {
        self.body.as_ref().map(|_| JSON_CONTENT_TYPE)
    }
}

/// A request target split into its parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route<'a> {
    /// Owner of the documents
    pub username: &'a str,
    /// Entity type name
    pub entity_type: &'a str,
    /// Key path, when the target addresses one document
    pub key_path: Option<&'a str>,
    /// Filter query, without the leading `?`
    pub query: Option<&'a str>,
}

/// Split a request target, or `None` if it lacks a username or entity type
pub fn parse_route(target: &str) -> Option<Route<'_>> {
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    };
    let path = path.strip_prefix('/')?;

    let mut parts = path.splitn(3, '/');
    let username = parts.next().filter(|s| !s.is_empty())?;
    let entity_type = parts.next().filter(|s| !s.is_empty())?;
    let key_path = parts.next();

    Some(Route {
        username,
        entity_type,
        key_path,
        query,
    })
}

/// Route a request to the controller and encode the outcome
pub fn dispatch(controller: &DocumentController, request: &Request) -> Response {
    let Some(route) = parse_route(&request.target) else {
        debug!(target: "docvault::transport", request = %request.target, "unroutable");
        return Response::empty(Status::NotFound);
    };

    let result = match (&request.method, route.key_path) {
        (Method::Get, Some(key_path)) => {
            controller.handle_get(route.username, route.entity_type, key_path)
        }
        (Method::Get, None) => controller.handle_list(
            route.username,
            route.entity_type,
            route.query.unwrap_or(""),
        ),
        (Method::Put, Some(key_path)) => controller.handle_put(
            route.username,
            route.entity_type,
            key_path,
            &request.body,
        ),
        (Method::Put, None) => Ok(Outcome::NotFound),
        (Method::Other(method), _) => {
            debug!(target: "docvault::transport", %method, "method not allowed");
            return Response::empty(Status::MethodNotAllowed);
        }
    };

    match result {
        Ok(outcome) => encode(outcome),
        Err(e) => {
            warn!(target: "docvault::transport", request = %request.target, error = %e, "request failed");
            Response::empty(Status::InternalError)
        }
    }
}

fn encode(outcome: Outcome) -> Response {
    match outcome {
        Outcome::Document(value) => Response::json(Status::Ok, value.to_json_string()),
        Outcome::Documents(values) => {
            Response::json(Status::Ok, DocumentValue::Array(values).to_json_string())
        }
        Outcome::Stored => Response::empty(Status::NoContent),
        Outcome::NotFound => Response::empty(Status::NotFound),
        Outcome::BadRequest { reason } => {
            Response::json(Status::BadRequest, json!({ "error": reason }).to_string())
        }
    }
}
