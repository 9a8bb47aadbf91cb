//! # docvault executor
//!
//! Request orchestration for docvault: the layer between a transport and
//! the storage capability.
//!
//! - [`DocumentController`] - get/put/list handlers over any [`Storage`](docvault_core::Storage)
//! - [`Outcome`] - what a handled request produced
//! - [`transport`] - route parsing and status mapping
//! - [`open`] - build a controller from configuration
//!
//! ## Quick Start
//!
//! ```text
//! use docvault_executor::{open, transport::{dispatch, Request}};
//! use docvault_storage::MemoryServer;
//!
//! let controller = open(&config, &server)?;
//! let response = dispatch(&controller, &Request::put("/alice/order/42", r#"{"total": 9.5}"#));
//! assert_eq!(response.status.code(), 204);
//! ```

#![warn(missing_docs)]

mod bootstrap;
mod controller;
mod output;
pub mod transport;

// Test modules
#[cfg(test)]
mod tests;

pub use bootstrap::{open, open_path};
pub use controller::DocumentController;
pub use output::Outcome;
