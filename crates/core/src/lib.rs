//! Core types and traits for docvault
//!
//! This crate defines the foundational types used throughout the system:
//! - Error: the error taxonomy shared by every layer
//! - DocumentValue / Number: the width-preserving document tree
//! - AttributeType / AttributeDescriptor / EntityTypeDescriptor: key schemas
//! - EntityTypeRegistry: the read-only set of known entity types
//! - TypedValue / EntityKey: parsed composite keys
//! - Config: the configuration document
//! - Storage: the get/put capability the orchestrator depends on

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod entity;
pub mod error;
pub mod key;
pub mod traits;
pub mod value;

pub use config::{Config, EntityTypeConfig, StorageConfig, CONFIG_FILE_NAME, MAIN_STORAGE};
pub use entity::{AttributeDescriptor, AttributeType, EntityTypeDescriptor, EntityTypeRegistry};
pub use error::{Error, Result};
pub use key::{parse_filter, parse_key_path, EntityKey, TypedValue};
pub use traits::Storage;
pub use value::{DocumentValue, Number, Object, ValueParseError};
