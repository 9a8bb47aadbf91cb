//! Error types for docvault
//!
//! Every layer (key parsing, configuration, storage, orchestration) reports
//! failures through the single [`Error`] enum defined here.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! ## Categories
//!
//! | Category | Variants | Where it ends up |
//! |----------|----------|------------------|
//! | Startup | `Configuration`, `Connection` | process refuses to start |
//! | Caller input | `InvalidKeyPath`, `InvalidAttributeValue` | not-found at the orchestrator |
//! | Identity | `UserNotFound` | not-found at the orchestrator |
//! | Schema | `DuplicateKeyAttribute` | configuration load failure |
//! | Store | `Data`, `Operation` | internal failure |
//! | Programming | `InvalidArgument` | internal failure |

use thiserror::Error;

/// Result type alias for docvault operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for docvault
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Configuration document is malformed or inconsistent
    #[error("configuration error: {reason}")]
    Configuration {
        /// What was wrong with the configuration
        reason: String,
    },

    /// The backing document database could not be reached
    #[error("connection error: {reason}")]
    Connection {
        /// Driver-level detail
        reason: String,
    },

    /// Key path has the wrong number of segments for its entity type
    #[error("invalid key path '{path}': expected {expected} segment(s), got {actual}")]
    InvalidKeyPath {
        /// The offending path
        path: String,
        /// Number of key attributes declared by the entity type
        expected: usize,
        /// Number of segments found in the path
        actual: usize,
    },

    /// A key segment is empty or does not parse under its declared type
    #[error("invalid value '{value}' for key attribute '{attribute}': {reason}")]
    InvalidAttributeValue {
        /// Attribute name from the entity type descriptor
        attribute: String,
        /// Raw segment text
        value: String,
        /// Why the segment was rejected
        reason: String,
    },

    /// Two key attributes of one entity type share a name
    #[error("duplicate key attribute '{attribute}'")]
    DuplicateKeyAttribute {
        /// The repeated attribute name
        attribute: String,
    },

    /// Username does not resolve to a stored user record
    #[error("user not found: {username}")]
    UserNotFound {
        /// The username that failed to resolve
        username: String,
    },

    /// A stored record violates an internal invariant
    #[error("data error: {reason}")]
    Data {
        /// Which invariant was violated
        reason: String,
    },

    /// A write or collection operation failed at the backing store
    #[error("operation error: {reason}")]
    Operation {
        /// Driver-level detail
        reason: String,
    },

    /// Caller broke an API precondition (bug, never user input)
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Which precondition was broken
        reason: String,
    },
}

impl Error {
    /// Build a configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Error::Configuration {
            reason: reason.into(),
        }
    }

    /// Build a connection error
    pub fn connection(reason: impl Into<String>) -> Self {
        Error::Connection {
            reason: reason.into(),
        }
    }

    /// Build a data error
    pub fn data(reason: impl Into<String>) -> Self {
        Error::Data {
            reason: reason.into(),
        }
    }

    /// Build an operation error
    pub fn operation(reason: impl Into<String>) -> Self {
        Error::Operation {
            reason: reason.into(),
        }
    }

    /// Build an invalid argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// True for the two key parsing failures
    pub fn is_key_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidKeyPath { .. } | Error::InvalidAttributeValue { .. }
        )
    }

    /// True for errors that abort startup
    pub fn is_fatal_at_startup(&self) -> bool {
        matches!(
            self,
            Error::Configuration { .. } | Error::Connection { .. } | Error::DuplicateKeyAttribute { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::configuration(e.to_string())
    }
}
