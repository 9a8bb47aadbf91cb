//! Outcome enum for request handling.
//!
//! Every handled request produces exactly one outcome. Expected failures
//! (unknown entity type, bad key, unknown user, malformed body) are
//! outcomes, not errors.

use docvault_core::DocumentValue;

/// Result of a handled request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The single document addressed by a key
    Document(DocumentValue),

    /// Documents matching a filter, in store order (possibly empty)
    Documents(Vec<DocumentValue>),

    /// The document was written
    Stored,

    /// Nothing is addressable at this location
    NotFound,

    /// The request body could not be decoded
    BadRequest {
        /// Decoder message
        reason: String,
    },
}

impl Outcome {
    /// True for the outcomes that carry a success status
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Outcome::Document(_) | Outcome::Documents(_) | Outcome::Stored
        )
    }
}
