//! Error types for the path forest
//!
//! Every failure is a value returned to the caller. We use `thiserror` for
//! automatic `Display` and `Error` trait implementations.
//!
//! | Variant | Cause | Caller action |
//! |---------|-------|---------------|
//! | `InvalidLabel` | malformed path text | fix input |
//! | `InvalidPattern` | misplaced `**`, empty segment | fix input |
//! | `Encode` | malformed or oversized JSON | fix input |
//! | `Conflict` | overlapping labels | retry with replacement |
//! | `NotFound` | pattern matched nothing | none |
//! | `StoreUnavailable` | lock timeout, backend failure | retry with backoff |

use thiserror::Error;

use crate::label::{Label, LabelParseError};
use crate::pattern::PatternParseError;

/// Result type alias for forest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure turning JSON into labeled leaves
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Input bytes are not well-formed JSON
    #[error("malformed JSON: {0}")]
    Malformed(String),

    /// An object key cannot be used as a label segment
    #[error("object key {key:?} cannot be a label segment: {reason}")]
    InvalidKey {
        /// The rejected key
        key: String,
        /// Why it was rejected
        reason: String,
    },

    /// A bare scalar document has no path to store it under
    #[error("top-level scalar has no label")]
    ScalarRoot,

    /// Nesting exceeds the configured depth
    #[error("nesting depth {depth} exceeds maximum of {max}")]
    TooDeep {
        /// Depth reached
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    /// Document exceeds the configured size
    #[error("document size {size} exceeds maximum of {max} bytes")]
    DocumentTooLarge {
        /// Actual size in bytes
        size: usize,
        /// Configured maximum
        max: usize,
    },
}

impl From<serde_json::Error> for EncodeError {
    fn from(e: serde_json::Error) -> Self {
        EncodeError::Malformed(e.to_string())
    }
}

/// Violation of the prefix-free (antichain) invariant
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConflictError {
    /// Two labels overlap: equal, or one is an ancestor of the other
    #[error("path {incoming} overlaps existing path {existing}")]
    Overlap {
        /// Label already present
        existing: Label,
        /// Label being added
        incoming: Label,
    },

    /// A label is deeper than the configured maximum
    #[error("path depth {depth} exceeds maximum of {max}")]
    DepthExceeded {
        /// Label length
        depth: usize,
        /// Configured maximum
        max: usize,
    },
}

/// Error types for the path forest
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Malformed label text
    #[error("invalid label: {0}")]
    InvalidLabel(#[from] LabelParseError),

    /// Malformed pattern text
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] PatternParseError),

    /// Request body could not be encoded
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Antichain invariant violated
    #[error("conflict: {0}")]
    Conflict(#[from] ConflictError),

    /// Pattern matched no stored node
    #[error("no nodes match {pattern}")]
    NotFound {
        /// The pattern or label that was looked up
        pattern: String,
    },

    /// Backing store could not serve the request in time
    #[error("store unavailable: {reason}")]
    StoreUnavailable {
        /// Description of the failure
        reason: String,
    },
}

impl Error {
    /// Build a `NotFound` error
    pub fn not_found(pattern: impl ToString) -> Self {
        Error::NotFound {
            pattern: pattern.to_string(),
        }
    }

    /// Build a `StoreUnavailable` error
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Error::StoreUnavailable {
            reason: reason.into(),
        }
    }

    /// True if the same request may succeed later
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::StoreUnavailable { .. })
    }

    /// True if the request itself is at fault
    pub fn is_client_error(&self) -> bool {
        !self.is_retryable()
    }
}
