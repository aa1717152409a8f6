//! Size limits for documents and labels
//!
//! Enforced by the encoder and decoder so that adversarial input cannot
//! exhaust the stack or memory. Violations surface as
//! [`EncodeError`](crate::EncodeError) on the way in and
//! [`ConflictError::DepthExceeded`](crate::ConflictError) on the way out.

use serde::{Deserialize, Serialize};

/// Default maximum nesting depth (100 levels)
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Largest configurable nesting depth
///
/// `serde_json` refuses input nested more than 128 levels, so a larger
/// depth could never be reached through the byte encoder.
pub const MAX_SUPPORTED_DEPTH: usize = 127;

/// Default maximum document size (16 MB)
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 16 * 1024 * 1024;

/// Limits applied during encode and decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum label length, which is also the maximum JSON nesting depth
    pub max_depth: usize,

    /// Maximum request body size in bytes
    pub max_document_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_depth: DEFAULT_MAX_DEPTH,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

impl Limits {
    /// Create limits with small values for testing
    pub fn with_small_limits() -> Self {
        Limits {
            max_depth: 4,
            max_document_bytes: 1024,
        }
    }
}
