//! API-key handling for the path forest.
//!
//! Keys are random tokens handed to clients. The server side only ever
//! keeps the base64 SHA-256 digest of a key, supplied once when the
//! [`ApiKeyVerifier`] is built, and compares digests in constant time.
//!
//! ```
//! use nemestrix_security::{hash_api_key, ApiKey, ApiKeyVerifier};
//!
//! let key = ApiKey::generate();
//! let verifier = ApiKeyVerifier::from_hash(&hash_api_key(key.as_str())).unwrap();
//! assert!(verifier.verify(Some(key.as_str())).is_ok());
//! assert!(verifier.verify(Some("wrong")).is_err());
//! ```

#![warn(missing_docs)]

use std::fmt;

use base64::engine::general_purpose::{STANDARD as BASE64, URL_SAFE_NO_PAD};
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Request header carrying the API key
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Environment variable the CLI suggests for exporting a key hash
pub const API_KEY_HASH_ENV: &str = "NEMESTRIX_API_KEY_HASH";

const KEY_BYTES: usize = 32;
const DIGEST_BYTES: usize = 32;

/// Authentication failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No key was presented
    #[error("API key required")]
    MissingKey,

    /// A key was presented but its digest does not match
    #[error("invalid API key")]
    InvalidKey,

    /// The configured hash is not base64 of a 32-byte digest
    #[error("malformed API key hash: {0}")]
    MalformedHash(String),
}

/// A freshly generated API key
///
/// `Debug` redacts the key so it does not end up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    /// Generate a key from 32 random bytes, URL-safe base64 without padding
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        ApiKey(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Wrap an existing key string
    pub fn from_string(key: impl Into<String>) -> Self {
        ApiKey(key.into())
    }

    /// The key text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hash of this key, suitable for configuration
    pub fn hash(&self) -> String {
        hash_api_key(&self.0)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(..)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn digest(key: &str) -> [u8; DIGEST_BYTES] {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hasher.finalize().into()
}

/// Standard base64 of the SHA-256 digest of `key`
pub fn hash_api_key(key: &str) -> String {
    BASE64.encode(digest(key))
}

/// Byte comparison whose running time depends only on the lengths
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Checks presented keys against a configured hash
#[derive(Clone)]
pub struct ApiKeyVerifier {
    expected: [u8; DIGEST_BYTES],
}

impl ApiKeyVerifier {
    /// Build a verifier from a base64 SHA-256 hash
    ///
    /// The hash is decoded here once, never per request.
    pub fn from_hash(hash: &str) -> Result<Self, AuthError> {
        let bytes = BASE64
            .decode(hash.trim())
            .map_err(|e| AuthError::MalformedHash(e.to_string()))?;
        let expected: [u8; DIGEST_BYTES] = bytes.try_into().map_err(|b: Vec<u8>| {
            AuthError::MalformedHash(format!("expected {} bytes, got {}", DIGEST_BYTES, b.len()))
        })?;
        Ok(ApiKeyVerifier { expected })
    }

    /// Verify a presented key
    ///
    /// # Errors
    ///
    /// `MissingKey` for `None` or an empty key, `InvalidKey` on mismatch.
    pub fn verify(&self, presented: Option<&str>) -> Result<(), AuthError> {
        let key = match presented {
            Some(k) if !k.is_empty() => k,
            _ => return Err(AuthError::MissingKey),
        };
        if constant_time_eq(&digest(key), &self.expected) {
            Ok(())
        } else {
            Err(AuthError::InvalidKey)
        }
    }
}

impl fmt::Debug for ApiKeyVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyVerifier").finish_non_exhaustive()
    }
}
