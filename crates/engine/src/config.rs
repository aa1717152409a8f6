//! Forest configuration via `nemestrix.toml`
//!
//! The file is read once when the forest is built. To change settings,
//! edit the file and restart.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use nemestrix_core::limits::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_DOCUMENT_BYTES, MAX_SUPPORTED_DEPTH};
use nemestrix_core::Limits;
use nemestrix_security::{ApiKeyVerifier, AuthError};

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "nemestrix.toml";

/// Failures reading or writing the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("config file '{path}': {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid configuration
    #[error("failed to parse config file '{path}': {message}")]
    Parse {
        /// File involved
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// A value is out of range
    #[error("invalid config value for {field}: {message}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// Config could not be rendered as TOML
    #[error("failed to serialize config: {0}")]
    Serialize(String),
}

/// API-key settings, persisted under `[auth]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthConfig {
    /// Base64 SHA-256 of the accepted key
    pub api_key_hash: String,
}

/// Forest configuration loaded from `nemestrix.toml`
///
/// # Example
///
/// ```toml
/// max_depth = 100
/// max_document_bytes = 16777216
/// lock_timeout_ms = 5000
///
/// # [auth]
/// # api_key_hash = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForestConfig {
    /// Maximum nesting depth, which is also the maximum label length
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Maximum accepted document size in bytes
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
    /// Bound on store lock acquisition in milliseconds
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
    /// Optional API-key settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_max_document_bytes() -> usize {
    DEFAULT_MAX_DOCUMENT_BYTES
}

fn default_lock_timeout_ms() -> u64 {
    5000
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_document_bytes: default_max_document_bytes(),
            lock_timeout_ms: default_lock_timeout_ms(),
            auth: None,
        }
    }
}

impl ForestConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Nemestrix configuration
#
# Maximum nesting depth of a document, which is also the maximum
# number of segments in a label (default: 100)
max_depth = 100

# Largest accepted document in bytes (default: 16 MiB)
max_document_bytes = 16777216

# How long an operation waits for the store lock before failing
# with "store unavailable" (default: 5000)
lock_timeout_ms = 5000

# API-key authentication. Generate a key with `nemestrix generate-key`
# and paste the printed hash here.
# [auth]
# api_key_hash = "base64-sha256-of-key"
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ForestConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `true` if the file was created.
    pub fn write_default_if_missing(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }
        std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(true)
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject values the codec cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid {
                field: "max_depth",
                message: "must be at least 1".to_string(),
            });
        }
        if self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(ConfigError::Invalid {
                field: "max_depth",
                message: format!("must be at most {MAX_SUPPORTED_DEPTH}"),
            });
        }
        if self.max_document_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_document_bytes",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Codec limits derived from this config
    ///
    /// The depth is clamped to [`MAX_SUPPORTED_DEPTH`] even when
    /// [`validate`](Self::validate) was never called.
    pub fn limits(&self) -> Limits {
        Limits {
            max_depth: self.max_depth.min(MAX_SUPPORTED_DEPTH),
            max_document_bytes: self.max_document_bytes,
        }
    }

    /// Store lock timeout
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// Build the key verifier, if authentication is configured
    pub fn verifier(&self) -> Result<Option<ApiKeyVerifier>, AuthError> {
        self.auth
            .as_ref()
            .map(|auth| ApiKeyVerifier::from_hash(&auth.api_key_hash))
            .transpose()
    }
}
