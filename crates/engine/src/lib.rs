//! Forest engine
//!
//! This crate joins the lower layers:
//! - Forest: write / replace / search / get / delete over JSON documents
//! - ForestConfig: `nemestrix.toml` loading and defaults
//!
//! The engine is the only component that knows about both the codec and
//! the store.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod forest;

pub use config::{AuthConfig, ConfigError, ForestConfig, CONFIG_FILE_NAME};
pub use forest::{Forest, Lookup, WriteMode, WriteReceipt};
