//! Nemestrix - hierarchical path storage for JSON documents
//!
//! A JSON document is stored as a forest of labeled leaves: every scalar
//! becomes one node addressed by the dot-separated path of keys and array
//! indices leading to it. Reading a path or a pattern rebuilds the nested
//! JSON, turning dense `0..k` index keys back into arrays.
//!
//! # Quick Start
//!
//! ```
//! use nemestrix::{Forest, WriteMode};
//! use serde_json::json;
//!
//! let forest = Forest::ephemeral();
//! forest.write(br#"{"x":{"y":1,"z":[true,"s"]}}"#, WriteMode::Create)?;
//!
//! assert_eq!(forest.search("x.*")?, json!({"x": {"y": 1, "z": [true, "s"]}}));
//! # Ok::<(), nemestrix::Error>(())
//! ```
//!
//! # Architecture
//!
//! - [`Label`], [`LabelPattern`], [`Leaf`]: the vocabulary (`nemestrix-core`)
//! - [`Encoder`], [`Decoder`]: JSON conversion (`nemestrix-codec`)
//! - [`ForestStore`]: the ordered in-memory store (`nemestrix-storage`)
//! - [`Forest`]: the facade joining the two (`nemestrix-engine`)

pub use nemestrix_codec::{decode, encode, encode_value, parse_flat, render_flat, Decoder, Encoder};
pub use nemestrix_core::{
    ConflictError, EncodeError, Error, Label, LabelParseError, LabelPattern, Leaf, LeafKind,
    Limits, Matcher, PathStore, PathView, PatternParseError, Result,
};
pub use nemestrix_engine::{
    AuthConfig, ConfigError, Forest, ForestConfig, Lookup, WriteMode, WriteReceipt,
    CONFIG_FILE_NAME,
};
pub use nemestrix_security::{hash_api_key, ApiKey, ApiKeyVerifier, AuthError, API_KEY_HEADER};
pub use nemestrix_storage::{ForestSnapshot, ForestStore, NodeId, ReadView, WriteTxn};
