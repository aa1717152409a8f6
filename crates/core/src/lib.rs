//! Core types and traits for Nemestrix
//!
//! This crate defines the foundational types used throughout the system:
//! - Label: hierarchical path identifier (`a.b.0.c`)
//! - LabelPattern: hierarchical query over labels (`a.*.c`, `a.**`)
//! - Leaf: typed scalar stored under a label
//! - Limits: depth and size bounds for encode/decode
//! - Error: error taxonomy shared by every layer
//! - Traits: PathView / PathStore, the storage boundary

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod label;
pub mod leaf;
pub mod limits;
pub mod pattern;
pub mod traits;

pub use error::{ConflictError, EncodeError, Error, Result};
pub use label::{Label, LabelParseError};
pub use leaf::{Leaf, LeafKind};
pub use limits::Limits;
pub use pattern::{LabelPattern, Matcher, PatternParseError};
pub use traits::{PathStore, PathView};
