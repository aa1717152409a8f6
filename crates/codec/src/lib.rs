//! JSON codec for the path forest
//!
//! Converts between a nested JSON document and the flat sequence of
//! `(Label, Leaf)` pairs it is stored as.
//!
//! ```
//! use nemestrix_codec::{decode, encode};
//! use serde_json::json;
//!
//! let pairs = encode(br#"{"x":{"y":1,"z":[true,"s"]}}"#).unwrap();
//! let labels: Vec<String> = pairs.iter().map(|(l, _)| l.to_string()).collect();
//! assert_eq!(labels, vec!["x.y", "x.z.0", "x.z.1"]);
//!
//! let value = decode(pairs).unwrap();
//! assert_eq!(value, json!({"x": {"y": 1, "z": [true, "s"]}}));
//! ```
//!
//! # Losslessness
//!
//! `decode(encode(j)) == j` holds when `j` is an object or array that
//! contains no `null`, no empty object or array, and no object whose keys
//! are exactly `"0".."k-1"`. Integral floats come back as integers.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod decode;
pub mod encode;
pub mod flat;

pub use decode::{decode, Decoder};
pub use encode::{encode, encode_value, Encoder};
pub use flat::{parse_flat, render_flat};
