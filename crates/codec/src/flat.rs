//! Flat `{ "label": scalar }` form
//!
//! The flat form is what a write reports back and what the command line
//! reads for `decode`: one object whose keys are rendered labels.

use nemestrix_core::{EncodeError, Error, Label, Leaf, Result};
use serde_json::{Map, Value};

/// Render pairs as a flat JSON object keyed by label text
pub fn render_flat<'a, I>(pairs: I) -> Value
where
    I: IntoIterator<Item = &'a (Label, Leaf)>,
{
    let map: Map<String, Value> = pairs
        .into_iter()
        .map(|(label, leaf)| (label.render(), leaf.to_json()))
        .collect();
    Value::Object(map)
}

/// Parse a flat JSON object into (Label, Leaf) pairs, in key order
///
/// `null` values are skipped. Nested objects or arrays as values are
/// rejected: the flat form carries scalars only.
pub fn parse_flat(value: &Value) -> Result<Vec<(Label, Leaf)>> {
    let map = value.as_object().ok_or_else(|| {
        Error::Encode(EncodeError::Malformed(
            "flat form must be a JSON object".to_string(),
        ))
    })?;

    let mut pairs = Vec::with_capacity(map.len());
    for (key, scalar) in map {
        let label: Label = key.parse()?;
        match scalar {
            Value::Null => {}
            Value::Array(_) | Value::Object(_) => {
                return Err(Error::Encode(EncodeError::Malformed(format!(
                    "value at {} is not a scalar",
                    key
                ))))
            }
            other => {
                if let Some(leaf) = Leaf::from_json(other) {
                    pairs.push((label, leaf));
                }
            }
        }
    }
    Ok(pairs)
}
