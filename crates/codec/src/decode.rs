//! Labeled leaves to JSON
//!
//! Two phases:
//!
//! 1. **Nest**: place every leaf into a tree of objects, creating
//!    intermediate objects on the way. A label that is a prefix of another
//!    label in the same input is a [`ConflictError::Overlap`].
//! 2. **Arrayify**: bottom-up, replace every object whose keys are exactly
//!    `"0"..="k-1"` with an array ordered by index.
//!
//! Arrayify cannot tell an array from an object that happens to have dense,
//! zero-based integer keys: `{"0":"a","1":"b"}` always decodes as
//! `["a","b"]`. Keys with leading zeros or signs (`"01"`, `"+1"`) are never
//! treated as indices.

use nemestrix_core::{ConflictError, Label, Leaf, Limits};
use serde_json::map::Entry;
use serde_json::{Map, Value};
use tracing::trace;

/// Decodes labeled leaves back into nested JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    limits: Limits,
}

impl Decoder {
    /// Create a decoder with the given limits
    pub fn new(limits: Limits) -> Self {
        Decoder { limits }
    }

    /// Decode a sequence of (Label, Leaf) pairs
    ///
    /// Object keys appear in the order their labels are supplied. The result
    /// is an object, or an array if the top-level keys are themselves dense
    /// indices. An empty input decodes to `{}`.
    pub fn decode<I>(&self, pairs: I) -> Result<Value, ConflictError>
    where
        I: IntoIterator<Item = (Label, Leaf)>,
    {
        let mut root = Map::new();
        let mut count = 0usize;
        for (label, leaf) in pairs {
            self.nest(&mut root, &label, leaf)?;
            count += 1;
        }

        let value = arrayify(root);
        trace!(target: "nemestrix::codec", leaves = count, "decoded document");
        Ok(value)
    }

    fn nest(&self, root: &mut Map<String, Value>, label: &Label, leaf: Leaf) -> Result<(), ConflictError> {
        if label.len() > self.limits.max_depth {
            return Err(ConflictError::DepthExceeded {
                depth: label.len(),
                max: self.limits.max_depth,
            });
        }

        let segments = label.segments();
        let (last, parents) = match segments.split_last() {
            Some(split) => split,
            None => return Ok(()),
        };

        let mut current = root;
        for (idx, segment) in parents.iter().enumerate() {
            let slot = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            current = match slot {
                Value::Object(map) => map,
                // A leaf already sits where this label needs a branch
                _ => {
                    return Err(ConflictError::Overlap {
                        existing: prefix_of(label, idx + 1),
                        incoming: label.clone(),
                    })
                }
            };
        }

        match current.entry(last.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(leaf.to_json());
                Ok(())
            }
            Entry::Occupied(slot) => {
                let mut existing = segments.to_vec();
                first_leaf_path(slot.get(), &mut existing);
                Err(ConflictError::Overlap {
                    existing: Label::from_segments(existing).unwrap_or_else(|_| label.clone()),
                    incoming: label.clone(),
                })
            }
        }
    }
}

/// The ancestor of `label` with `len` segments
fn prefix_of(label: &Label, len: usize) -> Label {
    label
        .ancestors()
        .find(|a| a.len() == len)
        .unwrap_or_else(|| label.clone())
}

/// Extend `path` down to the first leaf under `value`
fn first_leaf_path(value: &Value, path: &mut Vec<String>) {
    let mut current = value;
    while let Value::Object(map) = current {
        match map.iter().next() {
            Some((key, child)) => {
                path.push(key.clone());
                current = child;
            }
            None => break,
        }
    }
}

/// An object being rebuilt during [`arrayify`]
struct Frame {
    /// Key of this object in its parent
    key: String,
    done: Map<String, Value>,
    pending: serde_json::map::IntoIter,
}

/// Replace dense, zero-based integer-keyed objects with arrays, bottom-up
///
/// Post-order over an explicit stack, so label length never turns into
/// call depth.
fn arrayify(root: Map<String, Value>) -> Value {
    let mut stack = vec![Frame {
        key: String::new(),
        done: Map::with_capacity(root.len()),
        pending: root.into_iter(),
    }];

    while let Some(frame) = stack.last_mut() {
        match frame.pending.next() {
            Some((key, Value::Object(child))) => stack.push(Frame {
                key,
                done: Map::with_capacity(child.len()),
                pending: child.into_iter(),
            }),
            Some((key, leaf)) => {
                frame.done.insert(key, leaf);
            }
            None => {
                let Some(Frame { key, done, .. }) = stack.pop() else {
                    break;
                };
                let finished = into_array_if_dense(done);
                match stack.last_mut() {
                    Some(parent) => {
                        parent.done.insert(key, finished);
                    }
                    None => return finished,
                }
            }
        }
    }
    Value::Object(Map::new())
}

fn into_array_if_dense(mut map: Map<String, Value>) -> Value {
    if !is_dense_index_set(&map) {
        return Value::Object(map);
    }
    let items = (0..map.len())
        .map(|idx| map.remove(&idx.to_string()).unwrap_or(Value::Null))
        .collect();
    Value::Array(items)
}

/// True if the keys are exactly `{"0", "1", ..., "k-1"}` for some k >= 1
fn is_dense_index_set(map: &Map<String, Value>) -> bool {
    let len = map.len();
    if len == 0 {
        return false;
    }
    let mut seen = vec![false; len];
    for key in map.keys() {
        match parse_index(key) {
            Some(idx) if idx < len && !seen[idx] => seen[idx] = true,
            _ => return false,
        }
    }
    true
}

/// Parse a canonical non-negative decimal index
fn parse_index(key: &str) -> Option<usize> {
    let canonical = key == "0"
        || (key.starts_with(|c: char| matches!(c, '1'..='9'))
            && key.bytes().all(|b| b.is_ascii_digit()));
    if canonical {
        key.parse().ok()
    } else {
        None
    }
}

/// Decode with default limits
pub fn decode<I>(pairs: I) -> Result<Value, ConflictError>
where
    I: IntoIterator<Item = (Label, Leaf)>,
{
    Decoder::default().decode(pairs)
}
