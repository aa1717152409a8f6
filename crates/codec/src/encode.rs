//! JSON to labeled leaves
//!
//! Walks a document depth-first, pre-order, with an explicit stack so that
//! deeply nested input is bounded by [`Limits::max_depth`] instead of the
//! thread's stack size. Object keys and array indices become label
//! segments; every scalar reached becomes one `(Label, Leaf)` pair.
//!
//! `null`, `{}` and `[]` produce no leaves.

use nemestrix_core::label::validate_segment;
use nemestrix_core::{EncodeError, Label, Leaf, Limits};
use serde_json::Value;
use tracing::trace;

/// Encodes JSON documents into labeled leaves
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder {
    limits: Limits,
}

impl Encoder {
    /// Create an encoder with the given limits
    pub fn new(limits: Limits) -> Self {
        Encoder { limits }
    }

    /// Get the limits this encoder enforces
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Parse and encode raw JSON bytes
    pub fn encode_bytes(&self, bytes: &[u8]) -> Result<Vec<(Label, Leaf)>, EncodeError> {
        if bytes.len() > self.limits.max_document_bytes {
            return Err(EncodeError::DocumentTooLarge {
                size: bytes.len(),
                max: self.limits.max_document_bytes,
            });
        }
        let value: Value = serde_json::from_slice(bytes)?;
        self.encode_value(&value)
    }

    /// Encode an already-parsed JSON value
    pub fn encode_value(&self, value: &Value) -> Result<Vec<(Label, Leaf)>, EncodeError> {
        match value {
            Value::Null => return Ok(Vec::new()),
            Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                return Err(EncodeError::ScalarRoot)
            }
            Value::Array(_) | Value::Object(_) => {}
        }

        let mut out = Vec::new();
        // Segments of the container currently being walked
        let mut path: Vec<String> = Vec::new();
        let mut stack: Vec<Step<'_>> = Vec::new();
        self.push_children(&mut stack, 0, value)?;

        while let Some(step) = stack.pop() {
            match step {
                Step::Leave => {
                    path.pop();
                }
                Step::Visit(_, Value::Null) => {}
                Step::Visit(segment, node @ (Value::Array(_) | Value::Object(_))) => {
                    path.push(segment);
                    stack.push(Step::Leave);
                    self.push_children(&mut stack, path.len(), node)?;
                }
                Step::Visit(segment, scalar) => {
                    if let Some(leaf) = Leaf::from_json(scalar) {
                        let segments = path.iter().cloned().chain(std::iter::once(segment));
                        let label = Label::from_segments(segments).map_err(|e| {
                            EncodeError::InvalidKey {
                                key: String::new(),
                                reason: e.to_string(),
                            }
                        })?;
                        out.push((label, leaf));
                    }
                }
            }
        }

        trace!(target: "nemestrix::codec", leaves = out.len(), "encoded document");
        Ok(out)
    }

    /// Push the children of a container in reverse so they pop in order
    ///
    /// `parent_depth` is the number of segments leading to `container`.
    fn push_children<'v>(
        &self,
        stack: &mut Vec<Step<'v>>,
        parent_depth: usize,
        container: &'v Value,
    ) -> Result<(), EncodeError> {
        let depth = parent_depth + 1;
        match container {
            Value::Object(map) if !map.is_empty() => {
                if depth > self.limits.max_depth {
                    return Err(EncodeError::TooDeep {
                        depth,
                        max: self.limits.max_depth,
                    });
                }
                for (key, child) in map.iter().rev() {
                    validate_segment(key).map_err(|reason| EncodeError::InvalidKey {
                        key: key.clone(),
                        reason: reason.to_string(),
                    })?;
                    stack.push(Step::Visit(key.clone(), child));
                }
            }
            Value::Array(items) if !items.is_empty() => {
                if depth > self.limits.max_depth {
                    return Err(EncodeError::TooDeep {
                        depth,
                        max: self.limits.max_depth,
                    });
                }
                for (idx, child) in items.iter().enumerate().rev() {
                    stack.push(Step::Visit(idx.to_string(), child));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// One unit of work for the encoder walk
enum Step<'v> {
    /// Visit a child under the given segment
    Visit(String, &'v Value),
    /// Done with a container's children; pop its segment
    Leave,
}

/// Encode raw JSON bytes with default limits
pub fn encode(bytes: &[u8]) -> Result<Vec<(Label, Leaf)>, EncodeError> {
    Encoder::default().encode_bytes(bytes)
}

/// Encode a parsed JSON value with default limits
pub fn encode_value(value: &Value) -> Result<Vec<(Label, Leaf)>, EncodeError> {
    Encoder::default().encode_value(value)
}
