//! The forest facade
//!
//! Joins the codec and the store: documents are encoded into labeled
//! leaves on the way in and decoded back into nested JSON on the way out.
//!
//! Every write runs inside one store transaction, so the conflict check
//! and the mutation it guards are atomic with respect to other writers.

use serde_json::Value;
use tracing::{debug, info};

use nemestrix_codec::{Decoder, Encoder};
use nemestrix_core::{
    ConflictError, Error, Label, LabelPattern, Leaf, PathStore, PathView, Result,
};
use nemestrix_storage::{ForestSnapshot, ForestStore};

use crate::config::ForestConfig;

/// How a write treats stored nodes that overlap the incoming labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Fail with `Conflict` on any overlap and leave the store untouched
    #[default]
    Create,
    /// Remove every overlapping stored node, then insert
    Replace,
}

/// Outcome of a successful write
#[derive(Debug, Clone, PartialEq)]
pub struct WriteReceipt {
    /// Pairs inserted, in encode order
    pub written: Vec<(Label, Leaf)>,
    /// Stored labels removed to make room (Replace mode only)
    pub replaced: Vec<Label>,
    /// Store version after commit
    pub version: u64,
}

/// Result of looking up a single path
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// A leaf is stored at exactly the path
    Leaf(Leaf),
    /// The path is interior; its descendants decoded relative to it
    Subtree(Value),
}

impl Lookup {
    /// Render as JSON: the bare scalar or the nested subtree
    pub fn into_json(self) -> Value {
        match self {
            Lookup::Leaf(leaf) => leaf.to_json(),
            Lookup::Subtree(value) => value,
        }
    }
}

/// Hierarchical path storage for JSON documents
///
/// Thread-safe; share it behind an `Arc`.
///
/// # Example
///
/// ```
/// use nemestrix_engine::{Forest, Lookup, WriteMode};
/// use serde_json::json;
///
/// let forest = Forest::ephemeral();
/// forest.write(br#"{"x":{"y":1,"z":[true,"s"]}}"#, WriteMode::Create).unwrap();
///
/// assert_eq!(forest.get("x.y").unwrap(), Lookup::Leaf(1i64.into()));
/// assert_eq!(
///     forest.get("x").unwrap().into_json(),
///     json!({"y": 1, "z": [true, "s"]})
/// );
/// ```
#[derive(Debug)]
pub struct Forest {
    store: ForestStore,
    encoder: Encoder,
    decoder: Decoder,
}

impl Forest {
    /// Build a forest from configuration
    pub fn new(config: ForestConfig) -> Self {
        let limits = config.limits();
        info!(
            target: "nemestrix::forest",
            max_depth = limits.max_depth,
            max_document_bytes = limits.max_document_bytes,
            lock_timeout_ms = config.lock_timeout_ms,
            "forest opened"
        );
        Forest {
            store: ForestStore::with_lock_timeout(config.lock_timeout()),
            encoder: Encoder::new(limits),
            decoder: Decoder::new(limits),
        }
    }

    /// Build a forest with default configuration
    pub fn ephemeral() -> Self {
        Self::new(ForestConfig::default())
    }

    /// The backing store
    pub fn store(&self) -> &ForestStore {
        &self.store
    }

    /// Encode a JSON body and store its leaves
    ///
    /// # Errors
    ///
    /// - `Encode` if the body is malformed, a scalar, too deep or too large
    /// - `Conflict` in `Create` mode if any label overlaps a stored one
    /// - `StoreUnavailable` if the store lock times out
    pub fn write(&self, body: &[u8], mode: WriteMode) -> Result<WriteReceipt> {
        let pairs = self.encoder.encode_bytes(body)?;
        self.write_pairs(pairs, mode)
    }

    /// Store an already-parsed document
    pub fn write_value(&self, value: &Value, mode: WriteMode) -> Result<WriteReceipt> {
        let pairs = self.encoder.encode_value(value)?;
        self.write_pairs(pairs, mode)
    }

    fn write_pairs(&self, pairs: Vec<(Label, Leaf)>, mode: WriteMode) -> Result<WriteReceipt> {
        let mut txn = self.store.begin()?;
        // Dropping `txn` on error rolls back whatever was applied
        let replaced = apply_write(&mut txn, &pairs, mode)?;
        let version = txn.commit();

        info!(
            target: "nemestrix::forest",
            ?mode,
            written = pairs.len(),
            replaced = replaced.len(),
            version,
            "write committed"
        );
        Ok(WriteReceipt {
            written: pairs,
            replaced,
            version,
        })
    }

    /// Nodes matching `pattern` in label order, as pairs
    ///
    /// Returns an empty vector when nothing matches.
    pub fn search_leaves(&self, pattern: &str) -> Result<Vec<(Label, Leaf)>> {
        let pattern = LabelPattern::compile(pattern)?;
        self.store.read()?.find_by_pattern(&pattern)
    }

    /// Nodes matching `pattern` decoded to nested JSON keyed by full path
    ///
    /// # Errors
    ///
    /// `NotFound` if nothing matches.
    pub fn search(&self, pattern: &str) -> Result<Value> {
        let found = self.search_leaves(pattern)?;
        debug!(target: "nemestrix::forest", pattern, matched = found.len(), "search");
        if found.is_empty() {
            return Err(Error::not_found(pattern));
        }
        Ok(self.decoder.decode(found)?)
    }

    /// Look up a single path
    ///
    /// A leaf stored at exactly `path` comes back bare. Otherwise the
    /// descendants of `path` are decoded with `path` stripped off.
    ///
    /// # Errors
    ///
    /// `NotFound` if neither a leaf nor any descendant exists.
    pub fn get(&self, path: &str) -> Result<Lookup> {
        let label: Label = path.parse()?;
        let view = self.store.read()?;
        if let Some(leaf) = view.get(&label)? {
            return Ok(Lookup::Leaf(leaf));
        }

        let below = view.find_by_pattern(&LabelPattern::descendants_of(&label))?;
        drop(view);
        if below.is_empty() {
            return Err(Error::not_found(path));
        }

        let relative = below
            .into_iter()
            .filter_map(|(full, leaf)| full.relative_to(&label).map(|rel| (rel, leaf)));
        Ok(Lookup::Subtree(self.decoder.decode(relative)?))
    }

    /// Remove every node matching `pattern`
    ///
    /// Returns the number of nodes removed.
    ///
    /// # Errors
    ///
    /// `NotFound` if nothing matched.
    pub fn delete(&self, pattern: &str) -> Result<usize> {
        let compiled = LabelPattern::compile(pattern)?;
        let mut txn = self.store.begin()?;
        let removed = delete_matching(&mut txn, &compiled)?;
        if removed == 0 {
            return Err(Error::not_found(pattern));
        }
        let version = txn.commit();
        info!(target: "nemestrix::forest", pattern, removed, version, "delete committed");
        Ok(removed)
    }

    /// A point-in-time view unaffected by later writes
    pub fn snapshot(&self) -> Result<ForestSnapshot> {
        self.store.snapshot()
    }

    /// Number of stored nodes
    pub fn len(&self) -> Result<usize> {
        Ok(self.store.read()?.node_count())
    }

    /// True if nothing is stored
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Committed store version
    pub fn version(&self) -> Result<u64> {
        Ok(self.store.read()?.version())
    }
}

impl Default for Forest {
    fn default() -> Self {
        Self::ephemeral()
    }
}

/// Insert `pairs`, resolving overlaps according to `mode`
///
/// Returns the labels removed by replacement.
fn apply_write<S: PathStore>(
    store: &mut S,
    pairs: &[(Label, Leaf)],
    mode: WriteMode,
) -> Result<Vec<Label>> {
    let mut replaced = Vec::new();
    for (label, leaf) in pairs {
        match mode {
            WriteMode::Create => {
                if let Some(existing) = store.find_conflict(label)? {
                    debug!(target: "nemestrix::forest", %existing, incoming = %label, "write conflict");
                    return Err(ConflictError::Overlap {
                        existing,
                        incoming: label.clone(),
                    }
                    .into());
                }
            }
            WriteMode::Replace => {
                while let Some(existing) = store.find_conflict(label)? {
                    store.remove(&existing)?;
                    replaced.push(existing);
                }
            }
        }
        store.insert(label.clone(), leaf.clone())?;
    }
    Ok(replaced)
}

fn delete_matching<S: PathStore>(store: &mut S, pattern: &LabelPattern) -> Result<usize> {
    let matched = store.find_by_pattern(pattern)?;
    let mut removed = 0;
    for (label, _) in matched {
        if store.remove(&label)?.is_some() {
            removed += 1;
        }
    }
    Ok(removed)
}
