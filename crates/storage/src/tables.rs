//! Node and leaf tables
//!
//! Storage mirrors the relational layout the forest was designed around:
//! a node table mapping each [`Label`] to a [`NodeId`], and a leaf table
//! mapping each `NodeId` to its [`Leaf`]. Removing a node is two explicit
//! steps (node row, then leaf row) performed under the caller's lock.
//!
//! The node table is a `BTreeMap` ordered by label, so the descendants of
//! a label are one contiguous range starting right after it.

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use nemestrix_core::{Label, LabelPattern, Leaf};

/// Store-assigned node identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// The node and leaf tables plus counters
#[derive(Debug, Clone, Default)]
pub struct ForestTables {
    nodes: BTreeMap<Label, NodeId>,
    leaves: FxHashMap<NodeId, Leaf>,
    next_id: u64,
    version: u64,
}

impl ForestTables {
    /// Create empty tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Current committed version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Bump the version after a committed change
    pub(crate) fn bump_version(&mut self) -> u64 {
        self.version += 1;
        self.version
    }

    /// Number of stored nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no nodes are stored
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Identity of the node at `label`
    pub fn node_id(&self, label: &Label) -> Option<NodeId> {
        self.nodes.get(label).copied()
    }

    /// Leaf stored at exactly `label`
    pub fn get(&self, label: &Label) -> Option<&Leaf> {
        self.nodes.get(label).and_then(|id| self.leaves.get(id))
    }

    /// A stored label equal to, above, or below `label`
    ///
    /// Checks the exact label, then each proper ancestor, then the first
    /// label in the range after `label`, which is a descendant if any exists.
    pub fn find_conflict(&self, label: &Label) -> Option<Label> {
        if self.nodes.contains_key(label) {
            return Some(label.clone());
        }
        if let Some(ancestor) = label.ancestors().find(|a| self.nodes.contains_key(a)) {
            return Some(ancestor);
        }
        self.nodes
            .range(label.clone()..)
            .next()
            .map(|(candidate, _)| candidate)
            .filter(|candidate| label.is_ancestor_of(candidate))
            .cloned()
    }

    /// Stored nodes matching `pattern`, in label order
    pub fn find_by_pattern(&self, pattern: &LabelPattern) -> Vec<(Label, Leaf)> {
        let prefix = pattern.literal_prefix();
        let start = if prefix.is_empty() {
            None
        } else {
            Label::from_segments(prefix.iter().copied()).ok()
        };

        let candidates: Box<dyn Iterator<Item = (&Label, &NodeId)> + '_> = match start {
            Some(start) => Box::new(
                self.nodes
                    .range(start..)
                    .take_while(move |(label, _)| label.has_prefix(&prefix)),
            ),
            None => Box::new(self.nodes.iter()),
        };

        candidates
            .filter(|(label, _)| pattern.matches(label))
            .filter_map(|(label, id)| self.leaves.get(id).map(|leaf| (label.clone(), leaf.clone())))
            .collect()
    }

    /// Insert a node row and its leaf row under a fresh id
    ///
    /// Returns `None` without modifying anything if `label` is taken.
    pub(crate) fn insert(&mut self, label: Label, leaf: Leaf) -> Option<NodeId> {
        if self.nodes.contains_key(&label) {
            return None;
        }
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.leaves.insert(id, leaf);
        self.nodes.insert(label, id);
        Some(id)
    }

    /// Restore a previously removed node under its original id
    pub(crate) fn restore(&mut self, label: Label, id: NodeId, leaf: Leaf) {
        self.leaves.insert(id, leaf);
        self.nodes.insert(label, id);
    }

    /// Remove the node row, then its leaf row
    pub(crate) fn remove(&mut self, label: &Label) -> Option<(NodeId, Leaf)> {
        let id = self.nodes.remove(label)?;
        self.leaves.remove(&id).map(|leaf| (id, leaf))
    }

    /// Iterate over all stored nodes in label order
    pub fn iter(&self) -> impl Iterator<Item = (&Label, &Leaf)> + '_ {
        self.nodes
            .iter()
            .filter_map(|(label, id)| self.leaves.get(id).map(|leaf| (label, leaf)))
    }
}
