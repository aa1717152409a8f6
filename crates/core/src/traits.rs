//! Core traits for the path store abstraction
//!
//! The codec never talks to a concrete backend. It reads through
//! [`PathView`] and writes through [`PathStore`], so the in-memory store can
//! be swapped for a relational or on-disk one without touching upper layers.

use crate::error::Result;
use crate::label::Label;
use crate::leaf::Leaf;
use crate::pattern::LabelPattern;

/// Read access to a set of stored (Label, Leaf) nodes
///
/// Implementations must present a consistent view: a search never observes
/// a half-applied write batch.
pub trait PathView {
    /// Get the leaf stored at exactly `label`
    fn get(&self, label: &Label) -> Result<Option<Leaf>>;

    /// Find a stored label that is equal to, an ancestor of, or a
    /// descendant of `label`
    fn find_conflict(&self, label: &Label) -> Result<Option<Label>>;

    /// All stored nodes whose label matches `pattern`, sorted by label
    fn find_by_pattern(&self, pattern: &LabelPattern) -> Result<Vec<(Label, Leaf)>>;

    /// Number of stored nodes
    fn node_count(&self) -> usize;

    /// Store version this view reflects
    fn version(&self) -> u64;
}

/// Mutable access to the stored nodes
///
/// Single-node mutations. Batches are made atomic by the implementation's
/// transaction, not by this trait.
pub trait PathStore: PathView {
    /// Insert a node
    ///
    /// # Errors
    ///
    /// Returns [`ConflictError::Overlap`](crate::ConflictError) if a node
    /// already exists at `label`.
    fn insert(&mut self, label: Label, leaf: Leaf) -> Result<()>;

    /// Remove the node at `label`, returning its leaf if one existed
    fn remove(&mut self, label: &Label) -> Result<Option<Leaf>>;
}
