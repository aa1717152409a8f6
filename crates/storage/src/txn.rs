//! Write transactions
//!
//! A [`WriteTxn`] owns the store's write lock for its whole lifetime and
//! applies mutations in place, recording an undo entry for each one.
//!
//! ```text
//! begin()   -> acquire write lock
//! insert / remove ... (each recorded in the undo log)
//! commit()  -> bump version, release lock
//! drop      -> (not committed) replay undo log in reverse, release lock
//! ```
//!
//! Because the lock is held from the first conflict check to commit, a
//! concurrent writer cannot slip an overlapping label in between.

use parking_lot::RwLockWriteGuard;
use tracing::debug;

use nemestrix_core::{ConflictError, Label, LabelPattern, Leaf, PathStore, PathView, Result};

use crate::tables::{ForestTables, NodeId};

enum Undo {
    Inserted(Label),
    Removed { label: Label, id: NodeId, leaf: Leaf },
}

/// An open, serializable write transaction
pub struct WriteTxn<'a> {
    tables: RwLockWriteGuard<'a, ForestTables>,
    undo: Vec<Undo>,
    committed: bool,
}

impl<'a> WriteTxn<'a> {
    pub(crate) fn new(tables: RwLockWriteGuard<'a, ForestTables>) -> Self {
        WriteTxn {
            tables,
            undo: Vec::new(),
            committed: false,
        }
    }

    /// Number of mutations applied so far
    pub fn pending(&self) -> usize {
        self.undo.len()
    }

    /// Commit the transaction and return the resulting store version
    ///
    /// The version only advances if something changed.
    pub fn commit(mut self) -> u64 {
        let version = if self.undo.is_empty() {
            self.tables.version()
        } else {
            self.tables.bump_version()
        };
        debug!(target: "nemestrix::storage", version, mutations = self.undo.len(), "transaction committed");
        self.undo.clear();
        self.committed = true;
        version
    }

    /// Abandon the transaction, undoing every change
    pub fn rollback(self) {
        // Drop does the work
    }

    fn undo_all(&mut self) {
        let count = self.undo.len();
        while let Some(entry) = self.undo.pop() {
            match entry {
                Undo::Inserted(label) => {
                    self.tables.remove(&label);
                }
                Undo::Removed { label, id, leaf } => self.tables.restore(label, id, leaf),
            }
        }
        if count > 0 {
            debug!(target: "nemestrix::storage", mutations = count, "transaction rolled back");
        }
    }
}

impl Drop for WriteTxn<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.undo_all();
        }
    }
}

impl PathView for WriteTxn<'_> {
    fn get(&self, label: &Label) -> Result<Option<Leaf>> {
        Ok(self.tables.get(label).cloned())
    }

    fn find_conflict(&self, label: &Label) -> Result<Option<Label>> {
        Ok(self.tables.find_conflict(label))
    }

    fn find_by_pattern(&self, pattern: &LabelPattern) -> Result<Vec<(Label, Leaf)>> {
        Ok(self.tables.find_by_pattern(pattern))
    }

    fn node_count(&self) -> usize {
        self.tables.len()
    }

    fn version(&self) -> u64 {
        self.tables.version()
    }
}

impl PathStore for WriteTxn<'_> {
    fn insert(&mut self, label: Label, leaf: Leaf) -> Result<()> {
        match self.tables.insert(label.clone(), leaf) {
            Some(_) => {
                self.undo.push(Undo::Inserted(label));
                Ok(())
            }
            None => Err(ConflictError::Overlap {
                existing: label.clone(),
                incoming: label,
            }
            .into()),
        }
    }

    fn remove(&mut self, label: &Label) -> Result<Option<Leaf>> {
        match self.tables.remove(label) {
            Some((id, leaf)) => {
                self.undo.push(Undo::Removed {
                    label: label.clone(),
                    id,
                    leaf: leaf.clone(),
                });
                Ok(Some(leaf))
            }
            None => Ok(None),
        }
    }
}
