//! ForestSnapshot: point-in-time view via deep clone
//!
//! A snapshot copies the tables once and then never changes. It holds no
//! lock, so it can outlive any number of later writes and be shared
//! across threads.

use std::sync::Arc;

use nemestrix_core::{Label, LabelPattern, Leaf, PathView, Result};

use crate::tables::{ForestTables, NodeId};

/// An immutable copy of the store taken at one version
///
/// # Example
///
/// ```
/// use nemestrix_core::{Leaf, PathStore, PathView};
/// use nemestrix_storage::ForestStore;
///
/// let store = ForestStore::new();
/// let snapshot = store.snapshot().unwrap();
///
/// let mut txn = store.begin().unwrap();
/// txn.insert("a".parse().unwrap(), Leaf::from(1i64)).unwrap();
/// txn.commit();
///
/// // Writes after the snapshot are not visible
/// assert!(snapshot.get(&"a".parse().unwrap()).unwrap().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ForestSnapshot {
    tables: Arc<ForestTables>,
}

impl ForestSnapshot {
    pub(crate) fn new(tables: ForestTables) -> Self {
        ForestSnapshot {
            tables: Arc::new(tables),
        }
    }

    /// Identity of the node at `label` when the snapshot was taken
    pub fn node_id(&self, label: &Label) -> Option<NodeId> {
        self.tables.node_id(label)
    }

    /// Iterate over every stored node in label order
    pub fn iter(&self) -> impl Iterator<Item = (&Label, &Leaf)> + '_ {
        self.tables.iter()
    }
}

impl PathView for ForestSnapshot {
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
