//! ForestStore: in-memory path store with serializable write transactions
//!
//! This module implements the PathView / PathStore traits using:
//! - [`ForestTables`] (node and leaf tables) for ordered label storage
//! - `parking_lot::RwLock` for thread-safe access
//! - bounded lock acquisition, so a stuck writer surfaces as
//!   `StoreUnavailable` instead of blocking forever
//!
//! # Design Notes
//!
//! - **One writer at a time**: a [`WriteTxn`] holds the write lock from its
//!   first conflict check to commit, so check-then-write has no gap.
//! - **Readers never see partial batches**: reads take the read lock, which
//!   cannot be acquired while a write transaction is open.
//! - **Snapshots**: [`ForestStore::snapshot`] clones the tables for a
//!   long-lived point-in-time view that does not hold any lock.

use std::time::Duration;

use parking_lot::{RwLock, RwLockReadGuard};
use tracing::warn;

use nemestrix_core::{Error, Label, LabelPattern, Leaf, PathView, Result};

use crate::snapshot::ForestSnapshot;
use crate::tables::ForestTables;
use crate::txn::WriteTxn;

/// Default bound on lock acquisition
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// In-memory backing store for the path forest
///
/// Thread-safe; share it behind an `Arc`.
#[derive(Debug)]
pub struct ForestStore {
    tables: RwLock<ForestTables>,
    lock_timeout: Duration,
}

impl ForestStore {
    /// Create an empty store with the default lock timeout
    pub fn new() -> Self {
        Self::with_lock_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    /// Create an empty store with a custom lock timeout
    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        ForestStore {
            tables: RwLock::new(ForestTables::new()),
            lock_timeout,
        }
    }

    /// Configured lock timeout
    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    /// Open a consistent read view
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the read lock is not acquired within
    /// the lock timeout.
    pub fn read(&self) -> Result<ReadView<'_>> {
        match self.tables.try_read_for(self.lock_timeout) {
            Some(guard) => Ok(ReadView { tables: guard }),
            None => {
                warn!(target: "nemestrix::storage", timeout_ms = self.lock_timeout.as_millis() as u64, "read lock timed out");
                Err(Error::unavailable(format!(
                    "read lock not acquired within {:?}",
                    self.lock_timeout
                )))
            }
        }
    }

    /// Begin a write transaction
    ///
    /// The transaction holds the write lock until it is committed or
    /// dropped. Dropping without commit rolls back every change.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the write lock is not acquired within
    /// the lock timeout.
    pub fn begin(&self) -> Result<WriteTxn<'_>> {
        match self.tables.try_write_for(self.lock_timeout) {
            Some(guard) => Ok(WriteTxn::new(guard)),
            None => {
                warn!(target: "nemestrix::storage", timeout_ms = self.lock_timeout.as_millis() as u64, "write lock timed out");
                Err(Error::unavailable(format!(
                    "write lock not acquired within {:?}",
                    self.lock_timeout
                )))
            }
        }
    }

    /// Create a point-in-time snapshot of the whole store
    ///
    /// O(n) in the number of stored nodes.
    pub fn snapshot(&self) -> Result<ForestSnapshot> {
        let view = self.read()?;
        Ok(ForestSnapshot::new(view.tables.clone()))
    }
}

impl Default for ForestStore {
    fn default() -> Self {
        Self::new()
    }
}

/// A read view holding the store's read lock
pub struct ReadView<'a> {
    tables: RwLockReadGuard<'a, ForestTables>,
}

impl PathView for ReadView<'_> {
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
