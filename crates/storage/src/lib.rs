//! Storage layer for the path forest
//!
//! This crate implements the in-memory backing store with:
//! - ForestTables: ordered node table plus leaf table
//! - ForestStore: `RwLock`-guarded tables with bounded lock waits
//! - WriteTxn: serializable write transactions with rollback on drop
//! - ForestSnapshot: lock-free point-in-time views

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod snapshot;
pub mod store;
pub mod tables;
pub mod txn;

pub use snapshot::ForestSnapshot;
pub use store::{ForestStore, ReadView, DEFAULT_LOCK_TIMEOUT};
pub use tables::{ForestTables, NodeId};
pub use txn::WriteTxn;
