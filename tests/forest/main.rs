//! Forest integration tests
//!
//! Exercises the write path, pattern queries and concurrency guarantees
//! through the `Forest` facade.

#[path = "../common/mod.rs"]
mod common;

mod concurrency;
mod conflicts;
mod delete;
mod patterns;
