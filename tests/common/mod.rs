//! Shared test utilities for all integration test suites.
//!
//! Import via `mod common;` from any test's main.rs.

#![allow(dead_code)]

use std::sync::Arc;

pub use nemestrix::{Forest, ForestConfig, Label, Leaf, WriteMode};
use proptest::prelude::*;
use serde_json::{Map, Value};

/// Parse a label, panicking on bad test input
pub fn label(s: &str) -> Label {
    s.parse().unwrap()
}

/// A fresh forest shared across threads
pub fn shared_forest() -> Arc<Forest> {
    Arc::new(Forest::ephemeral())
}

/// Forest with a short lock timeout, for contention tests
pub fn impatient_forest(lock_timeout_ms: u64) -> Forest {
    Forest::new(ForestConfig {
        lock_timeout_ms,
        ..ForestConfig::default()
    })
}

/// Write a document, panicking on failure
pub fn seed(forest: &Forest, doc: &str) {
    forest.write(doc.as_bytes(), WriteMode::Create).unwrap();
}

/// Rendered labels of all stored nodes, in label order
pub fn stored_labels(forest: &Forest) -> Vec<String> {
    forest
        .search_leaves("**")
        .unwrap()
        .into_iter()
        .map(|(l, _)| l.render())
        .collect()
}

/// True if no stored label is an ancestor of, or equal to, another
pub fn is_antichain(labels: &[Label]) -> bool {
    labels
        .iter()
        .enumerate()
        .all(|(i, a)| labels[i + 1..].iter().all(|b| !a.overlaps(b)))
}

// ============================================================================
// Strategies
// ============================================================================

/// Object keys that are valid segments and never look like array indices
pub fn arb_key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,6}"
}

/// Scalars that survive a round trip exactly
pub fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        (-1_000_000i64..1_000_000).prop_map(Value::from),
        "[ -~]{0,12}".prop_map(Value::String),
        (-1.0e6f64..1.0e6)
            .prop_filter("non-integral", |f| f.fract() != 0.0)
            .prop_map(Value::from),
    ]
}

/// Documents the codec round-trips losslessly: no nulls, no empty
/// containers, no index-like object keys
pub fn arb_document() -> impl Strategy<Value = Value> {
    let leaf = arb_scalar();
    let tree = leaf.prop_recursive(5, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..5).prop_map(Value::Array),
            prop::collection::btree_map(arb_key(), inner, 1..5)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<String, Value>>())),
        ]
    });
    prop::collection::btree_map(arb_key(), tree, 1..5)
        .prop_map(|m| Value::Object(m.into_iter().collect()))
}
