//! Antichain enforcement on the create path

use crate::common::*;
use nemestrix::{ConflictError, Error};
use proptest::prelude::*;

#[test]
fn ancestor_already_stored_conflicts() {
    let forest = Forest::ephemeral();
    seed(&forest, r#"{"a":1}"#);
    let err = forest.write(br#"{"a":{"b":2}}"#, WriteMode::Create).unwrap_err();
    match err {
        Error::Conflict(ConflictError::Overlap { existing, incoming }) => {
            assert_eq!(existing, label("a"));
            assert_eq!(incoming, label("a.b"));
        }
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[test]
fn descendant_already_stored_conflicts() {
    let forest = Forest::ephemeral();
    seed(&forest, r#"{"a":{"b":2}}"#);
    assert!(matches!(
        forest.write(br#"{"a":1}"#, WriteMode::Create),
        Err(Error::Conflict(_))
    ));
}

#[test]
fn sibling_does_not_conflict() {
    let forest = Forest::ephemeral();
    seed(&forest, r#"{"a":{"b":2}}"#);
    forest.write(br#"{"a":{"c":3}}"#, WriteMode::Create).unwrap();
    assert_eq!(stored_labels(&forest), vec!["a.b", "a.c"]);
}

#[test]
fn exact_duplicate_conflicts() {
    let forest = Forest::ephemeral();
    seed(&forest, r#"{"a":[1]}"#);
    assert!(forest.write(br#"{"a":[1]}"#, WriteMode::Create).is_err());
}

#[test]
fn failed_batch_leaves_no_partial_insert() {
    let forest = Forest::ephemeral();
    seed(&forest, r#"{"k":{"deep":1}}"#);
    let before = forest.version().unwrap();

    let err = forest
        .write(br#"{"p":1,"q":[1,2,3],"k":"flat"}"#, WriteMode::Create)
        .unwrap_err();
    assert!(err.is_client_error());
    assert!(!err.is_retryable());

    assert_eq!(stored_labels(&forest), vec!["k.deep"]);
    assert_eq!(forest.version().unwrap(), before);
}

fn arb_small_doc() -> impl Strategy<Value = serde_json::Value> {
    fn object(
        entries: std::collections::BTreeMap<&'static str, serde_json::Value>,
    ) -> serde_json::Value {
        serde_json::Value::Object(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    let key = || prop::sample::select(vec!["a", "b", "c"]);
    let leaf = any::<bool>().prop_map(serde_json::Value::Bool);
    let inner = leaf.prop_recursive(2, 8, 3, move |inner| {
        prop::collection::btree_map(key(), inner, 1..3).prop_map(object)
    });
    prop::collection::btree_map(key(), inner, 1..3).prop_map(object)
}

proptest! {
    #[test]
    fn stored_labels_stay_an_antichain(docs in prop::collection::vec(arb_small_doc(), 1..8)) {
        let forest = Forest::ephemeral();
        for doc in &docs {
            let _ = forest.write_value(doc, WriteMode::Create);
        }
        let labels: Vec<Label> = forest
            .search_leaves("**")
            .unwrap()
            .into_iter()
            .map(|(l, _)| l)
            .collect();
        prop_assert!(is_antichain(&labels));
    }
}
