//! Pattern search and path lookup

use crate::common::*;
use nemestrix::{Error, LabelPattern, Lookup};
use serde_json::json;

fn populated() -> Forest {
    let forest = Forest::ephemeral();
    seed(
        &forest,
        r#"{"users":{"ann":{"age":31,"tags":["a","b"]},"bob":{"age":44}},"version":2}"#,
    );
    forest
}

#[test]
fn pattern_matching_properties() {
    let l = label("a.b.c");
    assert!(LabelPattern::compile("a.*.c").unwrap().matches(&l));
    assert!(!LabelPattern::compile("a.b").unwrap().matches(&l));
    assert!(LabelPattern::compile("a.**").unwrap().matches(&l));
    assert!(LabelPattern::compile("**").unwrap().matches(&l));
}

#[test]
fn single_level_wildcard_search() {
    let forest = populated();
    assert_eq!(
        forest.search("users.*.age").unwrap(),
        json!({"users": {"ann": {"age": 31}, "bob": {"age": 44}}})
    );
}

#[test]
fn trailing_wildcard_selects_descendants_only() {
    let forest = populated();
    let found = forest.search_leaves("users.ann.*").unwrap();
    let labels: Vec<String> = found.iter().map(|(l, _)| l.render()).collect();
    assert_eq!(labels, vec!["users.ann.age", "users.ann.tags.0", "users.ann.tags.1"]);
}

#[test]
fn subtree_wildcard_includes_the_node_itself() {
    let forest = populated();
    assert_eq!(forest.search("version.**").unwrap(), json!({"version": 2}));
    assert!(matches!(forest.search("version.*"), Err(Error::NotFound { .. })));
}

#[test]
fn results_are_label_ordered() {
    let forest = Forest::ephemeral();
    seed(&forest, r#"{"z":1,"a":{"m":2},"b":3}"#);
    assert_eq!(stored_labels(&forest), vec!["a.m", "b", "z"]);
}

#[test]
fn get_leaf_subtree_and_missing() {
    let forest = populated();
    assert_eq!(forest.get("version").unwrap(), Lookup::Leaf(Leaf::from(2i64)));
    assert_eq!(
        forest.get("users.ann").unwrap(),
        Lookup::Subtree(json!({"age": 31, "tags": ["a", "b"]}))
    );
    assert_eq!(
        forest.get("users.ann.tags").unwrap().into_json(),
        json!(["a", "b"])
    );
    assert!(matches!(forest.get("users.cy"), Err(Error::NotFound { .. })));
}

#[test]
fn invalid_inputs_are_client_errors() {
    let forest = populated();
    let err = forest.search("users.**.age").unwrap_err();
    assert!(matches!(err, Error::InvalidPattern(_)));
    assert!(err.is_client_error());

    let err = forest.get("users..ann").unwrap_err();
    assert!(matches!(err, Error::InvalidLabel(_)));
}

#[test]
fn character_prefix_is_not_a_path_prefix() {
    let forest = Forest::ephemeral();
    seed(&forest, r#"{"ab":{"c":1},"a":{"d":2}}"#);
    assert_eq!(forest.search("a.*").unwrap(), json!({"a": {"d": 2}}));
}
