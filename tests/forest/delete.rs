//! Pattern deletes

use crate::common::*;
use nemestrix::Error;
use serde_json::json;

#[test]
fn delete_subtree_then_rewrite() {
    let forest = Forest::ephemeral();
    seed(&forest, r#"{"a":{"b":1,"c":[1,2]},"d":true}"#);

    assert_eq!(forest.delete("a.**").unwrap(), 3);
    assert_eq!(stored_labels(&forest), vec!["d"]);

    // The freed path accepts a leaf that previously would have conflicted
    forest.write(br#"{"a":"back"}"#, WriteMode::Create).unwrap();
    assert_eq!(forest.search("**").unwrap(), json!({"a": "back", "d": true}));
}

#[test]
fn delete_single_level_wildcard() {
    let forest = Forest::ephemeral();
    seed(&forest, r#"{"s":{"x":{"on":true,"n":1},"y":{"on":false}}}"#);
    assert_eq!(forest.delete("s.*.on").unwrap(), 2);
    assert_eq!(stored_labels(&forest), vec!["s.x.n"]);
}

#[test]
fn delete_nothing_is_not_found() {
    let forest = Forest::ephemeral();
    seed(&forest, r#"{"a":1}"#);
    let before = forest.version().unwrap();
    assert!(matches!(forest.delete("b.**"), Err(Error::NotFound { .. })));
    assert_eq!(forest.version().unwrap(), before);
}

#[test]
fn snapshot_keeps_deleted_nodes() {
    let forest = Forest::ephemeral();
    seed(&forest, r#"{"a":1,"b":2}"#);
    let snapshot = forest.snapshot().unwrap();
    forest.delete("**").unwrap();
    assert_eq!(snapshot.iter().count(), 2);
    assert!(forest.is_empty().unwrap());
}
