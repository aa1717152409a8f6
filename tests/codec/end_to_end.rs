//! The write-then-fetch scenario driven through the codec and a store

use crate::common::*;
use nemestrix::{decode, encode, ForestStore, LabelPattern, PathStore, PathView};
use serde_json::json;

const BODY: &[u8] = br#"{"x":{"y":1,"z":[true,"s"]}}"#;

#[test]
fn encode_produces_expected_labels_and_kinds() {
    let pairs = encode(BODY).unwrap();
    assert_eq!(
        pairs,
        vec![
            (label("x.y"), Leaf::Number(1.0)),
            (label("x.z.0"), Leaf::Bool(true)),
            (label("x.z.1"), Leaf::String("s".to_string())),
        ]
    );
}

#[test]
fn fetch_descendants_and_decode_relative() {
    let store = ForestStore::new();
    let mut txn = store.begin().unwrap();
    for (l, leaf) in encode(BODY).unwrap() {
        assert!(txn.find_conflict(&l).unwrap().is_none());
        txn.insert(l, leaf).unwrap();
    }
    txn.commit();

    let x = label("x");
    let pattern = LabelPattern::compile("x.*").unwrap();
    let found = store.read().unwrap().find_by_pattern(&pattern).unwrap();
    assert_eq!(found.len(), 3);

    let relative: Vec<(Label, Leaf)> = found
        .into_iter()
        .map(|(l, leaf)| (l.relative_to(&x).unwrap(), leaf))
        .collect();
    assert_eq!(decode(relative).unwrap(), json!({"y": 1, "z": [true, "s"]}));
}

#[test]
fn forest_get_matches_manual_pipeline() {
    let forest = Forest::ephemeral();
    forest.write(BODY, WriteMode::Create).unwrap();
    assert_eq!(
        forest.get("x").unwrap().into_json(),
        json!({"y": 1, "z": [true, "s"]})
    );
}
