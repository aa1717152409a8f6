//! Round-trip property: decode(encode(j)) == j within the lossless scope

use crate::common::*;
use nemestrix::{decode, encode, encode_value};
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn decode_inverts_encode(doc in arb_document()) {
        let pairs = encode_value(&doc).unwrap();
        prop_assert_eq!(decode(pairs).unwrap(), doc);
    }

    #[test]
    fn encoded_labels_form_an_antichain(doc in arb_document()) {
        let labels: Vec<Label> = encode_value(&doc).unwrap().into_iter().map(|(l, _)| l).collect();
        prop_assert!(is_antichain(&labels));
    }

    #[test]
    fn decode_ignores_input_order(doc in arb_document()) {
        let mut pairs = encode_value(&doc).unwrap();
        pairs.reverse();
        let mut sorted = pairs.clone();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        prop_assert_eq!(decode(pairs).unwrap(), decode(sorted).unwrap());
    }
}

#[test]
fn top_level_array_roundtrips() {
    let doc = json!([{"a": 1}, [true, "x"], 2.5]);
    let pairs = encode(doc.to_string().as_bytes()).unwrap();
    assert_eq!(decode(pairs).unwrap(), doc);
}

#[test]
fn nulls_and_empty_containers_are_dropped() {
    let pairs = encode(br#"{"a":null,"b":{},"c":[],"d":{"e":1}}"#).unwrap();
    assert_eq!(decode(pairs).unwrap(), json!({"d": {"e": 1}}));
}

#[test]
fn integral_floats_come_back_as_integers() {
    let pairs = encode(br#"{"a":2.0,"b":-0.5}"#).unwrap();
    assert_eq!(decode(pairs).unwrap(), json!({"a": 2, "b": -0.5}));
}

#[test]
fn null_elements_leave_array_gaps() {
    // Index 1 is dropped, so 0 and 2 no longer form a dense run
    let pairs = encode(br#"{"a":[1,null,3]}"#).unwrap();
    assert_eq!(decode(pairs).unwrap(), json!({"a": {"0": 1, "2": 3}}));
}
