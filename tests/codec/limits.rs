//! Depth and size limits on adversarial input

use nemestrix::{decode, EncodeError, Encoder, Label, Leaf, Limits};

fn nested(depth: usize) -> String {
    let mut doc = String::new();
    for _ in 0..depth {
        doc.push_str("{\"k\":");
    }
    doc.push('1');
    for _ in 0..depth {
        doc.push('}');
    }
    doc
}

#[test]
fn depth_at_limit_is_accepted() {
    let encoder = Encoder::new(Limits::default());
    let pairs = encoder.encode_bytes(nested(100).as_bytes()).unwrap();
    assert_eq!(pairs[0].0.len(), 100);
}

#[test]
fn depth_over_limit_is_rejected() {
    let encoder = Encoder::new(Limits::default());
    let err = encoder.encode_bytes(nested(101).as_bytes()).unwrap_err();
    assert_eq!(err, EncodeError::TooDeep { depth: 101, max: 100 });
}

#[test]
fn oversized_document_rejected_before_parsing() {
    let encoder = Encoder::new(Limits::with_small_limits());
    let body = format!("{{\"k\":\"{}\"}}", "x".repeat(2048));
    assert!(matches!(
        encoder.encode_bytes(body.as_bytes()),
        Err(EncodeError::DocumentTooLarge { max: 1024, .. })
    ));
}

#[test]
fn long_labels_decode_within_default_limit() {
    let segments: Vec<String> = (0..100).map(|i| format!("s{}", i)).collect();
    let label = Label::from_segments(segments).unwrap();
    assert!(decode(vec![(label, Leaf::from(true))]).is_ok());
}
