//! Concurrency Tests
//!
//! - Overlapping concurrent creates never break the antichain
//! - Readers never observe a half-written batch
//! - Lock timeouts surface as retryable failures

use crate::common::*;
use nemestrix::{Error, ForestStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn racing_overlapping_creates_keep_antichain() {
    let forest = shared_forest();
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let forest = Arc::clone(&forest);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                // Even threads write the node, odd threads write below it
                let doc = if i % 2 == 0 {
                    format!(r#"{{"hot":{}}}"#, i)
                } else {
                    format!(r#"{{"hot":{{"t{}":{}}}}}"#, i, i)
                };
                barrier.wait();
                forest.write(doc.as_bytes(), WriteMode::Create).is_ok()
            })
        })
        .collect();

    let wins = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert!(wins >= 1);

    let labels: Vec<Label> = forest
        .search_leaves("**")
        .unwrap()
        .into_iter()
        .map(|(l, _)| l)
        .collect();
    assert!(is_antichain(&labels));
}

#[test]
fn readers_never_see_partial_batches() {
    let forest = shared_forest();
    let stop = Arc::new(AtomicBool::new(false));
    const BATCH: usize = 16;

    let writer = {
        let forest = Arc::clone(&forest);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            for round in 0..200 {
                let items: Vec<String> = (0..BATCH).map(|i| format!("{}", round * BATCH + i)).collect();
                let doc = format!(r#"{{"batch":[{}]}}"#, items.join(","));
                forest.write(doc.as_bytes(), WriteMode::Replace).unwrap();
            }
            stop.store(true, Ordering::Relaxed);
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let forest = Arc::clone(&forest);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    let found = forest.search_leaves("batch.*").unwrap();
                    assert!(found.is_empty() || found.len() == BATCH);
                    if let Some((_, first)) = found.first() {
                        let base = first.as_f64().unwrap();
                        for (_, leaf) in &found {
                            let v = leaf.as_f64().unwrap();
                            assert!(v >= base && v < base + BATCH as f64);
                        }
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for r in readers {
        r.join().unwrap();
    }
}

#[test]
fn lock_timeout_is_retryable() {
    let store = ForestStore::with_lock_timeout(Duration::from_millis(20));
    let _held = store.begin().unwrap();
    match store.begin() {
        Err(err @ Error::StoreUnavailable { .. }) => {
            assert!(err.is_retryable());
            assert!(!err.is_client_error());
        }
        Err(other) => panic!("unexpected error {:?}", other),
        Ok(_) => panic!("second writer acquired the lock"),
    }
    assert!(store.read().is_err());
}

#[test]
fn configured_timeout_reaches_the_store() {
    let forest = impatient_forest(20);
    seed(&forest, r#"{"a":1}"#);
    assert_eq!(forest.store().lock_timeout(), Duration::from_millis(20));

    let held = forest.store().begin().unwrap();
    let started = Instant::now();
    match forest.write(br#"{"b":2}"#, WriteMode::Create) {
        Err(err @ Error::StoreUnavailable { .. }) => assert!(err.is_retryable()),
        other => panic!("expected StoreUnavailable, got {:?}", other),
    }
    assert!(matches!(forest.search("**"), Err(Error::StoreUnavailable { .. })));
    // Well under the 5 s default
    assert!(started.elapsed() < Duration::from_secs(2));
    drop(held);

    assert_eq!(forest.get("a").unwrap().into_json(), serde_json::json!(1));
    assert!(forest.search_leaves("b").unwrap().is_empty());
}

#[test]
fn disjoint_writers_all_succeed() {
    let forest = shared_forest();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let forest = Arc::clone(&forest);
            thread::spawn(move || {
                let doc = format!(r#"{{"w{}":{{"v":[{},{}]}}}}"#, i, i, i + 1);
                forest.write(doc.as_bytes(), WriteMode::Create).unwrap().version
            })
        })
        .collect();
    let mut versions: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    versions.sort_unstable();
    assert_eq!(versions, (1..=8).collect::<Vec<u64>>());
    assert_eq!(forest.len().unwrap(), 16);
}
