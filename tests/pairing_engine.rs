#[path = "common/mod.rs"]
mod common;

use common::*;
use pairetl::{PairOptions, PairStore, PairingEngine};

fn test_opts() -> PairOptions {
    // batch_threshold 1 commits every write immediately, so lookups made by
    // later records in the same stream observe earlier winners.
    PairOptions::default()
        .with_progress(false)
        .with_batch_threshold(1)
}

/// Two replies compete for the same slot: C (score 4) arrives after
/// B (score 3), so C replaces B in place. A itself carries no parent
/// reference and is skipped as malformed, leaving no row of its own.
#[test]
fn higher_score_replaces_slot_winner() {
    let lines = jsonl(&[
        // no parent_id field at all -> malformed -> skipped
        r#"{"id":"A","body":"hi","subreddit":"rust","created_utc":100,"score":5}"#.to_string(),
        comment("B", "t1_A", "hello", "rust", 200, 3),
        comment("C", "t1_A", "hey", "rust", 300, 4),
    ]);

    let mut store = PairStore::open_in_memory().unwrap();
    let stats = PairingEngine::new(test_opts())
        .ingest_lines(lines.as_bytes(), &mut store)
        .unwrap();

    assert_eq!(stats.read, 3);
    assert_eq!(stats.accepted, 2, "A is malformed, B and C pass the filter");

    let slot = store.slot("A").unwrap().expect("slot A must exist");
    assert_eq!(slot.comment, "hey", "C (4) must beat B (3)");
    assert_eq!(slot.score, 4);
    assert_eq!(store.row_count().unwrap(), 1, "replace keeps row count unchanged");
}

/// Equal scores never replace: the earliest-arriving candidate keeps the
/// slot, the loser's insert dies on the primary-key constraint.
#[test]
fn score_tie_keeps_earliest_candidate() {
    let lines = jsonl(&[
        comment("B", "t1_A", "hello", "rust", 200, 3),
        comment("C", "t1_A", "hey", "rust", 300, 3),
    ]);

    let mut store = PairStore::open_in_memory().unwrap();
    PairingEngine::new(test_opts())
        .ingest_lines(lines.as_bytes(), &mut store)
        .unwrap();

    let slot = store.slot("A").unwrap().unwrap();
    assert_eq!(slot.comment, "hello");
    assert_eq!(store.row_count().unwrap(), 1);
}

/// A reply whose parent is already stored picks up the parent's text.
#[test]
fn parent_text_resolved_when_parent_arrives_first() {
    let lines = jsonl(&[
        comment("P", "t3_G", "parent body", "rust", 100, 7),
        comment("X", "t1_P", "child body", "rust", 200, 4),
    ]);

    let mut store = PairStore::open_in_memory().unwrap();
    let stats = PairingEngine::new(test_opts())
        .ingest_lines(lines.as_bytes(), &mut store)
        .unwrap();

    assert_eq!(stats.paired, 1);
    let slot = store.slot("P").unwrap().unwrap();
    assert_eq!(slot.parent.as_deref(), Some("parent body"));
    assert_eq!(slot.comment, "child body");
}

/// Out-of-order arrival: the child is processed before its parent exists in
/// the store, so its parent text stays absent — it is never backfilled even
/// though the parent shows up afterwards.
#[test]
fn late_parent_is_not_backfilled() {
    let lines = jsonl(&[
        comment("X", "t1_P", "child body", "rust", 100, 4),
        comment("P", "t3_G", "parent body", "rust", 200, 7),
    ]);

    let mut store = PairStore::open_in_memory().unwrap();
    let stats = PairingEngine::new(test_opts())
        .ingest_lines(lines.as_bytes(), &mut store)
        .unwrap();

    assert_eq!(stats.paired, 0);
    let slot = store.slot("P").unwrap().unwrap();
    assert_eq!(slot.comment, "child body");
    assert!(slot.parent.is_none(), "parent text must not be backfilled");
    // P itself landed in its own slot keyed by G.
    assert_eq!(store.slot("G").unwrap().unwrap().comment, "parent body");
}

/// Replacement carries the slot's parent field over unchanged: even when
/// the true parent has arrived in the meantime, a replace does not
/// re-resolve it.
#[test]
fn replace_does_not_reresolve_parent() {
    let lines = jsonl(&[
        comment("R1", "t1_S", "first reply", "rust", 100, 3),
        comment("S", "t3_G", "the parent", "rust", 200, 5),
        comment("R2", "t1_S", "better reply", "rust", 300, 9),
    ]);

    let mut store = PairStore::open_in_memory().unwrap();
    PairingEngine::new(test_opts())
        .ingest_lines(lines.as_bytes(), &mut store)
        .unwrap();

    let slot = store.slot("S").unwrap().unwrap();
    assert_eq!(slot.comment, "better reply");
    assert!(
        slot.parent.is_none(),
        "replace must keep the slot's original (absent) parent text"
    );
}

/// A duplicate comment_id under a different parent violates the UNIQUE
/// constraint; the statement is dropped silently and the job succeeds.
#[test]
fn duplicate_comment_id_is_swallowed() {
    let lines = jsonl(&[
        comment("dup", "t1_p1", "first", "rust", 100, 3),
        comment("dup", "t1_p2", "second", "rust", 200, 3),
    ]);

    let mut store = PairStore::open_in_memory().unwrap();
    let stats = PairingEngine::new(test_opts())
        .ingest_lines(lines.as_bytes(), &mut store)
        .unwrap();

    assert_eq!(stats.accepted, 2);
    assert_eq!(stats.applied, 1, "second insert dies on UNIQUE(comment_id)");
    assert!(store.slot("p1").unwrap().is_some());
    assert!(store.slot("p2").unwrap().is_none());
}

/// Malformed input never aborts the run: bad JSON, missing fields, and a
/// parent reference without its kind prefix are all skipped individually.
#[test]
fn malformed_records_are_skipped() {
    let lines = jsonl(&[
        "{not json at all".to_string(),
        r#"{"id":"a","parent_id":"t1_x","subreddit":"rust","created_utc":1,"score":5}"#.to_string(), // no body
        r#"{"id":"b","parent_id":"nounderscore","body":"hi","subreddit":"rust","created_utc":1,"score":5}"#.to_string(),
        String::new(),
    ]);

    let mut store = PairStore::open_in_memory().unwrap();
    let stats = PairingEngine::new(test_opts())
        .ingest_lines(lines.as_bytes(), &mut store)
        .unwrap();

    assert_eq!(stats.read, 4);
    assert_eq!(stats.accepted, 0);
    assert_eq!(store.row_count().unwrap(), 0);
}

/// The final partial batch is flushed at end-of-stream: with a threshold
/// far above the record count, everything still reaches the store.
#[test]
fn final_partial_batch_is_flushed() {
    let lines = jsonl(&[
        comment("a", "t1_p1", "one", "rust", 100, 3),
        comment("b", "t1_p2", "two", "rust", 200, 3),
        comment("c", "t1_p3", "three", "rust", 300, 3),
    ]);

    let opts = PairOptions::default().with_progress(false).with_batch_threshold(1000);
    let mut store = PairStore::open_in_memory().unwrap();
    let stats = PairingEngine::new(opts)
        .ingest_lines(lines.as_bytes(), &mut store)
        .unwrap();

    assert_eq!(stats.applied, 3);
    assert_eq!(store.row_count().unwrap(), 3);
}

/// Plain and `.zst` dumps of the same records produce identical stores.
#[test]
fn zst_and_plain_inputs_agree() {
    let records = vec![
        comment("P", "t3_G", "parent body", "rust", 100, 7),
        comment("X", "t1_P", "child body", "rust", 200, 4),
        comment("Y", "t1_P", "louder child", "rust", 300, 9),
    ];

    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("RC_2018-08");
    let zst = dir.path().join("RC_2018-08.zst");
    write_plain_lines(&plain, &records);
    write_zst_lines(&zst, &records);

    let engine = PairingEngine::new(test_opts());
    let mut store_a = PairStore::open_in_memory().unwrap();
    let mut store_b = PairStore::open_in_memory().unwrap();
    let sa = engine.ingest_file(&plain, &mut store_a).unwrap();
    let sb = engine.ingest_file(&zst, &mut store_b).unwrap();

    assert_eq!(sa.read, sb.read);
    assert_eq!(sa.paired, sb.paired);
    assert_eq!(store_a.row_count().unwrap(), store_b.row_count().unwrap());

    let a = store_a.slot("P").unwrap().unwrap();
    let b = store_b.slot("P").unwrap().unwrap();
    assert_eq!(a.comment, b.comment);
    assert_eq!(a.comment, "louder child");
}
