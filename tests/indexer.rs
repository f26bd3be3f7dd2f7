//! Keyframe indexer integration tests.
//!
//! These need the media fixtures described in `tests/fixtures/README.md`
//! and skip silently when a fixture is absent.

use std::path::Path;

use gopseek::{index_keyframes, KeyframeIndexer};

fn mp4_fixture() -> &'static str {
    "tests/fixtures/gop12.mp4"
}

fn annexb_fixture() -> &'static str {
    "tests/fixtures/gop12.h264"
}

#[test]
fn parse_finds_the_expected_keyframes() {
    let path = mp4_fixture();
    if !Path::new(path).exists() {
        return;
    }

    let mut indexer = KeyframeIndexer::open(path).expect("open");
    let table = indexer.parse().expect("parse");

    // 120 frames, keyframe every 12.
    assert_eq!(table.len(), 10);
    let indices: Vec<u64> = table.iter().map(|frame| frame.idx).collect();
    let expected: Vec<u64> = (0..10).map(|i| i * 12).collect();
    assert_eq!(indices, expected);
}

#[test]
fn table_indices_and_offsets_increase_strictly() {
    let path = mp4_fixture();
    if !Path::new(path).exists() {
        return;
    }

    let table = index_keyframes(path).expect("index");
    assert!(!table.is_empty(), "expected at least one keyframe");

    for pair in table.windows(2) {
        assert!(pair[0].idx < pair[1].idx, "idx must increase strictly");
        assert!(pair[0].base < pair[1].base, "base must increase strictly");
    }

    for frame in &table {
        assert!(frame.len > 0, "keyframe packets should not be empty");
    }
}

#[test]
fn parsing_twice_yields_identical_tables() {
    let path = mp4_fixture();
    if !Path::new(path).exists() {
        return;
    }

    let first = index_keyframes(path).expect("first index");
    let second = index_keyframes(path).expect("second index");
    assert_eq!(first, second);
}

#[test]
fn annexb_table_matches_the_mp4_table_by_index() {
    let mp4 = mp4_fixture();
    let raw = annexb_fixture();
    if !Path::new(mp4).exists() || !Path::new(raw).exists() {
        return;
    }

    let mp4_table = index_keyframes(mp4).expect("mp4 index");
    let raw_table = index_keyframes(raw).expect("annexb index");

    let mp4_indices: Vec<u64> = mp4_table.iter().map(|frame| frame.idx).collect();
    let raw_indices: Vec<u64> = raw_table.iter().map(|frame| frame.idx).collect();
    assert_eq!(mp4_indices, raw_indices);
}

#[test]
fn time_base_is_exposed() {
    let path = mp4_fixture();
    if !Path::new(path).exists() {
        return;
    }

    let indexer = KeyframeIndexer::open(path).expect("open");
    let time_base = indexer.time_base();
    assert!(time_base.denominator() > 0, "time base must be usable");
}
