//! Interval-map construction tests.
//!
//! These run on synthetic keyframe tables and need no media fixtures.

use gopseek::{GopSeekError, IntervalMap, KeyFrame};

/// A table shaped like a 120-frame stream with a keyframe every 12 frames.
fn gop12_table() -> Vec<KeyFrame> {
    (0..10u64)
        .map(|i| KeyFrame {
            idx: i * 12,
            base: 48 + i as i64 * 4096,
            len: 2048,
        })
        .collect()
}

#[test]
fn wanted_frames_land_in_their_intervals() {
    let map = IntervalMap::build(&gop12_table(), &[5, 17, 42]).expect("build");

    assert_eq!(map.len(), 3);

    assert_eq!(map.entries[0].interval.start.idx, 0);
    assert_eq!(map.entries[0].interval.end.idx, 12);
    assert_eq!(map.entries[0].wanted, vec![5]);

    assert_eq!(map.entries[1].interval.start.idx, 12);
    assert_eq!(map.entries[1].interval.end.idx, 24);
    assert_eq!(map.entries[1].wanted, vec![17]);

    assert_eq!(map.entries[2].interval.start.idx, 36);
    assert_eq!(map.entries[2].interval.end.idx, 48);
    assert_eq!(map.entries[2].wanted, vec![42]);
}

#[test]
fn wanted_index_at_keyframe_belongs_to_the_interval_it_opens() {
    let map = IntervalMap::build(&gop12_table(), &[0, 11]).expect("build");

    assert_eq!(map.len(), 1);
    assert_eq!(map.entries[0].interval.start.idx, 0);
    assert_eq!(map.entries[0].interval.end.idx, 12);
    assert_eq!(map.entries[0].wanted, vec![0, 11]);
}

#[test]
fn indices_at_or_past_the_last_keyframe_are_dropped() {
    // 108 is the last keyframe; 115 is past the end of the table.
    let map = IntervalMap::build(&gop12_table(), &[108, 115]).expect("build");
    assert!(map.is_empty());
}

#[test]
fn indices_below_the_first_keyframe_are_dropped() {
    let table: Vec<KeyFrame> = gop12_table().into_iter().skip(1).collect();
    assert_eq!(table[0].idx, 12);

    let map = IntervalMap::build(&table, &[3]).expect("build");
    assert!(map.is_empty());

    let map = IntervalMap::build(&table, &[3, 13]).expect("build");
    assert_eq!(map.len(), 1);
    assert_eq!(map.entries[0].wanted, vec![13]);
}

#[test]
fn permutations_of_the_wanted_set_build_equal_maps() {
    let table = gop12_table();
    let sorted = IntervalMap::build(&table, &[5, 17, 42, 90]).expect("build");
    let shuffled = IntervalMap::build(&table, &[90, 5, 42, 17]).expect("build");
    assert_eq!(sorted, shuffled);
}

#[test]
fn duplicate_wanted_indices_are_ignored() {
    let table = gop12_table();
    let deduplicated = IntervalMap::build(&table, &[5, 17]).expect("build");
    let duplicated = IntervalMap::build(&table, &[5, 5, 17, 5, 17]).expect("build");
    assert_eq!(deduplicated, duplicated);
}

#[test]
fn unsorted_keyframe_tables_are_sorted_before_pairing() {
    let mut reversed = gop12_table();
    reversed.reverse();

    let from_sorted = IntervalMap::build(&gop12_table(), &[5, 17, 42]).expect("build");
    let from_reversed = IntervalMap::build(&reversed, &[5, 17, 42]).expect("build");
    assert_eq!(from_sorted, from_reversed);
}

#[test]
fn empty_wanted_set_is_rejected() {
    let result = IntervalMap::build(&gop12_table(), &[]);
    assert!(matches!(result, Err(GopSeekError::EmptyInput)));
}

#[test]
fn empty_keyframe_table_is_rejected() {
    let result = IntervalMap::build(&[], &[5]);
    assert!(matches!(result, Err(GopSeekError::EmptyInput)));
}

#[test]
fn single_keyframe_table_builds_an_empty_map() {
    let table = vec![KeyFrame {
        idx: 0,
        base: 48,
        len: 2048,
    }];
    let map = IntervalMap::build(&table, &[0, 1, 2]).expect("build");
    assert!(map.is_empty());
}

#[test]
fn retained_indices_partition_into_exactly_one_interval() {
    let table = gop12_table();
    let wanted: Vec<u64> = (0..120).collect();
    let map = IntervalMap::build(&table, &wanted).expect("build");

    // Everything below the last keyframe (108) is retained exactly once.
    let mut retained: Vec<u64> = map
        .entries
        .iter()
        .flat_map(|entry| entry.wanted.iter().copied())
        .collect();
    let total = retained.len();
    retained.dedup();

    assert_eq!(total, 108);
    assert_eq!(retained.len(), total, "no index may appear twice");
    assert!(retained.iter().all(|&idx| idx < 108));

    // And each entry only lists indices its own interval covers.
    for entry in &map.entries {
        assert!(entry.wanted.iter().all(|&idx| entry.interval.covers(idx)));
    }
}
