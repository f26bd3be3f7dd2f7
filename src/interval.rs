//! Keyframe-bounded interval planning.
//!
//! Decoding an arbitrary set of frame indices means decoding forward from the
//! keyframe that opens each group of pictures. [`IntervalMap::build`] groups
//! the wanted indices by the pair of consecutive keyframes that brackets
//! them; the decoder then touches only the byte ranges those entries cover.

use crate::error::GopSeekError;
use crate::keyframe::KeyFrame;

/// The half-open run of decode-order frame indices `[start.idx, end.idx)`
/// between two consecutive keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInterval {
    /// Keyframe that opens the interval.
    pub start: KeyFrame,
    /// The next keyframe; not itself part of the interval.
    pub end: KeyFrame,
}

impl FrameInterval {
    /// Whether `idx` falls inside this interval.
    pub fn covers(&self, idx: u64) -> bool {
        idx >= self.start.idx && idx < self.end.idx
    }
}

/// One decode unit: an interval and the wanted indices inside it, sorted
/// ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalEntry {
    pub interval: FrameInterval,
    pub wanted: Vec<u64>,
}

/// The ordered decode plan derived from a keyframe table and a wanted set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalMap {
    /// Entries in ascending interval order; intervals containing no wanted
    /// index are omitted.
    pub entries: Vec<IntervalEntry>,
}

impl IntervalMap {
    /// Build the decode plan for `wanted` against `table`.
    ///
    /// The keyframe table is sorted by `idx` (stably, so duplicate entries
    /// keep their relative order) and every adjacent pair forms a candidate
    /// interval. The wanted indices are sorted and deduplicated first, which
    /// makes the result identical for any permutation of the same set.
    ///
    /// Wanted indices at or past the last keyframe are dropped without
    /// error: with no following keyframe there is no interval to bound the
    /// decode. The same applies to indices below the first keyframe.
    ///
    /// # Errors
    ///
    /// Returns [`GopSeekError::EmptyInput`] when `table` or `wanted` is
    /// empty.
    pub fn build(table: &[KeyFrame], wanted: &[u64]) -> Result<Self, GopSeekError> {
        if table.is_empty() || wanted.is_empty() {
            return Err(GopSeekError::EmptyInput);
        }

        let mut keyframes = table.to_vec();
        keyframes.sort_by_key(|frame| frame.idx);

        let mut requested = wanted.to_vec();
        requested.sort_unstable();
        requested.dedup();

        let mut entries = Vec::new();
        for pair in keyframes.windows(2) {
            let interval = FrameInterval {
                start: pair[0],
                end: pair[1],
            };

            let inside: Vec<u64> = requested
                .iter()
                .copied()
                .filter(|&frame| interval.covers(frame))
                .collect();

            if !inside.is_empty() {
                entries.push(IntervalEntry {
                    interval,
                    wanted: inside,
                });
            }
        }

        Ok(Self { entries })
    }

    /// Number of intervals in the plan.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no interval contains a wanted index.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
