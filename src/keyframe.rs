//! Keyframe descriptors.
//!
//! A [`KeyFrame`] records one random-access point of an H.264 stream as the
//! demuxer saw it: the decode-order index of the packet, its byte position in
//! the container, and its payload length. [`KeyframeIndexer`](crate::KeyframeIndexer)
//! fills an ordered [`KeyframeTable`] of these without decoding any samples.

/// A single random-access point in the video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyFrame {
    /// 0-based ordinal of this packet among the video stream's packets
    /// (decode order, non-video packets excluded).
    pub idx: u64,
    /// Absolute byte offset of the packet within the container. Negative when
    /// the demuxer does not know the position.
    pub base: i64,
    /// Packet payload length in bytes.
    pub len: u32,
}

/// An ordered table of keyframes covering one video stream.
///
/// Built once per input by [`KeyframeIndexer::parse`](crate::KeyframeIndexer::parse);
/// both `idx` and `base` are strictly increasing across the table. An empty
/// table means the stream carried no keyframes, which downstream consumers
/// treat as an error.
pub type KeyframeTable = Vec<KeyFrame>;
