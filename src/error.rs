//! Error types for the `gopseek` crate.
//!
//! [`GopSeekError`] is the unified error type returned by every fallible
//! operation. Besides carrying context in the Rust error value, the indexer
//! and decoder also write a fixed two-line diagnostic to stderr whenever one
//! of their public operations fails; downstream tooling scrapes that text, so
//! it is part of the observable interface.

use std::path::PathBuf;

use thiserror::Error;

/// The unified error type for all `gopseek` operations.
///
/// Variants map one-to-one onto the distinct failure points of the indexing
/// and decoding pipelines. Errors are never retried internally; the first
/// failure surfaces to the caller and no partial output is returned.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GopSeekError {
    /// An empty path was passed to `open`.
    #[error("No input path was provided")]
    MissingFile,

    /// The demuxer could not open the input.
    #[error("Failed to open input {}: {reason}", .path.display())]
    OpenFailure {
        /// Path that was passed to `open`.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The stream-info probe failed after the input was opened.
    #[error("Stream info probe failed: {reason}")]
    ProbeFailure { reason: String },

    /// The input has no video stream.
    #[error("No video stream found in input")]
    NoVideoStream,

    /// The first video stream is not H.264.
    #[error("Video stream is not H.264 (found {codec})")]
    UnsupportedCodec { codec: String },

    /// Allocating or opening the H.264 decoder failed.
    #[error("Failed to initialize the H.264 decoder: {reason}")]
    DecoderInitFailure { reason: String },

    /// Resolving, allocating, or initializing the `h264_mp4toannexb` filter
    /// failed.
    #[error("Failed to initialize the h264_mp4toannexb filter: {reason}")]
    BitstreamFilterInitFailure { reason: String },

    /// A packet read failed for a reason other than end of file.
    #[error("Packet read failed: {reason}")]
    ReadFailure { reason: String },

    /// Seeking to the start of a decode interval failed.
    #[error("Seek to interval start failed: {reason}")]
    SeekFailure { reason: String },

    /// End of file was reached before the end of a decode interval.
    #[error("Encountered end of file inside a decode interval")]
    UnexpectedEof,

    /// The keyframe table or the wanted-frame set was empty.
    #[error("Keyframe table and wanted-frame set must both be non-empty")]
    EmptyInput,

    /// The bitstream filter rejected a packet.
    #[error("Bitstream filter failed: {reason}")]
    FilterFailure { reason: String },

    /// The decoder rejected a packet or failed to produce a frame.
    #[error("Decoder failed: {reason}")]
    DecodeFailure { reason: String },

    /// Converting a decoded raster to an RGB image failed.
    #[error("Pixel format conversion failed: {reason}")]
    ConversionFailure { reason: String },
}

impl GopSeekError {
    /// Write the two-line stderr diagnostic and hand the error back.
    ///
    /// Applied once, at the public operation boundary, so nested helpers can
    /// propagate plain errors without printing twice. The second line is a
    /// fixed string matched by downstream tooling.
    pub(crate) fn trace(self) -> Self {
        eprintln!("*** {self}");
        eprintln!("*** Key frame detection failed");
        self
    }
}
