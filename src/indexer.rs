//! Demux-only keyframe indexing.
//!
//! [`KeyframeIndexer`] walks a container packet-by-packet and records every
//! packet whose keyframe flag is set, without decoding any samples. The scan
//! is O(packet count) in I/O and trivial in CPU, which is what makes a
//! second, decoder-driven pass over just the interesting intervals
//! affordable.
//!
//! # Example
//!
//! ```no_run
//! use gopseek::KeyframeIndexer;
//!
//! let mut indexer = KeyframeIndexer::open("input.mp4")?;
//! let table = indexer.parse()?;
//! println!("{} keyframes", table.len());
//! # Ok::<(), gopseek::GopSeekError>(())
//! ```

use std::path::Path;

use ffmpeg_next::{format::context::Input, Error as FfmpegError, Packet, Rational};

use crate::demux;
use crate::error::GopSeekError;
use crate::ffmpeg::{set_native_log_level, NativeLogLevel};
use crate::keyframe::{KeyFrame, KeyframeTable};

/// Scans a container for H.264 keyframes without decoding.
///
/// The indexer exclusively owns its demuxer context for the duration of one
/// scan; dropping it releases the context. Instances are single-threaded,
/// but independent instances over distinct files may run in parallel.
pub struct KeyframeIndexer {
    input_context: Input,
    stream_index: usize,
    time_base: Rational,
}

impl KeyframeIndexer {
    /// Open `path`, probe its streams, and verify the first video stream is
    /// H.264.
    ///
    /// On success the process-global FFmpeg log level is dropped to quiet:
    /// the packet walk in [`parse`](Self::parse) otherwise floods stderr on
    /// legitimate inputs. See [`crate::ffmpeg`] for re-tuning it.
    ///
    /// # Errors
    ///
    /// - [`GopSeekError::MissingFile`] for an empty path.
    /// - [`GopSeekError::OpenFailure`] if the demuxer cannot open the input.
    /// - [`GopSeekError::ProbeFailure`] if the stream-info probe fails.
    /// - [`GopSeekError::NoVideoStream`] if there is no video stream.
    /// - [`GopSeekError::UnsupportedCodec`] if the stream is not H.264.
    ///
    /// Every failure also writes the two-line diagnostic to stderr; any
    /// native resources allocated along the way are released before the
    /// error returns.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GopSeekError> {
        Self::open_inner(path.as_ref()).map_err(GopSeekError::trace)
    }

    fn open_inner(path: &Path) -> Result<Self, GopSeekError> {
        if path.as_os_str().is_empty() {
            return Err(GopSeekError::MissingFile);
        }

        log::debug!("Indexing keyframes in {}", path.display());

        let input_context = demux::open_and_probe(path)?;
        let (stream_index, time_base) = demux::select_h264_stream(&input_context)?;

        set_native_log_level(NativeLogLevel::Quiet);

        Ok(Self {
            input_context,
            stream_index,
            time_base,
        })
    }

    /// Time base of the selected video stream.
    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    /// Walk the file and collect one [`KeyFrame`] per keyframe-flagged video
    /// packet.
    ///
    /// Only packets of the selected video stream advance the frame counter;
    /// packets of other streams are skipped entirely. End of file terminates
    /// the scan normally.
    ///
    /// # Errors
    ///
    /// Returns [`GopSeekError::ReadFailure`] if a packet read fails for any
    /// reason other than end of file. Read errors are not retried.
    pub fn parse(&mut self) -> Result<KeyframeTable, GopSeekError> {
        self.parse_inner().map_err(GopSeekError::trace)
    }

    fn parse_inner(&mut self) -> Result<KeyframeTable, GopSeekError> {
        let mut table = KeyframeTable::new();
        let mut frame_idx: u64 = 0;
        let mut packet = Packet::empty();

        loop {
            match packet.read(&mut self.input_context) {
                Ok(()) => {
                    if packet.stream() != self.stream_index {
                        continue;
                    }

                    if packet.is_key() {
                        table.push(KeyFrame {
                            idx: frame_idx,
                            base: packet.position() as i64,
                            len: packet.size() as u32,
                        });
                    }

                    frame_idx += 1;
                }
                Err(FfmpegError::Eof) => break,
                Err(error) => {
                    return Err(GopSeekError::ReadFailure {
                        reason: error.to_string(),
                    });
                }
            }
        }

        log::debug!(
            "Found {} keyframe(s) across {} video packet(s)",
            table.len(),
            frame_idx
        );

        Ok(table)
    }
}

/// Open `path` and return its keyframe table in one call.
///
/// Convenience wrapper over [`KeyframeIndexer::open`] followed by
/// [`parse`](KeyframeIndexer::parse); the demuxer is closed before this
/// returns.
pub fn index_keyframes<P: AsRef<Path>>(path: P) -> Result<KeyframeTable, GopSeekError> {
    let mut indexer = KeyframeIndexer::open(path)?;
    indexer.parse()
}
