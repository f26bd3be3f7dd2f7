//! # gopseek
//!
//! GOP-bounded random access into H.264 streams, powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate.
//!
//! H.264 is only randomly accessible at keyframes, so materializing an
//! arbitrary set of frames from a large file does not require decoding the
//! whole stream. `gopseek` splits the problem in two:
//!
//! - [`KeyframeIndexer`] scans the container once, without decoding any
//!   samples, and produces a [`KeyframeTable`] of keyframe descriptors
//!   (decode-order index, byte offset, packet length).
//! - [`IntervalDecoder`] takes that table plus the wanted frame indices,
//!   partitions them into keyframe-bounded intervals ([`IntervalMap`]), and
//!   decodes only the byte ranges those intervals cover. AVCC-framed packets
//!   (MP4-like containers) are rewritten to Annex B on the fly through the
//!   `h264_mp4toannexb` bitstream filter.
//!
//! ## Quick Start
//!
//! ```no_run
//! use gopseek::{IntervalDecoder, KeyframeIndexer};
//!
//! let mut indexer = KeyframeIndexer::open("input.mp4")?;
//! let table = indexer.parse()?;
//!
//! let mut decoder = IntervalDecoder::open("input.mp4")?;
//! decoder.set_interval_map(&table, &[5, 17, 42])?;
//!
//! for frame in decoder.decode()? {
//!     println!(
//!         "frame {}: {}x{}",
//!         frame.idx,
//!         frame.raster.width(),
//!         frame.raster.height()
//!     );
//! }
//! # Ok::<(), gopseek::GopSeekError>(())
//! ```
//!
//! Decoded frames keep the stream's native pixel format and dimensions; the
//! [`raster`] module converts them to [`image::DynamicImage`] when ordinary
//! RGB output is needed.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on the system, and the
//! linked build must carry the `h264_mp4toannexb` bitstream filter (every
//! stock FFmpeg does).

mod bitstream;
mod demux;
mod seek;

pub mod decoder;
pub mod error;
pub mod ffmpeg;
pub mod indexer;
pub mod interval;
pub mod keyframe;
pub mod raster;

pub use decoder::{DecodedFrame, H264Format, IntervalDecoder};
pub use error::GopSeekError;
pub use ffmpeg::{set_native_log_level, NativeLogLevel};
pub use indexer::{index_keyframes, KeyframeIndexer};
pub use interval::{FrameInterval, IntervalEntry, IntervalMap};
pub use keyframe::{KeyFrame, KeyframeTable};
