//! Interval-bounded H.264 decoding.
//!
//! [`IntervalDecoder`] materializes an arbitrary set of frames by decoding
//! only the keyframe-bounded intervals that contain them: seek to the
//! keyframe opening each interval, feed packets (rewritten to Annex B when
//! the container is AVCC-framed) into the decoder, and keep the frames whose
//! decode-order index is wanted.
//!
//! # Example
//!
//! ```no_run
//! use gopseek::{index_keyframes, IntervalDecoder};
//!
//! let table = index_keyframes("input.mp4")?;
//!
//! let mut decoder = IntervalDecoder::open("input.mp4")?;
//! decoder.set_interval_map(&table, &[5, 17, 42])?;
//! let frames = decoder.decode()?;
//! # Ok::<(), gopseek::GopSeekError>(())
//! ```

use std::path::Path;

use ffmpeg_next::{
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::context::Input,
    frame::Video as RasterFrame,
    util::error::EAGAIN,
    Error as FfmpegError, Packet,
};

use crate::bitstream::{BitstreamFilter, FilterPoll};
use crate::demux;
use crate::error::GopSeekError;
use crate::interval::{FrameInterval, IntervalMap};
use crate::keyframe::KeyFrame;
use crate::seek;

/// How the H.264 byte stream is framed inside the container.
///
/// Classified once at open time from the codec parameters' reported bit
/// rate: a nonzero bit rate is taken to mean an AVCC container. This is a
/// heuristic and will misclassify constant-bit-rate Annex B streams that
/// report a rate; inspecting the container format or the presence of
/// `extradata` would be more principled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum H264Format {
    /// Length-prefixed NAL units, parameter sets in container metadata
    /// (MP4-like containers). Packets pass through the bitstream filter and
    /// seeks address frame indices.
    Avcc,
    /// Start-code-prefixed NAL units, parameter sets inline (raw streams).
    /// Packets reach the decoder untouched and seeks address byte offsets.
    AnnexB,
}

/// One decoded frame and its decode-order index.
///
/// The raster owns an independent pixel buffer and outlives the decoder. Its
/// pixel format and dimensions are whatever the stream produced; nothing is
/// converted or scaled (see [`crate::raster`] for RGB interop). `idx` counts
/// decoder emissions from the interval's start keyframe, so for streams with
/// B-frames it is a decode-order index, not a presentation-order one.
pub struct DecodedFrame {
    /// The decoded pixel data.
    pub raster: RasterFrame,
    /// Decode-order index of the frame within the video stream.
    pub idx: u64,
}

/// Decodes wanted frames out of keyframe-bounded intervals.
///
/// Owns its demuxer, decoder, and bitstream-filter contexts for the duration
/// of one decode session; all three are released when the decoder drops,
/// including after mid-pipeline errors. Instances are single-threaded.
pub struct IntervalDecoder {
    input_context: Input,
    decoder: VideoDecoder,
    filter: BitstreamFilter,
    stream_index: usize,
    byte_stream_format: H264Format,
    interval_map: IntervalMap,
}

impl IntervalDecoder {
    /// Open `path` and prepare the decode pipeline.
    ///
    /// Performs the same open/probe/stream-selection steps as
    /// [`KeyframeIndexer::open`](crate::KeyframeIndexer::open), then
    /// allocates and opens an H.264 decoder, classifies the byte-stream
    /// format, and initializes the `h264_mp4toannexb` filter. The filter is
    /// allocated for Annex B inputs too; only AVCC packets are routed
    /// through it.
    ///
    /// # Errors
    ///
    /// The open/probe/selection kinds of the indexer, plus
    /// [`GopSeekError::DecoderInitFailure`] and
    /// [`GopSeekError::BitstreamFilterInitFailure`]. Each failure writes the
    /// two-line diagnostic to stderr and releases whatever was allocated.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GopSeekError> {
        Self::open_inner(path.as_ref()).map_err(GopSeekError::trace)
    }

    fn open_inner(path: &Path) -> Result<Self, GopSeekError> {
        if path.as_os_str().is_empty() {
            return Err(GopSeekError::MissingFile);
        }

        log::debug!("Opening {} for interval decoding", path.display());

        let input_context = demux::open_and_probe(path)?;
        let (stream_index, _) = demux::select_h264_stream(&input_context)?;

        let (byte_stream_format, decoder, filter) = {
            let stream = input_context
                .stream(stream_index)
                .ok_or(GopSeekError::NoVideoStream)?;

            let parameters = stream.parameters();
            // SAFETY: the parameters pointer stays valid while `stream`
            // borrows the open input.
            let bit_rate = unsafe { (*parameters.as_ptr()).bit_rate };
            let byte_stream_format = if bit_rate != 0 {
                H264Format::Avcc
            } else {
                H264Format::AnnexB
            };

            let decoder = CodecContext::from_parameters(parameters)
                .map_err(|error| GopSeekError::DecoderInitFailure {
                    reason: error.to_string(),
                })?
                .decoder()
                .video()
                .map_err(|error| GopSeekError::DecoderInitFailure {
                    reason: error.to_string(),
                })?;

            let filter = BitstreamFilter::mp4_to_annexb(&stream)?;

            (byte_stream_format, decoder, filter)
        };

        log::debug!("Byte stream classified as {byte_stream_format:?}");

        Ok(Self {
            input_context,
            decoder,
            filter,
            stream_index,
            byte_stream_format,
            interval_map: IntervalMap::default(),
        })
    }

    /// Detected byte-stream framing of the input.
    pub fn byte_stream_format(&self) -> H264Format {
        self.byte_stream_format
    }

    /// Build the decode plan from a keyframe table and the wanted indices.
    ///
    /// See [`IntervalMap::build`] for the partitioning rules; the resulting
    /// plan replaces any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`GopSeekError::EmptyInput`] when either argument is empty.
    pub fn set_interval_map(
        &mut self,
        table: &[KeyFrame],
        wanted: &[u64],
    ) -> Result<(), GopSeekError> {
        let map = IntervalMap::build(table, wanted).map_err(GopSeekError::trace)?;
        log::debug!("Interval map holds {} interval(s)", map.len());
        self.interval_map = map;
        Ok(())
    }

    /// The current decode plan.
    pub fn interval_map(&self) -> &IntervalMap {
        &self.interval_map
    }

    /// Decode every interval in the plan and collect the wanted frames.
    ///
    /// Frames are emitted strictly in interval order and, within an
    /// interval, in the decoder's emission order. An empty plan decodes
    /// nothing and returns an empty vector.
    ///
    /// # Errors
    ///
    /// Any seek, read, filter, or decode failure aborts the run; no partial
    /// output is returned.
    pub fn decode(&mut self) -> Result<Vec<DecodedFrame>, GopSeekError> {
        self.decode_inner().map_err(GopSeekError::trace)
    }

    fn decode_inner(&mut self) -> Result<Vec<DecodedFrame>, GopSeekError> {
        let plan = self.interval_map.clone();

        let mut frames = Vec::new();
        for entry in &plan.entries {
            self.decode_interval(entry.interval, &entry.wanted, &mut frames)?;
        }

        log::debug!("Decoded {} wanted frame(s)", frames.len());
        Ok(frames)
    }

    /// Decode one interval, appending wanted frames to `frames`.
    fn decode_interval(
        &mut self,
        interval: FrameInterval,
        wanted: &[u64],
        frames: &mut Vec<DecodedFrame>,
    ) -> Result<(), GopSeekError> {
        match self.byte_stream_format {
            H264Format::Avcc => {
                seek::to_frame(&mut self.input_context, self.stream_index, interval.start.idx)?;
            }
            H264Format::AnnexB => {
                seek::to_byte(&mut self.input_context, self.stream_index, interval.start.base)?;
            }
        }

        // Frames buffered from a previous interval must not surface here.
        self.decoder.flush();

        let mut packet = Packet::empty();
        let mut decoded = RasterFrame::empty();

        // Inclusive upper bound: the end keyframe itself is visited, so every
        // index in [start, end) has been pulled before the interval closes.
        let mut idx = interval.start.idx;
        while idx <= interval.end.idx {
            // Read forward to the next packet of the selected stream.
            loop {
                match packet.read(&mut self.input_context) {
                    Ok(()) => {
                        if packet.stream() == self.stream_index {
                            break;
                        }
                    }
                    Err(FfmpegError::Eof) => return Err(GopSeekError::UnexpectedEof),
                    Err(error) => {
                        return Err(GopSeekError::ReadFailure {
                            reason: error.to_string(),
                        });
                    }
                }
            }

            if self.byte_stream_format != H264Format::AnnexB {
                self.filter.send(&mut packet)?;
                match self.filter.receive(&mut packet)? {
                    FilterPoll::Delivered => {}
                    // More input needed; re-enter the read without advancing.
                    FilterPoll::Again => continue,
                }
            }

            self.decoder
                .send_packet(&packet)
                .map_err(|error| GopSeekError::DecodeFailure {
                    reason: format!("sending a packet for decoding: {error}"),
                })?;

            match self.decoder.receive_frame(&mut decoded) {
                Ok(()) => {
                    if wanted.binary_search(&idx).is_ok() {
                        frames.push(DecodedFrame {
                            raster: decoded.clone(),
                            idx,
                        });
                    }
                    idx += 1;
                }
                // The decoder buffers across packets; feed it more input
                // without advancing the index.
                Err(FfmpegError::Other { errno: EAGAIN }) | Err(FfmpegError::Eof) => {}
                Err(error) => {
                    return Err(GopSeekError::DecodeFailure {
                        reason: error.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}
