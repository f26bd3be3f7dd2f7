//! Demuxer construction shared by the indexer and the decoder.
//!
//! The safe `ffmpeg_next::format::input` helper folds `avformat_open_input`
//! and `avformat_find_stream_info` into one call, which makes the two failure
//! modes indistinguishable. The open is performed through the C API instead,
//! so open errors and probe errors keep their own kinds; the raw context is
//! then handed to the safe [`Input`] owner, whose `Drop` closes it.

use std::ffi::CString;
use std::path::Path;
use std::ptr;

use ffmpeg_next::{codec, format::context::Input, media::Type, Error as FfmpegError, Rational};
use ffmpeg_sys_next::{
    avformat_close_input, avformat_find_stream_info, avformat_open_input, AVFormatContext,
};

use crate::error::GopSeekError;

/// Open `path` and probe its streams.
pub(crate) fn open_and_probe(path: &Path) -> Result<Input, GopSeekError> {
    // Idempotent; registers codecs and protocols on first use.
    ffmpeg_next::init().map_err(|error| GopSeekError::OpenFailure {
        path: path.to_path_buf(),
        reason: format!("FFmpeg initialisation failed: {error}"),
    })?;

    let c_path =
        CString::new(path.to_string_lossy().as_bytes()).map_err(|_| GopSeekError::OpenFailure {
            path: path.to_path_buf(),
            reason: "path contains an interior NUL byte".to_string(),
        })?;

    // SAFETY: `avformat_open_input` leaves `context` NULL on failure, so
    // there is nothing to free on the open-error path. After a probe failure
    // the context is closed here; on success ownership moves into `Input`.
    unsafe {
        let mut context: *mut AVFormatContext = ptr::null_mut();
        let status = avformat_open_input(
            &mut context,
            c_path.as_ptr(),
            ptr::null(),
            ptr::null_mut(),
        );
        if status < 0 {
            return Err(GopSeekError::OpenFailure {
                path: path.to_path_buf(),
                reason: FfmpegError::from(status).to_string(),
            });
        }

        let status = avformat_find_stream_info(context, ptr::null_mut());
        if status < 0 {
            avformat_close_input(&mut context);
            return Err(GopSeekError::ProbeFailure {
                reason: FfmpegError::from(status).to_string(),
            });
        }

        Ok(Input::wrap(context))
    }
}

/// Select the first video stream and verify it is H.264.
///
/// Returns the stream's index and time base. The time base is not used by
/// the scan itself but is kept available for callers.
pub(crate) fn select_h264_stream(input: &Input) -> Result<(usize, Rational), GopSeekError> {
    let stream = input
        .streams()
        .find(|stream| stream.parameters().medium() == Type::Video)
        .ok_or(GopSeekError::NoVideoStream)?;

    let codec_id = stream.parameters().id();
    if codec_id != codec::Id::H264 {
        return Err(GopSeekError::UnsupportedCodec {
            codec: format!("{codec_id:?}"),
        });
    }

    Ok((stream.index(), stream.time_base()))
}
