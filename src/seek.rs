//! Interval-start seeking.
//!
//! Interval starts are addressed two ways: by frame index for AVCC
//! containers (MP4-like formats keep a sample index, so `AVSEEK_FLAG_FRAME`
//! resolves it) and by byte offset for raw Annex B streams (no index exists,
//! so the packet position captured during the scan is the only reliable
//! entry point). The safe `Input::seek` wrapper only does timestamp seeks,
//! so both paths call `av_seek_frame` through `ffmpeg-sys-next` directly.
//!
//! Neither path verifies that the landed packet is the intended keyframe; a
//! demuxer that lands early just costs extra decoded-and-discarded packets.

use std::os::raw::c_int;

use ffmpeg_next::{format::context::Input, Error as FfmpegError};
use ffmpeg_sys_next::av_seek_frame;

use crate::error::GopSeekError;

// Flag values from libavformat/avformat.h; the safe wrapper does not expose
// them.
const AVSEEK_FLAG_BACKWARD: c_int = 1;
const AVSEEK_FLAG_BYTE: c_int = 2;
const AVSEEK_FLAG_FRAME: c_int = 8;

/// Seek to the keyframe at or before `frame_idx`, addressing by frame index.
pub(crate) fn to_frame(
    input: &mut Input,
    stream_index: usize,
    frame_idx: u64,
) -> Result<(), GopSeekError> {
    // SAFETY: the context pointer comes from a live `Input` borrow and is not
    // retained past the call.
    let status = unsafe {
        av_seek_frame(
            input.as_mut_ptr(),
            stream_index as c_int,
            frame_idx as i64,
            AVSEEK_FLAG_FRAME | AVSEEK_FLAG_BACKWARD,
        )
    };
    check(status)
}

/// Move the read pointer to an absolute byte offset.
pub(crate) fn to_byte(
    input: &mut Input,
    stream_index: usize,
    byte_offset: i64,
) -> Result<(), GopSeekError> {
    // SAFETY: as above.
    let status = unsafe {
        av_seek_frame(
            input.as_mut_ptr(),
            stream_index as c_int,
            byte_offset,
            AVSEEK_FLAG_BYTE,
        )
    };
    check(status)
}

fn check(status: c_int) -> Result<(), GopSeekError> {
    if status < 0 {
        return Err(GopSeekError::SeekFailure {
            reason: FfmpegError::from(status).to_string(),
        });
    }
    Ok(())
}
