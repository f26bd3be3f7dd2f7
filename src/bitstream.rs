//! RAII wrapper around FFmpeg's `h264_mp4toannexb` bitstream filter.
//!
//! AVCC-framed packets carry length-prefixed NAL units with the parameter
//! sets held in container metadata; the decoder in this crate consumes
//! Annex B start-code framing, so every AVCC packet is rewritten on the fly.
//! `ffmpeg-next` has no bitstream-filter support, so the `av_bsf_*` C API is
//! called through `ffmpeg-sys-next` and wrapped in an owner whose `Drop`
//! releases the filter context on every exit path.

use std::ffi::CString;
use std::ptr;

use ffmpeg_next::{util::error::EAGAIN, Error as FfmpegError, Packet, Stream};
use ffmpeg_sys_next::{
    av_bsf_alloc, av_bsf_free, av_bsf_get_by_name, av_bsf_init, av_bsf_receive_packet,
    av_bsf_send_packet, avcodec_parameters_copy, AVBSFContext, AVRational,
};

use crate::error::GopSeekError;

/// Outcome of polling the filter for a rewritten packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FilterPoll {
    /// The packet now holds a rewritten Annex B payload.
    Delivered,
    /// The filter needs more input before it can produce output.
    Again,
}

/// An initialized `h264_mp4toannexb` filter bound to one video stream.
pub(crate) struct BitstreamFilter {
    context: *mut AVBSFContext,
}

impl BitstreamFilter {
    /// Resolve, allocate, and initialize the filter for `stream`.
    ///
    /// The filter's input parameters are copied from the stream's codec
    /// parameters and its input time base is the stream's, matching what the
    /// downstream decoder expects.
    pub(crate) fn mp4_to_annexb(stream: &Stream<'_>) -> Result<Self, GopSeekError> {
        let name = CString::new("h264_mp4toannexb")
            .map_err(|_| init_failure("invalid filter name"))?;

        // SAFETY: `context` is wrapped in the RAII owner immediately after
        // allocation, so every later failure path frees it via `Drop`. The
        // stream's codec parameters stay valid while `stream` borrows the
        // open input.
        unsafe {
            let descriptor = av_bsf_get_by_name(name.as_ptr());
            if descriptor.is_null() {
                return Err(init_failure(
                    "h264_mp4toannexb is not present in this FFmpeg build",
                ));
            }

            let mut context: *mut AVBSFContext = ptr::null_mut();
            let status = av_bsf_alloc(descriptor, &mut context);
            if status < 0 {
                return Err(init_failure(&FfmpegError::from(status).to_string()));
            }
            let filter = Self { context };

            let status = avcodec_parameters_copy((*context).par_in, stream.parameters().as_ptr());
            if status < 0 {
                return Err(init_failure(&format!(
                    "copying codec parameters: {}",
                    FfmpegError::from(status)
                )));
            }

            let time_base = stream.time_base();
            (*context).time_base_in = AVRational {
                num: time_base.numerator(),
                den: time_base.denominator(),
            };

            let status = av_bsf_init(context);
            if status < 0 {
                return Err(init_failure(&FfmpegError::from(status).to_string()));
            }

            Ok(filter)
        }
    }

    /// Hand `packet` to the filter.
    ///
    /// The payload is moved into the filter; the packet itself is left blank
    /// until the next [`receive`](Self::receive) or read refills it.
    pub(crate) fn send(&mut self, packet: &mut Packet) -> Result<(), GopSeekError> {
        // SAFETY: both pointers are live for the duration of the call.
        let status = unsafe { av_bsf_send_packet(self.context, packet.as_mut_ptr()) };
        if status < 0 {
            return Err(GopSeekError::FilterFailure {
                reason: format!("send: {}", FfmpegError::from(status)),
            });
        }
        Ok(())
    }

    /// Poll the filter for a rewritten packet, written into `packet`.
    pub(crate) fn receive(&mut self, packet: &mut Packet) -> Result<FilterPoll, GopSeekError> {
        // SAFETY: both pointers are live for the duration of the call.
        let status = unsafe { av_bsf_receive_packet(self.context, packet.as_mut_ptr()) };
        if status == 0 {
            return Ok(FilterPoll::Delivered);
        }

        match FfmpegError::from(status) {
            FfmpegError::Other { errno: EAGAIN } => Ok(FilterPoll::Again),
            error => Err(GopSeekError::FilterFailure {
                reason: format!("receive: {error}"),
            }),
        }
    }
}

impl Drop for BitstreamFilter {
    fn drop(&mut self) {
        // SAFETY: `av_bsf_free` accepts NULL and NULLs the pointer, so the
        // release is idempotent even after a half-finished construction.
        unsafe { av_bsf_free(&mut self.context) };
    }
}

fn init_failure(reason: &str) -> GopSeekError {
    GopSeekError::BitstreamFilterInitFailure {
        reason: reason.to_string(),
    }
}
