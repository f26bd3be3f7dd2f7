//! RGB interop for decoded frames.
//!
//! The decode pipeline hands back frames in whatever pixel format the stream
//! carries (typically YUV 4:2:0). Callers that want to inspect or persist
//! them as ordinary images can convert here; the conversion runs outside the
//! decode loop and never feeds back into it.

use ffmpeg_next::{
    format::Pixel,
    frame::Video as RasterFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage};

use crate::decoder::DecodedFrame;
use crate::error::GopSeekError;

impl DecodedFrame {
    /// Convert this frame's raster to an RGB8 [`DynamicImage`].
    ///
    /// # Errors
    ///
    /// Returns [`GopSeekError::ConversionFailure`] if the scaler cannot be
    /// built for the frame's pixel format or the conversion fails.
    pub fn to_rgb_image(&self) -> Result<DynamicImage, GopSeekError> {
        to_rgb_image(&self.raster)
    }
}

/// Convert a decoded frame to RGB8 at its native dimensions.
pub fn to_rgb_image(frame: &RasterFrame) -> Result<DynamicImage, GopSeekError> {
    let width = frame.width();
    let height = frame.height();

    let mut scaler = ScalingContext::get(
        frame.format(),
        width,
        height,
        Pixel::RGB24,
        width,
        height,
        ScalingFlags::BILINEAR,
    )
    .map_err(|error| conversion_failure(&error.to_string()))?;

    let mut rgb_frame = RasterFrame::empty();
    scaler
        .run(frame, &mut rgb_frame)
        .map_err(|error| conversion_failure(&error.to_string()))?;

    let buffer = packed_rgb_rows(&rgb_frame, width, height);
    let image = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| conversion_failure("raster dimensions do not match the copied buffer"))?;

    Ok(DynamicImage::ImageRgb8(image))
}

/// Strip per-row stride padding into a tightly packed RGB24 buffer.
///
/// FFmpeg frames frequently carry padding at the end of each row
/// (stride > width * 3); `image` buffers must not.
fn packed_rgb_rows(frame: &RasterFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = frame.stride(0);
    let row_bytes = width as usize * 3;
    let data = frame.data(0);

    if stride == row_bytes {
        return data[..row_bytes * height as usize].to_vec();
    }

    let mut buffer = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        buffer.extend_from_slice(&data[start..start + row_bytes]);
    }
    buffer
}

fn conversion_failure(reason: &str) -> GopSeekError {
    GopSeekError::ConversionFailure {
        reason: reason.to_string(),
    }
}
