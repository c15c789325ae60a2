//! 24-bit uncompressed BMP decoder and encoder (internal).
//!
//! Use [`crate::DecodeRequest`] and [`crate::EncodeRequest`], or the
//! top-level helpers.

mod decode;
mod encode;
mod header;

pub use decode::BmpPermissiveness;
pub(crate) use encode::{EncodeOptions, encode_bmp};
#[cfg(feature = "imgref")]
pub(crate) use encode::encode_rows;
pub(crate) use header::{DEFAULT_PIXELS_PER_METER, row_stride};

use crate::error::BitmapError;
use crate::info::ImageInfo;
use crate::limits::{Limits, check_limits};
use crate::pixel::PixelLayout;
use enough::Stop;

/// Parse headers only.
pub(crate) fn probe(
    data: &[u8],
    permissiveness: BmpPermissiveness,
) -> Result<ImageInfo, BitmapError> {
    decode::parse_bmp_header(data, permissiveness)
}

/// Check the pixel data is long enough before a caller allocates for it.
pub(crate) fn check_data_len(
    data: &[u8],
    info: &ImageInfo,
    permissiveness: BmpPermissiveness,
) -> Result<(), BitmapError> {
    if permissiveness == BmpPermissiveness::Permissive {
        return Ok(());
    }
    decode::check_pixel_data_len(data, info, permissiveness)
}

/// Decode into a caller-supplied buffer.
///
/// Headers, limits, output capacity and (outside permissive mode) pixel
/// data length are all checked before `out` is written. An undersized
/// `out` yields [`BitmapError::BufferTooSmall`] carrying the dimensions.
pub(crate) fn decode_into(
    data: &[u8],
    out: &mut [u8],
    layout: PixelLayout,
    limits: Option<&Limits>,
    permissiveness: BmpPermissiveness,
    stop: &dyn Stop,
) -> Result<ImageInfo, BitmapError> {
    let info = decode::parse_bmp_header(data, permissiveness)?;
    let needed = required_bytes(&info, layout)?;
    check_limits(limits, info.width, info.height, needed)?;
    if out.len() < needed {
        return Err(BitmapError::BufferTooSmall {
            needed,
            actual: out.len(),
            width: info.width,
            height: info.height,
        });
    }
    stop.check()?;
    decode::decode_bmp_pixels(
        data,
        &info,
        layout,
        &mut out[..needed],
        permissiveness,
        stop,
    )?;
    Ok(info)
}

pub(crate) fn required_bytes(info: &ImageInfo, layout: PixelLayout) -> Result<usize, BitmapError> {
    info.required_bytes(layout)
        .ok_or(BitmapError::DimensionsTooLarge {
            width: info.width,
            height: info.height,
        })
}
