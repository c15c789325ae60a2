//! BMP encoder: uncompressed 24-bit BITMAPINFOHEADER.

use alloc::vec::Vec;
use enough::Stop;

use super::header::{
    BITS_PER_PIXEL, COMPRESSION_NONE, FileHeader, INFO_HEADER_SIZE, InfoHeader,
    PIXEL_DATA_OFFSET, row_stride,
};
use crate::error::BitmapError;
use crate::limits::{Limits, check_limits};
use crate::pixel::{PixelLayout, row_to_bgr};

/// Header fields the caller may choose.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EncodeOptions {
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub top_down: bool,
}

/// Sizes derived from validated dimensions.
struct Geometry {
    row_stride: usize,
    pixel_data_size: usize,
    file_size: usize,
}

fn geometry(width: u32, height: u32) -> Result<Geometry, BitmapError> {
    if width == 0 || height == 0 {
        return Err(BitmapError::InvalidDimensions { width, height });
    }
    let too_large = || BitmapError::DimensionsTooLarge { width, height };
    // Both land in signed 32-bit header fields.
    if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
        return Err(too_large());
    }
    let row_stride = row_stride(width as usize).ok_or_else(too_large)?;
    let pixel_data_size = row_stride
        .checked_mul(height as usize)
        .ok_or_else(too_large)?;
    let file_size = pixel_data_size
        .checked_add(PIXEL_DATA_OFFSET as usize)
        .ok_or_else(too_large)?;
    if u32::try_from(file_size).is_err() {
        return Err(too_large());
    }
    Ok(Geometry {
        row_stride,
        pixel_data_size,
        file_size,
    })
}

/// Encode a contiguous `layout` buffer of exactly `width * height` pixels.
pub(crate) fn encode_bmp(
    pixels: &[u8],
    width: u32,
    height: u32,
    layout: PixelLayout,
    options: EncodeOptions,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Vec<u8>, BitmapError> {
    if width == 0 || height == 0 {
        return Err(BitmapError::InvalidDimensions { width, height });
    }
    let row_bytes = (width as usize)
        .checked_mul(layout.bytes_per_pixel())
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
    let expected = row_bytes
        .checked_mul(height as usize)
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
    if pixels.len() != expected {
        return Err(BitmapError::InputSizeMismatch {
            expected,
            actual: pixels.len(),
        });
    }

    encode_rows(width, height, layout, options, limits, stop, |y| {
        &pixels[y * row_bytes..(y + 1) * row_bytes]
    })
}

/// Encode an image whose rows are supplied by `row_at(y)`, top row first.
///
/// Each row must be `width * layout.bytes_per_pixel()` bytes.
pub(crate) fn encode_rows<'a, F>(
    width: u32,
    height: u32,
    layout: PixelLayout,
    options: EncodeOptions,
    limits: Option<&Limits>,
    stop: &dyn Stop,
    row_at: F,
) -> Result<Vec<u8>, BitmapError>
where
    F: Fn(usize) -> &'a [u8],
{
    let geo = geometry(width, height)?;
    check_limits(limits, width, height, geo.file_size)?;
    stop.check()?;

    let mut out = Vec::with_capacity(geo.file_size);
    write_bmp_header(&mut out, &geo, width, height, options);

    let w = width as usize;
    let h = height as usize;
    let emit_row = |out: &mut Vec<u8>, y: usize| {
        let start = out.len();
        // Zero-filled, so the padding tail is already written.
        out.resize(start + geo.row_stride, 0);
        row_to_bgr(layout, row_at(y), &mut out[start..start + w * 3]);
    };

    if options.top_down {
        for y in 0..h {
            if y % 16 == 0 {
                stop.check()?;
            }
            emit_row(&mut out, y);
        }
    } else {
        for (i, y) in (0..h).rev().enumerate() {
            if i % 16 == 0 {
                stop.check()?;
            }
            emit_row(&mut out, y);
        }
    }

    debug_assert_eq!(out.len(), geo.file_size);
    log::trace!(
        "encoded {width}x{height} BMP: stride {}, {} bytes",
        geo.row_stride,
        geo.file_size
    );
    Ok(out)
}

fn write_bmp_header(
    out: &mut Vec<u8>,
    geo: &Geometry,
    width: u32,
    height: u32,
    options: EncodeOptions,
) {
    // Both fit: checked by geometry().
    let height = height as i32;
    FileHeader {
        file_size: geo.file_size as u32,
        reserved: [0, 0],
        data_offset: PIXEL_DATA_OFFSET,
    }
    .write_to(out);
    InfoHeader {
        header_size: INFO_HEADER_SIZE,
        width: width as i32,
        height: if options.top_down { -height } else { height },
        planes: 1,
        bits_per_pixel: BITS_PER_PIXEL,
        compression: COMPRESSION_NONE,
        image_size: geo.pixel_data_size as u32,
        x_pixels_per_meter: options.x_pixels_per_meter,
        y_pixels_per_meter: options.y_pixels_per_meter,
        colors_used: 0,
        colors_important: 0,
    }
    .write_to(out);
}
