//! 24-bit uncompressed BMP decoder.
//!
//! Headers are fully validated before any output byte is written. Pixel
//! rows are read bottom-up (positive height) or top-down (negative height)
//! and emitted top-to-bottom.

use alloc::vec;

use enough::Stop;

use super::header::{
    BITS_PER_PIXEL, COMPATIBLE_INFO_HEADER_SIZES, COMPRESSION_NONE, Cursor, FILE_HEADER_SIZE,
    FileHeader, INFO_HEADER_SIZE, InfoHeader, row_stride,
};
use crate::error::BitmapError;
use crate::info::ImageInfo;
use crate::pixel::{PixelLayout, bgr_to_row};

// ── Permissiveness ──────────────────────────────────────────────────

/// Controls how strictly the BMP decoder validates input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BmpPermissiveness {
    /// Only a 40-byte BITMAPINFOHEADER. File size and image data size
    /// fields must match when non-zero, and the pixel data must start at
    /// or after byte 54.
    Strict,

    /// Default behavior. Accept any info header version that begins with a
    /// BITMAPINFOHEADER (V1 through V5) and treat the size fields as
    /// advisory. Reject planes != 1 and truncated pixel data.
    #[default]
    Standard,

    /// As `Standard`, but ignore the planes field and zero-fill pixel rows
    /// missing from a truncated file.
    Permissive,
}

/// Parse and validate the file and info headers.
pub(crate) fn parse_bmp_header(
    data: &[u8],
    permissiveness: BmpPermissiveness,
) -> Result<ImageInfo, BitmapError> {
    let is_strict = permissiveness == BmpPermissiveness::Strict;
    let is_permissive = permissiveness == BmpPermissiveness::Permissive;

    let mut cursor = Cursor::new(data);
    let file = FileHeader::parse(&mut cursor)?;
    let info = InfoHeader::parse(&mut cursor)?;

    let header_ok = if is_strict {
        info.header_size == INFO_HEADER_SIZE
    } else {
        COMPATIBLE_INFO_HEADER_SIZES.contains(&info.header_size)
    };
    if !header_ok {
        return Err(BitmapError::InvalidHeader(alloc::format!(
            "unsupported BMP info header size: {}",
            info.header_size
        )));
    }

    if info.planes != 1 {
        if !is_permissive {
            return Err(BitmapError::InvalidHeader(alloc::format!(
                "BMP planes field is {}, expected 1",
                info.planes
            )));
        }
        log::warn!("ignoring BMP planes field {}", info.planes);
    }

    if info.bits_per_pixel != BITS_PER_PIXEL {
        return Err(BitmapError::UnsupportedVariant(alloc::format!(
            "BMP bit depth {} unsupported (only 24)",
            info.bits_per_pixel
        )));
    }
    if info.compression != COMPRESSION_NONE {
        return Err(BitmapError::UnsupportedVariant(alloc::format!(
            "BMP compression {} unsupported (only uncompressed)",
            info.compression
        )));
    }

    if info.width < 0 {
        return Err(BitmapError::InvalidHeader(alloc::format!(
            "BMP width is negative ({})",
            info.width
        )));
    }
    let width = info.width as u32;
    let height = info.height.unsigned_abs();
    if width == 0 || height == 0 {
        return Err(BitmapError::InvalidDimensions { width, height });
    }

    let headers_end = FILE_HEADER_SIZE as u64 + u64::from(info.header_size);
    if u64::from(file.data_offset) < headers_end {
        return Err(BitmapError::InvalidHeader(alloc::format!(
            "BMP pixel data offset ({}) overlaps the headers ({headers_end} bytes)",
            file.data_offset
        )));
    }

    if is_strict {
        if file.file_size != 0 && file.file_size as usize != data.len() {
            return Err(BitmapError::InvalidHeader(alloc::format!(
                "BMP file size field ({}) doesn't match actual size ({})",
                file.file_size,
                data.len()
            )));
        }
        if info.image_size != 0 {
            let expected = row_stride(width as usize)
                .and_then(|s| s.checked_mul(height as usize))
                .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
            if info.image_size as usize != expected {
                return Err(BitmapError::InvalidHeader(alloc::format!(
                    "BMP image data size field ({}) doesn't match expected ({expected})",
                    info.image_size
                )));
            }
        }
    }

    log::trace!(
        "BMP header: {width}x{height}, top_down={}, data_offset={}, info_size={}",
        info.is_top_down(),
        file.data_offset,
        info.header_size
    );

    Ok(ImageInfo {
        width,
        height,
        top_down: info.is_top_down(),
        data_offset: file.data_offset,
        file_size: file.file_size,
        image_size: info.image_size,
        x_pixels_per_meter: info.x_pixels_per_meter,
        y_pixels_per_meter: info.y_pixels_per_meter,
    })
}

/// Fail with `UnexpectedEof` if `data` ends before the last pixel byte.
///
/// Permissive mode only warns; the decoder zero-fills what is missing.
pub(crate) fn check_pixel_data_len(
    data: &[u8],
    info: &ImageInfo,
    permissiveness: BmpPermissiveness,
) -> Result<(), BitmapError> {
    let too_large = || BitmapError::DimensionsTooLarge {
        width: info.width,
        height: info.height,
    };
    let stride = row_stride(info.width as usize).ok_or_else(too_large)?;
    let pixel_bytes = stride
        .checked_mul(info.height as usize)
        .ok_or_else(too_large)?;
    // The last row needs only its pixels, not its trailing padding.
    let needed_end = (info.data_offset as usize)
        .checked_add(pixel_bytes - stride + info.width as usize * 3)
        .ok_or_else(too_large)?;

    if needed_end > data.len() {
        if permissiveness != BmpPermissiveness::Permissive {
            return Err(BitmapError::UnexpectedEof);
        }
        log::warn!(
            "BMP pixel data truncated: need {needed_end} bytes, have {}; zero-filling",
            data.len()
        );
    }
    Ok(())
}

/// Decode pixel rows into `out`, which must be exactly
/// `width * height * layout.bytes_per_pixel()` bytes.
pub(crate) fn decode_bmp_pixels(
    data: &[u8],
    info: &ImageInfo,
    layout: PixelLayout,
    out: &mut [u8],
    permissiveness: BmpPermissiveness,
    stop: &dyn Stop,
) -> Result<(), BitmapError> {
    let w = info.width as usize;
    let h = info.height as usize;
    let stride = row_stride(w).ok_or(BitmapError::DimensionsTooLarge {
        width: info.width,
        height: info.height,
    })?;
    let in_row = w * 3;
    let out_row = w * layout.bytes_per_pixel();
    debug_assert_eq!(out.len(), out_row * h);

    let start = info.data_offset as usize;
    check_pixel_data_len(data, info, permissiveness)?;

    let pixel_data = data.get(start..).unwrap_or(&[]);
    let mut scratch = vec![0u8; in_row];

    for (y, dst) in out.chunks_exact_mut(out_row).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        let file_row = if info.top_down { y } else { h - 1 - y };
        let row_start = file_row * stride;
        let src = match pixel_data.get(row_start..row_start + in_row) {
            Some(src) => src,
            None => {
                let available = pixel_data.get(row_start..).unwrap_or(&[]);
                let n = available.len().min(in_row);
                scratch[..n].copy_from_slice(&available[..n]);
                scratch[n..].fill(0);
                &scratch
            }
        };
        bgr_to_row(layout, src, dst);
    }

    Ok(())
}
