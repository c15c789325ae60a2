//! BMP file header and BITMAPINFOHEADER field codecs.
//!
//! Every multi-byte field is little-endian on disk regardless of host.

use alloc::vec::Vec;

use crate::error::BitmapError;

/// Size of the `BM` file header.
pub(crate) const FILE_HEADER_SIZE: usize = 14;
/// Size of BITMAPINFOHEADER.
pub(crate) const INFO_HEADER_SIZE: u32 = 40;
/// Pixel data offset written by the encoder.
pub(crate) const PIXEL_DATA_OFFSET: u32 = FILE_HEADER_SIZE as u32 + INFO_HEADER_SIZE;
/// 72 DPI expressed in pixels per metre.
pub(crate) const DEFAULT_PIXELS_PER_METER: u32 = 2835;
/// The only bit depth this codec reads or writes.
pub(crate) const BITS_PER_PIXEL: u16 = 24;
/// BI_RGB.
pub(crate) const COMPRESSION_NONE: u32 = 0;

/// Info header sizes whose first 40 bytes are a BITMAPINFOHEADER
/// (V1, V2, V3, V4, V5).
pub(crate) const COMPATIBLE_INFO_HEADER_SIZES: [u32; 5] = [40, 52, 56, 108, 124];

/// Bytes per stored row: `width * 3` rounded up to a multiple of 4.
pub(crate) fn row_stride(width: usize) -> Option<usize> {
    width
        .checked_mul(3)
        .and_then(|r| r.checked_add(3))
        .map(|r| r & !3)
}

// ── Cursor for reading from &[u8] ───────────────────────────────────

pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N], BitmapError> {
        let end = self.pos.checked_add(N).ok_or(BitmapError::UnexpectedEof)?;
        let bytes = self
            .data
            .get(self.pos..end)
            .ok_or(BitmapError::UnexpectedEof)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(bytes);
        self.pos = end;
        Ok(buf)
    }

    pub(crate) fn get_u16_le(&mut self) -> Result<u16, BitmapError> {
        self.read_fixed_bytes().map(u16::from_le_bytes)
    }

    pub(crate) fn get_u32_le(&mut self) -> Result<u32, BitmapError> {
        self.read_fixed_bytes().map(u32::from_le_bytes)
    }

    pub(crate) fn get_i32_le(&mut self) -> Result<i32, BitmapError> {
        self.read_fixed_bytes().map(i32::from_le_bytes)
    }

    pub(crate) fn get_signature(&mut self) -> Result<[u8; 2], BitmapError> {
        self.read_fixed_bytes()
    }
}

// ── File header ─────────────────────────────────────────────────────

/// The 14-byte file header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FileHeader {
    pub file_size: u32,
    pub reserved: [u16; 2],
    pub data_offset: u32,
}

impl FileHeader {
    pub(crate) fn parse(cursor: &mut Cursor<'_>) -> Result<Self, BitmapError> {
        if cursor.get_signature()? != *b"BM" {
            return Err(BitmapError::UnrecognizedFormat);
        }
        let file_size = cursor.get_u32_le()?;
        let reserved = [cursor.get_u16_le()?, cursor.get_u16_le()?];
        let data_offset = cursor.get_u32_le()?;
        Ok(Self {
            file_size,
            reserved,
            data_offset,
        })
    }

    pub(crate) fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&self.file_size.to_le_bytes());
        out.extend_from_slice(&self.reserved[0].to_le_bytes());
        out.extend_from_slice(&self.reserved[1].to_le_bytes());
        out.extend_from_slice(&self.data_offset.to_le_bytes());
    }
}

// ── Info header ─────────────────────────────────────────────────────

/// The BITMAPINFOHEADER fields. Later header versions are read through
/// this same 40-byte prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct InfoHeader {
    pub header_size: u32,
    pub width: i32,
    /// Positive = bottom-up rows, negative = top-down.
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

impl InfoHeader {
    pub(crate) fn parse(cursor: &mut Cursor<'_>) -> Result<Self, BitmapError> {
        Ok(Self {
            header_size: cursor.get_u32_le()?,
            width: cursor.get_i32_le()?,
            height: cursor.get_i32_le()?,
            planes: cursor.get_u16_le()?,
            bits_per_pixel: cursor.get_u16_le()?,
            compression: cursor.get_u32_le()?,
            image_size: cursor.get_u32_le()?,
            x_pixels_per_meter: cursor.get_i32_le()?,
            y_pixels_per_meter: cursor.get_i32_le()?,
            colors_used: cursor.get_u32_le()?,
            colors_important: cursor.get_u32_le()?,
        })
    }

    pub(crate) fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.header_size.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&self.planes.to_le_bytes());
        out.extend_from_slice(&self.bits_per_pixel.to_le_bytes());
        out.extend_from_slice(&self.compression.to_le_bytes());
        out.extend_from_slice(&self.image_size.to_le_bytes());
        out.extend_from_slice(&self.x_pixels_per_meter.to_le_bytes());
        out.extend_from_slice(&self.y_pixels_per_meter.to_le_bytes());
        out.extend_from_slice(&self.colors_used.to_le_bytes());
        out.extend_from_slice(&self.colors_important.to_le_bytes());
    }

    pub(crate) fn is_top_down(&self) -> bool {
        self.height < 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_info() -> InfoHeader {
        InfoHeader {
            header_size: 40,
            width: 3,
            height: -2,
            planes: 1,
            bits_per_pixel: 24,
            compression: 0,
            image_size: 24,
            x_pixels_per_meter: 2835,
            y_pixels_per_meter: 2835,
            colors_used: 0,
            colors_important: 0,
        }
    }

    #[test]
    fn stride_rounds_to_four() {
        assert_eq!(row_stride(1), Some(4));
        assert_eq!(row_stride(2), Some(8));
        assert_eq!(row_stride(3), Some(12));
        assert_eq!(row_stride(4), Some(12));
        assert_eq!(row_stride(5), Some(16));
        assert_eq!(row_stride(usize::MAX), None);
    }

    #[test]
    fn file_header_byte_layout() {
        let header = FileHeader {
            file_size: 0x0102_0304,
            reserved: [0, 0],
            data_offset: 54,
        };
        let mut out = Vec::new();
        header.write_to(&mut out);
        assert_eq!(
            out,
            [b'B', b'M', 0x04, 0x03, 0x02, 0x01, 0, 0, 0, 0, 54, 0, 0, 0]
        );
        let parsed = FileHeader::parse(&mut Cursor::new(&out)).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn info_header_byte_layout() {
        let info = sample_info();
        let mut out = Vec::new();
        info.write_to(&mut out);
        assert_eq!(out.len(), INFO_HEADER_SIZE as usize);
        assert_eq!(&out[0..4], &40u32.to_le_bytes());
        assert_eq!(&out[4..8], &3i32.to_le_bytes());
        // Negative height is two's complement little-endian.
        assert_eq!(&out[8..12], &[0xFE, 0xFF, 0xFF, 0xFF]);
        assert_eq!(&out[12..14], &[1, 0]);
        assert_eq!(&out[14..16], &[24, 0]);
        assert_eq!(&out[24..28], &2835u32.to_le_bytes());

        let parsed = InfoHeader::parse(&mut Cursor::new(&out)).unwrap();
        assert_eq!(parsed, info);
        assert!(parsed.is_top_down());
    }

    #[test]
    fn bad_signature_is_unrecognized() {
        let data = *b"PM\0\0\0\0\0\0\0\0\0\0\0\0";
        assert!(matches!(
            FileHeader::parse(&mut Cursor::new(&data)),
            Err(BitmapError::UnrecognizedFormat)
        ));
    }

    #[test]
    fn truncated_header_is_eof() {
        assert!(matches!(
            FileHeader::parse(&mut Cursor::new(b"BM\x01")),
            Err(BitmapError::UnexpectedEof)
        ));
        let mut out = Vec::new();
        sample_info().write_to(&mut out);
        out.truncate(39);
        assert!(matches!(
            InfoHeader::parse(&mut Cursor::new(&out)),
            Err(BitmapError::UnexpectedEof)
        ));
    }
}
