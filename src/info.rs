use crate::bmp::{self, BmpPermissiveness};
use crate::error::BitmapError;
use crate::pixel::PixelLayout;

/// Image metadata parsed from the BMP headers, without touching pixel data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Rows stored top-to-bottom (negative height on disk).
    pub top_down: bool,
    /// Offset of the first pixel row from the start of the file.
    pub data_offset: u32,
    /// File size field of the header (advisory outside strict mode).
    pub file_size: u32,
    /// Image data size field of the header (may be zero).
    pub image_size: u32,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
}

impl ImageInfo {
    /// Probe BMP headers with [`BmpPermissiveness::Standard`].
    pub fn from_bytes(data: &[u8]) -> Result<Self, BitmapError> {
        bmp::probe(data, BmpPermissiveness::Standard)
    }

    /// Bytes per stored row, including padding to a 4-byte boundary.
    pub fn row_stride(&self) -> Option<usize> {
        bmp::row_stride(self.width as usize)
    }

    /// Output buffer size needed to decode into `layout`.
    pub fn required_bytes(&self, layout: PixelLayout) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|px| px.checked_mul(layout.bytes_per_pixel()))
    }
}
