use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;

#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use crate::bmp::{self, BmpPermissiveness};
use crate::error::BitmapError;
use crate::info::ImageInfo;
use crate::limits::Limits;
use crate::pixel::PixelLayout;

/// Builder for BMP decoding.
///
/// Defaults: RGBA output, [`BmpPermissiveness::Standard`], no limits.
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
    permissiveness: BmpPermissiveness,
    layout: PixelLayout,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limits: None,
            permissiveness: BmpPermissiveness::default(),
            layout: PixelLayout::default(),
        }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn with_permissiveness(mut self, permissiveness: BmpPermissiveness) -> Self {
        self.permissiveness = permissiveness;
        self
    }

    /// Output pixel layout. 4-channel layouts get alpha = 255.
    pub fn with_layout(mut self, layout: PixelLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Parse and validate the headers only.
    pub fn info(&self) -> Result<ImageInfo, BitmapError> {
        bmp::probe(self.data, self.permissiveness)
    }

    /// Decode into a caller-allocated buffer.
    ///
    /// `out` must hold at least `width * height * layout.bytes_per_pixel()`
    /// bytes; only that prefix is written. If it is smaller, returns
    /// [`BitmapError::BufferTooSmall`] with the image dimensions and leaves
    /// `out` untouched, so the caller can size a buffer and retry.
    pub fn decode_into(&self, out: &mut [u8], stop: impl Stop) -> Result<ImageInfo, BitmapError> {
        bmp::decode_into(
            self.data,
            out,
            self.layout,
            self.limits,
            self.permissiveness,
            &stop,
        )
    }

    /// Decode into a newly allocated buffer of exactly the required size.
    pub fn decode(&self, stop: impl Stop) -> Result<DecodeOutput, BitmapError> {
        let info = self.info()?;
        let needed = bmp::required_bytes(&info, self.layout)?;
        // Limits are checked again inside decode_into; this guards the allocation.
        if let Some(limits) = self.limits {
            limits.check(info.width, info.height)?;
            limits.check_memory(needed)?;
        }
        bmp::check_data_len(self.data, &info, self.permissiveness)?;
        let mut pixels = vec![0u8; needed];
        let info = self.decode_into(&mut pixels, stop)?;
        Ok(DecodeOutput {
            pixels,
            width: info.width,
            height: info.height,
            layout: self.layout,
            info,
        })
    }
}

/// Decoded image with owned pixel data.
#[derive(Clone, Debug)]
pub struct DecodeOutput {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    pub info: ImageInfo,
}

impl DecodeOutput {
    /// Access the pixel data, row-major, top row first.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take ownership of the pixel data.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Reinterpret pixel data as typed pixel slice.
    ///
    /// Returns [`BitmapError::UnsupportedVariant`] if the pixel layout doesn't match `P`.
    #[cfg(feature = "rgb")]
    pub fn as_pixels<P: crate::DecodePixel>(&self) -> Result<&[P], BitmapError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        if self.layout != P::layout() {
            return Err(BitmapError::UnsupportedVariant(alloc::format!(
                "pixel layout is {:?}, requested {:?}",
                self.layout,
                P::layout()
            )));
        }
        Ok(self.pixels().as_pixels())
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of typed pixels.
    #[cfg(feature = "imgref")]
    pub fn as_imgref<P: crate::DecodePixel>(&self) -> Result<imgref::ImgRef<'_, P>, BitmapError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgRef::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Convert to an [`imgref::ImgVec`] of typed pixels.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec<P: crate::DecodePixel>(&self) -> Result<imgref::ImgVec<P>, BitmapError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgVec::new(
            pixels.to_vec(),
            self.width as usize,
            self.height as usize,
        ))
    }
}

/// Decode BMP data to RGBA with default settings.
pub fn decode_bmp(data: &[u8], stop: impl Stop) -> Result<DecodeOutput, BitmapError> {
    DecodeRequest::new(data).decode(stop)
}

/// Decode BMP data to RGBA into a caller-allocated buffer.
pub fn decode_bmp_into(
    data: &[u8],
    out: &mut [u8],
    stop: impl Stop,
) -> Result<ImageInfo, BitmapError> {
    DecodeRequest::new(data).decode_into(out, stop)
}
