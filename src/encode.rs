use alloc::vec::Vec;

use enough::Stop;

use crate::bmp::{self, DEFAULT_PIXELS_PER_METER, EncodeOptions};
use crate::error::BitmapError;
use crate::limits::Limits;
use crate::pixel::PixelLayout;

/// Builder for BMP encoding.
///
/// Defaults: bottom-up rows (positive height), 2835 pixels per metre
/// (72 DPI) in both directions, no limits.
#[derive(Clone, Debug)]
pub struct EncodeRequest<'a> {
    options: EncodeOptions,
    limits: Option<&'a Limits>,
}

impl Default for EncodeRequest<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> EncodeRequest<'a> {
    pub fn new() -> Self {
        Self {
            options: EncodeOptions {
                x_pixels_per_meter: DEFAULT_PIXELS_PER_METER as i32,
                y_pixels_per_meter: DEFAULT_PIXELS_PER_METER as i32,
                top_down: false,
            },
            limits: None,
        }
    }

    /// Resolution fields, in pixels per metre. Zero is valid.
    pub fn with_resolution(mut self, x_pixels_per_meter: i32, y_pixels_per_meter: i32) -> Self {
        self.options.x_pixels_per_meter = x_pixels_per_meter;
        self.options.y_pixels_per_meter = y_pixels_per_meter;
        self
    }

    /// Store rows top-to-bottom with a negative height field.
    pub fn top_down(mut self, top_down: bool) -> Self {
        self.options.top_down = top_down;
        self
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Encode `width * height` pixels of `layout` into a complete BMP file.
    ///
    /// `pixels.len()` must equal `width * height * layout.bytes_per_pixel()`.
    /// Alpha, if present, is dropped.
    pub fn encode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        layout: PixelLayout,
        stop: impl Stop,
    ) -> Result<Vec<u8>, BitmapError> {
        bmp::encode_bmp(
            pixels,
            width,
            height,
            layout,
            self.options,
            self.limits,
            &stop,
        )
    }

    /// Encode typed pixels.
    #[cfg(feature = "rgb")]
    pub fn encode_pixels<P: crate::DecodePixel>(
        &self,
        pixels: &[P],
        width: u32,
        height: u32,
        stop: impl Stop,
    ) -> Result<Vec<u8>, BitmapError>
    where
        [P]: rgb::ComponentBytes<u8>,
    {
        use rgb::ComponentBytes as _;
        self.encode(pixels.as_bytes(), width, height, P::layout(), stop)
    }

    /// Encode an [`imgref::ImgRef`], honouring its stride.
    #[cfg(feature = "imgref")]
    pub fn encode_imgref<P: crate::DecodePixel>(
        &self,
        img: imgref::ImgRef<'_, P>,
        stop: impl Stop,
    ) -> Result<Vec<u8>, BitmapError>
    where
        [P]: rgb::ComponentBytes<u8>,
    {
        use rgb::ComponentBytes as _;
        let too_large = || BitmapError::DimensionsTooLarge {
            width: u32::try_from(img.width()).unwrap_or(u32::MAX),
            height: u32::try_from(img.height()).unwrap_or(u32::MAX),
        };
        let width = u32::try_from(img.width()).map_err(|_| too_large())?;
        let height = u32::try_from(img.height()).map_err(|_| too_large())?;
        let w = img.width();
        let stride = img.stride();
        let buf: &[P] = img.buf();
        bmp::encode_rows(
            width,
            height,
            P::layout(),
            self.options,
            self.limits,
            &stop,
            |y| buf[y * stride..y * stride + w].as_bytes(),
        )
    }
}

/// Encode with default settings.
pub fn encode_bmp(
    pixels: &[u8],
    width: u32,
    height: u32,
    layout: PixelLayout,
    stop: impl Stop,
) -> Result<Vec<u8>, BitmapError> {
    EncodeRequest::new().encode(pixels, width, height, layout, stop)
}

/// Encode a row-major RGBA matrix with default settings.
pub fn encode_rgba(
    pixels: &[u8],
    width: u32,
    height: u32,
    stop: impl Stop,
) -> Result<Vec<u8>, BitmapError> {
    encode_bmp(pixels, width, height, PixelLayout::Rgba8, stop)
}
