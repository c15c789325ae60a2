/// Pixel memory layout of a caller-side buffer.
///
/// BMP stores 24-bit pixels as B, G, R. Every layout here converts to and
/// from that on-disk order; 4-channel layouts gain an opaque alpha on
/// decode because the format carries none.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// 4 channels, 8-bit RGBA. The row-major "RGBA matrix".
    #[default]
    Rgba8,
    /// 4 channels, 8-bit BGRA.
    Bgra8,
    /// 3 channels, 8-bit RGB.
    Rgb8,
    /// 3 channels, 8-bit BGR (BMP's native order).
    Bgr8,
}

impl PixelLayout {
    /// Bytes per pixel for this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Rgb8 | Self::Bgr8 => 3,
            Self::Rgba8 | Self::Bgra8 => 4,
        }
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.bytes_per_pixel()
    }

    /// Whether the layout has an alpha channel.
    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::Rgba8 | Self::Bgra8)
    }
}

/// Typed pixels with a fixed [`PixelLayout`].
#[cfg(feature = "rgb")]
pub trait DecodePixel: Copy + 'static {
    fn layout() -> PixelLayout;
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::RGBA8 {
    fn layout() -> PixelLayout {
        PixelLayout::Rgba8
    }
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::alt::BGRA8 {
    fn layout() -> PixelLayout {
        PixelLayout::Bgra8
    }
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::RGB8 {
    fn layout() -> PixelLayout {
        PixelLayout::Rgb8
    }
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::alt::BGR8 {
    fn layout() -> PixelLayout {
        PixelLayout::Bgr8
    }
}

/// Convert one row of `layout` pixels into BMP's BGR byte order.
///
/// `src` holds `n * layout.bytes_per_pixel()` bytes, `dst` holds `n * 3`.
/// Alpha is dropped.
pub(crate) fn row_to_bgr(layout: PixelLayout, src: &[u8], dst: &mut [u8]) {
    #[cfg(feature = "simd")]
    {
        // garb rejects empty or misaligned rows; the scalar path handles those.
        let done = match layout {
            PixelLayout::Rgba8 => garb::bytes::rgba_to_bgr(src, dst).is_ok(),
            PixelLayout::Bgra8 => garb::bytes::bgra_to_bgr(src, dst).is_ok(),
            PixelLayout::Rgb8 => garb::bytes::rgb_to_bgr(src, dst).is_ok(),
            PixelLayout::Bgr8 => false,
        };
        if done {
            return;
        }
    }

    match layout {
        PixelLayout::Bgr8 => dst.copy_from_slice(src),
        PixelLayout::Rgb8 => {
            for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(3)) {
                d[0] = s[2];
                d[1] = s[1];
                d[2] = s[0];
            }
        }
        PixelLayout::Rgba8 => {
            for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(3)) {
                d[0] = s[2];
                d[1] = s[1];
                d[2] = s[0];
            }
        }
        PixelLayout::Bgra8 => {
            for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(3)) {
                d.copy_from_slice(&s[..3]);
            }
        }
    }
}

/// Convert one row of BMP BGR bytes into `layout` pixels.
///
/// `src` holds `n * 3` bytes, `dst` holds `n * layout.bytes_per_pixel()`.
/// 4-channel targets get alpha = 255.
pub(crate) fn bgr_to_row(layout: PixelLayout, src: &[u8], dst: &mut [u8]) {
    #[cfg(feature = "simd")]
    {
        let done = match layout {
            PixelLayout::Rgba8 => garb::bytes::bgr_to_rgba(src, dst).is_ok(),
            PixelLayout::Bgra8 => garb::bytes::bgr_to_bgra(src, dst).is_ok(),
            PixelLayout::Rgb8 => garb::bytes::bgr_to_rgb(src, dst).is_ok(),
            PixelLayout::Bgr8 => false,
        };
        if done {
            return;
        }
    }

    match layout {
        PixelLayout::Bgr8 => dst.copy_from_slice(src),
        PixelLayout::Rgb8 => {
            for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(3)) {
                d[0] = s[2];
                d[1] = s[1];
                d[2] = s[0];
            }
        }
        PixelLayout::Rgba8 => {
            for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(4)) {
                d[0] = s[2];
                d[1] = s[1];
                d[2] = s[0];
                d[3] = 255;
            }
        }
        PixelLayout::Bgra8 => {
            for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(4)) {
                d[..3].copy_from_slice(s);
                d[3] = 255;
            }
        }
    }
}
