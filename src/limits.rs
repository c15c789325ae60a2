use crate::error::BitmapError;

/// Caps on the images a decode or encode call will accept.
///
/// Decoding checks them right after the headers are parsed, before any
/// pixel row is read. Encoding checks them before the output file is
/// assembled. All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    /// Widest image accepted, in pixels.
    pub max_width: Option<u64>,
    /// Tallest image accepted, in pixels (top-down files count by magnitude).
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Largest byte count a call may produce: the decoded pixel buffer for
    /// decoding (whether allocated by the crate or supplied by the caller)
    /// or the whole BMP file for encoding.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Reject dimensions over any cap with `LimitExceeded`.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), BitmapError> {
        if let Some(max_w) = self.max_width {
            if u64::from(width) > max_w {
                return Err(BitmapError::LimitExceeded(alloc::format!(
                    "width {width} exceeds limit {max_w}"
                )));
            }
        }
        if let Some(max_h) = self.max_height {
            if u64::from(height) > max_h {
                return Err(BitmapError::LimitExceeded(alloc::format!(
                    "height {height} exceeds limit {max_h}"
                )));
            }
        }
        if let Some(max_px) = self.max_pixels {
            let pixels = u64::from(width) * u64::from(height);
            if pixels > max_px {
                return Err(BitmapError::LimitExceeded(alloc::format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }
        Ok(())
    }

    /// Reject a decoded buffer or encoded file larger than `max_memory_bytes`.
    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), BitmapError> {
        if let Some(max_mem) = self.max_memory_bytes {
            if bytes as u64 > max_mem {
                return Err(BitmapError::LimitExceeded(alloc::format!(
                    "{bytes} bytes exceeds memory limit {max_mem}"
                )));
            }
        }
        Ok(())
    }
}

/// Apply optional limits to both dimensions and the byte count they imply.
pub(crate) fn check_limits(
    limits: Option<&Limits>,
    width: u32,
    height: u32,
    bytes: usize,
) -> Result<(), BitmapError> {
    if let Some(limits) = limits {
        limits.check(width, height)?;
        limits.check_memory(bytes)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unlimited() {
        let limits = Limits::default();
        assert!(limits.check(u32::MAX, u32::MAX).is_ok());
        assert!(limits.check_memory(usize::MAX).is_ok());
    }

    #[test]
    fn each_cap_is_enforced() {
        let limits = Limits {
            max_width: Some(8),
            max_height: Some(4),
            max_pixels: Some(20),
            max_memory_bytes: Some(64),
        };
        assert!(limits.check(8, 2).is_ok());
        assert!(matches!(
            limits.check(9, 1),
            Err(BitmapError::LimitExceeded(_))
        ));
        assert!(matches!(
            limits.check(1, 5),
            Err(BitmapError::LimitExceeded(_))
        ));
        assert!(matches!(
            limits.check(6, 4),
            Err(BitmapError::LimitExceeded(_))
        ));
        assert!(limits.check_memory(64).is_ok());
        assert!(matches!(
            limits.check_memory(65),
            Err(BitmapError::LimitExceeded(_))
        ));
    }

    #[test]
    fn check_limits_without_limits_passes() {
        assert!(check_limits(None, 100_000, 100_000, usize::MAX).is_ok());
    }
}
