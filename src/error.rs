use alloc::string::String;
use enough::StopReason;

/// Status returned by the legacy integer contract on success.
pub const STATUS_OK: i32 = 0;
/// Status for every failure other than an undersized output buffer.
pub const STATUS_FAILURE: i32 = -1;
/// Status for a decode whose output buffer cannot hold the image.
pub const STATUS_BUFFER_TOO_SMALL: i32 = -2;

/// Errors from BMP decoding and encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BitmapError {
    #[error("unrecognized format magic bytes")]
    UnrecognizedFormat,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("input size mismatch: expected {expected} bytes, got {actual}")]
    InputSizeMismatch { expected: usize, actual: usize },

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("buffer too small for {width}x{height}: need {needed} bytes, got {actual}")]
    BufferTooSmall {
        needed: usize,
        actual: usize,
        width: u32,
        height: u32,
    },

    #[cfg(feature = "std")]
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for BitmapError {
    fn from(r: StopReason) -> Self {
        BitmapError::Cancelled(r)
    }
}

impl BitmapError {
    /// Collapse to the two-code integer contract.
    ///
    /// [`BitmapError::BufferTooSmall`] maps to [`STATUS_BUFFER_TOO_SMALL`];
    /// everything else (bad input, malformed or unsupported headers, I/O)
    /// maps to [`STATUS_FAILURE`].
    pub fn status_code(&self) -> i32 {
        match self {
            Self::BufferTooSmall { .. } => STATUS_BUFFER_TOO_SMALL,
            _ => STATUS_FAILURE,
        }
    }

    /// For an undersized decode buffer, the `(needed, width, height)` a
    /// retry should use.
    pub fn required_size(&self) -> Option<(usize, u32, u32)> {
        match *self {
            Self::BufferTooSmall {
                needed,
                width,
                height,
                ..
            } => Some((needed, width, height)),
            _ => None,
        }
    }
}

/// Map a codec result onto the integer status contract.
pub fn status_of<T>(result: &Result<T, BitmapError>) -> i32 {
    match result {
        Ok(_) => STATUS_OK,
        Err(e) => e.status_code(),
    }
}
