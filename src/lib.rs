//! # zenbmp
//!
//! 24-bit uncompressed BMP encoder and decoder for flat, row-major RGBA
//! pixel matrices.
//!
//! ## Format
//!
//! Output files are a 14-byte `BM` file header, a 40-byte
//! BITMAPINFOHEADER, then pixel rows stored B, G, R with each row padded
//! to a multiple of 4 bytes. Rows are bottom-up by default. All header
//! fields are little-endian.
//!
//! The decoder accepts the same files plus top-down (negative height)
//! files and, outside [`BmpPermissiveness::Strict`], the V2–V5 info
//! header versions, which share the BITMAPINFOHEADER prefix. Alpha is
//! synthesized as 255 since 24-bit BMP has none.
//!
//! ## Caller-allocated decoding
//!
//! [`DecodeRequest::decode_into`] writes into a buffer you own. If it is
//! too small you get [`BitmapError::BufferTooSmall`] with the dimensions
//! and required size, and nothing is written; size a buffer and retry,
//! or probe first with [`ImageInfo::from_bytes`].
//!
//! ## Non-Goals
//!
//! - Compressed (RLE, bitfields, JPEG/PNG) BMP variants
//! - 32-bit BMP with alpha, palettes and sub-byte depths
//! - Any other image format
//!
//! ## Usage
//!
//! ```no_run
//! use zenbmp::{DecodeRequest, EncodeRequest, ImageInfo, PixelLayout};
//! use enough::Unstoppable;
//!
//! let rgba = vec![255u8; 3 * 2 * 4]; // 3x2 opaque white
//! let bmp = EncodeRequest::new()
//!     .encode(&rgba, 3, 2, PixelLayout::Rgba8, Unstoppable)?;
//!
//! let info = ImageInfo::from_bytes(&bmp)?;
//! let mut out = vec![0u8; info.required_bytes(PixelLayout::Rgba8).unwrap()];
//! DecodeRequest::new(&bmp).decode_into(&mut out, Unstoppable)?;
//! assert_eq!(out, rgba);
//! # Ok::<(), zenbmp::BitmapError>(())
//! ```
//!
//! With the `std` feature (default), [`write_bmp_from_rgba_matrix`] and
//! [`read_bmp_to_rgba_matrix`] do the same against files, and
//! [`BitmapError::status_code`] maps any failure onto the `0 / -1 / -2`
//! integer contract.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod error;
mod info;
mod limits;
mod pixel;

mod bmp;

mod decode;
mod encode;

#[cfg(feature = "std")]
mod file;

// Re-exports
pub use bmp::BmpPermissiveness;
pub use decode::{DecodeOutput, DecodeRequest, decode_bmp, decode_bmp_into};
pub use encode::{EncodeRequest, encode_bmp, encode_rgba};
pub use enough::{Stop, Unstoppable};
pub use error::{BitmapError, STATUS_BUFFER_TOO_SMALL, STATUS_FAILURE, STATUS_OK, status_of};
pub use info::ImageInfo;
pub use limits::Limits;
#[cfg(feature = "rgb")]
pub use pixel::DecodePixel;
pub use pixel::PixelLayout;

#[cfg(feature = "std")]
pub use file::{read_bmp, read_bmp_info, read_bmp_to_rgba_matrix, write_bmp_from_rgba_matrix};
