//! File-level entry points.
//!
//! Each call opens, fully reads or writes, and closes its file before
//! returning. Nothing is shared between calls.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use enough::{Stop, Unstoppable};

use crate::decode::{DecodeOutput, DecodeRequest};
use crate::encode::EncodeRequest;
use crate::error::BitmapError;
use crate::info::ImageInfo;
use crate::pixel::PixelLayout;

/// File header plus BITMAPINFOHEADER.
const PROBE_BYTES: u64 = 54;

fn check_path(path: &Path) -> Result<&Path, BitmapError> {
    if path.as_os_str().is_empty() {
        return Err(BitmapError::InvalidPath("empty path".into()));
    }
    Ok(path)
}

/// Replace `path` with `bytes` without ever exposing a partial file.
///
/// The data goes to a temporary file in the destination directory which is
/// then renamed over `path`. On failure the temporary file is removed and
/// any existing file at `path` is left as it was.
///
/// A symlink is written through: its target is replaced, not the link. An
/// existing file keeps its permissions; a new one gets the usual
/// `0o666 & !umask` rather than the owner-only mode of temporary files.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), BitmapError> {
    let target = match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => fs::canonicalize(path)?,
        _ => path.to_path_buf(),
    };
    let existing = fs::metadata(&target).ok().map(|meta| meta.permissions());

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    if let Some(permissions) = existing {
        tmp.as_file().set_permissions(permissions)?;
    }
    tmp.persist(&target).map_err(|e| BitmapError::Io(e.error))?;
    Ok(())
}

impl EncodeRequest<'_> {
    /// Encode and write a BMP file, creating or replacing `path`.
    ///
    /// The whole file is assembled in memory first, so invalid input never
    /// touches the filesystem.
    pub fn encode_to_path(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        layout: PixelLayout,
        path: impl AsRef<Path>,
        stop: impl Stop,
    ) -> Result<(), BitmapError> {
        let path = check_path(path.as_ref())?;
        let bytes = self.encode(pixels, width, height, layout, stop)?;
        write_atomic(path, &bytes)?;
        log::debug!(
            "wrote {width}x{height} BMP ({} bytes) to {}",
            bytes.len(),
            path.display()
        );
        Ok(())
    }
}

/// Write a row-major RGBA matrix as a 24-bit BMP file.
///
/// `rgba` must hold exactly `width * height * 4` bytes. Alpha is dropped.
pub fn write_bmp_from_rgba_matrix(
    rgba: &[u8],
    width: u32,
    height: u32,
    path: impl AsRef<Path>,
) -> Result<(), BitmapError> {
    EncodeRequest::new().encode_to_path(rgba, width, height, PixelLayout::Rgba8, path, Unstoppable)
}

/// Read a 24-bit BMP file into a caller-allocated RGBA buffer.
///
/// On success the first `width * height * 4` bytes of `rgba` hold the image,
/// top row first, every alpha 255. If `rgba` is too small the result is
/// [`BitmapError::BufferTooSmall`] carrying the width, height and required
/// size, and `rgba` is not written.
pub fn read_bmp_to_rgba_matrix(
    path: impl AsRef<Path>,
    rgba: &mut [u8],
) -> Result<ImageInfo, BitmapError> {
    let path = check_path(path.as_ref())?;
    let data = fs::read(path)?;
    let result = DecodeRequest::new(&data).decode_into(rgba, Unstoppable);
    match &result {
        Ok(info) => log::debug!(
            "read {}x{} BMP from {}",
            info.width,
            info.height,
            path.display()
        ),
        Err(e) => log::debug!("failed to read BMP from {}: {e}", path.display()),
    }
    result
}

/// Read only the headers of a BMP file.
///
/// This is the size query for [`read_bmp_to_rgba_matrix`]:
/// `info.required_bytes(PixelLayout::Rgba8)` is the buffer it needs.
pub fn read_bmp_info(path: impl AsRef<Path>) -> Result<ImageInfo, BitmapError> {
    let path = check_path(path.as_ref())?;
    let mut header = Vec::with_capacity(PROBE_BYTES as usize);
    File::open(path)?.take(PROBE_BYTES).read_to_end(&mut header)?;
    ImageInfo::from_bytes(&header)
}

/// Read a BMP file into a newly allocated RGBA buffer.
pub fn read_bmp(path: impl AsRef<Path>) -> Result<DecodeOutput, BitmapError> {
    let path = check_path(path.as_ref())?;
    let data = fs::read(path)?;
    DecodeRequest::new(&data).decode(Unstoppable)
}
