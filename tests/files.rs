#![cfg(feature = "std")]

use std::fs;

use tempfile::tempdir;
use zenbmp::*;

fn solid(w: u32, h: u32, color: [u8; 4]) -> Vec<u8> {
    color.repeat((w * h) as usize)
}

#[test]
fn create_image() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("image.bmp");
    let rgba = solid(42, 42, [255, 0, 255, 0]);

    write_bmp_from_rgba_matrix(&rgba, 42, 42, &path).unwrap();

    // 42 * 3 = 126, padded to 128.
    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 54 + 128 * 42);
    assert_eq!(&bytes[0..2], b"BM");
}

#[test]
fn read_image() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test_image.bmp");
    let rgba = solid(10, 10, [255, 128, 0, 255]);
    write_bmp_from_rgba_matrix(&rgba, 10, 10, &path).unwrap();

    let mut out = vec![0u8; 10_000];
    let info = read_bmp_to_rgba_matrix(&path, &mut out).unwrap();
    assert_eq!(info.width, 10);
    assert_eq!(info.height, 10);
    assert_eq!(&out[..400], &rgba[..]);
    assert!(out[400..].iter().all(|&b| b == 0));
}

#[test]
fn two_by_one_file_is_62_bytes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("two.bmp");
    write_bmp_from_rgba_matrix(&[255, 0, 0, 255, 0, 255, 0, 128], 2, 1, &path).unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len(), 62);

    let mut out = [0u8; 8];
    read_bmp_to_rgba_matrix(&path, &mut out).unwrap();
    assert_eq!(out, [255, 0, 0, 255, 0, 255, 0, 255]);
}

#[test]
fn too_small_then_retry() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ten.bmp");
    write_bmp_from_rgba_matrix(&solid(10, 10, [1, 2, 3, 255]), 10, 10, &path).unwrap();

    let mut small = [0u8; 10];
    let err = read_bmp_to_rgba_matrix(&path, &mut small).unwrap_err();
    assert_eq!(err.status_code(), STATUS_BUFFER_TOO_SMALL);
    let (needed, width, height) = err.required_size().unwrap();
    assert_eq!((needed, width, height), (400, 10, 10));
    assert_eq!(small, [0u8; 10]);

    let mut out = vec![0u8; needed];
    assert!(read_bmp_to_rgba_matrix(&path, &mut out).is_ok());
}

#[test]
fn probe_gives_required_size() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("probe.bmp");
    write_bmp_from_rgba_matrix(&solid(3, 7, [9, 9, 9, 255]), 3, 7, &path).unwrap();

    let info = read_bmp_info(&path).unwrap();
    assert_eq!((info.width, info.height), (3, 7));
    assert_eq!(info.required_bytes(PixelLayout::Rgba8), Some(84));

    let decoded = read_bmp(&path).unwrap();
    assert_eq!(decoded.pixels().len(), 84);
}

#[test]
fn missing_file_is_generic_failure() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.bmp");
    let mut out = [0u8; 16];
    let err = read_bmp_to_rgba_matrix(&path, &mut out).unwrap_err();
    assert!(matches!(err, BitmapError::Io(_)));
    assert_eq!(err.status_code(), STATUS_FAILURE);
    assert!(read_bmp_info(&path).is_err());
}

#[test]
fn empty_path_is_rejected() {
    let err = write_bmp_from_rgba_matrix(&[0, 0, 0, 255], 1, 1, "").unwrap_err();
    assert!(matches!(err, BitmapError::InvalidPath(_)));
    assert_eq!(err.status_code(), STATUS_FAILURE);

    let mut out = [0u8; 4];
    assert!(matches!(
        read_bmp_to_rgba_matrix("", &mut out),
        Err(BitmapError::InvalidPath(_))
    ));
}

#[test]
fn not_a_bmp_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fake.bmp");
    fs::write(&path, b"P6\n1 1\n255\n\xff\x00\x00").unwrap();
    let mut out = [0u8; 4];
    let err = read_bmp_to_rgba_matrix(&path, &mut out).unwrap_err();
    assert!(matches!(err, BitmapError::UnrecognizedFormat));
    assert_eq!(err.status_code(), STATUS_FAILURE);
}

#[test]
fn failed_encode_leaves_existing_file_alone() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("keep.bmp");
    write_bmp_from_rgba_matrix(&solid(2, 2, [5, 6, 7, 255]), 2, 2, &path).unwrap();
    let before = fs::read(&path).unwrap();

    // Wrong buffer length and zero dimensions never reach the filesystem.
    assert!(write_bmp_from_rgba_matrix(&[0; 3], 1, 1, &path).is_err());
    assert!(write_bmp_from_rgba_matrix(&[], 0, 0, &path).is_err());
    assert_eq!(fs::read(&path).unwrap(), before);

    // Only the target file is left in the directory.
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn overwrite_replaces_contents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("over.bmp");
    write_bmp_from_rgba_matrix(&solid(4, 4, [1, 1, 1, 255]), 4, 4, &path).unwrap();
    write_bmp_from_rgba_matrix(&solid(1, 1, [2, 2, 2, 255]), 1, 1, &path).unwrap();

    let decoded = read_bmp(&path).unwrap();
    assert_eq!((decoded.width, decoded.height), (1, 1));
    assert_eq!(decoded.pixels(), &[2, 2, 2, 255]);
}

#[test]
fn missing_directory_is_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no/such/dir/out.bmp");
    let err = write_bmp_from_rgba_matrix(&[0, 0, 0, 255], 1, 1, &path).unwrap_err();
    assert!(matches!(err, BitmapError::Io(_)));
    assert!(!path.exists());
}

#[test]
fn encode_to_path_with_options() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("opts.bmp");
    let rgb = [10, 20, 30, 40, 50, 60];
    EncodeRequest::new()
        .top_down(true)
        .with_resolution(0, 0)
        .encode_to_path(&rgb, 1, 2, PixelLayout::Rgb8, &path, Unstoppable)
        .unwrap();

    let info = read_bmp_info(&path).unwrap();
    assert!(info.top_down);
    assert_eq!(info.x_pixels_per_meter, 0);

    let mut out = [0u8; 8];
    read_bmp_to_rgba_matrix(&path, &mut out).unwrap();
    assert_eq!(out, [10, 20, 30, 255, 40, 50, 60, 255]);
}

#[cfg(unix)]
#[test]
fn overwrite_keeps_existing_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let path = dir.path().join("shared.bmp");
    write_bmp_from_rgba_matrix(&solid(2, 2, [1, 2, 3, 255]), 2, 2, &path).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

    write_bmp_from_rgba_matrix(&solid(3, 1, [4, 5, 6, 255]), 3, 1, &path).unwrap();
    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o640);
    assert_eq!(read_bmp(&path).unwrap().width, 3);
}

#[cfg(unix)]
#[test]
fn new_file_gets_default_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let plain = dir.path().join("plain.bin");
    fs::write(&plain, b"x").unwrap();
    let path = dir.path().join("fresh.bmp");
    write_bmp_from_rgba_matrix(&[0, 0, 0, 255], 1, 1, &path).unwrap();

    let mode = |p: &std::path::Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode(&path), mode(&plain));
}

#[cfg(unix)]
#[test]
fn symlink_is_written_through() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("real.bmp");
    let link = dir.path().join("link.bmp");
    fs::write(&target, b"old").unwrap();
    std::os::unix::fs::symlink(&target, &link).unwrap();

    write_bmp_from_rgba_matrix(&[7, 8, 9, 255], 1, 1, &link).unwrap();

    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    let decoded = read_bmp(&target).unwrap();
    assert_eq!(decoded.pixels(), &[7, 8, 9, 255]);
    assert_eq!(fs::read(&link).unwrap(), fs::read(&target).unwrap());
}
