#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn bmp24(width: i32, height: i32, bgr_rows: &[&[u8]]) -> Vec<u8> {
    let stride = ((width as usize * 3) + 3) & !3;
    let pixel_bytes = stride * bgr_rows.len();
    let file_size = 54 + pixel_bytes as u32;
    let mut bmp = Vec::with_capacity(file_size as usize);
    bmp.extend_from_slice(b"BM");
    bmp.extend_from_slice(&file_size.to_le_bytes());
    bmp.extend_from_slice(&[0u8; 4]); // reserved
    bmp.extend_from_slice(&54u32.to_le_bytes()); // data offset
    bmp.extend_from_slice(&40u32.to_le_bytes()); // DIB header size
    bmp.extend_from_slice(&width.to_le_bytes());
    bmp.extend_from_slice(&height.to_le_bytes());
    bmp.extend_from_slice(&1u16.to_le_bytes()); // planes
    bmp.extend_from_slice(&24u16.to_le_bytes()); // bpp
    bmp.extend_from_slice(&0u32.to_le_bytes()); // compression
    bmp.extend_from_slice(&(pixel_bytes as u32).to_le_bytes());
    bmp.extend_from_slice(&[0u8; 16]); // resolution, palette counts
    for row in bgr_rows {
        bmp.extend_from_slice(row);
        bmp.extend(std::iter::repeat_n(0u8, stride - row.len()));
    }
    bmp
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    fs::write(format!("{dir}/bmp_1x1.bmp"), bmp24(1, 1, &[&[0xff, 0, 0]])).unwrap();
    fs::write(
        format!("{dir}/bmp_2x2.bmp"),
        bmp24(2, 2, &[&[0xff, 0, 0, 0xff, 0xff, 0xff], &[0, 0, 0xff, 0, 0xff, 0]]),
    )
    .unwrap();
    fs::write(
        format!("{dir}/bmp_2x2_top_down.bmp"),
        bmp24(2, -2, &[&[0xff, 0, 0, 0xff, 0xff, 0xff], &[0, 0, 0xff, 0, 0xff, 0]]),
    )
    .unwrap();
    fs::write(
        format!("{dir}/bmp_5x1.bmp"),
        bmp24(5, 1, &[&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]]),
    )
    .unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
    let mut truncated = bmp24(2, 2, &[&[1, 2, 3, 4, 5, 6], &[7, 8, 9, 10, 11, 12]]);
    truncated.truncate(60);
    fs::write(format!("{dir}/bmp_truncated.bin"), truncated).unwrap();

    println!("Generated seed corpus in {dir}/");
}
