#![no_main]
use libfuzzer_sys::fuzz_target;
use zenbmp::{BmpPermissiveness, DecodeRequest, ImageInfo};

fuzz_target!(|data: &[u8]| {
    // Probing and decoding must never panic, in any mode.
    let _ = ImageInfo::from_bytes(data);
    let _ = zenbmp::decode_bmp(data, enough::Unstoppable);

    // Fixed small output buffer exercises the too-small path.
    let mut out = [0u8; 256];
    for mode in [
        BmpPermissiveness::Strict,
        BmpPermissiveness::Standard,
        BmpPermissiveness::Permissive,
    ] {
        let _ = DecodeRequest::new(data)
            .with_permissiveness(mode)
            .decode_into(&mut out, enough::Unstoppable);
    }
});
