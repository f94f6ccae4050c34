// SPDX-License-Identifier: PMPL-1.0-or-later
// Fuzz target for the pixel unpacker with arbitrary geometry

#![no_main]

use libfuzzer_sys::fuzz_target;
use ravf_format::{ColorType, ImageEndianness, ImageFormat};
use ravf_image::{decode_frame_image, ImageGeometry, NoConversion};

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let Ok(format) = ImageFormat::from_byte(data[0] % 6) else {
        return;
    };
    let geometry = ImageGeometry {
        width: u32::from(data[1]),
        height: u32::from(data[2]),
        row_stride: u32::from(data[3]),
        format,
        color_type: ColorType::Mono,
        endianness: ImageEndianness::Little,
    };
    // Geometry and payload disagree most of the time; that must be an error, not a panic.
    let _ = decode_frame_image(&data[4..], &geometry, &NoConversion);
});
