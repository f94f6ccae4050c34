// SPDX-License-Identifier: PMPL-1.0-or-later
//
// RAVF container format - Image crate
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Turns RAVF frame payloads into `ndarray` sample grids: stride trimming,
// 10/12-bit unpacking, bit-depth scaling, and a hook for color conversion.
//
// ## Usage
//
// ```no_run
// use ravf_format::RavfReader;
// use ravf_image::{read_image, NoConversion};
//
// let mut reader = RavfReader::open_file("/tmp/night.ravf").unwrap();
// let decoded = read_image(&mut reader, 0, &NoConversion).unwrap();
// println!("{} {} {:?}", decoded.info.start_date, decoded.info.start_time, decoded.image.dim());
// ```

pub mod convert;
pub mod decode;
pub mod error;
pub mod geometry;
pub mod unpack;

pub use convert::{ColorConverter, NoConversion};
pub use decode::{decode_frame_image, read_image, DecodedFrame, FrameInfo, FrameStatus};
pub use error::{ImageError, ImageResult};
pub use geometry::ImageGeometry;
pub use unpack::{
    grid_u16_le, grid_u8, scale_to_16bit, unpack_10bit_packed, unpack_12bit_packed, unstride,
    RowLayout,
};
