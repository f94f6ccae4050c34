// SPDX-License-Identifier: PMPL-1.0-or-later
//
// RAVF container format - Frame image materialization
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Decode path per IMAGE-FORMAT:
//   8BIT          bytes  -> unstride -> widen -> scale 8
//   16BIT         words  -> unstride
//   PACKED_10BIT  bytes  -> unstride -> unpack 10 -> scale 10
//   PACKED_12BIT  bytes  -> unstride -> unpack 12 -> scale 12
//   UNPACKED_10BIT words -> unstride -> scale 10
//   UNPACKED_12BIT words -> unstride -> scale 12
// followed by the color converter unless COLOR-TYPE is MONO.

use std::io::{Read, Seek};

use ndarray::Array2;
use ravf_format::{ColorType, FrameRecord, FrameType, ImageEndianness, ImageFormat, RavfReader};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::convert::ColorConverter;
use crate::error::ImageResult;
use crate::geometry::ImageGeometry;
use crate::unpack::{
    grid_u16_le, grid_u8, scale_to_16bit, unpack_10bit_packed, unpack_12bit_packed, unstride,
    RowLayout,
};

/// Exposure start as display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInfo {
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `HH:MM:SS.ffffff`
    pub start_time: String,
}

/// Timing and GPS status copied from the frame record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameStatus {
    pub frame_type: FrameType,
    pub start_timestamp: u64,
    pub exposure_duration: u64,
    pub satellites: u8,
    pub almanac_status: u8,
    pub almanac_offset: i8,
    pub satellite_fix_status: u8,
    pub sequence: u32,
}

impl From<&FrameRecord> for FrameStatus {
    fn from(frame: &FrameRecord) -> Self {
        Self {
            frame_type: frame.frame_type,
            start_timestamp: frame.start_timestamp,
            exposure_duration: frame.exposure_duration,
            satellites: frame.satellites,
            almanac_status: frame.almanac_status,
            almanac_offset: frame.almanac_offset,
            satellite_fix_status: frame.satellite_fix_status,
            sequence: frame.sequence,
        }
    }
}

/// One frame ready for display or photometry.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFrame {
    /// `height` x `width` samples scaled to 16 bits.
    pub image: Array2<u16>,
    pub info: FrameInfo,
    pub status: FrameStatus,
}

/// Decode one frame payload into a 16-bit sample grid.
pub fn decode_frame_image(
    payload: &[u8],
    geometry: &ImageGeometry,
    converter: &dyn ColorConverter,
) -> ImageResult<Array2<u16>> {
    let width = geometry.width as usize;
    let height = geometry.height as usize;
    let stride = geometry.row_stride as usize;

    let image = match geometry.format {
        ImageFormat::Format8Bit => {
            let bytes = grid_u8(payload, stride, height)?;
            let mut image = unstride(bytes, RowLayout::Samples, width)?.mapv(u16::from);
            scale_to_16bit(&mut image, 8)?;
            image
        }
        ImageFormat::Format16Bit => words(payload, geometry)?,
        ImageFormat::Packed10Bit => {
            let bytes = grid_u8(payload, stride, height)?;
            let mut image = unpack_10bit_packed(unstride(bytes, RowLayout::Packed10, width)?)?;
            scale_to_16bit(&mut image, 10)?;
            image
        }
        ImageFormat::Packed12Bit => {
            let bytes = grid_u8(payload, stride, height)?;
            let mut image = unpack_12bit_packed(unstride(bytes, RowLayout::Packed12, width)?)?;
            scale_to_16bit(&mut image, 12)?;
            image
        }
        ImageFormat::Unpacked10Bit | ImageFormat::Unpacked12Bit => {
            let mut image = words(payload, geometry)?;
            scale_to_16bit(&mut image, geometry.format.bit_depth())?;
            image
        }
    };

    match geometry.color_type {
        ColorType::Mono => Ok(image),
        source => converter.convert(image, source, geometry.format),
    }
}

/// 16-bit words trimmed to `width` columns. Always little-endian.
fn words(payload: &[u8], geometry: &ImageGeometry) -> ImageResult<Array2<u16>> {
    if geometry.endianness == ImageEndianness::Big {
        warn!("IMAGE-ENDIANESS is big-endian; decoding samples as little-endian");
    }
    let grid = grid_u16_le(payload, geometry.row_stride as usize, geometry.height as usize)?;
    Ok(unstride(grid.view(), RowLayout::Samples, geometry.width as usize)?.to_owned())
}

/// Read frame `ordinal` from `reader` and decode its image.
pub fn read_image<R: Read + Seek>(
    reader: &mut RavfReader<R>,
    ordinal: usize,
    converter: &dyn ColorConverter,
) -> ImageResult<DecodedFrame> {
    let geometry = ImageGeometry::from_header(reader.header())?;
    let frame = reader.frame_by_ordinal(ordinal)?;
    let image = decode_frame_image(&frame.payload, &geometry, converter)?;

    let (start_date, start_time) = frame.start_timestamp_as_strings();
    debug!(
        ordinal,
        format = ?geometry.format,
        rows = image.nrows(),
        columns = image.ncols(),
        "Decoded frame image"
    );

    Ok(DecodedFrame {
        image,
        info: FrameInfo {
            start_date,
            start_time,
        },
        status: FrameStatus::from(&frame),
    })
}
