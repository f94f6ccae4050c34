// SPDX-License-Identifier: PMPL-1.0-or-later
//
// RAVF container format - Image geometry
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use ravf_format::schema::{
    COLOR_TYPE, IMAGE_ENDIANESS, IMAGE_FORMAT, IMAGE_HEIGHT, IMAGE_ROW_STRIDE, IMAGE_WIDTH,
};
use ravf_format::{ColorType, Header, ImageEndianness, ImageFormat, RavfError, ScalarKind, ScalarValue};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ImageError, ImageResult};

/// Frame layout declared by a file's header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGeometry {
    /// Pixels per row.
    pub width: u32,
    /// Rows per frame.
    pub height: u32,
    /// Stored bytes per row, padding included.
    pub row_stride: u32,
    pub format: ImageFormat,
    pub color_type: ColorType,
    pub endianness: ImageEndianness,
}

impl ImageGeometry {
    /// Read the geometry fields from `header`.
    ///
    /// Unknown format or color tags map to `UnsupportedFormat` and
    /// `UnsupportedColorType`. An unknown endianness byte is logged and read
    /// as little-endian, since samples are always decoded that way.
    pub fn from_header(header: &Header) -> ImageResult<Self> {
        let format = required_u8(header, IMAGE_FORMAT)?;
        let format =
            ImageFormat::from_byte(format).map_err(|_| ImageError::UnsupportedFormat(format))?;
        let color_type = required_u8(header, COLOR_TYPE)?;
        let color_type = ColorType::from_byte(color_type)
            .map_err(|_| ImageError::UnsupportedColorType(color_type))?;
        let endianness = endianness_or_little(required_u8(header, IMAGE_ENDIANESS)?);

        Ok(Self {
            width: required_u32(header, IMAGE_WIDTH)?,
            height: required_u32(header, IMAGE_HEIGHT)?,
            row_stride: required_u32(header, IMAGE_ROW_STRIDE)?,
            format,
            color_type,
            endianness,
        })
    }

    /// Payload bytes one frame should carry.
    pub fn payload_len(&self) -> usize {
        self.row_stride as usize * self.height as usize
    }
}

fn endianness_or_little(byte: u8) -> ImageEndianness {
    ImageEndianness::from_byte(byte).unwrap_or_else(|_| {
        warn!(value = byte, "Unknown IMAGE-ENDIANESS; assuming little-endian");
        ImageEndianness::Little
    })
}

fn required<'a>(header: &'a Header, name: &str) -> Result<&'a ScalarValue, RavfError> {
    header
        .metadata_value(name)
        .ok_or_else(|| RavfError::MissingMetadata(name.to_string()))
}

fn mismatch(name: &str, expected: ScalarKind, value: &ScalarValue) -> RavfError {
    RavfError::TypeMismatch {
        name: name.to_string(),
        expected,
        actual: value.kind(),
    }
}

fn required_u8(header: &Header, name: &str) -> Result<u8, RavfError> {
    let value = required(header, name)?;
    value
        .as_u8()
        .ok_or_else(|| mismatch(name, ScalarKind::UInt8, value))
}

fn required_u32(header: &Header, name: &str) -> Result<u32, RavfError> {
    let value = required(header, name)?;
    value
        .as_u32()
        .ok_or_else(|| mismatch(name, ScalarKind::UInt32, value))
}
