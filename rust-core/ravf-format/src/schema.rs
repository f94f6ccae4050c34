// SPDX-License-Identifier: PMPL-1.0-or-later
//
// RAVF container format - Metadata schema
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The fixed set of metadata fields every RAVF file carries, their kinds and
// defaults, and the enumerations stored in the UINT8 fields. The "must set"
// flag is write-time validation state only and is never persisted.

use serde::{Deserialize, Serialize};

use crate::error::{RavfError, RavfResult};
use crate::value::{ScalarKind, ScalarValue};

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

/// Byte offset of the first frame (the header's own serialized length).
pub const OFFSET_FRAMES: &str = "OFFSET-FRAMES";
/// Byte offset of the trailing index.
pub const OFFSET_INDEX: &str = "OFFSET-INDEX";
/// Number of frames written.
pub const FRAMES_COUNT: &str = "FRAMES-COUNT";

pub const COLOR_TYPE: &str = "COLOR-TYPE";
pub const IMAGE_ENDIANESS: &str = "IMAGE-ENDIANESS";
pub const IMAGE_WIDTH: &str = "IMAGE-WIDTH";
pub const IMAGE_HEIGHT: &str = "IMAGE-HEIGHT";
pub const IMAGE_ROW_STRIDE: &str = "IMAGE-ROW-STRIDE";
pub const IMAGE_FORMAT: &str = "IMAGE-FORMAT";
pub const FRAME_TIMING_ACCURACY: &str = "FRAME-TIMING-ACCURACY";

// ---------------------------------------------------------------------------
// FieldSpec
// ---------------------------------------------------------------------------

/// One field of the fixed schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// The metadata entry name.
    pub name: &'static str,
    /// Placeholder value; its variant fixes the field's kind.
    pub default: ScalarValue,
    /// The caller must supply a value before a file can be written.
    pub must_set: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, default: ScalarValue, must_set: bool) -> Self {
        Self { name, default, must_set }
    }

    pub fn kind(&self) -> ScalarKind {
        self.default.kind()
    }
}

const fn text(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, ScalarValue::Utf8String(String::new()), false)
}

/// Writer-maintained bookkeeping fields. Callers may never set these.
pub static PRIVATE_FIELDS: [FieldSpec; 3] = [
    FieldSpec::new(OFFSET_FRAMES, ScalarValue::UInt64(0), false),
    FieldSpec::new(OFFSET_INDEX, ScalarValue::UInt64(0), false),
    FieldSpec::new(FRAMES_COUNT, ScalarValue::UInt32(0), false),
];

/// Fields every file carries, in on-disk order.
pub static PUBLIC_FIELDS: [FieldSpec; 35] = [
    FieldSpec::new(COLOR_TYPE, ScalarValue::UInt8(ColorType::Mono as u8), true),
    FieldSpec::new(IMAGE_ENDIANESS, ScalarValue::UInt8(ImageEndianness::Little as u8), true),
    FieldSpec::new(IMAGE_WIDTH, ScalarValue::UInt32(0), true),
    FieldSpec::new(IMAGE_HEIGHT, ScalarValue::UInt32(0), true),
    FieldSpec::new(IMAGE_ROW_STRIDE, ScalarValue::UInt32(0), true),
    FieldSpec::new(IMAGE_FORMAT, ScalarValue::UInt8(ImageFormat::Format8Bit as u8), true),
    FieldSpec::new("IMAGE-BINNING-X", ScalarValue::UInt8(1), false),
    FieldSpec::new("IMAGE-BINNING-Y", ScalarValue::UInt8(1), false),
    text("RECORDER-SOFTWARE"),
    text("RECORDER-SOFTWARE-VERSION"),
    text("RECORDER-HARDWARE"),
    text("RECORDER-HARDWARE-VERSION"),
    text("INSTRUMENT"),
    text("INSTRUMENT-VENDOR"),
    text("INSTRUMENT-VERSION"),
    text("INSTRUMENT-SERIAL"),
    text("INSTRUMENT-FIRMWARE-VERSION"),
    text("INSTRUMENT-SENSOR"),
    FieldSpec::new("INSTRUMENT-GAIN", ScalarValue::Float32(1.0), false),
    FieldSpec::new("INSTRUMENT-GAMMA", ScalarValue::Float32(1.0), false),
    FieldSpec::new("INSTRUMENT-SHUTTER", ScalarValue::UInt64(0), false),
    FieldSpec::new("INSTRUMENT-OFFSET", ScalarValue::UInt32(0), false),
    text("TELESCOPE"),
    text("OBSERVER"),
    text("OBSERVER-ID"),
    FieldSpec::new("LATITUDE", ScalarValue::Float32(0.0), false),
    FieldSpec::new("LONGITUDE", ScalarValue::Float32(0.0), false),
    FieldSpec::new("ALTITUDE", ScalarValue::Float32(0.0), false),
    text("OBJNAME"),
    FieldSpec::new("RA", ScalarValue::Float32(0.0), false),
    FieldSpec::new("DEC", ScalarValue::Float32(0.0), false),
    FieldSpec::new("EQUINOX", ScalarValue::UInt8(Equinox::JNow as u8), false),
    FieldSpec::new("RECORDING-START-UTC", ScalarValue::Timestamp(0), false),
    text("COMMENT"),
    FieldSpec::new(FRAME_TIMING_ACCURACY, ScalarValue::UInt64(0), true),
];

/// Look up a private bookkeeping field by name.
pub fn private_field(name: &str) -> Option<&'static FieldSpec> {
    PRIVATE_FIELDS.iter().find(|field| field.name == name)
}

/// Look up a public schema field by name.
pub fn public_field(name: &str) -> Option<&'static FieldSpec> {
    PUBLIC_FIELDS.iter().find(|field| field.name == name)
}

// ---------------------------------------------------------------------------
// Enumerations stored in UINT8 fields
// ---------------------------------------------------------------------------

/// Sensor color arrangement (`COLOR-TYPE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorType {
    Mono = 0,
    BayerRggb = 1,
    BayerGrbg = 2,
    BayerGbrg = 3,
    BayerBggr = 4,
    BayerCyym = 5,
    BayerYcmy = 6,
    BayerYmcy = 7,
    BayerMyyc = 8,
    Rgb = 9,
    Bgr = 10,
}

impl ColorType {
    pub fn from_byte(byte: u8) -> RavfResult<Self> {
        match byte {
            0 => Ok(Self::Mono),
            1 => Ok(Self::BayerRggb),
            2 => Ok(Self::BayerGrbg),
            3 => Ok(Self::BayerGbrg),
            4 => Ok(Self::BayerBggr),
            5 => Ok(Self::BayerCyym),
            6 => Ok(Self::BayerYcmy),
            7 => Ok(Self::BayerYmcy),
            8 => Ok(Self::BayerMyyc),
            9 => Ok(Self::Rgb),
            10 => Ok(Self::Bgr),
            other => Err(RavfError::InvalidEnumValue { name: COLOR_TYPE, value: other }),
        }
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// Byte order of 16-bit samples (`IMAGE-ENDIANESS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageEndianness {
    Big = 0,
    Little = 1,
}

impl ImageEndianness {
    pub fn from_byte(byte: u8) -> RavfResult<Self> {
        match byte {
            0 => Ok(Self::Big),
            1 => Ok(Self::Little),
            other => Err(RavfError::InvalidEnumValue { name: IMAGE_ENDIANESS, value: other }),
        }
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// Pixel encoding of frame payloads (`IMAGE-FORMAT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    /// One byte per sample.
    Format8Bit = 0,
    /// Two bytes per sample, full 16-bit range.
    Format16Bit = 1,
    /// Four 10-bit samples in five bytes.
    Packed10Bit = 2,
    /// Two 12-bit samples in three bytes.
    Packed12Bit = 3,
    /// 10-bit samples in the low bits of 16-bit words.
    Unpacked10Bit = 4,
    /// 12-bit samples in the low bits of 16-bit words.
    Unpacked12Bit = 5,
}

impl ImageFormat {
    pub fn from_byte(byte: u8) -> RavfResult<Self> {
        match byte {
            0 => Ok(Self::Format8Bit),
            1 => Ok(Self::Format16Bit),
            2 => Ok(Self::Packed10Bit),
            3 => Ok(Self::Packed12Bit),
            4 => Ok(Self::Unpacked10Bit),
            5 => Ok(Self::Unpacked12Bit),
            other => Err(RavfError::InvalidEnumValue { name: IMAGE_FORMAT, value: other }),
        }
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Significant bits per sample.
    pub fn bit_depth(self) -> u8 {
        match self {
            Self::Format8Bit => 8,
            Self::Format16Bit => 16,
            Self::Packed10Bit | Self::Unpacked10Bit => 10,
            Self::Packed12Bit | Self::Unpacked12Bit => 12,
        }
    }
}

/// Reference frame of the `RA`/`DEC` fields (`EQUINOX`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Equinox {
    J2000 = 0,
    JNow = 1,
}

impl Equinox {
    pub fn from_byte(byte: u8) -> RavfResult<Self> {
        match byte {
            0 => Ok(Self::J2000),
            1 => Ok(Self::JNow),
            other => Err(RavfError::InvalidEnumValue { name: "EQUINOX", value: other }),
        }
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }
}
