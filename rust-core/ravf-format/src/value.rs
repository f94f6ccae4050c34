// SPDX-License-Identifier: PMPL-1.0-or-later
//
// RAVF container format - Scalar value codec
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The closed set of primitive types a metadata entry can hold, and their
// little-endian wire encoding. Fixed-width kinds are described by a single
// lookup table keyed by the on-disk tag; strings carry a u16 byte-length
// prefix followed by UTF-8 bytes.

use std::fmt;
use std::io::{ErrorKind, Read};

use serde::{Deserialize, Serialize};

use crate::error::{RavfError, RavfResult};

/// Longest string (in bytes) a u16 length prefix can describe.
pub const MAX_STRING_LENGTH: usize = u16::MAX as usize;

// ---------------------------------------------------------------------------
// ScalarKind
// ---------------------------------------------------------------------------

/// The type tag stored in front of every metadata value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    Int8 = 0,
    UInt8 = 1,
    Int16 = 2,
    UInt16 = 3,
    Int32 = 4,
    UInt32 = 5,
    Int64 = 6,
    UInt64 = 7,
    /// Nanoseconds since 2010-01-01T00:00:00 UTC, stored as a u64.
    Timestamp = 8,
    Float32 = 9,
    Float64 = 10,
    /// u16 byte-length prefix followed by UTF-8 bytes.
    Utf8String = 11,
}

/// How a kind is laid out on the wire.
#[derive(Clone, Copy)]
enum Layout {
    /// Exactly `width` little-endian bytes, decoded by `decode`.
    Fixed {
        width: usize,
        decode: fn(&[u8]) -> ScalarValue,
    },
    /// u16 length prefix, then that many bytes.
    LengthPrefixed,
}

#[derive(Clone, Copy)]
struct KindSpec {
    kind: ScalarKind,
    name: &'static str,
    layout: Layout,
}

/// Wire descriptions, indexed by tag value.
static KIND_TABLE: [KindSpec; 12] = [
    KindSpec {
        kind: ScalarKind::Int8,
        name: "INT8",
        layout: Layout::Fixed { width: 1, decode: |b| ScalarValue::Int8(b[0] as i8) },
    },
    KindSpec {
        kind: ScalarKind::UInt8,
        name: "UINT8",
        layout: Layout::Fixed { width: 1, decode: |b| ScalarValue::UInt8(b[0]) },
    },
    KindSpec {
        kind: ScalarKind::Int16,
        name: "INT16",
        layout: Layout::Fixed {
            width: 2,
            decode: |b| ScalarValue::Int16(i16::from_le_bytes([b[0], b[1]])),
        },
    },
    KindSpec {
        kind: ScalarKind::UInt16,
        name: "UINT16",
        layout: Layout::Fixed {
            width: 2,
            decode: |b| ScalarValue::UInt16(u16::from_le_bytes([b[0], b[1]])),
        },
    },
    KindSpec {
        kind: ScalarKind::Int32,
        name: "INT32",
        layout: Layout::Fixed {
            width: 4,
            decode: |b| ScalarValue::Int32(i32::from_le_bytes(le4(b))),
        },
    },
    KindSpec {
        kind: ScalarKind::UInt32,
        name: "UINT32",
        layout: Layout::Fixed {
            width: 4,
            decode: |b| ScalarValue::UInt32(u32::from_le_bytes(le4(b))),
        },
    },
    KindSpec {
        kind: ScalarKind::Int64,
        name: "INT64",
        layout: Layout::Fixed {
            width: 8,
            decode: |b| ScalarValue::Int64(i64::from_le_bytes(le8(b))),
        },
    },
    KindSpec {
        kind: ScalarKind::UInt64,
        name: "UINT64",
        layout: Layout::Fixed {
            width: 8,
            decode: |b| ScalarValue::UInt64(u64::from_le_bytes(le8(b))),
        },
    },
    KindSpec {
        kind: ScalarKind::Timestamp,
        name: "TIMESTAMP",
        layout: Layout::Fixed {
            width: 8,
            decode: |b| ScalarValue::Timestamp(u64::from_le_bytes(le8(b))),
        },
    },
    KindSpec {
        kind: ScalarKind::Float32,
        name: "FLOAT32",
        layout: Layout::Fixed {
            width: 4,
            decode: |b| ScalarValue::Float32(f32::from_le_bytes(le4(b))),
        },
    },
    KindSpec {
        kind: ScalarKind::Float64,
        name: "FLOAT64",
        layout: Layout::Fixed {
            width: 8,
            decode: |b| ScalarValue::Float64(f64::from_le_bytes(le8(b))),
        },
    },
    KindSpec {
        kind: ScalarKind::Utf8String,
        name: "UTF8STRING",
        layout: Layout::LengthPrefixed,
    },
];

fn le4(b: &[u8]) -> [u8; 4] {
    [b[0], b[1], b[2], b[3]]
}

fn le8(b: &[u8]) -> [u8; 8] {
    [b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]
}

impl ScalarKind {
    /// Every kind, in tag order.
    pub const ALL: [ScalarKind; 12] = [
        Self::Int8,
        Self::UInt8,
        Self::Int16,
        Self::UInt16,
        Self::Int32,
        Self::UInt32,
        Self::Int64,
        Self::UInt64,
        Self::Timestamp,
        Self::Float32,
        Self::Float64,
        Self::Utf8String,
    ];

    /// Decode a type tag byte into a `ScalarKind`.
    pub fn from_byte(byte: u8) -> RavfResult<Self> {
        KIND_TABLE
            .get(byte as usize)
            .map(|spec| spec.kind)
            .ok_or(RavfError::UnsupportedType(byte))
    }

    /// Encode this kind as its tag byte.
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// The on-disk width in bytes, or `None` for length-prefixed strings.
    pub fn fixed_width(self) -> Option<usize> {
        match self.spec().layout {
            Layout::Fixed { width, .. } => Some(width),
            Layout::LengthPrefixed => None,
        }
    }

    /// The canonical upper-case name (`"UINT32"`, `"UTF8STRING"`, ...).
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    fn spec(self) -> &'static KindSpec {
        &KIND_TABLE[self as usize]
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// ScalarValue
// ---------------------------------------------------------------------------

/// A typed metadata value. The variant is the value's kind; there is no
/// implicit coercion between kinds (a `UInt64` is never a `Timestamp`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Timestamp(u64),
    Float32(f32),
    Float64(f64),
    Utf8String(String),
}

impl ScalarValue {
    /// The kind this value encodes as.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Int8(_) => ScalarKind::Int8,
            Self::UInt8(_) => ScalarKind::UInt8,
            Self::Int16(_) => ScalarKind::Int16,
            Self::UInt16(_) => ScalarKind::UInt16,
            Self::Int32(_) => ScalarKind::Int32,
            Self::UInt32(_) => ScalarKind::UInt32,
            Self::Int64(_) => ScalarKind::Int64,
            Self::UInt64(_) => ScalarKind::UInt64,
            Self::Timestamp(_) => ScalarKind::Timestamp,
            Self::Float32(_) => ScalarKind::Float32,
            Self::Float64(_) => ScalarKind::Float64,
            Self::Utf8String(_) => ScalarKind::Utf8String,
        }
    }

    /// Number of bytes `encode` appends for this value.
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Utf8String(text) => 2 + text.len(),
            other => other.kind().fixed_width().unwrap_or(0),
        }
    }

    /// Append the little-endian encoding of this value to `out`.
    ///
    /// Fails with `StringTooLong` if a string exceeds 65535 bytes.
    pub fn encode(&self, out: &mut Vec<u8>) -> RavfResult<()> {
        match self {
            Self::Int8(v) => out.extend_from_slice(&v.to_le_bytes()),
            Self::UInt8(v) => out.push(*v),
            Self::Int16(v) => out.extend_from_slice(&v.to_le_bytes()),
            Self::UInt16(v) => out.extend_from_slice(&v.to_le_bytes()),
            Self::Int32(v) => out.extend_from_slice(&v.to_le_bytes()),
            Self::UInt32(v) => out.extend_from_slice(&v.to_le_bytes()),
            Self::Int64(v) => out.extend_from_slice(&v.to_le_bytes()),
            Self::UInt64(v) | Self::Timestamp(v) => out.extend_from_slice(&v.to_le_bytes()),
            Self::Float32(v) => out.extend_from_slice(&v.to_le_bytes()),
            Self::Float64(v) => out.extend_from_slice(&v.to_le_bytes()),
            Self::Utf8String(text) => encode_string(text, out)?,
        }
        Ok(())
    }

    /// Decode one value of the given kind from `source`, consuming exactly
    /// its encoded length.
    pub fn decode<R: Read>(kind: ScalarKind, source: &mut R) -> RavfResult<Self> {
        match kind.spec().layout {
            Layout::Fixed { width, decode } => {
                let mut buffer = [0u8; 8];
                read_exact(source, &mut buffer[..width])?;
                Ok(decode(&buffer[..width]))
            }
            Layout::LengthPrefixed => Ok(Self::Utf8String(decode_string(source)?)),
        }
    }

    pub fn as_u8(&self) -> Option<u8> {
        match self {
            Self::UInt8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::UInt32(v) => Some(*v),
            _ => None,
        }
    }

    /// The payload of a `UInt64` or `Timestamp` value.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt64(v) | Self::Timestamp(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Utf8String(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int8(v) => write!(f, "{v}"),
            Self::UInt8(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::UInt16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::UInt32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::UInt64(v) | Self::Timestamp(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Utf8String(text) => f.write_str(text),
        }
    }
}

impl From<i8> for ScalarValue {
    fn from(value: i8) -> Self {
        Self::Int8(value)
    }
}

impl From<u8> for ScalarValue {
    fn from(value: u8) -> Self {
        Self::UInt8(value)
    }
}

impl From<i16> for ScalarValue {
    fn from(value: i16) -> Self {
        Self::Int16(value)
    }
}

impl From<u16> for ScalarValue {
    fn from(value: u16) -> Self {
        Self::UInt16(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<u32> for ScalarValue {
    fn from(value: u32) -> Self {
        Self::UInt32(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<u64> for ScalarValue {
    fn from(value: u64) -> Self {
        Self::UInt64(value)
    }
}

impl From<f32> for ScalarValue {
    fn from(value: f32) -> Self {
        Self::Float32(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        Self::Utf8String(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        Self::Utf8String(value)
    }
}

// ---------------------------------------------------------------------------
// Wire helpers shared by the other codecs
// ---------------------------------------------------------------------------

/// Append a u16-length-prefixed UTF-8 string.
pub(crate) fn encode_string(text: &str, out: &mut Vec<u8>) -> RavfResult<()> {
    let bytes = text.as_bytes();
    let length = u16::try_from(bytes.len()).map_err(|_| RavfError::StringTooLong(bytes.len()))?;
    out.extend_from_slice(&length.to_le_bytes());
    out.extend_from_slice(bytes);
    Ok(())
}

/// Read a u16-length-prefixed UTF-8 string.
pub(crate) fn decode_string<R: Read>(source: &mut R) -> RavfResult<String> {
    let length = u16::from_le_bytes(read_array(source)?) as usize;
    let mut bytes = vec![0u8; length];
    read_exact(source, &mut bytes)?;
    Ok(String::from_utf8(bytes)?)
}

/// `read_exact` that reports a short stream as `UnexpectedEof`.
pub(crate) fn read_exact<R: Read>(source: &mut R, buffer: &mut [u8]) -> RavfResult<()> {
    source.read_exact(buffer).map_err(|err| match err.kind() {
        ErrorKind::UnexpectedEof => RavfError::UnexpectedEof(buffer.len() as u64),
        _ => RavfError::Io(err),
    })
}

/// Read a fixed-size byte array.
pub(crate) fn read_array<const N: usize, R: Read>(source: &mut R) -> RavfResult<[u8; N]> {
    let mut buffer = [0u8; N];
    read_exact(source, &mut buffer)?;
    Ok(buffer)
}
