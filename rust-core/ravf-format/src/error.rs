// SPDX-License-Identifier: PMPL-1.0-or-later
//
// RAVF container format - Error types
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Defines all error conditions that can arise while encoding or decoding a
// RAVF file: I/O failures, structural corruption, metadata type violations
// and writer schema validation failures.

use thiserror::Error;

use crate::value::ScalarKind;

/// Errors that can occur while reading or writing a RAVF file.
#[derive(Debug, Error)]
pub enum RavfError {
    /// An I/O error occurred on the backing store.
    #[error("RAVF I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A magic constant did not match. The file is not RAVF or is corrupt.
    #[error("{structure} magic mismatch: expected {expected:#x}, got {actual:#x}")]
    MagicMismatch {
        /// Which structure was being decoded ("header" or "frame").
        structure: &'static str,
        /// The format constant.
        expected: u64,
        /// The value found in the stream.
        actual: u64,
    },

    /// A metadata value's kind disagrees with the entry's declared kind.
    #[error("Type mismatch for '{name}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// The metadata entry name.
        name: String,
        /// The declared kind of the entry.
        expected: ScalarKind,
        /// The kind of the offered value.
        actual: ScalarKind,
    },

    /// An unknown scalar kind tag was encountered.
    #[error("Unsupported scalar type tag: {0}")]
    UnsupportedType(u8),

    /// A length-prefixed string did not hold valid UTF-8.
    #[error("Invalid UTF-8 in string field: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A string is too long for its u16 length prefix.
    #[error("String of {0} bytes exceeds the 65535 byte limit")]
    StringTooLong(usize),

    /// A metadata name is already used by another entry.
    #[error("Metadata name '{0}' is already in use")]
    NameCollision(String),

    /// A required-field override names a field outside the schema.
    #[error("Unknown required field '{0}'")]
    UnknownField(String),

    /// A required field was never given a value.
    #[error("Required field '{0}' must be set before writing")]
    MissingRequiredField(String),

    /// A metadata entry needed to read the file is absent.
    #[error("Metadata entry '{0}' not found")]
    MissingMetadata(String),

    /// A frame ordinal outside `0..count` was requested.
    #[error("Frame ordinal {ordinal} out of range (frame count {count})")]
    IndexOutOfRange {
        /// The requested ordinal.
        ordinal: usize,
        /// The number of frames in the index.
        count: usize,
    },

    /// An invalid frame type byte was encountered.
    #[error("Invalid frame type byte: {0}")]
    InvalidFrameType(u8),

    /// A metadata enumeration field holds a value outside its domain.
    #[error("Invalid value {value} for '{name}'")]
    InvalidEnumValue {
        /// The metadata entry name.
        name: &'static str,
        /// The raw value found.
        value: u8,
    },

    /// A frame record declares a header length shorter than its fields.
    #[error("Frame header length {0} is shorter than the fixed field block")]
    InvalidFrameHeaderLength(u32),

    /// A frame payload is larger than the configured limit on read, or
    /// than the u32 length field allows on write.
    #[error("Frame payload of {length} bytes exceeds maximum {max_length}")]
    PayloadTooLarge {
        /// The declared (read) or actual (write) payload length.
        length: u64,
        /// The limit that was exceeded.
        max_length: u64,
    },

    /// The index declares more frames than the configured limit.
    #[error("Index declares {count} frames, exceeding maximum {max_count}")]
    IndexTooLarge {
        /// The declared frame count.
        count: u32,
        /// The configured limit.
        max_count: u32,
    },

    /// The stream ended in the middle of a structure.
    #[error("Unexpected end of stream while reading {0} bytes")]
    UnexpectedEof(u64),
}

/// Convenience type alias for RAVF results.
pub type RavfResult<T> = Result<T, RavfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_magic_mismatch() {
        let error = RavfError::MagicMismatch {
            structure: "header",
            expected: 0x4656_4152,
            actual: 0xDEAD_BEEF,
        };
        let message = format!("{error}");
        assert!(message.contains("header"));
        assert!(message.contains("0x46564152"));
        assert!(message.contains("0xdeadbeef"));
    }

    #[test]
    fn test_error_display_type_mismatch() {
        let error = RavfError::TypeMismatch {
            name: "IMAGE-WIDTH".to_string(),
            expected: ScalarKind::UInt32,
            actual: ScalarKind::Utf8String,
        };
        let message = format!("{error}");
        assert!(message.contains("IMAGE-WIDTH"));
        assert!(message.contains("UINT32"));
        assert!(message.contains("UTF8STRING"));
    }

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file gone");
        let error = RavfError::Io(io_error);
        assert!(format!("{error}").contains("file gone"));
    }

    #[test]
    fn test_error_display_index_out_of_range() {
        let error = RavfError::IndexOutOfRange { ordinal: 9, count: 3 };
        let message = format!("{error}");
        assert!(message.contains('9'));
        assert!(message.contains('3'));
    }
}
