// SPDX-License-Identifier: PMPL-1.0-or-later
//
// RAVF container format - Metadata entries
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// A metadata entry is a named, typed value: the unit of the header's
// extensible schema.
//
// On-disk binary format (all integers little-endian):
//   [2 bytes: name_len (u16)]
//   [N bytes: name]                 -- UTF-8
//   [1 byte:  kind tag]             -- see ScalarKind
//   [M bytes: value]                -- fixed width, or u16-prefixed UTF-8

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{RavfError, RavfResult};
use crate::value::{decode_string, encode_string, read_array, ScalarKind, ScalarValue};

/// A single named metadata value.
///
/// The declared kind is fixed at construction; every later update must
/// supply a value of the same kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    name: String,
    kind: ScalarKind,
    value: ScalarValue,
}

impl MetadataEntry {
    /// Create an entry, failing with `TypeMismatch` if `value` is not of
    /// the declared `kind`.
    pub fn new(name: impl Into<String>, kind: ScalarKind, value: ScalarValue) -> RavfResult<Self> {
        let name = name.into();
        check_kind(&name, kind, &value)?;
        Ok(Self { name, kind, value })
    }

    /// Create an entry whose kind is taken from the value itself.
    pub fn from_value(name: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            kind: value.kind(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    pub fn value(&self) -> &ScalarValue {
        &self.value
    }

    /// Replace the value in place. The new value must match the declared kind.
    pub fn update(&mut self, value: ScalarValue) -> RavfResult<()> {
        check_kind(&self.name, self.kind, &value)?;
        self.value = value;
        Ok(())
    }

    /// Number of bytes `serialize` produces.
    pub fn serialized_len(&self) -> usize {
        2 + self.name.len() + 1 + self.value.encoded_len()
    }

    /// Serialize to the on-disk format: name, kind tag, value.
    pub fn serialize(&self) -> RavfResult<Vec<u8>> {
        let mut buffer = Vec::with_capacity(self.serialized_len());
        self.serialize_into(&mut buffer)?;
        Ok(buffer)
    }

    /// Append the on-disk encoding to an existing buffer.
    pub fn serialize_into(&self, buffer: &mut Vec<u8>) -> RavfResult<()> {
        encode_string(&self.name, buffer)?;
        buffer.push(self.kind.to_byte());
        self.value.encode(buffer)
    }

    /// Read one entry: name, then kind tag, then the value the tag selects.
    pub fn deserialize<R: Read>(source: &mut R) -> RavfResult<Self> {
        let name = decode_string(source)?;
        let [tag] = read_array::<1, _>(source)?;
        let kind = ScalarKind::from_byte(tag)?;
        let value = ScalarValue::decode(kind, source)?;
        Ok(Self { name, kind, value })
    }
}

fn check_kind(name: &str, kind: ScalarKind, value: &ScalarValue) -> RavfResult<()> {
    if value.kind() == kind {
        Ok(())
    } else {
        Err(RavfError::TypeMismatch {
            name: name.to_string(),
            expected: kind,
            actual: value.kind(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_construct_checks_kind() {
        let result = MetadataEntry::new("IMAGE-WIDTH", ScalarKind::UInt32, ScalarValue::from("640"));
        match result {
            Err(RavfError::TypeMismatch { name, expected, actual }) => {
                assert_eq!(name, "IMAGE-WIDTH");
                assert_eq!(expected, ScalarKind::UInt32);
                assert_eq!(actual, ScalarKind::Utf8String);
            }
            other => panic!("Expected TypeMismatch, got: {other:?}"),
        }
    }

    #[test]
    fn test_update_keeps_declared_kind() {
        let mut entry =
            MetadataEntry::new("RECORDING-START-UTC", ScalarKind::Timestamp, ScalarValue::Timestamp(0))
                .unwrap();
        // A plain u64 is not a timestamp.
        assert!(entry.update(ScalarValue::UInt64(10)).is_err());
        assert_eq!(entry.value(), &ScalarValue::Timestamp(0));

        entry.update(ScalarValue::Timestamp(10)).unwrap();
        assert_eq!(entry.value(), &ScalarValue::Timestamp(10));
    }

    #[test]
    fn test_wire_layout() {
        let entry = MetadataEntry::from_value("W", 640u32);
        let bytes = entry.serialize().unwrap();
        assert_eq!(bytes, vec![0x01, 0x00, b'W', 5, 0x80, 0x02, 0x00, 0x00]);
        assert_eq!(bytes.len(), entry.serialized_len());
    }

    #[test]
    fn test_roundtrip_string_entry() {
        let entry = MetadataEntry::from_value("OBSERVER", "Jürgen Ødegård");
        let bytes = entry.serialize().unwrap();
        let recovered = MetadataEntry::deserialize(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(recovered, entry);
    }

    #[test]
    fn test_unknown_kind_tag() {
        let bytes = vec![0x01, 0x00, b'X', 42, 0, 0, 0, 0];
        let result = MetadataEntry::deserialize(&mut Cursor::new(bytes));
        assert!(matches!(result, Err(RavfError::UnsupportedType(42))));
    }

    #[test]
    fn test_deserialize_consumes_exactly_one_entry() {
        let first = MetadataEntry::from_value("A", 1u8);
        let second = MetadataEntry::from_value("B", -3i64);
        let mut bytes = first.serialize().unwrap();
        bytes.extend(second.serialize().unwrap());

        let mut cursor = Cursor::new(bytes);
        assert_eq!(MetadataEntry::deserialize(&mut cursor).unwrap(), first);
        assert_eq!(MetadataEntry::deserialize(&mut cursor).unwrap(), second);
    }
}
