// SPDX-License-Identifier: PMPL-1.0-or-later
//
// RAVF container format - File header
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The header opens every RAVF file and is rewritten in place when the
// writer finishes (backpatching the index offset and frame count).
//
// On-disk binary format (all integers little-endian):
//   [4 bytes: magic (u32)]          -- 0x46564152, "RAVF"
//   [2 bytes: version (u16)]
//   [4 bytes: entry_count (u32)]
//   [entry_count x MetadataEntry]

use std::collections::HashSet;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::entry::MetadataEntry;
use crate::error::{RavfError, RavfResult};
use crate::schema::{private_field, FRAMES_COUNT, OFFSET_FRAMES, OFFSET_INDEX};
use crate::value::{read_array, ScalarValue};

/// Header magic, the bytes "RAVF" read as a little-endian u32.
pub const RAVF_MAGIC: u32 = 0x4656_4152;

/// The format version this crate writes.
pub const RAVF_VERSION: u16 = 1;

/// Size of the magic + version + entry count preamble.
pub const HEADER_PREAMBLE_SIZE: usize = 4 + 2 + 4;

/// Positions of the writer-maintained entries within `entries`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Bookkeeping {
    offset_frames: Option<usize>,
    offset_index: Option<usize>,
    frames_count: Option<usize>,
}

impl Bookkeeping {
    fn locate(entries: &[MetadataEntry]) -> Self {
        let find = |name: &str| entries.iter().position(|entry| entry.name() == name);
        Self {
            offset_frames: find(OFFSET_FRAMES),
            offset_index: find(OFFSET_INDEX),
            frames_count: find(FRAMES_COUNT),
        }
    }
}

/// The RAVF file header: format version plus an ordered list of metadata
/// entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    version: u16,
    entries: Vec<MetadataEntry>,
    bookkeeping: Bookkeeping,
    frame_count: u32,
}

impl Header {
    /// Build a header for writing.
    ///
    /// `entries` must contain `OFFSET-FRAMES`, `OFFSET-INDEX` and
    /// `FRAMES-COUNT` with their schema kinds, and names must be unique.
    /// `OFFSET-FRAMES` is set to the header's own serialized length; the
    /// field is fixed-width, so updating it does not change that length.
    pub fn new(entries: Vec<MetadataEntry>) -> RavfResult<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.name()) {
                return Err(RavfError::NameCollision(entry.name().to_string()));
            }
            if let Some(field) = private_field(entry.name()) {
                if entry.kind() != field.kind() {
                    return Err(RavfError::TypeMismatch {
                        name: entry.name().to_string(),
                        expected: field.kind(),
                        actual: entry.kind(),
                    });
                }
            }
        }

        let bookkeeping = Bookkeeping::locate(&entries);
        let mut header = Self {
            version: RAVF_VERSION,
            entries,
            bookkeeping,
            frame_count: 0,
        };

        for (slot, name) in [
            (bookkeeping.offset_frames, OFFSET_FRAMES),
            (bookkeeping.offset_index, OFFSET_INDEX),
            (bookkeeping.frames_count, FRAMES_COUNT),
        ] {
            if slot.is_none() {
                return Err(RavfError::MissingRequiredField(name.to_string()));
            }
        }

        let length = header.serialized_len() as u64;
        header.set_slot(bookkeeping.offset_frames, OFFSET_FRAMES, ScalarValue::UInt64(length))?;

        Ok(header)
    }

    /// Read a header from the current position of `source`.
    ///
    /// Consumes the preamble and exactly `entry_count` entries; nothing
    /// after the last entry is read. Stored bookkeeping values are kept
    /// as found.
    pub fn deserialize<R: Read>(source: &mut R) -> RavfResult<Self> {
        let magic = u32::from_le_bytes(read_array(source)?);
        if magic != RAVF_MAGIC {
            return Err(RavfError::MagicMismatch {
                structure: "header",
                expected: RAVF_MAGIC as u64,
                actual: magic as u64,
            });
        }
        let version = u16::from_le_bytes(read_array(source)?);
        let entry_count = u32::from_le_bytes(read_array(source)?);

        // Each entry takes at least 4 bytes; cap the pre-allocation so a
        // corrupt count cannot reserve gigabytes up front.
        let mut entries = Vec::with_capacity((entry_count as usize).min(1024));
        for _ in 0..entry_count {
            entries.push(MetadataEntry::deserialize(source)?);
        }

        let bookkeeping = Bookkeeping::locate(&entries);
        let frame_count = bookkeeping
            .frames_count
            .and_then(|index| entries[index].value().as_u32())
            .unwrap_or(0);

        Ok(Self {
            version,
            entries,
            bookkeeping,
            frame_count,
        })
    }

    /// Number of bytes `serialize` produces.
    pub fn serialized_len(&self) -> usize {
        HEADER_PREAMBLE_SIZE
            + self
                .entries
                .iter()
                .map(MetadataEntry::serialized_len)
                .sum::<usize>()
    }

    /// Serialize to the on-disk format.
    pub fn serialize(&self) -> RavfResult<Vec<u8>> {
        let mut buffer = Vec::with_capacity(self.serialized_len());
        buffer.extend_from_slice(&RAVF_MAGIC.to_le_bytes());
        buffer.extend_from_slice(&self.version.to_le_bytes());
        buffer.extend_from_slice(&(self.entries.len() as u32).to_le_bytes());
        for entry in &self.entries {
            entry.serialize_into(&mut buffer)?;
        }
        Ok(buffer)
    }

    /// Write the header at the start of `sink`.
    ///
    /// Copies the running frame count into `FRAMES-COUNT`, seeks to offset
    /// zero, writes the full header and leaves `sink` positioned at its end
    /// so appending can resume. Returns that end-of-file position.
    pub fn write<W: Write + Seek>(&mut self, sink: &mut W) -> RavfResult<u64> {
        let frames_count = self.bookkeeping.frames_count;
        self.set_slot(frames_count, FRAMES_COUNT, ScalarValue::UInt32(self.frame_count))?;

        let bytes = self.serialize()?;
        sink.seek(SeekFrom::Start(0))?;
        sink.write_all(&bytes)?;
        Ok(sink.seek(SeekFrom::End(0))?)
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    /// The value of the first entry called `name`.
    pub fn metadata_value(&self, name: &str) -> Option<&ScalarValue> {
        self.entries
            .iter()
            .find(|entry| entry.name() == name)
            .map(MetadataEntry::value)
    }

    /// All entries as `(name, value)` pairs, in header order.
    pub fn metadata(&self) -> Vec<(&str, &ScalarValue)> {
        self.entries
            .iter()
            .map(|entry| (entry.name(), entry.value()))
            .collect()
    }

    pub fn entries(&self) -> &[MetadataEntry] {
        &self.entries
    }

    /// Frames counted so far (on read: the stored `FRAMES-COUNT`).
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// The stored `OFFSET-FRAMES` value.
    pub fn offset_frames(&self) -> Option<u64> {
        self.slot_value(self.bookkeeping.offset_frames)
    }

    /// The stored `OFFSET-INDEX` value.
    pub fn offset_index(&self) -> Option<u64> {
        self.slot_value(self.bookkeeping.offset_index)
    }

    /// Record where the index will be written.
    pub fn update_offset_index(&mut self, offset: u64) -> RavfResult<()> {
        let slot = self.bookkeeping.offset_index;
        self.set_slot(slot, OFFSET_INDEX, ScalarValue::UInt64(offset))
    }

    /// Count one more written frame. Persisted on the next `write`.
    pub fn increment_frame_count(&mut self) {
        self.frame_count = self.frame_count.saturating_add(1);
    }

    fn slot_value(&self, slot: Option<usize>) -> Option<u64> {
        slot.and_then(|index| self.entries[index].value().as_u64())
    }

    fn set_slot(&mut self, slot: Option<usize>, name: &str, value: ScalarValue) -> RavfResult<()> {
        match slot {
            Some(index) => self.entries[index].update(value),
            None => Err(RavfError::MissingMetadata(name.to_string())),
        }
    }
}
