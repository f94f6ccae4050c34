// SPDX-License-Identifier: PMPL-1.0-or-later
//
// RAVF container format - Frame index
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The index trails the last frame and maps each frame ordinal to its byte
// offset and start timestamp, so readers can seek straight to any frame.
//
// On-disk binary format (all integers little-endian):
//   [4 bytes: frame_count (u32)]
//   [frame_count x (8 bytes offset (u64), 8 bytes start_timestamp (u64))]

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{RavfError, RavfResult};
use crate::value::read_array;

/// Bytes per serialized index entry.
pub const INDEX_ENTRY_SIZE: usize = 8 + 8;

/// Location and start time of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Absolute byte offset of the frame record.
    pub offset: u64,
    /// The frame's start timestamp (ns since the RAVF epoch).
    pub start_timestamp: u64,
}

/// Ordered frame table, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameIndex {
    entries: Vec<IndexEntry>,
}

impl FrameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one frame. No sorting or de-duplication is applied.
    pub fn add_frame(&mut self, offset: u64, start_timestamp: u64) {
        self.entries.push(IndexEntry {
            offset,
            start_timestamp,
        });
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry for `ordinal`, or `IndexOutOfRange`.
    pub fn item(&self, ordinal: usize) -> RavfResult<IndexEntry> {
        self.entries
            .get(ordinal)
            .copied()
            .ok_or(RavfError::IndexOutOfRange {
                ordinal,
                count: self.entries.len(),
            })
    }

    /// Start timestamps of every frame, in ordinal order.
    pub fn timestamps(&self) -> Vec<u64> {
        self.entries.iter().map(|entry| entry.start_timestamp).collect()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn serialized_len(&self) -> usize {
        4 + self.entries.len() * INDEX_ENTRY_SIZE
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.serialized_len());
        buffer.extend_from_slice(&(self.entries.len() as u32).to_le_bytes());
        for entry in &self.entries {
            buffer.extend_from_slice(&entry.offset.to_le_bytes());
            buffer.extend_from_slice(&entry.start_timestamp.to_le_bytes());
        }
        buffer
    }

    /// Write the index at the current position of `sink`.
    pub fn write<W: Write>(&self, sink: &mut W) -> RavfResult<()> {
        sink.write_all(&self.serialize())?;
        Ok(())
    }

    /// Read an index from the current position of `source`.
    ///
    /// Counts above `max_entries` are treated as corruption.
    pub fn deserialize<R: Read>(source: &mut R, max_entries: u32) -> RavfResult<Self> {
        let count = u32::from_le_bytes(read_array(source)?);
        if count > max_entries {
            return Err(RavfError::IndexTooLarge {
                count,
                max_count: max_entries,
            });
        }

        let mut entries = Vec::with_capacity((count as usize).min(4096));
        for _ in 0..count {
            let offset = u64::from_le_bytes(read_array(source)?);
            let start_timestamp = u64::from_le_bytes(read_array(source)?);
            entries.push(IndexEntry {
                offset,
                start_timestamp,
            });
        }

        Ok(Self { entries })
    }
}
