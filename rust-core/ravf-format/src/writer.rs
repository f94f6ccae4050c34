// SPDX-License-Identifier: PMPL-1.0-or-later
//
// RAVF container format - Streaming writer
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The `RavfWriter` validates the metadata schema, writes the header, streams
// frames while building the index in memory, and on `finish` backpatches
// the header and appends the index.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::config::{FlushMode, WriterConfig};
use crate::entry::MetadataEntry;
use crate::error::{RavfError, RavfResult};
use crate::frame::FrameRecord;
use crate::header::Header;
use crate::index::FrameIndex;
use crate::schema::{private_field, PRIVATE_FIELDS, PUBLIC_FIELDS};
use crate::value::ScalarValue;

// ---------------------------------------------------------------------------
// Schema assembly
// ---------------------------------------------------------------------------

/// A public schema entry plus its write-time "still a placeholder" flag.
struct PendingField {
    entry: MetadataEntry,
    must_set: bool,
}

/// Build the full ordered entry list: private bookkeeping, then the public
/// schema with the caller's overrides applied, then user-defined entries.
///
/// * `required` - overrides for public schema fields, by name.
/// * `user` - extra entries with caller-chosen names and kinds.
pub fn build_metadata<'a>(
    required: impl IntoIterator<Item = (&'a str, ScalarValue)>,
    user: impl IntoIterator<Item = MetadataEntry>,
) -> RavfResult<Vec<MetadataEntry>> {
    let private: Vec<MetadataEntry> = PRIVATE_FIELDS
        .iter()
        .map(|field| MetadataEntry::from_value(field.name, field.default.clone()))
        .collect();

    let mut public: Vec<PendingField> = PUBLIC_FIELDS
        .iter()
        .map(|field| PendingField {
            entry: MetadataEntry::from_value(field.name, field.default.clone()),
            must_set: field.must_set,
        })
        .collect();

    for (name, value) in required {
        if private_field(name).is_some() {
            return Err(RavfError::NameCollision(name.to_string()));
        }
        let pending = public
            .iter_mut()
            .find(|pending| pending.entry.name() == name)
            .ok_or_else(|| RavfError::UnknownField(name.to_string()))?;
        pending.entry.update(value)?;
        pending.must_set = false;
    }

    if let Some(pending) = public.iter().find(|pending| pending.must_set) {
        return Err(RavfError::MissingRequiredField(pending.entry.name().to_string()));
    }

    let mut entries = private;
    entries.extend(public.into_iter().map(|pending| pending.entry));

    for entry in user {
        if entries.iter().any(|existing| existing.name() == entry.name()) {
            return Err(RavfError::NameCollision(entry.name().to_string()));
        }
        entries.push(entry);
    }

    Ok(entries)
}

// ---------------------------------------------------------------------------
// RavfWriter
// ---------------------------------------------------------------------------

/// An append-only writer for one RAVF file.
///
/// The file is structurally incomplete until `finish` runs: the header's
/// `OFFSET-INDEX` does not point at an index before then.
pub struct RavfWriter<W: Write + Seek> {
    /// The backing store, positioned at end-of-file between calls.
    sink: W,

    /// The header, backpatched on `finish`.
    header: Header,

    /// Offsets and timestamps of every frame written so far.
    index: FrameIndex,

    /// Where the next frame (or the index) starts. Tracked here so appends
    /// never have to ask the sink, which would flush a `BufWriter`.
    next_offset: u64,

    config: WriterConfig,
}

impl RavfWriter<BufWriter<File>> {
    /// Create (or truncate) `path` and start a writer session on it.
    pub fn create_file<'a>(
        path: impl AsRef<Path>,
        required: impl IntoIterator<Item = (&'a str, ScalarValue)>,
        user: impl IntoIterator<Item = MetadataEntry>,
    ) -> RavfResult<Self> {
        let file = File::create(path.as_ref())?;
        info!(path = %path.as_ref().display(), "Created RAVF file");
        Self::create(BufWriter::new(file), required, user)
    }

    /// Flush buffered frames and `fsync` the file.
    ///
    /// `FlushMode::EveryFrame` only hands bytes to the OS; call this when
    /// frames must survive a power loss.
    pub fn sync(&mut self) -> RavfResult<()> {
        self.sink.flush()?;
        self.sink.get_ref().sync_all()?;
        debug!(frames = self.index.count(), "Synced RAVF file");
        Ok(())
    }
}

impl<W: Write + Seek> RavfWriter<W> {
    /// Start a writer session on `sink` with the default configuration.
    ///
    /// Fails before anything is written if the metadata does not satisfy
    /// the schema (see [`build_metadata`]).
    pub fn create<'a>(
        sink: W,
        required: impl IntoIterator<Item = (&'a str, ScalarValue)>,
        user: impl IntoIterator<Item = MetadataEntry>,
    ) -> RavfResult<Self> {
        Self::create_with_config(sink, required, user, WriterConfig::default())
    }

    /// Start a writer session with an explicit configuration.
    pub fn create_with_config<'a>(
        mut sink: W,
        required: impl IntoIterator<Item = (&'a str, ScalarValue)>,
        user: impl IntoIterator<Item = MetadataEntry>,
        config: WriterConfig,
    ) -> RavfResult<Self> {
        let entries = build_metadata(required, user)?;
        for entry in &entries {
            debug!(name = entry.name(), kind = %entry.kind(), value = %entry.value(), "Metadata entry");
        }

        let mut header = Header::new(entries)?;
        let next_offset = header.write(&mut sink)?;

        info!(
            entries = header.entries().len(),
            header_length = header.serialized_len(),
            "Wrote RAVF header"
        );

        Ok(Self {
            sink,
            header,
            index: FrameIndex::new(),
            next_offset,
            config,
        })
    }

    /// Append one frame at the current end of the file.
    ///
    /// Timestamps and payload sizes are not validated. Returns the frame's
    /// ordinal.
    pub fn write_frame(&mut self, frame: &FrameRecord) -> RavfResult<usize> {
        let offset = self.next_offset;
        frame.write(&mut self.sink)?;
        self.next_offset += frame.serialized_len() as u64;

        self.index.add_frame(offset, frame.start_timestamp);
        self.header.increment_frame_count();

        if self.config.flush == FlushMode::EveryFrame {
            self.sink.flush()?;
        }

        let ordinal = self.index.count() - 1;
        debug!(
            ordinal,
            offset,
            sequence = frame.sequence,
            payload_length = frame.payload.len(),
            "Appended frame"
        );

        Ok(ordinal)
    }

    /// Complete the file: append the index, backpatch `OFFSET-INDEX` and
    /// `FRAMES-COUNT` in the header, and flush. Returns the sink.
    pub fn finish(mut self) -> RavfResult<W> {
        let index_offset = self.next_offset;
        self.header.update_offset_index(index_offset)?;
        self.header.write(&mut self.sink)?;
        self.index.write(&mut self.sink)?;
        self.sink.flush()?;

        info!(
            frames = self.index.count(),
            index_offset,
            "Finished RAVF file"
        );

        Ok(self.sink)
    }

    pub fn version(&self) -> u16 {
        self.header.version()
    }

    /// Frames written so far.
    pub fn frame_count(&self) -> usize {
        self.index.count()
    }

    pub fn header(&self) -> &Header {
        &self.header
    }
}
