// SPDX-License-Identifier: PMPL-1.0-or-later
//
// RAVF container format - Random-access reader
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The `RavfReader` loads the header and index once on open, then serves
// frames by ordinal with a single seek per frame.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::ReaderConfig;
use crate::error::{RavfError, RavfResult};
use crate::frame::FrameRecord;
use crate::header::Header;
use crate::index::FrameIndex;
use crate::schema::OFFSET_INDEX;
use crate::value::ScalarValue;

/// Reads a finished RAVF file.
pub struct RavfReader<R: Read + Seek> {
    source: R,
    header: Header,
    index: FrameIndex,
    config: ReaderConfig,
}

impl RavfReader<BufReader<File>> {
    /// Open the RAVF file at `path` with the default configuration.
    pub fn open_file(path: impl AsRef<Path>) -> RavfResult<Self> {
        let file = File::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "Opening RAVF file");
        Self::open(BufReader::new(file))
    }
}

impl<R: Read + Seek> RavfReader<R> {
    /// Parse the header and index of `source` with the default limits.
    pub fn open(source: R) -> RavfResult<Self> {
        Self::open_with_config(source, ReaderConfig::default())
    }

    /// Parse the header at offset zero, then the index at `OFFSET-INDEX`.
    ///
    /// A stored `FRAMES-COUNT` that disagrees with the index is logged and
    /// otherwise ignored; the index is authoritative.
    pub fn open_with_config(mut source: R, config: ReaderConfig) -> RavfResult<Self> {
        source.seek(SeekFrom::Start(0))?;
        let header = Header::deserialize(&mut source)?;

        let index_offset = header
            .offset_index()
            .ok_or_else(|| RavfError::MissingMetadata(OFFSET_INDEX.to_string()))?;
        source.seek(SeekFrom::Start(index_offset))?;
        let index = FrameIndex::deserialize(&mut source, config.max_index_entries)?;

        if header.frame_count() as usize != index.count() {
            warn!(
                frames_count = header.frame_count(),
                index_count = index.count(),
                "FRAMES-COUNT disagrees with the index"
            );
        }

        info!(
            version = header.version(),
            entries = header.entries().len(),
            frames = index.count(),
            "Opened RAVF file"
        );

        Ok(Self {
            source,
            header,
            index,
            config,
        })
    }

    /// The value of the header entry called `name`.
    pub fn metadata_value(&self, name: &str) -> Option<&ScalarValue> {
        self.header.metadata_value(name)
    }

    /// All header entries as `(name, value)` pairs, in file order.
    pub fn metadata(&self) -> Vec<(&str, &ScalarValue)> {
        self.header.metadata()
    }

    /// Number of frames in the index.
    pub fn frame_count(&self) -> usize {
        self.index.count()
    }

    pub fn version(&self) -> u16 {
        self.header.version()
    }

    /// Start timestamps of all frames, in ordinal order.
    pub fn timestamps(&self) -> Vec<u64> {
        self.index.timestamps()
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn index(&self) -> &FrameIndex {
        &self.index
    }

    /// Read the frame at `ordinal` (0-based, write order).
    ///
    /// The ordinal is checked against the index before the source is
    /// touched.
    pub fn frame_by_ordinal(&mut self, ordinal: usize) -> RavfResult<FrameRecord> {
        let entry = self.index.item(ordinal)?;
        self.source.seek(SeekFrom::Start(entry.offset))?;
        let frame = FrameRecord::deserialize(&mut self.source, self.config.max_payload_length)?;

        debug!(
            ordinal,
            offset = entry.offset,
            payload_length = frame.payload.len(),
            "Read frame"
        );
        Ok(frame)
    }

    /// Iterate over every frame in ordinal order.
    pub fn frames(&mut self) -> Frames<'_, R> {
        Frames {
            reader: self,
            next: 0,
        }
    }

    /// Give back the underlying source.
    pub fn into_inner(self) -> R {
        self.source
    }
}

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

/// Iterator returned by [`RavfReader::frames`].
///
/// Yields one `RavfResult` per index entry; an error does not stop the
/// iteration, so callers may skip a damaged frame.
pub struct Frames<'a, R: Read + Seek> {
    reader: &'a mut RavfReader<R>,
    next: usize,
}

impl<R: Read + Seek> Iterator for Frames<'_, R> {
    type Item = RavfResult<FrameRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.reader.frame_count() {
            return None;
        }
        let ordinal = self.next;
        self.next += 1;
        Some(self.reader.frame_by_ordinal(ordinal))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.reader.frame_count().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<R: Read + Seek> ExactSizeIterator for Frames<'_, R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::MetadataEntry;
    use crate::frame::FrameType;
    use crate::schema::{
        COLOR_TYPE, FRAME_TIMING_ACCURACY, IMAGE_ENDIANESS, IMAGE_FORMAT, IMAGE_HEIGHT,
        IMAGE_ROW_STRIDE, IMAGE_WIDTH, OFFSET_FRAMES,
    };
    use crate::writer::RavfWriter;
    use std::io::Cursor;

    fn required_fields() -> Vec<(&'static str, ScalarValue)> {
        vec![
            (COLOR_TYPE, ScalarValue::UInt8(0)),
            (IMAGE_ENDIANESS, ScalarValue::UInt8(1)),
            (IMAGE_WIDTH, ScalarValue::UInt32(640)),
            (IMAGE_HEIGHT, ScalarValue::UInt32(480)),
            (IMAGE_ROW_STRIDE, ScalarValue::UInt32(640)),
            (IMAGE_FORMAT, ScalarValue::UInt8(0)),
            (FRAME_TIMING_ACCURACY, ScalarValue::UInt64(500)),
        ]
    }

    fn test_frame(sequence: u32, payload_length: usize) -> FrameRecord {
        FrameRecord {
            frame_type: FrameType::Dark,
            start_timestamp: 400_000_000_000_000_000 + sequence as u64 * 40_000_000,
            exposure_duration: 40_000_000,
            satellites: 11,
            almanac_status: 2,
            almanac_offset: -18,
            satellite_fix_status: 3,
            sequence,
            payload: (0..payload_length).map(|i| (i % 251) as u8).collect(),
        }
    }

    /// Helper: write `count` frames into an in-memory file.
    fn write_file(count: u32) -> Vec<u8> {
        let user = vec![MetadataEntry::from_value("OBSERVATORY-CODE", "Z80")];
        let mut writer =
            RavfWriter::create(Cursor::new(Vec::new()), required_fields(), user).unwrap();
        for sequence in 0..count {
            writer.write_frame(&test_frame(sequence, 16 + sequence as usize)).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_write_and_read_back() {
        let mut reader = RavfReader::open(Cursor::new(write_file(3))).unwrap();
        assert_eq!(reader.version(), 1);
        assert_eq!(reader.frame_count(), 3);
        assert_eq!(reader.header().frame_count(), 3);

        for sequence in 0..3u32 {
            let frame = reader.frame_by_ordinal(sequence as usize).unwrap();
            assert_eq!(frame, test_frame(sequence, 16 + sequence as usize));
        }
    }

    #[test]
    fn test_metadata_lookup() {
        let reader = RavfReader::open(Cursor::new(write_file(1))).unwrap();
        assert_eq!(reader.metadata_value(IMAGE_WIDTH), Some(&ScalarValue::UInt32(640)));
        assert_eq!(
            reader.metadata_value("OBSERVATORY-CODE").and_then(ScalarValue::as_str),
            Some("Z80")
        );
        assert!(reader.metadata_value("NOT-THERE").is_none());

        let metadata = reader.metadata();
        assert_eq!(metadata[0].0, OFFSET_FRAMES);
        assert_eq!(metadata.last().unwrap().0, "OBSERVATORY-CODE");
    }

    #[test]
    fn test_first_frame_at_offset_frames() {
        let reader = RavfReader::open(Cursor::new(write_file(2))).unwrap();
        let offset_frames = reader.header().offset_frames().unwrap();
        assert_eq!(reader.index().item(0).unwrap().offset, offset_frames);
        assert_eq!(offset_frames as usize, reader.header().serialized_len());
    }

    #[test]
    fn test_timestamps() {
        let reader = RavfReader::open(Cursor::new(write_file(3))).unwrap();
        let timestamps = reader.timestamps();
        assert_eq!(timestamps.len(), 3);
        assert_eq!(timestamps[2] - timestamps[0], 80_000_000);
    }

    #[test]
    fn test_empty_file_has_no_frames() {
        let mut reader = RavfReader::open(Cursor::new(write_file(0))).unwrap();
        assert_eq!(reader.frame_count(), 0);
        assert!(reader.timestamps().is_empty());
        assert!(matches!(
            reader.frame_by_ordinal(0),
            Err(RavfError::IndexOutOfRange { ordinal: 0, count: 0 })
        ));
    }

    #[test]
    fn test_frames_iterator() {
        let mut reader = RavfReader::open(Cursor::new(write_file(4))).unwrap();
        let frames = reader.frames();
        assert_eq!(frames.len(), 4);
        let sequences: Vec<u32> = frames.map(|frame| frame.unwrap().sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_bad_header_magic() {
        let mut bytes = write_file(1);
        bytes[0] ^= 0xFF;
        assert!(matches!(
            RavfReader::open(Cursor::new(bytes)),
            Err(RavfError::MagicMismatch { structure: "header", .. })
        ));
    }

    #[test]
    fn test_bad_frame_magic() {
        let bytes = write_file(2);
        let mut reader = RavfReader::open(Cursor::new(bytes.clone())).unwrap();
        let second = reader.index().item(1).unwrap().offset as usize;

        let mut corrupted = bytes;
        corrupted[second] ^= 0x01;
        let mut reader = RavfReader::open(Cursor::new(corrupted)).unwrap();
        assert!(reader.frame_by_ordinal(0).is_ok());
        assert!(matches!(
            reader.frame_by_ordinal(1),
            Err(RavfError::MagicMismatch { structure: "frame", .. })
        ));
    }

    #[test]
    fn test_payload_limit() {
        let config = ReaderConfig {
            max_payload_length: 16,
            ..ReaderConfig::default()
        };
        let mut reader = RavfReader::open_with_config(Cursor::new(write_file(2)), config).unwrap();
        assert!(reader.frame_by_ordinal(0).is_ok());
        assert!(matches!(
            reader.frame_by_ordinal(1),
            Err(RavfError::PayloadTooLarge { length: 17, max_length: 16 })
        ));
    }

    #[test]
    fn test_unfinished_file_is_rejected() {
        let mut writer =
            RavfWriter::create(Cursor::new(Vec::new()), required_fields(), vec![]).unwrap();
        writer.write_frame(&test_frame(0, 8)).unwrap();
        // Skip `finish`: OFFSET-INDEX still holds its zero placeholder, so
        // the "index" parsed at offset 0 starts with the header magic.
        let mut bytes = writer.header().serialize().unwrap();
        bytes.extend_from_slice(&test_frame(0, 8).serialize().unwrap());

        let config = ReaderConfig {
            max_index_entries: 1024,
            ..ReaderConfig::default()
        };
        assert!(matches!(
            RavfReader::open_with_config(Cursor::new(bytes), config),
            Err(RavfError::IndexTooLarge { .. })
        ));
    }

    #[test]
    fn test_open_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("night.ravf");
        std::fs::write(&path, write_file(2)).unwrap();

        let mut reader = RavfReader::open_file(&path).unwrap();
        assert_eq!(reader.frame_count(), 2);
        let frame = reader.frame_by_ordinal(1).unwrap();
        assert_eq!(frame.almanac_offset, -18);
        assert_eq!(frame.frame_type, FrameType::Dark);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            RavfReader::open_file(dir.path().join("absent.ravf")),
            Err(RavfError::Io(_))
        ));
    }

    /// Helper: a source that counts every read and seek.
    struct CountingSource {
        inner: Cursor<Vec<u8>>,
        operations: usize,
    }

    impl Read for CountingSource {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.operations += 1;
            self.inner.read(buf)
        }
    }

    impl Seek for CountingSource {
        fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
            self.operations += 1;
            self.inner.seek(pos)
        }
    }

    #[test]
    fn test_out_of_range_ordinal_does_no_io() {
        let source = CountingSource {
            inner: Cursor::new(write_file(1)),
            operations: 0,
        };
        let mut reader = RavfReader::open(source).unwrap();

        let before = reader.source.operations;
        assert!(matches!(
            reader.frame_by_ordinal(1),
            Err(RavfError::IndexOutOfRange { ordinal: 1, count: 1 })
        ));
        assert_eq!(reader.source.operations, before);

        assert!(reader.frame_by_ordinal(0).is_ok());
        assert!(reader.source.operations > before);
    }
}
