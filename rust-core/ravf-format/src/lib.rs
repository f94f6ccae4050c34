// SPDX-License-Identifier: PMPL-1.0-or-later
//
// RAVF container format crate
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reads and writes RAVF files: seekable containers for GPS-timed
// astronomical video frames. A file carries a typed, self-describing
// metadata header, a stream of timestamped frame records and a trailing
// index that maps frame ordinals to byte offsets.
//
// # File layout
//
// ```text
// [Header][Frame 0][Frame 1]...[Frame N-1][Index]
// ```
//
// The writer emits the header first with placeholder bookkeeping values,
// appends frames, then on `finish` appends the index and rewrites the
// header in place so that `OFFSET-INDEX` and `FRAMES-COUNT` are correct.
// Every bookkeeping field is fixed-width, so the rewrite never changes the
// header's length.
//
// ## Header (all integers little-endian)
//
// ```text
// [4 bytes: magic (u32)]          -- 0x46564152
// [2 bytes: version (u16)]        -- 1
// [4 bytes: entry_count (u32)]
// [entry_count x MetadataEntry]
// ```
//
// ## MetadataEntry
//
// ```text
// [2 bytes: name_length (u16)][name_length bytes: UTF-8 name]
// [1 byte: kind tag]              -- 0..=11, see `ScalarKind`
// [value]                         -- fixed-width LE, or u16-length-prefixed UTF-8
// ```
//
// ## Frame record
//
// ```text
// [8 bytes: magic (u64)]          -- 0xAF8ABD3C2A98CA3F
// [4 bytes: header_length (u32)]  -- 101 when written
// [4 bytes: payload_length (u32)]
// [1 byte:  frame_type]           -- 0=Light, 1=Bias, 2=Dark, 3=Flat
// [8 bytes: start_timestamp]      -- ns since 2010-01-01T00:00:00 UTC
// [8 bytes: exposure_duration]    -- ns
// [1 byte:  satellites]
// [1 byte:  almanac_status]
// [1 byte:  almanac_offset (i8)]
// [1 byte:  satellite_fix_status]
// [4 bytes: sequence (u32)]
// [header_length - 41 bytes: reserved]
// [payload_length bytes: payload]
// ```
//
// ## Index
//
// ```text
// [4 bytes: frame_count (u32)]
// [frame_count x (offset u64, start_timestamp u64)]
// ```
//
// ## Usage
//
// ```no_run
// use ravf_format::{FrameRecord, RavfReader, RavfWriter, ScalarValue};
//
// let required = vec![
//     ("COLOR-TYPE", ScalarValue::UInt8(0)),
//     ("IMAGE-ENDIANESS", ScalarValue::UInt8(1)),
//     ("IMAGE-WIDTH", ScalarValue::UInt32(640)),
//     ("IMAGE-HEIGHT", ScalarValue::UInt32(480)),
//     ("IMAGE-ROW-STRIDE", ScalarValue::UInt32(640)),
//     ("IMAGE-FORMAT", ScalarValue::UInt8(0)),
//     ("FRAME-TIMING-ACCURACY", ScalarValue::UInt64(1_000)),
// ];
//
// let mut writer = RavfWriter::create_file("/tmp/night.ravf", required, vec![]).unwrap();
// writer.write_frame(&FrameRecord { payload: vec![0; 640 * 480], ..Default::default() }).unwrap();
// writer.finish().unwrap();
//
// let mut reader = RavfReader::open_file("/tmp/night.ravf").unwrap();
// let frame = reader.frame_by_ordinal(0).unwrap();
// println!("{:?}", frame.start_timestamp_as_strings());
// ```

pub mod config;
pub mod entry;
pub mod error;
pub mod frame;
pub mod header;
pub mod index;
pub mod reader;
pub mod schema;
pub mod time;
pub mod value;
pub mod writer;

// Re-export the primary public API for ergonomic imports.
pub use config::{FlushMode, ReaderConfig, WriterConfig};
pub use entry::MetadataEntry;
pub use error::{RavfError, RavfResult};
pub use frame::{FrameRecord, FrameType, FRAME_HEADER_LENGTH, FRAME_MAGIC};
pub use header::{Header, RAVF_MAGIC, RAVF_VERSION};
pub use index::{FrameIndex, IndexEntry};
pub use reader::{Frames, RavfReader};
pub use schema::{ColorType, Equinox, ImageEndianness, ImageFormat};
pub use value::{ScalarKind, ScalarValue};
pub use writer::{build_metadata, RavfWriter};
