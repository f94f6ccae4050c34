// SPDX-License-Identifier: PMPL-1.0-or-later
//
// RAVF container format - Frame records
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// A frame record is a fixed-size block of GPS timing and status fields,
// followed by reserved padding and the raw (possibly bit-packed) image
// payload.
//
// On-disk binary format (all integers little-endian):
//   [8 bytes: magic (u64)]          -- 0xAF8ABD3C2A98CA3F
//   [4 bytes: header_length (u32)]  -- offset of the payload from record start
//   [4 bytes: payload_length (u32)]
//   [1 byte:  frame_type]           -- 0=Light, 1=Bias, 2=Dark, 3=Flat
//   [8 bytes: start_timestamp (u64)]   -- ns since 2010-01-01T00:00:00Z
//   [8 bytes: exposure_duration (u64)] -- ns
//   [1 byte:  satellites (u8)]
//   [1 byte:  almanac_status (u8)]
//   [1 byte:  almanac_offset (i8)]
//   [1 byte:  satellite_fix_status (u8)]
//   [4 bytes: sequence (u32)]
//   [60 bytes: reserved, written as zero]
//   [payload_length bytes: payload]

use std::io::{Read, Seek, SeekFrom, Write};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RavfError, RavfResult};
use crate::time::{timestamp_to_calendar, timestamp_to_datetime};
use crate::value::{read_array, read_exact};

/// Frame record magic.
pub const FRAME_MAGIC: u64 = 0xAF8A_BD3C_2A98_CA3F;

/// Size of the fixed field block.
pub const FRAME_FIELDS_SIZE: usize = 41;

/// Reserved bytes after the field block, kept for future fields.
pub const FRAME_RESERVED_SIZE: usize = 60;

/// The header length this crate writes (fields plus reserved bytes).
pub const FRAME_HEADER_LENGTH: u32 = (FRAME_FIELDS_SIZE + FRAME_RESERVED_SIZE) as u32;

// ---------------------------------------------------------------------------
// FrameType
// ---------------------------------------------------------------------------

/// What kind of exposure a frame holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameType {
    /// A science exposure.
    #[default]
    Light = 0,
    /// A zero-length bias frame.
    Bias = 1,
    /// A dark frame (shutter closed).
    Dark = 2,
    /// A flat-field calibration frame.
    Flat = 3,
}

impl FrameType {
    /// Decode a single byte into a `FrameType`.
    pub fn from_byte(byte: u8) -> RavfResult<Self> {
        match byte {
            0 => Ok(Self::Light),
            1 => Ok(Self::Bias),
            2 => Ok(Self::Dark),
            3 => Ok(Self::Flat),
            other => Err(RavfError::InvalidFrameType(other)),
        }
    }

    /// Encode this frame type as a single byte.
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

// ---------------------------------------------------------------------------
// FrameRecord
// ---------------------------------------------------------------------------

/// One captured frame with its timing and GPS status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame_type: FrameType,

    /// Exposure start, nanoseconds since 2010-01-01T00:00:00 UTC.
    pub start_timestamp: u64,

    /// Exposure length in nanoseconds.
    pub exposure_duration: u64,

    /// Number of satellites in view of the timing receiver.
    pub satellites: u8,

    pub almanac_status: u8,

    pub almanac_offset: i8,

    pub satellite_fix_status: u8,

    /// Capture sequence number assigned by the recorder.
    pub sequence: u32,

    /// Raw or bit-packed pixel bytes, exactly as captured.
    pub payload: Vec<u8>,
}

impl FrameRecord {
    /// Total bytes `serialize` produces.
    pub fn serialized_len(&self) -> usize {
        FRAME_HEADER_LENGTH as usize + self.payload.len()
    }

    /// Serialize the field block, reserved bytes and payload.
    pub fn serialize(&self) -> RavfResult<Vec<u8>> {
        let payload_length = encoded_payload_length(self.payload.len())?;

        let mut buffer = Vec::with_capacity(self.serialized_len());
        buffer.extend_from_slice(&FRAME_MAGIC.to_le_bytes());
        buffer.extend_from_slice(&FRAME_HEADER_LENGTH.to_le_bytes());
        buffer.extend_from_slice(&payload_length.to_le_bytes());
        buffer.push(self.frame_type.to_byte());
        buffer.extend_from_slice(&self.start_timestamp.to_le_bytes());
        buffer.extend_from_slice(&self.exposure_duration.to_le_bytes());
        buffer.push(self.satellites);
        buffer.push(self.almanac_status);
        buffer.extend_from_slice(&self.almanac_offset.to_le_bytes());
        buffer.push(self.satellite_fix_status);
        buffer.extend_from_slice(&self.sequence.to_le_bytes());
        buffer.resize(FRAME_HEADER_LENGTH as usize, 0);
        buffer.extend_from_slice(&self.payload);

        Ok(buffer)
    }

    /// Write the record to `sink` in one contiguous write.
    pub fn write<W: Write>(&self, sink: &mut W) -> RavfResult<()> {
        sink.write_all(&self.serialize()?)?;
        Ok(())
    }

    /// Read a record starting at the current position of `source`.
    ///
    /// The payload is read from `start + header_length`, whatever the
    /// reserved bytes contain. Payloads longer than `max_payload_length`
    /// are rejected before any allocation.
    pub fn deserialize<R: Read + Seek>(source: &mut R, max_payload_length: u32) -> RavfResult<Self> {
        let start = source.stream_position()?;

        let magic = u64::from_le_bytes(read_array(source)?);
        if magic != FRAME_MAGIC {
            return Err(RavfError::MagicMismatch {
                structure: "frame",
                expected: FRAME_MAGIC,
                actual: magic,
            });
        }

        let header_length = u32::from_le_bytes(read_array(source)?);
        if (header_length as usize) < FRAME_FIELDS_SIZE {
            return Err(RavfError::InvalidFrameHeaderLength(header_length));
        }
        let payload_length = u32::from_le_bytes(read_array(source)?);
        if payload_length > max_payload_length {
            return Err(RavfError::PayloadTooLarge {
                length: u64::from(payload_length),
                max_length: u64::from(max_payload_length),
            });
        }

        let [frame_type] = read_array::<1, _>(source)?;
        let frame_type = FrameType::from_byte(frame_type)?;
        let start_timestamp = u64::from_le_bytes(read_array(source)?);
        let exposure_duration = u64::from_le_bytes(read_array(source)?);
        let [satellites, almanac_status, almanac_offset, satellite_fix_status] =
            read_array::<4, _>(source)?;
        let sequence = u32::from_le_bytes(read_array(source)?);

        source.seek(SeekFrom::Start(start + header_length as u64))?;

        let mut payload = vec![0u8; payload_length as usize];
        read_exact(source, &mut payload)?;

        Ok(Self {
            frame_type,
            start_timestamp,
            exposure_duration,
            satellites,
            almanac_status,
            almanac_offset: almanac_offset as i8,
            satellite_fix_status,
            sequence,
            payload,
        })
    }

    /// Exposure start as a UTC datetime.
    pub fn start_time_utc(&self) -> DateTime<Utc> {
        timestamp_to_datetime(self.start_timestamp)
    }

    /// Exposure start split into calendar date and time of day.
    pub fn start_timestamp_as_calendar(&self) -> (NaiveDate, NaiveTime) {
        timestamp_to_calendar(self.start_timestamp)
    }

    /// Exposure start as `("YYYY-MM-DD", "HH:MM:SS.ffffff")` text.
    pub fn start_timestamp_as_strings(&self) -> (String, String) {
        let (date, time) = self.start_timestamp_as_calendar();
        (
            date.format("%Y-%m-%d").to_string(),
            time.format("%H:%M:%S%.6f").to_string(),
        )
    }
}

/// The payload length as stored in the u32 length field.
fn encoded_payload_length(len: usize) -> RavfResult<u32> {
    u32::try_from(len).map_err(|_| RavfError::PayloadTooLarge {
        length: len as u64,
        max_length: u64::from(u32::MAX),
    })
}
