// SPDX-License-Identifier: PMPL-1.0-or-later
//! End-to-end tests writing and reading RAVF files on disk

use std::fs;

use ravf_format::schema::{IMAGE_FORMAT, IMAGE_WIDTH, OFFSET_FRAMES};
use ravf_format::{
    FlushMode, FrameRecord, FrameType, MetadataEntry, RavfError, RavfReader, RavfWriter,
    ScalarValue, WriterConfig,
};
use tempfile::TempDir;

fn required_fields() -> Vec<(&'static str, ScalarValue)> {
    vec![
        ("COLOR-TYPE", ScalarValue::UInt8(0)),
        ("IMAGE-ENDIANESS", ScalarValue::UInt8(1)),
        ("IMAGE-WIDTH", ScalarValue::UInt32(8)),
        ("IMAGE-HEIGHT", ScalarValue::UInt32(4)),
        ("IMAGE-ROW-STRIDE", ScalarValue::UInt32(8)),
        ("IMAGE-FORMAT", ScalarValue::UInt8(0)),
        ("FRAME-TIMING-ACCURACY", ScalarValue::UInt64(250)),
    ]
}

fn frame(sequence: u32, start_timestamp: u64) -> FrameRecord {
    FrameRecord {
        frame_type: FrameType::Light,
        start_timestamp,
        exposure_duration: 20_000_000,
        satellites: 7,
        sequence,
        payload: vec![sequence as u8; 32],
        ..FrameRecord::default()
    }
}

#[test]
fn test_three_frames_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("occultation.ravf");

    let user = vec![
        MetadataEntry::from_value("TARGET-ASTEROID", "(4) Vesta"),
        MetadataEntry::from_value("EVENT-EPOCH", ScalarValue::Timestamp(123_456_789)),
    ];
    let mut writer = RavfWriter::create_file(&path, required_fields(), user).unwrap();
    let timestamps = [1_000u64, 2_000, 3_000];
    for (sequence, start) in timestamps.iter().enumerate() {
        writer.write_frame(&frame(sequence as u32, *start)).unwrap();
    }
    assert_eq!(writer.frame_count(), 3);
    writer.finish().unwrap();

    let mut reader = RavfReader::open_file(&path).unwrap();
    assert_eq!(reader.frame_count(), 3);
    assert_eq!(reader.timestamps(), timestamps.to_vec());
    assert_eq!(
        reader.metadata_value("TARGET-ASTEROID").and_then(ScalarValue::as_str),
        Some("(4) Vesta")
    );
    assert_eq!(
        reader.metadata_value("EVENT-EPOCH"),
        Some(&ScalarValue::Timestamp(123_456_789))
    );
    assert_eq!(reader.frame_by_ordinal(2).unwrap(), frame(2, 3_000));
}

#[test]
fn test_zero_frame_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.ravf");
    RavfWriter::create_file(&path, required_fields(), vec![])
        .unwrap()
        .finish()
        .unwrap();

    let reader = RavfReader::open_file(&path).unwrap();
    assert_eq!(reader.frame_count(), 0);
    let header_length = reader.header().offset_frames().unwrap();
    assert_eq!(reader.header().offset_index(), Some(header_length));
    assert_eq!(fs::metadata(&path).unwrap().len(), header_length + 4);
}

#[test]
fn test_flush_every_frame() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flushed.ravf");
    let file = fs::File::create(&path).unwrap();

    let config = WriterConfig {
        flush: FlushMode::EveryFrame,
    };
    let mut writer =
        RavfWriter::create_with_config(std::io::BufWriter::new(file), required_fields(), vec![], config)
            .unwrap();
    writer.write_frame(&frame(0, 10)).unwrap();

    let header_length = writer.header().serialized_len() as u64;
    let expected = header_length + frame(0, 10).serialized_len() as u64;
    assert_eq!(fs::metadata(&path).unwrap().len(), expected);

    writer.finish().unwrap();
    assert_eq!(RavfReader::open_file(&path).unwrap().frame_count(), 1);
}

#[test]
fn test_corrupt_header_magic() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("corrupt.ravf");
    let mut writer = RavfWriter::create_file(&path, required_fields(), vec![]).unwrap();
    writer.write_frame(&frame(0, 1)).unwrap();
    writer.finish().unwrap();

    let mut bytes = fs::read(&path).unwrap();
    bytes[..4].copy_from_slice(b"AVI ");
    fs::write(&path, bytes).unwrap();

    assert!(matches!(
        RavfReader::open_file(&path),
        Err(RavfError::MagicMismatch { structure: "header", expected: 0x4656_4152, .. })
    ));
}

#[test]
fn test_schema_violations() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rejected.ravf");

    let missing: Vec<_> = required_fields()
        .into_iter()
        .filter(|(name, _)| *name != IMAGE_FORMAT)
        .collect();
    assert!(matches!(
        RavfWriter::create_file(&path, missing, vec![]),
        Err(RavfError::MissingRequiredField(name)) if name == IMAGE_FORMAT
    ));

    let mut private = required_fields();
    private.push((OFFSET_FRAMES, ScalarValue::UInt64(0)));
    assert!(matches!(
        RavfWriter::create_file(&path, private, vec![]),
        Err(RavfError::NameCollision(name)) if name == OFFSET_FRAMES
    ));

    let mut unknown = required_fields();
    unknown.push(("SHOE-SIZE", ScalarValue::UInt8(9)));
    assert!(matches!(
        RavfWriter::create_file(&path, unknown, vec![]),
        Err(RavfError::UnknownField(name)) if name == "SHOE-SIZE"
    ));

    let mut mistyped = required_fields();
    mistyped.retain(|(name, _)| *name != IMAGE_WIDTH);
    mistyped.push((IMAGE_WIDTH, ScalarValue::Int32(8)));
    assert!(matches!(
        RavfWriter::create_file(&path, mistyped, vec![]),
        Err(RavfError::TypeMismatch { .. })
    ));
}

#[test]
fn test_ordinal_out_of_range() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("short.ravf");
    let mut writer = RavfWriter::create_file(&path, required_fields(), vec![]).unwrap();
    writer.write_frame(&frame(0, 5)).unwrap();
    writer.finish().unwrap();

    let mut reader = RavfReader::open_file(&path).unwrap();
    assert!(matches!(
        reader.frame_by_ordinal(1),
        Err(RavfError::IndexOutOfRange { ordinal: 1, count: 1 })
    ));
    assert!(reader.frame_by_ordinal(0).is_ok());
}
