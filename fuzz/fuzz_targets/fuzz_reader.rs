// SPDX-License-Identifier: PMPL-1.0-or-later
// Fuzz target for opening whole files and walking their index

#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use ravf_format::{RavfReader, ReaderConfig};

fuzz_target!(|data: &[u8]| {
    let config = ReaderConfig {
        max_payload_length: 1 << 16,
        max_index_entries: 1 << 12,
    };
    if let Ok(mut reader) = RavfReader::open_with_config(Cursor::new(data), config) {
        let _ = reader.metadata();
        for frame in reader.frames() {
            let _ = frame;
        }
    }
});
