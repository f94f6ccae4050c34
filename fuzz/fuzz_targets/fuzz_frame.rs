// SPDX-License-Identifier: PMPL-1.0-or-later
// Fuzz target for frame record decoding

#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use ravf_format::FrameRecord;

fuzz_target!(|data: &[u8]| {
    // Keep payload allocations small; the length field is attacker-controlled.
    let _ = FrameRecord::deserialize(&mut Cursor::new(data), 1 << 16);
});
