// SPDX-License-Identifier: PMPL-1.0-or-later
// Fuzz target for header and metadata entry decoding

#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use ravf_format::Header;

fuzz_target!(|data: &[u8]| {
    // Decoding must fail cleanly, never panic.
    if let Ok(header) = Header::deserialize(&mut Cursor::new(data)) {
        // Anything that decodes must re-encode to a prefix of the input.
        if let Ok(bytes) = header.serialize() {
            assert_eq!(&data[..bytes.len()], bytes.as_slice());
        }
    }
});
