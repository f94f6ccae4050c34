// SPDX-License-Identifier: PMPL-1.0-or-later
//
// RAVF container format - Session configuration
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use serde::{Deserialize, Serialize};

/// Default upper bound on a single frame payload (256 MiB).
pub const DEFAULT_MAX_PAYLOAD_LENGTH: u32 = 256 * 1024 * 1024;

/// Default upper bound on the number of index entries.
pub const DEFAULT_MAX_INDEX_ENTRIES: u32 = 1 << 24;

/// Controls how often the writer flushes its sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlushMode {
    /// Flush the sink after every frame, handing the bytes to the OS. This
    /// survives a process crash but not a power loss; file-backed writers
    /// call `RavfWriter::sync` for that. The file still needs `finish` to
    /// be readable.
    EveryFrame,

    /// Flush only when the session finishes.
    #[default]
    OnFinish,
}

/// Writer session settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterConfig {
    pub flush: FlushMode,
}

/// Reader session settings. The limits bound allocations driven by length
/// fields read from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Largest frame payload accepted, in bytes.
    pub max_payload_length: u32,
    /// Largest index (in frames) accepted.
    pub max_index_entries: u32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_payload_length: DEFAULT_MAX_PAYLOAD_LENGTH,
            max_index_entries: DEFAULT_MAX_INDEX_ENTRIES,
        }
    }
}
