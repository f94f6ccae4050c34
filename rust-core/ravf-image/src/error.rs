// SPDX-License-Identifier: PMPL-1.0-or-later
//
// RAVF container format - Image decoding errors
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use ravf_format::RavfError;
use thiserror::Error;

/// Errors raised while turning a frame payload into an image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Reading the frame or its metadata failed.
    #[error("RAVF format error: {0}")]
    Format(#[from] RavfError),

    #[error("Unsupported image format tag: {0}")]
    UnsupportedFormat(u8),

    #[error("Unsupported color type tag: {0}")]
    UnsupportedColorType(u8),

    /// A buffer or row does not have the size the geometry implies.
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Invalid bit depth: {0}")]
    InvalidBitDepth(u8),

    /// The color converter failed.
    #[error("Color conversion failed: {0}")]
    Conversion(String),
}

/// Convenience alias used throughout the image crate.
pub type ImageResult<T> = Result<T, ImageError>;
