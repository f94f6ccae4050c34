// SPDX-License-Identifier: PMPL-1.0-or-later
//
// RAVF container format - Pixel unpacker
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Turns raw frame payloads into linear 16-bit sample grids. Payloads are
// row-major with `stride` bytes per row; rows may carry trailing padding.
//
// Packed layouts (bytes left to right):
//   12-bit: [aaaabbbb][AAAAAAAA][BBBBBBBB]            -> A, B
//   10-bit: [AAAAAAAA][BBBBBBBB][CCCCCCCC][DDDDDDDD][aabbccdd] -> A, B, C, D

use std::borrow::Cow;

use ndarray::{s, Array2, ArrayView2};

use crate::error::{ImageError, ImageResult};

/// How the columns of a payload row relate to image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLayout {
    /// Two pixels per three bytes.
    Packed12,
    /// Four pixels per five bytes.
    Packed10,
    /// One column per pixel (8-bit bytes or 16-bit words).
    Samples,
}

impl RowLayout {
    /// Columns holding pixel data for an image `width` pixels wide.
    pub fn trimmed_columns(self, width: usize) -> usize {
        match self {
            Self::Packed12 => (width * 3) / 2,
            Self::Packed10 => (width * 5) / 4,
            Self::Samples => width,
        }
    }
}

fn check_buffer_len(len: usize, stride: usize, height: usize) -> ImageResult<()> {
    let expected = stride.checked_mul(height).unwrap_or(usize::MAX);
    if len != expected {
        return Err(ImageError::ShapeMismatch {
            expected,
            actual: len,
        });
    }
    Ok(())
}

/// View `buffer` as `height` rows of `stride` bytes.
pub fn grid_u8(buffer: &[u8], stride: usize, height: usize) -> ImageResult<ArrayView2<'_, u8>> {
    check_buffer_len(buffer.len(), stride, height)?;
    ArrayView2::from_shape((height, stride), buffer).map_err(|_| ImageError::ShapeMismatch {
        expected: stride * height,
        actual: buffer.len(),
    })
}

/// Decode `buffer` as `height` rows of `stride / 2` little-endian words.
pub fn grid_u16_le(buffer: &[u8], stride: usize, height: usize) -> ImageResult<Array2<u16>> {
    check_buffer_len(buffer.len(), stride, height)?;
    if stride % 2 != 0 {
        return Err(ImageError::ShapeMismatch {
            expected: stride + 1,
            actual: stride,
        });
    }

    let samples: Vec<u16> = buffer
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    Array2::from_shape_vec((height, stride / 2), samples).map_err(|_| ImageError::ShapeMismatch {
        expected: stride * height,
        actual: buffer.len(),
    })
}

/// Drop the stride padding at the end of each row.
///
/// Fails with `ShapeMismatch` if the rows are narrower than `width` needs.
pub fn unstride<'a, T>(
    grid: ArrayView2<'a, T>,
    layout: RowLayout,
    width: usize,
) -> ImageResult<ArrayView2<'a, T>> {
    let columns = layout.trimmed_columns(width);
    if columns > grid.ncols() {
        return Err(ImageError::ShapeMismatch {
            expected: columns,
            actual: grid.ncols(),
        });
    }
    Ok(grid.slice_move(s![.., ..columns]))
}

/// Run `decode` over every `group`-byte run of every row, collecting
/// `per_group` pixels per run.
fn unpack_rows<const N: usize>(
    grid: ArrayView2<'_, u8>,
    per_group: usize,
    decode: impl Fn(&[u8; N], &mut Vec<u16>),
) -> ImageResult<Array2<u16>> {
    let (rows, columns) = grid.dim();
    if columns % N != 0 {
        return Err(ImageError::ShapeMismatch {
            expected: columns - columns % N,
            actual: columns,
        });
    }

    let out_columns = columns / N * per_group;
    let mut pixels = Vec::with_capacity(rows * out_columns);
    for row in grid.rows() {
        let bytes: Cow<'_, [u8]> = match row.as_slice() {
            Some(slice) => Cow::Borrowed(slice),
            None => Cow::Owned(row.to_vec()),
        };
        for chunk in bytes.chunks_exact(N) {
            let mut group = [0u8; N];
            group.copy_from_slice(chunk);
            decode(&group, &mut pixels);
        }
    }

    Array2::from_shape_vec((rows, out_columns), pixels).map_err(|_| ImageError::ShapeMismatch {
        expected: rows * out_columns,
        actual: rows * columns,
    })
}

/// Unpack 12-bit pixels stored two per three bytes.
///
/// Row length must be a multiple of 3 bytes.
pub fn unpack_12bit_packed(grid: ArrayView2<'_, u8>) -> ImageResult<Array2<u16>> {
    unpack_rows::<3>(grid, 2, |&[b0, b1, b2], out| {
        let (b0, b1, b2) = (u16::from(b0), u16::from(b1), u16::from(b2));
        out.push((b1 << 4) | ((b0 >> 4) & 0xF));
        out.push((b2 << 4) | (b0 & 0xF));
    })
}

/// Unpack 10-bit pixels stored four per five bytes. The fifth byte holds
/// the two low bits of each pixel, first pixel in the top bits.
///
/// Row length must be a multiple of 5 bytes.
pub fn unpack_10bit_packed(grid: ArrayView2<'_, u8>) -> ImageResult<Array2<u16>> {
    unpack_rows::<5>(grid, 4, |group, out| {
        let low = u16::from(group[4]);
        for (i, &high) in group[..4].iter().enumerate() {
            let shift = 6 - 2 * i as u16;
            out.push((u16::from(high) << 2) | ((low >> shift) & 0x3));
        }
    })
}

/// Stretch `bit_depth`-bit samples to the full 16-bit range in place.
pub fn scale_to_16bit(image: &mut Array2<u16>, bit_depth: u8) -> ImageResult<()> {
    if bit_depth == 0 || bit_depth > 16 {
        return Err(ImageError::InvalidBitDepth(bit_depth));
    }
    let shift = 16 - u32::from(bit_depth);
    if shift > 0 {
        image.mapv_inplace(|sample| sample << shift);
    }
    Ok(())
}
