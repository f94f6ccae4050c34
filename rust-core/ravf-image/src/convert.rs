// SPDX-License-Identifier: PMPL-1.0-or-later
//
// RAVF container format - Color conversion seam
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Debayering and other color work belong to an image-processing library.
// The decoder calls a `ColorConverter` for every frame whose COLOR-TYPE is
// not MONO and takes back whatever grid it returns.

use ndarray::Array2;
use ravf_format::{ColorType, ImageFormat};

use crate::error::ImageResult;

/// Converts a linear 16-bit sample grid in `source` arrangement.
pub trait ColorConverter {
    /// `format` is the payload format the samples were decoded from; some
    /// sensors use a different mosaic per readout mode.
    fn convert(
        &self,
        image: Array2<u16>,
        source: ColorType,
        format: ImageFormat,
    ) -> ImageResult<Array2<u16>>;
}

/// Returns samples unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConversion;

impl ColorConverter for NoConversion {
    fn convert(
        &self,
        image: Array2<u16>,
        _source: ColorType,
        _format: ImageFormat,
    ) -> ImageResult<Array2<u16>> {
        Ok(image)
    }
}

impl<F> ColorConverter for F
where
    F: Fn(Array2<u16>, ColorType, ImageFormat) -> ImageResult<Array2<u16>>,
{
    fn convert(
        &self,
        image: Array2<u16>,
        source: ColorType,
        format: ImageFormat,
    ) -> ImageResult<Array2<u16>> {
        self(image, source, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImageError;
    use ndarray::array;

    #[test]
    fn test_no_conversion_is_identity() {
        let image = array![[1u16, 2], [3, 4]];
        let converted = NoConversion
            .convert(image.clone(), ColorType::BayerRggb, ImageFormat::Packed12Bit)
            .unwrap();
        assert_eq!(converted, image);
    }

    #[test]
    fn test_closure_converter() {
        let halve = |image: Array2<u16>, _: ColorType, _: ImageFormat| -> ImageResult<Array2<u16>> {
            Ok(image.mapv(|sample| sample / 2))
        };
        let converted = halve
            .convert(array![[10u16, 20]], ColorType::Rgb, ImageFormat::Format16Bit)
            .unwrap();
        assert_eq!(converted, array![[5u16, 10]]);

        let failing = |_: Array2<u16>, source: ColorType, _: ImageFormat| -> ImageResult<Array2<u16>> {
            Err(ImageError::Conversion(format!("{source:?} not supported")))
        };
        assert!(matches!(
            failing.convert(array![[0u16]], ColorType::BayerCyym, ImageFormat::Format8Bit),
            Err(ImageError::Conversion(_))
        ));
    }
}
