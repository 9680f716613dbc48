//! Two-level threshold mapping.

use serde::{Deserialize, Serialize};

use crate::{luminance, PixelBuffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThresholdParams {
    /// Luminance above which a pixel becomes `white_value`.
    pub threshold: u8,
    pub white_value: u8,
    pub black_value: u8,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            threshold: 128,
            white_value: 255,
            black_value: 0,
        }
    }
}

/// Map each pixel to one of two gray levels. Alpha is preserved.
pub fn threshold_map(pixels: &PixelBuffer, params: &ThresholdParams) -> PixelBuffer {
    PixelBuffer::from_fn(pixels.width(), pixels.height(), |x, y| {
        let [r, g, b, a] = pixels.pixel(x, y);
        let level = if luminance(r as f32, g as f32, b as f32) > params.threshold as f32 {
            params.white_value
        } else {
            params.black_value
        };
        [level, level, level, a]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        let input = PixelBuffer::from_fn(2, 1, |x, _| if x == 0 { [200, 200, 200, 10] } else { [60, 60, 60, 20] });
        let out = threshold_map(&input, &ThresholdParams::default());
        assert_eq!(out.pixel(0, 0), [255, 255, 255, 10]);
        assert_eq!(out.pixel(1, 0), [0, 0, 0, 20]);
    }

    #[test]
    fn test_custom_levels() {
        let params = ThresholdParams {
            threshold: 50,
            white_value: 230,
            black_value: 30,
        };
        let out = threshold_map(&PixelBuffer::filled(1, 1, [60, 60, 60, 255]), &params);
        assert_eq!(out.pixel(0, 0), [230, 230, 230, 255]);
    }
}
