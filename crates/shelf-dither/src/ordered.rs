//! Ordered (Bayer-style) dithering with tone mapping.
//!
//! Light pixels become transparent paper and dark pixels opaque ink, so the
//! result works as an overlay on any background.

use serde::{Deserialize, Serialize};
use shelf_core::Theme;

use crate::{luminance, PixelBuffer};

/// 4x4 threshold matrix, indexed `[y % 4][x % 4]`.
pub const THRESHOLD_MATRIX: [[u8; 4]; 4] = [
    [0, 128, 32, 160],
    [192, 64, 224, 96],
    [48, 176, 16, 144],
    [240, 112, 208, 80],
];

pub const PAPER: [u8; 3] = [245, 245, 240];
pub const INK: [u8; 3] = [43, 43, 43];

pub const CONTRAST_RANGE: (f32, f32) = (0.2, 4.0);
pub const BIAS_RANGE: (f32, f32) = (-200.0, 200.0);
pub const SATURATION_RANGE: (f32, f32) = (0.0, 3.0);

/// Tone-mapping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderedParams {
    /// Gain around the midpoint 128.
    pub contrast: f32,
    /// Added after the contrast gain.
    pub bias: f32,
    /// 0 is grayscale, 1 the original colors, above 1 boosted.
    pub saturation: f32,
}

impl Default for OrderedParams {
    fn default() -> Self {
        Self {
            contrast: 1.0,
            bias: 0.0,
            saturation: 1.0,
        }
    }
}

impl OrderedParams {
    pub fn with_contrast(mut self, contrast: f32) -> Self {
        self.contrast = contrast;
        self
    }

    pub fn with_bias(mut self, bias: f32) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_saturation(mut self, saturation: f32) -> Self {
        self.saturation = saturation;
        self
    }

    /// Parameters clamped to their supported ranges. NaN falls back to the
    /// default value.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        Self {
            contrast: clamp_or(self.contrast, CONTRAST_RANGE, defaults.contrast),
            bias: clamp_or(self.bias, BIAS_RANGE, defaults.bias),
            saturation: clamp_or(self.saturation, SATURATION_RANGE, defaults.saturation),
        }
    }

    /// Tone-mapped intensity of one pixel, in `[0, 255]`.
    pub fn adjusted_intensity(&self, r: u8, g: u8, b: u8) -> f32 {
        let (r, g, b) = (r as f32, g as f32, b as f32);
        let lum = luminance(r, g, b);

        let sr = (lum + (r - lum) * self.saturation).clamp(0.0, 255.0);
        let sg = (lum + (g - lum) * self.saturation).clamp(0.0, 255.0);
        let sb = (lum + (b - lum) * self.saturation).clamp(0.0, 255.0);

        let gray = luminance(sr, sg, sb);
        ((gray - 128.0) * self.contrast + 128.0 + self.bias).clamp(0.0, 255.0)
    }
}

fn clamp_or(value: f32, (min, max): (f32, f32), fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

/// Apply ordered dithering. In the dark theme the ink takes the paper tone
/// so the stipple stays visible on a dark surface.
pub fn ordered_dither(pixels: &PixelBuffer, params: &OrderedParams, theme: Theme) -> PixelBuffer {
    let params = params.clamped();
    let ink = if theme.is_dark() { PAPER } else { INK };

    PixelBuffer::from_fn(pixels.width(), pixels.height(), |x, y| {
        let [r, g, b, _] = pixels.pixel(x, y);
        let threshold = THRESHOLD_MATRIX[(y % 4) as usize][(x % 4) as usize] as f32;

        if params.adjusted_intensity(r, g, b) > threshold {
            [PAPER[0], PAPER[1], PAPER[2], 0]
        } else {
            [ink[0], ink[1], ink[2], 255]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_is_transparent_paper() {
        let out = ordered_dither(
            &PixelBuffer::filled(4, 4, [255, 255, 255, 255]),
            &OrderedParams::default(),
            Theme::Light,
        );
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(out.pixel(x, y), [245, 245, 240, 0]);
            }
        }
    }

    #[test]
    fn test_black_is_opaque_ink() {
        let out = ordered_dither(
            &PixelBuffer::filled(4, 4, [0, 0, 0, 255]),
            &OrderedParams::default(),
            Theme::Light,
        );
        assert_eq!(out.pixel(0, 0), [43, 43, 43, 255]);
        assert_eq!(out.pixel(3, 3), [43, 43, 43, 255]);
    }

    #[test]
    fn test_matrix_position_decides_midtone() {
        // Luminance 100: above thresholds 0, 32, 64, 96, 16, 48, 80; below the rest.
        let out = ordered_dither(
            &PixelBuffer::filled(4, 4, [100, 100, 100, 255]),
            &OrderedParams::default(),
            Theme::Light,
        );
        let paper = (0..16)
            .filter(|i| out.pixel(i % 4, i / 4)[3] == 0)
            .count();
        assert_eq!(paper, 7);
        assert_eq!(out.pixel(0, 0)[3], 0);
        assert_eq!(out.pixel(1, 0)[3], 255);
    }

    #[test]
    fn test_dark_theme_ink_uses_paper_tone() {
        let out = ordered_dither(
            &PixelBuffer::filled(1, 1, [0, 0, 0, 255]),
            &OrderedParams::default(),
            Theme::Dark,
        );
        assert_eq!(out.pixel(0, 0), [245, 245, 240, 255]);
    }

    #[test]
    fn test_params_are_clamped() {
        let p = OrderedParams {
            contrast: 10.0,
            bias: -500.0,
            saturation: f32::NAN,
        }
        .clamped();
        assert_eq!(p.contrast, 4.0);
        assert_eq!(p.bias, -200.0);
        assert_eq!(p.saturation, 1.0);
    }

    #[test]
    fn test_params_deserialize_with_defaults() {
        let p: OrderedParams = serde_json::from_str(r#"{"bias": 20}"#).unwrap();
        assert_eq!(p, OrderedParams::default().with_bias(20.0));
    }
}
