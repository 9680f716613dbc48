use serde::{Deserialize, Serialize};
use shelf_core::Theme;

use crate::{
    floyd_steinberg, ordered_dither, threshold_map, OrderedParams, Palette, PixelBuffer,
    ThresholdParams,
};

/// Re-encoding algorithm with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Variant {
    Ordered(OrderedParams),
    FloydSteinberg(Palette),
    Threshold(ThresholdParams),
}

impl Variant {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ordered(_) => "ordered",
            Self::FloydSteinberg(_) => "floydSteinberg",
            Self::Threshold(_) => "threshold",
        }
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::Ordered(OrderedParams::default())
    }
}

/// Apply `variant` to `pixels`. Only ordered dithering depends on `theme`.
pub fn reencode(pixels: &PixelBuffer, variant: &Variant, theme: Theme) -> PixelBuffer {
    match variant {
        Variant::Ordered(params) => ordered_dither(pixels, params, theme),
        Variant::FloydSteinberg(palette) => floyd_steinberg(pixels, palette),
        Variant::Threshold(params) => threshold_map(pixels, params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_serialization() {
        let json = serde_json::to_value(Variant::Ordered(OrderedParams::default())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "ordered", "contrast": 1.0, "bias": 0.0, "saturation": 1.0})
        );

        let parsed: Variant = serde_json::from_str(r#"{"kind": "threshold", "threshold": 90}"#).unwrap();
        assert_eq!(
            parsed,
            Variant::Threshold(ThresholdParams {
                threshold: 90,
                ..ThresholdParams::default()
            })
        );
    }

    #[test]
    fn test_theme_only_affects_ordered() {
        let input = PixelBuffer::from_fn(8, 8, |x, y| [(x * 30) as u8, (y * 30) as u8, 128, 255]);
        let diffusion = Variant::FloydSteinberg(Palette::game_boy());
        assert_eq!(
            reencode(&input, &diffusion, Theme::Light),
            reencode(&input, &diffusion, Theme::Dark)
        );

        let ordered = Variant::default();
        assert_ne!(
            reencode(&input, &ordered, Theme::Light),
            reencode(&input, &ordered, Theme::Dark)
        );
    }
}
