//! Re-encode a local image with a dithering variant.

use anyhow::{Context as _, Result};
use shelf_core::Theme;
use shelf_dither::{
    png_data_url, reencode_bytes, OrderedParams, Palette, ThresholdParams, Variant,
};

use super::{DitherArgs, VariantKind};
use crate::context::Context;
use crate::output::format_bytes;

fn variant_for(args: &DitherArgs) -> Variant {
    match args.variant {
        VariantKind::Ordered => Variant::Ordered(
            OrderedParams::default()
                .with_contrast(args.contrast)
                .with_bias(args.bias)
                .with_saturation(args.saturation)
                .clamped(),
        ),
        VariantKind::GameBoy => Variant::FloydSteinberg(Palette::game_boy()),
        VariantKind::Threshold => Variant::Threshold(ThresholdParams {
            threshold: args.threshold,
            white_value: args.white,
            black_value: args.black,
        }),
    }
}

/// Run the dither command.
pub async fn run(args: DitherArgs, ctx: &Context) -> Result<()> {
    let input = ctx.resolve_path(&args.input);
    let bytes = std::fs::read(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let variant = variant_for(&args);
    let theme = if args.dark { Theme::Dark } else { Theme::Light };
    ctx.output.debug(&format!("{:?} ({:?})", variant, theme));

    let png = reencode_bytes(&bytes, &variant, theme)
        .with_context(|| format!("Failed to re-encode {}", input.display()))?;

    if args.data_url {
        println!("{}", png_data_url(&png));
        return Ok(());
    }

    if let Some(output) = &args.output {
        let path = ctx.resolve_path(output);
        std::fs::write(&path, &png)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        if ctx.output.is_json() {
            ctx.output.json(&serde_json::json!({
                "path": path.display().to_string(),
                "variant": variant,
                "bytes": png.len(),
            }));
        } else {
            ctx.output.success(&format!(
                "{} → {} ({}, {})",
                input.display(),
                path.display(),
                variant.name(),
                format_bytes(png.len() as u64)
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: DitherArgs,
    }

    fn parse(argv: &[&str]) -> Result<DitherArgs, clap::Error> {
        Harness::try_parse_from(std::iter::once("dither").chain(argv.iter().copied()))
            .map(|h| h.args)
    }

    #[test]
    fn test_requires_one_target() {
        assert!(parse(&["in.png"]).is_err());
        assert!(parse(&["in.png", "-o", "out.png", "--data-url"]).is_err());
        assert!(parse(&["in.png", "--data-url"]).is_ok());
    }

    #[test]
    fn test_ordered_params_are_clamped() {
        let args = parse(&["in.png", "-o", "o.png", "--contrast", "9", "--bias", "-500"]).unwrap();
        match variant_for(&args) {
            Variant::Ordered(params) => {
                assert_eq!(params.contrast, 4.0);
                assert_eq!(params.bias, -200.0);
            }
            other => panic!("unexpected variant {:?}", other),
        }
    }

    #[test]
    fn test_threshold_variant() {
        let args = parse(&[
            "in.png", "--data-url", "--variant", "threshold", "--threshold", "90", "--white", "200",
        ])
        .unwrap();
        assert_eq!(
            variant_for(&args),
            Variant::Threshold(ThresholdParams {
                threshold: 90,
                white_value: 200,
                black_value: 0,
            })
        );
    }

    #[test]
    fn test_game_boy_variant() {
        let args = parse(&["in.png", "--data-url", "--variant", "game-boy"]).unwrap();
        assert_eq!(variant_for(&args), Variant::FloydSteinberg(Palette::game_boy()));
    }
}
