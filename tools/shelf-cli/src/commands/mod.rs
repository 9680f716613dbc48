//! CLI command implementations.

pub mod asset;
pub mod catalog;
pub mod dither;
pub mod status;

use std::path::PathBuf;

use clap::{ArgGroup, Args, ValueEnum};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    /// Show at most this many products.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {}

/// Arguments for the asset command.
#[derive(Args)]
pub struct AssetArgs {
    /// Proxy query string, e.g. `url=...&pageId=...&cover=true`.
    pub query: String,

    /// Write the image bytes to this file.
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Dithering variant selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum VariantKind {
    /// Bayer 4x4 two-tone with tone mapping.
    Ordered,
    /// Floyd-Steinberg diffusion onto the four-tone green palette.
    GameBoy,
    /// Single luminance threshold.
    Threshold,
}

/// Arguments for the dither command.
#[derive(Args)]
#[command(group(ArgGroup::new("target").required(true).args(["output", "data_url"])))]
pub struct DitherArgs {
    /// Input image (PNG, JPEG, GIF or WebP).
    pub input: PathBuf,

    /// Variant to apply.
    #[arg(long, value_enum, default_value_t = VariantKind::Ordered)]
    pub variant: VariantKind,

    /// Contrast gain (ordered).
    #[arg(long, default_value_t = 1.0)]
    pub contrast: f32,

    /// Brightness bias (ordered).
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub bias: f32,

    /// Color saturation (ordered).
    #[arg(long, default_value_t = 1.0)]
    pub saturation: f32,

    /// Luminance threshold (threshold).
    #[arg(long, default_value_t = 128)]
    pub threshold: u8,

    /// Gray level above the threshold (threshold).
    #[arg(long, default_value_t = 255)]
    pub white: u8,

    /// Gray level at or below the threshold (threshold).
    #[arg(long, default_value_t = 0)]
    pub black: u8,

    /// Render for the dark theme.
    #[arg(long)]
    pub dark: bool,

    /// Write the PNG to this file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print a PNG data URL instead of writing a file.
    #[arg(long)]
    pub data_url: bool,
}
