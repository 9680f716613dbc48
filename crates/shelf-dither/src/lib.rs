//! Stylized re-encoding of product images.
//!
//! This crate provides:
//! - `PixelBuffer` - An owned RGBA8 buffer
//! - `Variant` - Ordered dithering, Floyd-Steinberg diffusion or plain threshold
//! - `reencode` - The pure pixel transform
//! - `reencode_image` - Decode, transform and emit a PNG data URL
//!
//! Every transform is a pure function of its inputs: the same pixels and
//! parameters always produce byte-identical output.

mod diffusion;
mod encode;
mod error;
mod ordered;
mod palette;
mod pixels;
mod threshold;
mod variant;

pub use diffusion::*;
pub use encode::*;
pub use error::*;
pub use ordered::*;
pub use palette::*;
pub use pixels::*;
pub use threshold::*;
pub use variant::*;

/// Perceptual luminance used by every variant.
#[inline]
pub fn luminance(r: f32, g: f32, b: f32) -> f32 {
    r * 0.3 + g * 0.59 + b * 0.11
}
