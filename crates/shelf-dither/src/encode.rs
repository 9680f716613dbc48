//! Encoded-image entry points.

use std::io::Cursor;

use base64::{engine::general_purpose, Engine};
use image::{codecs::png::PngEncoder, ColorType, ImageEncoder};
use shelf_core::Theme;
use shelf_observability::StructuredLogger;

use crate::{reencode, DitherError, PixelBuffer, Variant};

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Decode any supported format into RGBA8.
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, DitherError> {
    let rgba = image::load_from_memory(bytes)
        .map_err(DitherError::Decode)?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(DitherError::Empty);
    }
    PixelBuffer::new(width, height, rgba.into_raw())
}

pub fn encode_png(pixels: &PixelBuffer) -> Result<Vec<u8>, DitherError> {
    let mut out = Cursor::new(Vec::new());
    PngEncoder::new(&mut out)
        .write_image(
            pixels.as_bytes(),
            pixels.width(),
            pixels.height(),
            ColorType::Rgba8,
        )
        .map_err(DitherError::Encode)?;
    Ok(out.into_inner())
}

pub fn png_data_url(png: &[u8]) -> String {
    format!(
        "{}{}",
        PNG_DATA_URL_PREFIX,
        general_purpose::STANDARD.encode(png)
    )
}

/// Decode, transform and encode as PNG bytes.
pub fn reencode_bytes(bytes: &[u8], variant: &Variant, theme: Theme) -> Result<Vec<u8>, DitherError> {
    let pixels = decode(bytes)?;
    encode_png(&reencode(&pixels, variant, theme))
}

/// Re-encode an image to a PNG data URL.
///
/// Returns `None` when the image cannot be decoded or encoded; callers show
/// the original image instead.
pub fn reencode_image(
    bytes: &[u8],
    variant: &Variant,
    theme: Theme,
    logger: &StructuredLogger,
) -> Option<String> {
    match reencode_bytes(bytes, variant, theme) {
        Ok(png) => Some(png_data_url(&png)),
        Err(err) => {
            logger
                .warn_builder("image re-encode failed")
                .field("variant", variant.name())
                .field("error", err.to_string())
                .field_u64("input_bytes", bytes.len() as u64)
                .emit();
            None
        }
    }
}
