use thiserror::Error;

#[derive(Debug, Error)]
pub enum DitherError {
    #[error("pixel buffer of {len} bytes does not match {width}x{height} RGBA")]
    BufferSize { width: u32, height: u32, len: usize },

    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("image has no pixels")]
    Empty,
}
