//! Persisted bitmap encoding: 8-bit grayscale PNG.

use crate::model::Bitmap;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, ImageFormat};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("image data is empty")]
    Empty,
    #[error("image has zero width or height")]
    ZeroSize,
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Encode a bitmap as a grayscale PNG.
pub fn encode_png(bitmap: &Bitmap) -> Result<Vec<u8>, CodecError> {
    let mut png_data = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut png_data, CompressionType::Best, FilterType::Adaptive);
    encoder
        .write_image(
            bitmap.as_raw(),
            bitmap.width(),
            bitmap.height(),
            ExtendedColorType::L8,
        )
        .map_err(CodecError::Encode)?;
    Ok(png_data)
}

/// Decode PNG bytes into a bitmap. Color images are reduced to luma.
pub fn decode_png(bytes: &[u8]) -> Result<Bitmap, CodecError> {
    if bytes.is_empty() {
        return Err(CodecError::Empty);
    }
    let image =
        image::load_from_memory_with_format(bytes, ImageFormat::Png).map_err(CodecError::Decode)?;
    Bitmap::from_image(image.into_luma8()).ok_or(CodecError::ZeroSize)
}
