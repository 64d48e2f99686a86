//! Downsampling of generated header images before they are saved.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::domain::AppError;

/// Encoded image ready to be written, with its final dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub resized: bool,
}

/// Scale `bytes` down to at most `max_width` pixels wide.
///
/// The aspect ratio and the encoding (PNG or JPEG) are kept. Images already
/// within the limit are returned byte for byte.
pub fn downsample(bytes: &[u8], max_width: u32) -> Result<HeaderImage, AppError> {
    let format = image::guess_format(bytes).map_err(|e| AppError::Image(e.to_string()))?;
    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
        return Err(AppError::Image(format!("unsupported image format {:?}", format)));
    }
    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| AppError::Image(e.to_string()))?;
    let (width, height) = decoded.dimensions();
    if width <= max_width {
        return Ok(HeaderImage { bytes: bytes.to_vec(), width, height, resized: false });
    }

    let scaled = decoded.resize(max_width, height, FilterType::Lanczos3);
    let scaled = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(scaled.to_rgb8()),
        _ => scaled,
    };
    let (width, height) = scaled.dimensions();
    let mut out = Cursor::new(Vec::new());
    scaled.write_to(&mut out, format).map_err(|e| AppError::Image(e.to_string()))?;
    tracing::debug!(width, height, "header image downsampled");
    Ok(HeaderImage { bytes: out.into_inner(), width, height, resized: true })
}
