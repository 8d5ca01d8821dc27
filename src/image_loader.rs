//! Capture loading for the extraction pipeline
//!
//! The capture collaborator writes browser screenshots to disk as PNG or
//! JPEG; this module decodes them (and the other formats a webcam stack
//! plausibly produces) into `RgbImage` buffers for the pipeline. In-memory
//! buffers are supported for callers that never touch the filesystem.

use crate::error::{ExtractionError, Result};
use image::{GrayImage, ImageReader, RgbImage};
use std::path::Path;

/// Supported capture formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG image
    Png,
    /// JPEG image
    Jpeg,
    /// WebP image
    WebP,
    /// BMP image
    Bmp,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["png", "jpg", "jpeg", "webp", "bmp"]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}

/// Load a capture from disk as an 8-bit RGB image
///
/// # Errors
///
/// Returns `ExtractionError::ImageLoad` if the file cannot be opened, the
/// extension is not a supported capture format, or decoding fails.
pub fn load_image(path: &Path) -> Result<RgbImage> {
    if ImageFormat::from_extension(path).is_none() {
        return Err(ExtractionError::ImageLoad {
            message: format!("Unsupported capture format: {}", path.display()),
            source: None,
        });
    }

    let reader = ImageReader::open(path).map_err(|e| {
        ExtractionError::image_load(format!("Failed to open capture file: {}", path.display()), e)
    })?;

    let img = reader.decode().map_err(|e| {
        ExtractionError::image_load(format!("Failed to decode capture: {}", path.display()), e)
    })?;

    Ok(img.to_rgb8())
}

/// Decode a capture from an in-memory encoded buffer
///
/// The format is guessed from the buffer contents.
pub fn load_image_from_memory(buffer: &[u8]) -> Result<RgbImage> {
    let img = image::load_from_memory(buffer)
        .map_err(|e| ExtractionError::image_load("Failed to decode capture buffer", e))?;
    Ok(img.to_rgb8())
}

/// Load a grayscale region mask from disk
///
/// Any raster format is accepted; the image is converted to 8-bit grayscale
/// and nonzero pixels mark the region of interest.
pub fn load_mask(path: &Path) -> Result<GrayImage> {
    let reader = ImageReader::open(path).map_err(|e| {
        ExtractionError::image_load(format!("Failed to open mask file: {}", path.display()), e)
    })?;

    let img = reader.decode().map_err(|e| {
        ExtractionError::image_load(format!("Failed to decode mask: {}", path.display()), e)
    })?;

    Ok(img.to_luma8())
}
