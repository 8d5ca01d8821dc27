//! Region-of-interest resolution against captured frames
//!
//! The sky region is a static deployment configuration value, never inferred
//! from image content. Three definitions are supported:
//! - an absolute pixel rectangle,
//! - a relative-fraction rectangle scaled to the frame,
//! - a grayscale mask image (nonzero = selected).
//!
//! Resolution is a pure transform: image + spec in, validated region out.

use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::region::DEFAULT_SKY_BAND_HEIGHT_FRACTION;
use crate::error::{ExtractionError, Result};
use crate::image_loader;

/// Static description of the image sub-area expected to contain sky
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegionSpec {
    /// Fixed pixel rectangle
    Absolute { x: u32, y: u32, width: u32, height: u32 },

    /// Rectangle as fractions of the frame dimensions, each in [0, 1]
    Relative {
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    },

    /// Grayscale mask image matching the frame dimensions; nonzero pixels
    /// are selected
    Mask { path: PathBuf },
}

impl RegionSpec {
    /// Default sky band: full width, top portion of the frame
    pub fn sky_band() -> Self {
        RegionSpec::Relative {
            left: 0.0,
            top: 0.0,
            width: 1.0,
            height: DEFAULT_SKY_BAND_HEIGHT_FRACTION,
        }
    }
}

impl Default for RegionSpec {
    fn default() -> Self {
        Self::sky_band()
    }
}

/// Validated region of interest within one frame
///
/// Bounds are guaranteed to lie inside the image they were resolved against,
/// with a nonzero pixel count. An optional mask (row-major over the bounds)
/// narrows the rectangle further.
#[derive(Debug, Clone)]
pub struct Region {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    mask: Option<Vec<bool>>,
}

impl Region {
    /// Left edge in image coordinates
    pub fn x(&self) -> u32 {
        self.x
    }

    /// Top edge in image coordinates
    pub fn y(&self) -> u32 {
        self.y
    }

    /// Region width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Region height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of selected pixels (mask-aware)
    pub fn pixel_count(&self) -> usize {
        match &self.mask {
            Some(mask) => mask.iter().filter(|selected| **selected).count(),
            None => self.width as usize * self.height as usize,
        }
    }

    /// Check whether an absolute image coordinate belongs to the region
    pub fn contains(&self, x: u32, y: u32) -> bool {
        if x < self.x || y < self.y || x >= self.x + self.width || y >= self.y + self.height {
            return false;
        }
        match &self.mask {
            Some(mask) => {
                let idx = (y - self.y) as usize * self.width as usize + (x - self.x) as usize;
                mask[idx]
            }
            None => true,
        }
    }

    /// Iterate selected pixels in row-major order, in absolute image
    /// coordinates
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let (x0, y0, w) = (self.x, self.y, self.width);
        (0..self.height).flat_map(move |dy| (0..w).map(move |dx| (x0 + dx, y0 + dy))).filter(
            move |(x, y)| match &self.mask {
                Some(mask) => {
                    let idx = (y - y0) as usize * w as usize + (x - x0) as usize;
                    mask[idx]
                }
                None => true,
            },
        )
    }
}

/// Resolves region specifications against captured frames
pub struct RegionSelector;

impl Default for RegionSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionSelector {
    /// Create a new region selector
    pub fn new() -> Self {
        Self
    }

    /// Resolve a region spec against an image
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidRegion` if the computed bounds fall
    /// outside the image, collapse to zero area, or (for masks) the mask
    /// dimensions mismatch the frame or select no pixels.
    pub fn select(&self, image: &RgbImage, spec: &RegionSpec) -> Result<Region> {
        let (img_w, img_h) = image.dimensions();

        match spec {
            RegionSpec::Absolute { x, y, width, height } => {
                self.resolve_rect(img_w, img_h, *x, *y, *width, *height)
            }
            RegionSpec::Relative { left, top, width, height } => {
                self.resolve_relative(img_w, img_h, *left, *top, *width, *height)
            }
            RegionSpec::Mask { path } => {
                let mask = image_loader::load_mask(path)?;
                self.select_with_mask(image, &mask)
            }
        }
    }

    /// Resolve an in-memory grayscale mask against an image
    ///
    /// The mask must match the frame dimensions; nonzero pixels are selected.
    /// The resulting region is the bounding box of the selected pixels with
    /// the mask attached.
    pub fn select_with_mask(&self, image: &RgbImage, mask: &GrayImage) -> Result<Region> {
        let (img_w, img_h) = image.dimensions();
        if mask.dimensions() != (img_w, img_h) {
            let (mask_w, mask_h) = mask.dimensions();
            return Err(ExtractionError::invalid_region(
                format!("mask dimensions {}x{} do not match frame", mask_w, mask_h),
                img_w,
                img_h,
            ));
        }

        let mut min_x = img_w;
        let mut min_y = img_h;
        let mut max_x = 0u32;
        let mut max_y = 0u32;
        let mut any = false;
        for (x, y, pixel) in mask.enumerate_pixels() {
            if pixel.0[0] > 0 {
                any = true;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }
        if !any {
            return Err(ExtractionError::invalid_region(
                "mask selects no pixels",
                img_w,
                img_h,
            ));
        }

        let width = max_x - min_x + 1;
        let height = max_y - min_y + 1;
        let mut selected = Vec::with_capacity(width as usize * height as usize);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                selected.push(mask.get_pixel(x, y).0[0] > 0);
            }
        }

        Ok(Region {
            x: min_x,
            y: min_y,
            width,
            height,
            mask: Some(selected),
        })
    }

    fn resolve_rect(
        &self,
        img_w: u32,
        img_h: u32,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<Region> {
        if width == 0 || height == 0 {
            return Err(ExtractionError::invalid_region(
                format!("region {}x{} has zero area", width, height),
                img_w,
                img_h,
            ));
        }
        let right = x as u64 + width as u64;
        let bottom = y as u64 + height as u64;
        if right > img_w as u64 || bottom > img_h as u64 {
            return Err(ExtractionError::invalid_region(
                format!(
                    "region {}x{} at ({}, {}) extends beyond image bounds",
                    width, height, x, y
                ),
                img_w,
                img_h,
            ));
        }
        Ok(Region {
            x,
            y,
            width,
            height,
            mask: None,
        })
    }

    fn resolve_relative(
        &self,
        img_w: u32,
        img_h: u32,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> Result<Region> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(left) || !in_unit(top) || !in_unit(width) || !in_unit(height) {
            return Err(ExtractionError::invalid_region(
                format!(
                    "relative fractions ({}, {}, {}, {}) outside [0, 1]",
                    left, top, width, height
                ),
                img_w,
                img_h,
            ));
        }
        if left + width > 1.0 + f64::EPSILON || top + height > 1.0 + f64::EPSILON {
            return Err(ExtractionError::invalid_region(
                "relative region extends beyond image bounds",
                img_w,
                img_h,
            ));
        }

        let x = (left * img_w as f64).floor() as u32;
        let y = (top * img_h as f64).floor() as u32;
        let x_end = ((left + width) * img_w as f64).floor().min(img_w as f64) as u32;
        let y_end = ((top + height) * img_h as f64).floor().min(img_h as f64) as u32;
        if x_end <= x || y_end <= y {
            return Err(ExtractionError::invalid_region(
                "relative region collapses to zero area",
                img_w,
                img_h,
            ));
        }

        self.resolve_rect(img_w, img_h, x, y, x_end - x, y_end - y)
    }
}
