//! Color space conversion utilities
//!
//! Provides the conversions the pipeline needs:
//! - 8-bit RGB to Lab for perceptual clustering
//! - Lab to sRGB with gamut clamping for display output
//! - Hex color representation
//! - Rec. 709 luminance for the tie-break rule
//! - Round-half-to-even quantization to 8-bit channels

use palette::{FromColor, IntoColor, Lab, Srgb};

use crate::constants::luminance::{REC_709_BLUE, REC_709_GREEN, REC_709_RED};

/// Color converter for pipeline color math
pub struct ColorConverter;

impl Default for ColorConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorConverter {
    /// Create a new color converter
    pub fn new() -> Self {
        Self
    }

    /// Convert RGB (0-255) to Lab color space
    ///
    /// # Arguments
    ///
    /// * `r`, `g`, `b` - RGB values in range [0, 255]
    pub fn rgb_to_lab(&self, r: u8, g: u8, b: u8) -> Lab {
        let srgb = Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
        Lab::from_color(srgb)
    }

    /// Convert Lab to sRGB, clamped to the valid gamut
    pub fn lab_to_srgb(&self, lab: Lab) -> Srgb {
        let srgb: Srgb = lab.into_color();
        Srgb::new(
            srgb.red.clamp(0.0, 1.0),
            srgb.green.clamp(0.0, 1.0),
            srgb.blue.clamp(0.0, 1.0),
        )
    }

    /// Convert sRGB to 8-bit channels using the fixed rounding policy
    pub fn srgb_to_rgb8(&self, srgb: Srgb) -> [u8; 3] {
        [
            quantize_channel(srgb.red * 255.0),
            quantize_channel(srgb.green * 255.0),
            quantize_channel(srgb.blue * 255.0),
        ]
    }

    /// Convert 8-bit channels to a hexadecimal color string
    ///
    /// # Returns
    ///
    /// Hex color string (e.g., "#87ceeb")
    pub fn rgb8_to_hex(&self, rgb: [u8; 3]) -> String {
        format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
    }

    /// Rec. 709 luminance of an sRGB color
    pub fn luminance(&self, srgb: Srgb) -> f32 {
        REC_709_RED * srgb.red + REC_709_GREEN * srgb.green + REC_709_BLUE * srgb.blue
    }
}

/// Quantize a channel value to u8 with round-half-to-even
///
/// The mean of a cluster's channel values is an f32; the fixed rounding
/// policy keeps the 8-bit output exactly reproducible across runs and
/// platforms. Input is clamped to [0, 255] first.
pub fn quantize_channel(value: f32) -> u8 {
    value.clamp(0.0, 255.0).round_ties_even() as u8
}
