//! Region pixel sampling into the working color space
//!
//! Flattens the selected region into an order-irrelevant collection of
//! 3-channel color vectors. Exactly one conversion function is chosen per
//! run and applied to every pixel, keeping the sampling bias-free. Large
//! regions can be thinned with a deterministic stride.

use image::RgbImage;
use palette::{Lab, Srgb};
use serde::{Deserialize, Serialize};

use crate::color::conversion::{quantize_channel, ColorConverter};
use crate::constants::sampling::DEFAULT_STRIDE;
use crate::error::{ExtractionError, Result};
use crate::region::Region;

/// Working color space for sampling and clustering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorSpace {
    /// sRGB with 0-255 channel scale
    #[default]
    Srgb,
    /// CIE L*a*b* (perceptually uniform)
    Lab,
}

impl ColorSpace {
    /// Render a working-space color vector as a display sRGB color
    pub fn to_srgb(&self, sample: [f32; 3]) -> Srgb {
        match self {
            ColorSpace::Srgb => Srgb::new(
                (sample[0] / 255.0).clamp(0.0, 1.0),
                (sample[1] / 255.0).clamp(0.0, 1.0),
                (sample[2] / 255.0).clamp(0.0, 1.0),
            ),
            ColorSpace::Lab => {
                ColorConverter::new().lab_to_srgb(Lab::new(sample[0], sample[1], sample[2]))
            }
        }
    }

    /// Render a working-space color vector as quantized 8-bit channels
    pub fn to_rgb8(&self, sample: [f32; 3]) -> [u8; 3] {
        match self {
            // Direct quantization keeps sRGB-space means bit-exact
            ColorSpace::Srgb => [
                quantize_channel(sample[0]),
                quantize_channel(sample[1]),
                quantize_channel(sample[2]),
            ],
            ColorSpace::Lab => ColorConverter::new().srgb_to_rgb8(self.to_srgb(sample)),
        }
    }
}

/// Flat collection of color samples drawn from one region
#[derive(Debug, Clone)]
pub struct SampleSet {
    space: ColorSpace,
    samples: Vec<[f32; 3]>,
}

impl SampleSet {
    /// Construct a sample set directly (primarily for tests and callers
    /// composing stages manually)
    pub fn new(space: ColorSpace, samples: Vec<[f32; 3]>) -> Self {
        Self { space, samples }
    }

    /// Working color space of the samples
    pub fn space(&self) -> ColorSpace {
        self.space
    }

    /// Samples as a flat slice
    pub fn samples(&self) -> &[[f32; 3]] {
        &self.samples
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the set holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Channel-wise mean of all samples
    ///
    /// Accumulates in f64 in sample order so the result is reproducible.
    /// Returns `None` for an empty set.
    pub fn mean(&self) -> Option<[f32; 3]> {
        if self.samples.is_empty() {
            return None;
        }
        let mut sum = [0.0f64; 3];
        for sample in &self.samples {
            sum[0] += sample[0] as f64;
            sum[1] += sample[1] as f64;
            sum[2] += sample[2] as f64;
        }
        let n = self.samples.len() as f64;
        Some([
            (sum[0] / n) as f32,
            (sum[1] / n) as f32,
            (sum[2] / n) as f32,
        ])
    }
}

/// Samples region pixels into the working color space
pub struct PixelSampler {
    stride: u32,
}

impl Default for PixelSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelSampler {
    /// Create a sampler that visits every region pixel
    pub fn new() -> Self {
        Self { stride: DEFAULT_STRIDE }
    }

    /// Create a sampler that visits every `stride`-th pixel on both axes
    pub fn with_stride(stride: u32) -> Self {
        Self { stride }
    }

    /// Produce a sample set from the region of an image
    ///
    /// Pixels are visited in row-major order starting at the region origin;
    /// with stride `s`, rows and columns at offsets 0, s, 2s, ... are kept.
    /// Mask-defined regions only contribute their selected pixels.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidParameter` for a zero stride, and
    /// `ExtractionError::EmptySample` if no samples result (e.g. a stride
    /// subsample of a mask that misses every selected pixel).
    pub fn sample(
        &self,
        image: &RgbImage,
        region: &Region,
        space: ColorSpace,
    ) -> Result<SampleSet> {
        if self.stride == 0 {
            return Err(ExtractionError::invalid_parameter("stride", 0));
        }

        let converter = ColorConverter::new();
        let convert: Box<dyn Fn(u8, u8, u8) -> [f32; 3]> = match space {
            ColorSpace::Srgb => Box::new(|r, g, b| [r as f32, g as f32, b as f32]),
            ColorSpace::Lab => Box::new(move |r, g, b| {
                let lab = converter.rgb_to_lab(r, g, b);
                [lab.l, lab.a, lab.b]
            }),
        };

        let stride = self.stride as usize;
        let mut samples =
            Vec::with_capacity(region.pixel_count() / (stride * stride) + 1);
        for dy in (0..region.height()).step_by(stride) {
            for dx in (0..region.width()).step_by(stride) {
                let (x, y) = (region.x() + dx, region.y() + dy);
                if !region.contains(x, y) {
                    continue;
                }
                let pixel = image.get_pixel(x, y).0;
                samples.push(convert(pixel[0], pixel[1], pixel[2]));
            }
        }

        if samples.is_empty() {
            return Err(ExtractionError::EmptySample {
                region_width: region.width(),
                region_height: region.height(),
                stride: self.stride,
            });
        }

        Ok(SampleSet { space, samples })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{RegionSelector, RegionSpec};
    use image::{Luma, Rgb};

    fn gradient_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 100])
        })
    }

    fn full_region(image: &RgbImage) -> Region {
        let (w, h) = image.dimensions();
        RegionSelector::new()
            .select(image, &RegionSpec::Absolute { x: 0, y: 0, width: w, height: h })
            .unwrap()
    }

    #[test]
    fn test_sample_count_matches_region_area() {
        let img = gradient_image(16, 9);
        let region = full_region(&img);

        let samples = PixelSampler::new().sample(&img, &region, ColorSpace::Srgb).unwrap();
        assert_eq!(samples.len(), 16 * 9);
    }

    #[test]
    fn test_srgb_samples_preserve_channel_values() {
        let img = RgbImage::from_pixel(2, 1, Rgb([12, 200, 77]));
        let region = full_region(&img);

        let samples = PixelSampler::new().sample(&img, &region, ColorSpace::Srgb).unwrap();
        assert_eq!(samples.samples()[0], [12.0, 200.0, 77.0]);
    }

    #[test]
    fn test_lab_samples_are_perceptual() {
        let img = RgbImage::from_pixel(1, 1, Rgb([255, 255, 255]));
        let region = full_region(&img);

        let samples = PixelSampler::new().sample(&img, &region, ColorSpace::Lab).unwrap();
        let lab = samples.samples()[0];
        assert!(lab[0] > 99.0);
        assert!(lab[1].abs() < 1.0);
        assert!(lab[2].abs() < 1.0);
    }

    #[test]
    fn test_stride_subsample_is_deterministic() {
        let img = gradient_image(10, 10);
        let region = full_region(&img);

        let sampler = PixelSampler::with_stride(3);
        let first = sampler.sample(&img, &region, ColorSpace::Srgb).unwrap();
        let second = sampler.sample(&img, &region, ColorSpace::Srgb).unwrap();

        // Offsets 0, 3, 6, 9 on both axes
        assert_eq!(first.len(), 16);
        assert_eq!(first.samples(), second.samples());
    }

    #[test]
    fn test_zero_stride_is_invalid_parameter() {
        let img = gradient_image(4, 4);
        let region = full_region(&img);

        let err = PixelSampler::with_stride(0)
            .sample(&img, &region, ColorSpace::Srgb)
            .unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidParameter { .. }));
    }

    #[test]
    fn test_mask_region_respects_selected_pixels() {
        let img = gradient_image(8, 8);
        let mut mask = image::GrayImage::from_pixel(8, 8, Luma([0]));
        mask.put_pixel(1, 1, Luma([255]));
        mask.put_pixel(3, 3, Luma([255]));
        let region = RegionSelector::new().select_with_mask(&img, &mask).unwrap();

        // Stride 2 visits offsets (0, 0), (2, 0), (0, 2), (2, 2) from the
        // bounding-box origin (1, 1): absolute (1, 1) and (3, 3) are both
        // selected
        let set = PixelSampler::with_stride(2).sample(&img, &region, ColorSpace::Srgb).unwrap();
        assert_eq!(set.len(), 2);

        // Stride 3 visits (1, 1) and misses (3, 3)
        let set = PixelSampler::with_stride(3).sample(&img, &region, ColorSpace::Srgb).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_stride_missing_every_mask_pixel_is_empty_sample() {
        let img = gradient_image(8, 8);
        let mut mask = image::GrayImage::from_pixel(8, 8, Luma([0]));
        // Bounding box origin (1, 1) is itself unselected
        mask.put_pixel(2, 1, Luma([255]));
        mask.put_pixel(1, 2, Luma([255]));
        let region = RegionSelector::new().select_with_mask(&img, &mask).unwrap();

        // Stride 2 only visits (1, 1) within the 2x2 bounding box
        let err = PixelSampler::with_stride(2)
            .sample(&img, &region, ColorSpace::Srgb)
            .unwrap_err();
        assert!(matches!(err, ExtractionError::EmptySample { .. }));
    }

    #[test]
    fn test_mean_accumulates_all_samples() {
        let set = SampleSet::new(
            ColorSpace::Srgb,
            vec![[0.0, 0.0, 0.0], [10.0, 20.0, 30.0], [20.0, 40.0, 60.0]],
        );
        assert_eq!(set.mean(), Some([10.0, 20.0, 30.0]));
    }

    #[test]
    fn test_mean_of_empty_set() {
        let set = SampleSet::new(ColorSpace::Srgb, vec![]);
        assert_eq!(set.mean(), None);
    }

    #[test]
    fn test_color_space_to_rgb8_srgb_quantizes() {
        assert_eq!(ColorSpace::Srgb.to_rgb8([126.5, 127.5, 255.0]), [126, 128, 255]);
    }

    #[test]
    fn test_color_space_to_rgb8_lab_roundtrip() {
        let converter = ColorConverter::new();
        let lab = converter.rgb_to_lab(135, 206, 235);
        assert_eq!(ColorSpace::Lab.to_rgb8([lab.l, lab.a, lab.b]), [135, 206, 235]);
    }
}
