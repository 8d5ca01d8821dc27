//! # Sky Colors
//!
//! A Rust crate for deriving a single representative "sky color" from
//! webcam captures.
//!
//! This library implements the color-extraction pipeline behind a
//! sky-posting bot: the capture and publishing collaborators hand it a
//! decoded frame and consume one color. It works by:
//! - Cropping/masking the frame to the configured sky region
//! - Flattening the region into color samples in a working color space
//! - Clustering the samples into K dominant colors with k-means
//! - Selecting the largest cluster's centroid with a deterministic
//!   tie-break
//!
//! The pipeline is a single synchronous computation with no shared state
//! between runs: identical input and configuration always produce an
//! identical color.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sky_colors::{extract_sky_color_from_path, PipelineConfig};
//! use std::path::Path;
//!
//! let config = PipelineConfig::default();
//! let result = extract_sky_color_from_path(Path::new("capture.png"), &config)?;
//! println!("Sky is {} (RGB {:?})", result.hex, result.rgb);
//! # Ok::<(), sky_colors::ExtractionError>(())
//! ```

use image::RgbImage;
use palette::{FromColor, Lab, Srgb};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

pub mod cluster;
pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod image_loader;
pub mod region;
pub mod render;

pub use cluster::{
    Cluster, ClusterEngine, ClusteringResult, DominantColorSelector, EmptyClusterPolicy, TieBreak,
};
pub use color::{ColorConverter, ColorSpace, PixelSampler, SampleSet};
pub use config::{ClusteringConfig, PipelineConfig, SamplingConfig};
pub use error::{ExtractionError, Result};
pub use region::{Region, RegionSelector, RegionSpec};

/// Complete extraction result for one capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyColorResult {
    /// Dominant color as 8-bit RGB channels
    pub rgb: [u8; 3],
    /// Dominant color as a hex string (e.g. "#87ceeb")
    pub hex: String,
    /// Dominant color as display sRGB
    pub srgb: Srgb,
    /// Dominant color in CIE Lab
    pub lab: Lab,
    /// Mean color of the whole region, for comparison against the dominant
    pub average_rgb: [u8; 3],
    /// Mean color as a hex string
    pub average_hex: String,
    /// Number of color samples the result was derived from
    pub sample_count: usize,
    /// K-means iterations performed
    pub iterations: usize,
    /// Whether clustering converged before the iteration cap
    pub converged: bool,
}

/// Intermediate artifacts for auditing one extraction
///
/// Consumed by the [`render`] module to produce visualization images; the
/// core result does not depend on it.
#[derive(Debug, Clone)]
pub struct SkyDiagnostics {
    /// The resolved sky region
    pub region: Region,
    /// The full clustering result
    pub clustering: ClusteringResult,
}

/// Extract the dominant sky color from a decoded capture
///
/// This is the main entry point. The configuration is applied exactly as
/// given; nothing is read from ambient state.
///
/// # Errors
///
/// Returns `ExtractionError` if:
/// - The configuration fails validation
/// - The configured region falls outside the frame or selects no pixels
/// - Sampling produces zero samples
/// - Strict convergence was requested and the iteration cap was reached
pub fn extract_sky_color(image: &RgbImage, config: &PipelineConfig) -> Result<SkyColorResult> {
    extract_sky_color_with_diagnostics(image, config).map(|(result, _)| result)
}

/// Extract the dominant sky color from a capture file
///
/// Convenience wrapper decoding the file first; see [`extract_sky_color`].
pub fn extract_sky_color_from_path(path: &Path, config: &PipelineConfig) -> Result<SkyColorResult> {
    let image = image_loader::load_image(path)?;
    extract_sky_color(&image, config)
}

/// Extract the dominant sky color, keeping intermediate artifacts
///
/// Same computation as [`extract_sky_color`], additionally returning the
/// resolved region and full clustering result for diagnostics rendering.
pub fn extract_sky_color_with_diagnostics(
    image: &RgbImage,
    config: &PipelineConfig,
) -> Result<(SkyColorResult, SkyDiagnostics)> {
    config.validate()?;

    let region = RegionSelector::new().select(image, &config.region)?;
    debug!(
        "selected {}x{} region at ({}, {}), {} pixels",
        region.width(),
        region.height(),
        region.x(),
        region.y(),
        region.pixel_count()
    );

    let sampler = PixelSampler::with_stride(config.sampling.stride);
    let samples = sampler.sample(image, &region, config.color_space)?;
    debug!("sampled {} pixels in {:?}", samples.len(), config.color_space);

    let mean_vec = match samples.mean() {
        Some(mean) => mean,
        None => {
            return Err(ExtractionError::EmptySample {
                region_width: region.width(),
                region_height: region.height(),
                stride: config.sampling.stride,
            })
        }
    };

    let engine = ClusterEngine::with_params(
        config.clustering.cluster_count,
        config.clustering.max_iterations,
        config.clustering.convergence_epsilon,
        config.clustering.empty_cluster_policy,
        config.clustering.require_convergence,
    );
    let clustering = engine.run(&samples)?;

    let selector = DominantColorSelector::with_tie_break(config.tie_break);
    let dominant_vec = match selector.select(&clustering) {
        Ok(cluster) => cluster.centroid,
        Err(ExtractionError::NoClusters { .. }) => {
            // Degenerate near-uniform input under the Drop policy: the mean
            // of the entire sample set stands in
            debug!("empty clustering result, falling back to sample mean");
            mean_vec
        }
        Err(other) => return Err(other),
    };

    let converter = ColorConverter::new();
    let rgb = config.color_space.to_rgb8(dominant_vec);
    let srgb = config.color_space.to_srgb(dominant_vec);
    let average_rgb = config.color_space.to_rgb8(mean_vec);

    let result = SkyColorResult {
        rgb,
        hex: converter.rgb8_to_hex(rgb),
        srgb,
        lab: Lab::from_color(srgb),
        average_rgb,
        average_hex: converter.rgb8_to_hex(average_rgb),
        sample_count: samples.len(),
        iterations: clustering.iterations,
        converged: clustering.converged,
    };

    info!(
        "extracted sky color {} from {} samples ({} clusters, {} iterations)",
        result.hex,
        result.sample_count,
        clustering.clusters.len(),
        clustering.iterations
    );

    Ok((result, SkyDiagnostics { region, clustering }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_sky_color_result_serialization() {
        let result = SkyColorResult {
            rgb: [135, 206, 235],
            hex: "#87ceeb".to_string(),
            srgb: Srgb::new(135.0 / 255.0, 206.0 / 255.0, 235.0 / 255.0),
            lab: Lab::new(79.2, -10.8, -17.5),
            average_rgb: [130, 200, 230],
            average_hex: "#82c8e6".to_string(),
            sample_count: 1024,
            iterations: 4,
            converged: true,
        };

        let json = serde_json::to_string(&result).unwrap();
        let deserialized: SkyColorResult = serde_json::from_str(&json).unwrap();

        assert_eq!(result, deserialized);
    }

    #[test]
    fn test_extract_on_uniform_frame() {
        let image = RgbImage::from_pixel(32, 32, Rgb([135, 206, 235]));
        let config = PipelineConfig {
            region: RegionSpec::Absolute { x: 0, y: 0, width: 32, height: 32 },
            ..PipelineConfig::default()
        };

        let result = extract_sky_color(&image, &config).unwrap();
        assert_eq!(result.rgb, [135, 206, 235]);
        assert_eq!(result.hex, "#87ceeb");
        assert_eq!(result.average_rgb, [135, 206, 235]);
        assert_eq!(result.sample_count, 1024);
        assert!(result.converged);
    }

    #[test]
    fn test_diagnostics_expose_clustering() {
        let image = RgbImage::from_pixel(16, 16, Rgb([20, 40, 60]));
        let config = PipelineConfig {
            region: RegionSpec::Absolute { x: 0, y: 0, width: 16, height: 16 },
            ..PipelineConfig::default()
        };

        let (result, diagnostics) = extract_sky_color_with_diagnostics(&image, &config).unwrap();
        assert_eq!(diagnostics.clustering.clusters.len(), 1);
        assert_eq!(diagnostics.clustering.sample_count(), result.sample_count);
        assert_eq!(diagnostics.region.width(), 16);
    }
}
