//! Configuration structures for the sky color extraction pipeline.
//!
//! This module defines all tunable parameters for one extraction run,
//! organized into logical groups for region selection, sampling, and
//! clustering. Configuration is always passed explicitly into a pipeline
//! invocation; there is no ambient or global state.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed
//! programmatically:
//!
//! ```no_run
//! use sky_colors::PipelineConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = PipelineConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use defaults
//! let config = PipelineConfig::default();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::cluster::{EmptyClusterPolicy, TieBreak};
use crate::color::ColorSpace;
use crate::constants::{clustering, sampling};
use crate::error::{ExtractionError, Result};
use crate::region::RegionSpec;

/// Complete configuration for one extraction run.
///
/// Can be serialized to/from JSON so a deployment's behavior is fully
/// reproducible from its config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Sky region definition
    pub region: RegionSpec,

    /// Working color space for sampling and clustering
    #[serde(default)]
    pub color_space: ColorSpace,

    /// Pixel sampling configuration
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Clustering configuration
    #[serde(default)]
    pub clustering: ClusteringConfig,

    /// Tie-break rule for equal-count clusters
    #[serde(default)]
    pub tie_break: TieBreak,
}

/// Pixel sampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Sampling stride on both axes (1 = every pixel)
    pub stride: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self { stride: sampling::DEFAULT_STRIDE }
    }
}

/// K-means clustering parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Number of dominant color clusters (K)
    pub cluster_count: usize,

    /// Iteration cap preventing non-termination on degenerate inputs
    pub max_iterations: usize,

    /// Convergence threshold on centroid movement, in working-space units
    pub convergence_epsilon: f32,

    /// Policy for clusters left without members after an update step
    #[serde(default)]
    pub empty_cluster_policy: EmptyClusterPolicy,

    /// Fail with `ClusteringDidNotConverge` if the iteration cap is reached
    /// before convergence
    #[serde(default)]
    pub require_convergence: bool,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            cluster_count: clustering::DEFAULT_CLUSTER_COUNT,
            max_iterations: clustering::DEFAULT_MAX_ITERATIONS,
            convergence_epsilon: clustering::DEFAULT_CONVERGENCE_EPSILON,
            empty_cluster_policy: EmptyClusterPolicy::default(),
            require_convergence: false,
        }
    }
}

impl Default for PipelineConfig {
    /// Default deployment configuration: top-of-frame sky band, sRGB
    /// working space, every pixel sampled, K = 5
    fn default() -> Self {
        Self {
            region: RegionSpec::sky_band(),
            color_space: ColorSpace::default(),
            sampling: SamplingConfig::default(),
            clustering: ClusteringConfig::default(),
            tie_break: TieBreak::default(),
        }
    }
}

impl PipelineConfig {
    /// Check parameter ranges before a run
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidParameter` naming the offending
    /// field.
    pub fn validate(&self) -> Result<()> {
        if self.sampling.stride == 0 {
            return Err(ExtractionError::invalid_parameter("sampling.stride", 0));
        }
        if self.clustering.cluster_count == 0 {
            return Err(ExtractionError::invalid_parameter(
                "clustering.cluster_count",
                0,
            ));
        }
        if self.clustering.max_iterations == 0 {
            return Err(ExtractionError::invalid_parameter(
                "clustering.max_iterations",
                0,
            ));
        }
        let epsilon = self.clustering.convergence_epsilon;
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(ExtractionError::invalid_parameter(
                "clustering.convergence_epsilon",
                epsilon,
            ));
        }
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &std::path::Path) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &std::path::Path) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
