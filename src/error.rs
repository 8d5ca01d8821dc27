//! Error types for the sky_colors library

use thiserror::Error;

/// Result type alias for sky_colors operations
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Error types for the sky color extraction pipeline
///
/// Every failure carries enough context (stage, input dimensions, counts)
/// to diagnose a bad capture such as a black frame or a cropped image.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Capture file could not be loaded or decoded
    #[error("Failed to load capture: {message}")]
    ImageLoad {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configured region falls outside the image or selects no pixels
    #[error("Invalid region: {reason} (image is {image_width}x{image_height})")]
    InvalidRegion {
        reason: String,
        image_width: u32,
        image_height: u32,
    },

    /// Sampling produced zero color samples
    #[error("No samples produced from {region_width}x{region_height} region (stride {stride})")]
    EmptySample {
        region_width: u32,
        region_height: u32,
        stride: u32,
    },

    /// Clustering hit the iteration cap before converging
    ///
    /// Only raised when the caller opts into strict convergence; otherwise
    /// the cap terminates silently and the result records `converged = false`.
    #[error("Clustering did not converge within {iterations} iterations")]
    ClusteringDidNotConverge { iterations: usize },

    /// Clustering produced an empty result
    #[error("Clustering produced no clusters from {sample_count} samples")]
    NoClusters { sample_count: usize },

    /// Invalid configuration parameter
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },
}

impl ExtractionError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoad {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid region error with image context
    pub fn invalid_region(reason: impl Into<String>, image_width: u32, image_height: u32) -> Self {
        Self::InvalidRegion {
            reason: reason.into(),
            image_width,
            image_height,
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Check whether retrying with a fresh capture could succeed
    ///
    /// Configuration mistakes are permanent; everything else may clear up on
    /// the next scheduled capture (e.g. a truncated screenshot).
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ExtractionError::InvalidParameter { .. })
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            ExtractionError::ImageLoad { .. } => {
                "Could not load the capture. Please check the file format and try again.".to_string()
            }
            ExtractionError::InvalidRegion { image_width, image_height, .. } => {
                format!(
                    "The configured sky region does not fit the {}x{} capture. Please check the region settings.",
                    image_width, image_height
                )
            }
            ExtractionError::EmptySample { .. } => {
                "The sky region produced no color samples. The capture may be cropped or corrupted.".to_string()
            }
            ExtractionError::ClusteringDidNotConverge { .. } => {
                "Color clustering did not settle on a stable palette. A later capture may succeed.".to_string()
            }
            ExtractionError::NoClusters { .. } => {
                "No dominant colors could be derived from the capture.".to_string()
            }
            ExtractionError::InvalidParameter { parameter, .. } => {
                format!("Configuration value '{}' is invalid.", parameter)
            }
        }
    }
}
