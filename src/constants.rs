//! Default parameters and reference values for sky color extraction
//!
//! This module contains compile-time constants for the extraction pipeline,
//! chosen to match the behavior of the deployed webcam setup.

/// Clustering defaults
pub mod clustering {
    /// Default number of dominant color clusters (K)
    pub const DEFAULT_CLUSTER_COUNT: usize = 5;

    /// Iteration cap preventing non-termination on degenerate inputs
    pub const DEFAULT_MAX_ITERATIONS: usize = 200;

    /// Convergence threshold on centroid movement, in working-space units
    ///
    /// With the default sRGB working space (0-255 channel scale) this means
    /// a tenth of a channel step.
    pub const DEFAULT_CONVERGENCE_EPSILON: f32 = 0.1;
}

/// Sampling defaults
pub mod sampling {
    /// Default sampling stride (1 = every pixel in the region)
    pub const DEFAULT_STRIDE: u32 = 1;
}

/// Region defaults
pub mod region {
    /// Default sky band: full width, top fraction of the frame
    ///
    /// Webcams pointed at the horizon keep sky in the upper part of the
    /// frame; the band stops well above typical rooftop lines.
    pub const DEFAULT_SKY_BAND_HEIGHT_FRACTION: f64 = 0.35;
}

/// Luminance computation
pub mod luminance {
    /// Rec. 709 luma coefficients for sRGB channels
    pub const REC_709_RED: f32 = 0.2126;
    pub const REC_709_GREEN: f32 = 0.7152;
    pub const REC_709_BLUE: f32 = 0.0722;
}

/// Diagnostic rendering dimensions
pub mod render {
    /// Dominant color swatch dimensions, sized for social posting
    pub const SWATCH_WIDTH: u32 = 1200;
    pub const SWATCH_HEIGHT: u32 = 675;

    /// Palette summary bar dimensions
    pub const PALETTE_WIDTH: u32 = 300;
    pub const PALETTE_HEIGHT: u32 = 900;

    /// Region outline color for annotated captures (RGB)
    pub const REGION_OUTLINE: [u8; 3] = [255, 0, 0];
}
