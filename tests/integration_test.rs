//! Integration tests for the complete sky color extraction pipeline
//!
//! These tests validate the end-to-end workflow on synthetic captures:
//! - Region selection against the frame
//! - Sampling and clustering determinism
//! - Dominant color selection
//! - Error handling for bad captures and bad configuration

use image::{Rgb, RgbImage};
use sky_colors::{
    extract_sky_color, extract_sky_color_from_path, extract_sky_color_with_diagnostics,
    ColorSpace, EmptyClusterPolicy, ExtractionError, PipelineConfig, RegionSpec,
};
use std::path::Path;

/// 10x10 frame: pure blue sky in the 4x4 sub-rectangle at (3, 3), pure red
/// elsewhere
fn blue_patch_frame() -> RgbImage {
    RgbImage::from_fn(10, 10, |x, y| {
        if (3..7).contains(&x) && (3..7).contains(&y) {
            Rgb([0, 0, 255])
        } else {
            Rgb([255, 0, 0])
        }
    })
}

fn config_with_region(region: RegionSpec) -> PipelineConfig {
    PipelineConfig { region, ..PipelineConfig::default() }
}

// ============================================================================
// Core Pipeline Properties
// ============================================================================

#[test]
fn test_blue_sky_patch_yields_pure_blue() {
    let frame = blue_patch_frame();
    let config =
        config_with_region(RegionSpec::Absolute { x: 3, y: 3, width: 4, height: 4 });

    let result = extract_sky_color(&frame, &config).unwrap();
    assert_eq!(result.rgb, [0, 0, 255]);
    assert_eq!(result.hex, "#0000ff");
    assert_eq!(result.sample_count, 16);
    assert!(result.converged);
}

#[test]
fn test_blue_sky_patch_in_lab_space() {
    let frame = blue_patch_frame();
    let mut config =
        config_with_region(RegionSpec::Absolute { x: 3, y: 3, width: 4, height: 4 });
    config.color_space = ColorSpace::Lab;

    let result = extract_sky_color(&frame, &config).unwrap();
    assert_eq!(result.rgb, [0, 0, 255]);
}

#[test]
fn test_larger_cluster_wins() {
    // Region covering the whole frame: 84 red pixels vs 16 blue
    let frame = blue_patch_frame();
    let config =
        config_with_region(RegionSpec::Absolute { x: 0, y: 0, width: 10, height: 10 });

    let result = extract_sky_color(&frame, &config).unwrap();
    assert_eq!(result.rgb, [255, 0, 0]);
    assert_eq!(result.sample_count, 100);
}

#[test]
fn test_extraction_is_deterministic() {
    // A noisy-ish gradient frame where cluster boundaries are not obvious
    let frame = RgbImage::from_fn(64, 48, |x, y| {
        Rgb([
            ((x * 3 + y * 7) % 256) as u8,
            ((x * 11 + y * 5) % 256) as u8,
            ((x * 13 + y * 2) % 256) as u8,
        ])
    });
    let config = config_with_region(RegionSpec::Relative {
        left: 0.0,
        top: 0.0,
        width: 1.0,
        height: 0.5,
    });

    let first = extract_sky_color(&frame, &config).unwrap();
    let second = extract_sky_color(&frame, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_uniform_frame_ignores_cluster_count() {
    let frame = RgbImage::from_pixel(20, 20, Rgb([120, 180, 240]));

    for k in [1, 3, 5] {
        let mut config =
            config_with_region(RegionSpec::Absolute { x: 0, y: 0, width: 20, height: 20 });
        config.clustering.cluster_count = k;

        let (result, diagnostics) =
            extract_sky_color_with_diagnostics(&frame, &config).unwrap();
        assert_eq!(result.rgb, [120, 180, 240]);
        assert_eq!(diagnostics.clustering.clusters.len(), 1);
    }
}

#[test]
fn test_stride_subsample_count() {
    let frame = RgbImage::from_pixel(10, 10, Rgb([50, 50, 50]));
    let mut config =
        config_with_region(RegionSpec::Absolute { x: 0, y: 0, width: 10, height: 10 });
    config.sampling.stride = 3;

    let result = extract_sky_color(&frame, &config).unwrap();
    // Offsets 0, 3, 6, 9 on both axes
    assert_eq!(result.sample_count, 16);
}

#[test]
fn test_average_color_reported() {
    // Half black, half white region: average is mid-gray, dominant is one
    // of the extremes
    let frame = RgbImage::from_fn(8, 2, |x, _| {
        if x < 4 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
    });
    let config = config_with_region(RegionSpec::Absolute { x: 0, y: 0, width: 8, height: 2 });

    let result = extract_sky_color(&frame, &config).unwrap();
    // 127.5 rounds half-to-even to 128
    assert_eq!(result.average_rgb, [128, 128, 128]);
    // Equal counts: lexicographic tie-break picks black
    assert_eq!(result.rgb, [0, 0, 0]);
}

#[test]
fn test_iteration_cap_bounds_run() {
    let frame = RgbImage::from_fn(32, 32, |x, y| {
        Rgb([((x * y) % 256) as u8, (x % 256) as u8, (y % 256) as u8])
    });
    let mut config =
        config_with_region(RegionSpec::Absolute { x: 0, y: 0, width: 32, height: 32 });
    config.clustering.max_iterations = 2;
    config.clustering.convergence_epsilon = 0.0;

    let result = extract_sky_color(&frame, &config).unwrap();
    assert!(result.iterations <= 2);
}

#[test]
fn test_strict_convergence_surfaces_cap() {
    let frame = RgbImage::from_fn(32, 32, |x, y| {
        Rgb([((x * y) % 256) as u8, (x % 256) as u8, (y % 256) as u8])
    });
    let mut config =
        config_with_region(RegionSpec::Absolute { x: 0, y: 0, width: 32, height: 32 });
    config.clustering.max_iterations = 1;
    config.clustering.convergence_epsilon = 0.0;
    config.clustering.require_convergence = true;

    let err = extract_sky_color(&frame, &config).unwrap_err();
    assert!(matches!(err, ExtractionError::ClusteringDidNotConverge { .. }));
}

#[test]
fn test_drop_policy_reduces_cluster_count() {
    // Gray levels engineered so the cluster seeded at 2 empties once its
    // neighbors' means settle around it
    let mut values = vec![2u8, 0, 22, 12];
    values.extend(std::iter::repeat(15).take(6));
    let frame = RgbImage::from_fn(10, 1, |x, _| {
        let v = values[x as usize];
        Rgb([v, v, v])
    });

    let mut config =
        config_with_region(RegionSpec::Absolute { x: 0, y: 0, width: 10, height: 1 });
    config.clustering.cluster_count = 3;
    config.clustering.empty_cluster_policy = EmptyClusterPolicy::Drop;

    let (_, diagnostics) = extract_sky_color_with_diagnostics(&frame, &config).unwrap();
    assert_eq!(diagnostics.clustering.clusters.len(), 2);
}

// ============================================================================
// Error Handling
// ============================================================================

#[test]
fn test_region_beyond_bounds_is_rejected() {
    let frame = blue_patch_frame();
    let config =
        config_with_region(RegionSpec::Absolute { x: 5, y: 5, width: 10, height: 10 });

    let err = extract_sky_color(&frame, &config).unwrap_err();
    match err {
        ExtractionError::InvalidRegion { image_width, image_height, .. } => {
            assert_eq!((image_width, image_height), (10, 10));
        }
        other => panic!("Expected InvalidRegion, got: {:?}", other),
    }
}

#[test]
fn test_zero_area_region_is_rejected() {
    let frame = blue_patch_frame();
    let config =
        config_with_region(RegionSpec::Absolute { x: 0, y: 0, width: 0, height: 5 });

    assert!(matches!(
        extract_sky_color(&frame, &config).unwrap_err(),
        ExtractionError::InvalidRegion { .. }
    ));
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let frame = blue_patch_frame();
    let mut config =
        config_with_region(RegionSpec::Absolute { x: 0, y: 0, width: 10, height: 10 });
    config.clustering.cluster_count = 0;

    assert!(matches!(
        extract_sky_color(&frame, &config).unwrap_err(),
        ExtractionError::InvalidParameter { .. }
    ));
}

#[test]
fn test_extract_from_missing_file() {
    let config = PipelineConfig::default();
    let err =
        extract_sky_color_from_path(Path::new("nonexistent_capture.png"), &config).unwrap_err();
    assert!(matches!(err, ExtractionError::ImageLoad { .. }));
    assert!(err.is_retryable());
}

#[test]
fn test_extract_from_unsupported_format() {
    let config = PipelineConfig::default();
    let err = extract_sky_color_from_path(Path::new("capture.tiff"), &config).unwrap_err();
    assert!(matches!(err, ExtractionError::ImageLoad { .. }));
}

// ============================================================================
// File Round Trips
// ============================================================================

#[test]
fn test_extract_from_saved_capture() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capture.png");
    blue_patch_frame().save(&path).unwrap();

    let config =
        config_with_region(RegionSpec::Absolute { x: 3, y: 3, width: 4, height: 4 });
    let result = extract_sky_color_from_path(&path, &config).unwrap();
    assert_eq!(result.rgb, [0, 0, 255]);
}

#[test]
fn test_mask_region_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let mask_path = dir.path().join("sky_mask.png");

    // Mask selecting exactly the blue patch
    let mask = image::GrayImage::from_fn(10, 10, |x, y| {
        if (3..7).contains(&x) && (3..7).contains(&y) {
            image::Luma([255])
        } else {
            image::Luma([0])
        }
    });
    mask.save(&mask_path).unwrap();

    let frame = blue_patch_frame();
    let config = config_with_region(RegionSpec::Mask { path: mask_path });
    let result = extract_sky_color(&frame, &config).unwrap();
    assert_eq!(result.rgb, [0, 0, 255]);
    assert_eq!(result.sample_count, 16);
}

#[test]
fn test_config_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut config =
        config_with_region(RegionSpec::Relative { left: 0.1, top: 0.0, width: 0.8, height: 0.3 });
    config.clustering.cluster_count = 4;
    config.sampling.stride = 2;
    config.to_json_file(&path).unwrap();

    let loaded = PipelineConfig::from_json_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_result_serializes_for_publishing() {
    let frame = blue_patch_frame();
    let config =
        config_with_region(RegionSpec::Absolute { x: 3, y: 3, width: 4, height: 4 });
    let result = extract_sky_color(&frame, &config).unwrap();

    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"hex\":\"#0000ff\""));

    let parsed: sky_colors::SkyColorResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, result);
}

// ============================================================================
// Diagnostics Rendering
// ============================================================================

#[test]
fn test_diagnostic_artifacts_render() {
    use sky_colors::render::{annotate_region, render_palette, render_swatch};

    let frame = blue_patch_frame();
    let config =
        config_with_region(RegionSpec::Absolute { x: 0, y: 0, width: 10, height: 10 });
    let (result, diagnostics) = extract_sky_color_with_diagnostics(&frame, &config).unwrap();

    let swatch = render_swatch(result.rgb, 16, 9);
    assert!(swatch.pixels().all(|p| p.0 == [255, 0, 0]));

    let palette = render_palette(&diagnostics.clustering, 10, 100);
    // Red dominates 84:16, so the top row is red and the bottom is blue
    assert_eq!(palette.get_pixel(0, 0).0, [255, 0, 0]);
    assert_eq!(palette.get_pixel(0, 99).0, [0, 0, 255]);

    let annotated = annotate_region(&frame, &diagnostics.region);
    assert_eq!(annotated.dimensions(), frame.dimensions());
}
