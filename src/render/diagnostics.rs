//! Visualization of extraction results
//!
//! Three artifacts support auditing a deployment:
//! - a solid swatch of the dominant color, sized for posting,
//! - a palette bar stacking the top-K clusters by member share,
//! - the source capture with the selected region outlined.
//!
//! All functions are pure consumers of already-computed results.

use image::{Rgb, RgbImage};

use crate::cluster::kmeans::ClusteringResult;
use crate::constants::render::REGION_OUTLINE;
use crate::region::Region;

/// Render a solid color swatch
pub fn render_swatch(rgb: [u8; 3], width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(rgb))
}

/// Render a stacked palette bar from a clustering result
///
/// Clusters are stacked top to bottom by descending member count (count
/// ties ordered by centroid so the output is deterministic), each row
/// group's height proportional to its share of the samples. Row boundaries
/// truncate; the final group absorbs the remainder.
pub fn render_palette(result: &ClusteringResult, width: u32, height: u32) -> RgbImage {
    let mut image = RgbImage::new(width, height);
    let total: usize = result.sample_count();
    if total == 0 {
        return image;
    }

    let mut ordered: Vec<_> = result.clusters.iter().collect();
    ordered.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.centroid.partial_cmp(&b.centroid).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut cumulative = 0usize;
    let mut row_start = 0u32;
    for (i, cluster) in ordered.iter().enumerate() {
        cumulative += cluster.count;
        let row_end = if i == ordered.len() - 1 {
            height
        } else {
            (height as u64 * cumulative as u64 / total as u64) as u32
        };
        let rgb = Rgb(result.space.to_rgb8(cluster.centroid));
        for y in row_start..row_end {
            for x in 0..width {
                image.put_pixel(x, y, rgb);
            }
        }
        row_start = row_end;
    }

    image
}

/// Copy a capture with the selected region outlined
///
/// Draws a one-pixel border just inside the region bounds (for mask-defined
/// regions, the bounding box).
pub fn annotate_region(image: &RgbImage, region: &Region) -> RgbImage {
    let mut annotated = image.clone();
    let outline = Rgb(REGION_OUTLINE);

    let left = region.x();
    let top = region.y();
    let right = region.x() + region.width() - 1;
    let bottom = region.y() + region.height() - 1;

    for x in left..=right {
        annotated.put_pixel(x, top, outline);
        annotated.put_pixel(x, bottom, outline);
    }
    for y in top..=bottom {
        annotated.put_pixel(left, y, outline);
        annotated.put_pixel(right, y, outline);
    }

    annotated
}
