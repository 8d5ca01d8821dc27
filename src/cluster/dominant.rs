//! Dominant color selection from a clustering result
//!
//! The cluster with the largest member count wins. Ties are broken by a
//! fixed deterministic rule so identical input always produces identical
//! output.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::cluster::kmeans::{Cluster, ClusteringResult};
use crate::color::conversion::ColorConverter;
use crate::error::{ExtractionError, Result};

/// Deterministic tie-break rule for equal-count clusters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TieBreak {
    /// Prefer the lexicographically smallest centroid vector
    #[default]
    LexicographicSmallest,
    /// Prefer the centroid with the lowest Rec. 709 luminance; exact
    /// luminance ties fall back to the lexicographic rule
    LowestLuminance,
}

/// Selects the single representative color from a clustering result
pub struct DominantColorSelector {
    tie_break: TieBreak,
}

impl Default for DominantColorSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl DominantColorSelector {
    /// Create a selector with the default tie-break rule
    pub fn new() -> Self {
        Self { tie_break: TieBreak::default() }
    }

    /// Create a selector with an explicit tie-break rule
    pub fn with_tie_break(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    /// Pick the dominant cluster
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::NoClusters` for an empty clustering result.
    /// The pipeline entry points recover from that case by falling back to
    /// the mean of the entire sample set.
    pub fn select<'a>(&self, result: &'a ClusteringResult) -> Result<&'a Cluster> {
        let mut best: Option<&Cluster> = None;
        for cluster in &result.clusters {
            match best {
                None => best = Some(cluster),
                Some(current) => {
                    if self.beats(cluster, current, result) {
                        best = Some(cluster);
                    }
                }
            }
        }
        best.ok_or(ExtractionError::NoClusters {
            sample_count: result.sample_count(),
        })
    }

    fn beats(&self, candidate: &Cluster, current: &Cluster, result: &ClusteringResult) -> bool {
        match candidate.count.cmp(&current.count) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => match self.tie_break {
                TieBreak::LexicographicSmallest => lexicographic_less(candidate, current),
                TieBreak::LowestLuminance => {
                    let converter = ColorConverter::new();
                    let lum_candidate =
                        converter.luminance(result.space.to_srgb(candidate.centroid));
                    let lum_current = converter.luminance(result.space.to_srgb(current.centroid));
                    match lum_candidate.partial_cmp(&lum_current) {
                        Some(Ordering::Less) => true,
                        Some(Ordering::Greater) => false,
                        _ => lexicographic_less(candidate, current),
                    }
                }
            },
        }
    }
}

fn lexicographic_less(candidate: &Cluster, current: &Cluster) -> bool {
    candidate.centroid.partial_cmp(&current.centroid) == Some(Ordering::Less)
}
