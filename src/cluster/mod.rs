//! Dominant color clustering module
//!
//! This module partitions a sample set into K dominant color groups with
//! k-means and selects the single representative color from the result.

pub mod dominant;
pub mod kmeans;

pub use dominant::{DominantColorSelector, TieBreak};
pub use kmeans::{Cluster, ClusterEngine, ClusteringResult, EmptyClusterPolicy};
