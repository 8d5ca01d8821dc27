//! Lloyd's k-means over color samples
//!
//! Deterministic by construction: centroids seed from the first K distinct
//! samples in sample order, assignment ties go to the lowest centroid index,
//! and means accumulate in f64 in fixed sample order. Re-running on the same
//! sample set always yields the same result.
//!
//! Termination: assignments stable, every centroid moved less than epsilon,
//! or the iteration cap. The cap bounds worst-case latency on degenerate
//! inputs; callers needing a convergence guarantee opt into strict mode.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::sampler::{ColorSpace, SampleSet};
use crate::constants::clustering::{
    DEFAULT_CLUSTER_COUNT, DEFAULT_CONVERGENCE_EPSILON, DEFAULT_MAX_ITERATIONS,
};
use crate::error::{ExtractionError, Result};

/// Policy for clusters left without members after an update step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmptyClusterPolicy {
    /// Re-seed from the sample farthest from all current centroids,
    /// keeping the cluster count at K
    #[default]
    Reseed,
    /// Remove the cluster, shrinking the effective K for the rest of the
    /// run; the result reports the reduced count
    Drop,
}

/// One dominant color group: centroid plus member count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Mean color vector of the members, in the working color space
    pub centroid: [f32; 3],
    /// Number of samples assigned to this cluster (always ≥ 1)
    pub count: usize,
}

/// Output of one clustering run
///
/// Clusters are unordered among themselves; each carries its member count
/// for downstream ranking. `iterations` and `converged` let callers that
/// need guarantees check how the run terminated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringResult {
    /// Working color space the centroids live in
    pub space: ColorSpace,
    /// The retained clusters (empty clusters are never reported)
    pub clusters: Vec<Cluster>,
    /// Number of assignment/update passes performed
    pub iterations: usize,
    /// Whether the run terminated by stability or epsilon rather than the cap
    pub converged: bool,
}

impl ClusteringResult {
    /// Total number of samples across all clusters
    pub fn sample_count(&self) -> usize {
        self.clusters.iter().map(|c| c.count).sum()
    }
}

/// K-means engine over color sample sets
pub struct ClusterEngine {
    cluster_count: usize,
    max_iterations: usize,
    epsilon: f32,
    empty_cluster_policy: EmptyClusterPolicy,
    require_convergence: bool,
}

impl Default for ClusterEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterEngine {
    /// Create an engine with default parameters
    pub fn new() -> Self {
        Self {
            cluster_count: DEFAULT_CLUSTER_COUNT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            epsilon: DEFAULT_CONVERGENCE_EPSILON,
            empty_cluster_policy: EmptyClusterPolicy::default(),
            require_convergence: false,
        }
    }

    /// Create an engine with custom parameters
    pub fn with_params(
        cluster_count: usize,
        max_iterations: usize,
        epsilon: f32,
        empty_cluster_policy: EmptyClusterPolicy,
        require_convergence: bool,
    ) -> Self {
        Self {
            cluster_count,
            max_iterations,
            epsilon,
            empty_cluster_policy,
            require_convergence,
        }
    }

    /// Partition a sample set into at most K dominant color clusters
    ///
    /// Fewer than K distinct samples reduce the effective cluster count; a
    /// uniform sample set yields exactly one cluster at that color.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` for a zero K, zero iteration cap, or a
    ///   non-finite/negative epsilon
    /// - `NoClusters` for an empty sample set
    /// - `ClusteringDidNotConverge` when strict convergence is requested and
    ///   the iteration cap was reached first
    pub fn run(&self, samples: &SampleSet) -> Result<ClusteringResult> {
        self.validate()?;

        let data = samples.samples();
        if data.is_empty() {
            return Err(ExtractionError::NoClusters { sample_count: 0 });
        }

        let mut centroids = seed_centroids(data, self.cluster_count);
        let mut assignments: Vec<usize> = vec![usize::MAX; data.len()];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            iterations += 1;

            let mut changed = 0usize;
            for (i, sample) in data.iter().enumerate() {
                let nearest = nearest_centroid(sample, &centroids);
                if assignments[i] != nearest {
                    assignments[i] = nearest;
                    changed += 1;
                }
            }
            if changed == 0 {
                converged = true;
                break;
            }

            let (updated, had_empty, dropped) =
                self.update_centroids(data, &assignments, &centroids);

            // Movement convergence is only meaningful when the cluster set
            // kept its shape this iteration
            if !had_empty {
                let moved = max_movement(&centroids, &updated);
                centroids = updated;
                if moved < self.epsilon {
                    converged = true;
                    break;
                }
            } else {
                centroids = updated;
                if dropped {
                    // Cluster indices shifted; force a full reassignment
                    for a in assignments.iter_mut() {
                        *a = usize::MAX;
                    }
                }
            }
        }

        if !converged && self.require_convergence {
            return Err(ExtractionError::ClusteringDidNotConverge { iterations });
        }

        // Final membership pass against the final centroids; clusters that
        // attract no samples are not reported
        let mut counts = vec![0usize; centroids.len()];
        for sample in data {
            counts[nearest_centroid(sample, &centroids)] += 1;
        }
        let clusters: Vec<Cluster> = centroids
            .iter()
            .zip(&counts)
            .filter(|(_, &count)| count > 0)
            .map(|(&centroid, &count)| Cluster { centroid, count })
            .collect();

        debug!(
            "k-means finished: {} clusters, {} iterations, converged = {}",
            clusters.len(),
            iterations,
            converged
        );

        Ok(ClusteringResult {
            space: samples.space(),
            clusters,
            iterations,
            converged,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.cluster_count == 0 {
            return Err(ExtractionError::invalid_parameter("cluster_count", 0));
        }
        if self.max_iterations == 0 {
            return Err(ExtractionError::invalid_parameter("max_iterations", 0));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(ExtractionError::invalid_parameter(
                "convergence_epsilon",
                self.epsilon,
            ));
        }
        Ok(())
    }

    /// Recompute centroids as member means; apply the empty-cluster policy
    ///
    /// Returns the new centroids plus whether any cluster emptied and
    /// whether clusters were dropped (indices shifted).
    fn update_centroids(
        &self,
        data: &[[f32; 3]],
        assignments: &[usize],
        centroids: &[[f32; 3]],
    ) -> (Vec<[f32; 3]>, bool, bool) {
        let mut sums = vec![[0.0f64; 3]; centroids.len()];
        let mut counts = vec![0usize; centroids.len()];
        for (i, sample) in data.iter().enumerate() {
            let c = assignments[i];
            sums[c][0] += sample[0] as f64;
            sums[c][1] += sample[1] as f64;
            sums[c][2] += sample[2] as f64;
            counts[c] += 1;
        }

        let mut updated = centroids.to_vec();
        let mut empty_slots = Vec::new();
        for c in 0..centroids.len() {
            if counts[c] > 0 {
                let n = counts[c] as f64;
                updated[c] = [
                    (sums[c][0] / n) as f32,
                    (sums[c][1] / n) as f32,
                    (sums[c][2] / n) as f32,
                ];
            } else {
                empty_slots.push(c);
            }
        }

        if empty_slots.is_empty() {
            return (updated, false, false);
        }

        match self.empty_cluster_policy {
            EmptyClusterPolicy::Reseed => {
                // Fill one slot at a time so later re-seeds account for
                // earlier ones
                let mut filled: Vec<[f32; 3]> = updated
                    .iter()
                    .enumerate()
                    .filter(|(c, _)| !empty_slots.contains(c))
                    .map(|(_, &centroid)| centroid)
                    .collect();
                for &c in &empty_slots {
                    let reseeded = farthest_sample(data, &filled);
                    debug!("re-seeding empty cluster {} at {:?}", c, reseeded);
                    updated[c] = reseeded;
                    filled.push(reseeded);
                }
                (updated, true, false)
            }
            EmptyClusterPolicy::Drop => {
                debug!("dropping {} empty cluster(s)", empty_slots.len());
                for &c in empty_slots.iter().rev() {
                    updated.remove(c);
                }
                (updated, true, true)
            }
        }
    }
}

/// Seed centroids from the first K distinct samples in sample order
fn seed_centroids(data: &[[f32; 3]], k: usize) -> Vec<[f32; 3]> {
    let mut centroids: Vec<[f32; 3]> = Vec::with_capacity(k);
    for sample in data {
        if !centroids.contains(sample) {
            centroids.push(*sample);
            if centroids.len() == k {
                break;
            }
        }
    }
    centroids
}

/// Index of the nearest centroid by squared Euclidean distance
///
/// Exact ties go to the lowest index.
fn nearest_centroid(sample: &[f32; 3], centroids: &[[f32; 3]]) -> usize {
    let mut best = 0;
    let mut best_dist = distance_squared(sample, &centroids[0]);
    for (i, centroid) in centroids.iter().enumerate().skip(1) {
        let dist = distance_squared(sample, centroid);
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

/// Sample maximizing the minimum distance to the given centroids
///
/// Exact ties go to the earliest sample.
fn farthest_sample(data: &[[f32; 3]], centroids: &[[f32; 3]]) -> [f32; 3] {
    let mut best = data[0];
    let mut best_dist = f32::MIN;
    for sample in data {
        let nearest = centroids
            .iter()
            .map(|c| distance_squared(sample, c))
            .fold(f32::MAX, f32::min);
        if nearest > best_dist {
            best = *sample;
            best_dist = nearest;
        }
    }
    best
}

fn distance_squared(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    let d0 = a[0] - b[0];
    let d1 = a[1] - b[1];
    let d2 = a[2] - b[2];
    d0 * d0 + d1 * d1 + d2 * d2
}

/// Largest Euclidean centroid movement between two centroid sets
fn max_movement(before: &[[f32; 3]], after: &[[f32; 3]]) -> f32 {
    before
        .iter()
        .zip(after)
        .map(|(b, a)| distance_squared(b, a).sqrt())
        .fold(0.0, f32::max)
}
