//! Cluster formation over the timepoint axis.
//!
//! A cluster is a maximal contiguous run of timepoints whose statistic
//! crosses the cluster-forming threshold in the tested direction. For a
//! two-sided tail, positive and negative excursions form separate clusters
//! even when adjacent.

use serde::{Deserialize, Serialize};

use crate::types::{ClusterMask, Tail};

/// A contiguous run of supra-threshold timepoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// First timepoint index inside the cluster.
    pub start: usize,
    /// One past the last timepoint index inside the cluster.
    pub end: usize,
    /// Aggregate statistic: sum of the per-timepoint t values in the run.
    /// Negative for clusters below a negative threshold.
    pub mass: f64,
}

impl Cluster {
    /// Number of timepoints spanned.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when the cluster spans no timepoints (never produced by
    /// [`find_clusters`], present for completeness).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Boolean membership mask over a timepoint axis of length `n_timepoints`.
    pub fn mask(&self, n_timepoints: usize) -> ClusterMask {
        ClusterMask::from_shape_fn(n_timepoints, |j| j >= self.start && j < self.end)
    }
}

/// Polarity class of a timepoint under the threshold rule.
///
/// 0 = sub-threshold, +1 = exceeds in the positive direction,
/// -1 = exceeds in the negative direction.
fn classify(t: f64, threshold: f64, tail: Tail) -> i8 {
    match tail {
        Tail::Positive => {
            if t > threshold {
                1
            } else {
                0
            }
        }
        Tail::Negative => {
            if t < threshold {
                -1
            } else {
                0
            }
        }
        Tail::TwoSided => {
            let mag = threshold.abs();
            if t > mag {
                1
            } else if t < -mag {
                -1
            } else {
                0
            }
        }
    }
}

/// Form all clusters of `t` under the given threshold and tail.
pub fn find_clusters(t: &[f64], threshold: f64, tail: Tail) -> Vec<Cluster> {
    find_clusters_excluding(t, threshold, tail, None)
}

/// Cluster formation with an optional per-timepoint exclusion mask.
///
/// Excluded timepoints are treated as sub-threshold, so they break runs.
/// Used by the step-down pass to remove already-significant clusters.
pub(crate) fn find_clusters_excluding(
    t: &[f64],
    threshold: f64,
    tail: Tail,
    exclude: Option<&[bool]>,
) -> Vec<Cluster> {
    let mut clusters = Vec::new();
    let mut run_class = 0i8;
    let mut run_start = 0usize;
    let mut run_mass = 0.0;

    for (j, &value) in t.iter().enumerate() {
        let excluded = exclude.map_or(false, |mask| mask[j]);
        let class = if excluded {
            0
        } else {
            classify(value, threshold, tail)
        };

        if class == run_class {
            if class != 0 {
                run_mass += value;
            }
            continue;
        }
        if run_class != 0 {
            clusters.push(Cluster {
                start: run_start,
                end: j,
                mass: run_mass,
            });
        }
        run_class = class;
        run_start = j;
        run_mass = if class != 0 { value } else { 0.0 };
    }
    if run_class != 0 {
        clusters.push(Cluster {
            start: run_start,
            end: t.len(),
            mass: run_mass,
        });
    }

    clusters
}

/// The per-draw entry of the null distribution: the extreme cluster mass
/// under the threshold rule, or 0.0 when no cluster forms.
///
/// Positive tail records the largest mass, negative tail the most negative
/// mass (as-is, i.e. <= 0), two-sided the largest absolute mass.
pub(crate) fn max_cluster_stat(
    t: &[f64],
    threshold: f64,
    tail: Tail,
    exclude: Option<&[bool]>,
) -> f64 {
    let clusters = find_clusters_excluding(t, threshold, tail, exclude);
    match tail {
        Tail::Positive => clusters.iter().map(|c| c.mass).fold(0.0, f64::max),
        Tail::Negative => clusters.iter().map(|c| c.mass).fold(0.0, f64::min),
        Tail::TwoSided => clusters.iter().map(|c| c.mass.abs()).fold(0.0, f64::max),
    }
}
