//! Test result types and related structures.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::statistics::Cluster;
use crate::types::{ClusterMask, Tail};

/// Complete result from a cluster permutation test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterTestResult {
    /// Observed per-timepoint one-sample t statistic.
    pub t_obs: Array1<f64>,

    /// Observed clusters, ordered by position along the timepoint axis.
    pub clusters: Vec<Cluster>,

    /// Monte-Carlo p-value per cluster, parallel to `clusters`.
    ///
    /// Always in [0, 1]. Draw 0 of the null distribution is the identity
    /// assignment, so every observed cluster counts against itself and the
    /// smallest attainable p-value is `1 / n_draws`.
    pub p_values: Vec<f64>,

    /// Null distribution: one maximum cluster statistic per draw, indexed
    /// by draw number (0.0 where a draw formed no cluster).
    pub h0: Vec<f64>,

    /// Shape, configuration, and runtime details of this run.
    pub metadata: Metadata,
}

/// Metadata for debugging and reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Number of epochs (rows) in the sample matrix.
    pub n_epochs: usize,
    /// Number of timepoints (columns) in the sample matrix.
    pub n_timepoints: usize,
    /// Tail direction the test was run with.
    pub tail: Tail,
    /// Resolved cluster-forming threshold.
    pub threshold: f64,
    /// Number of permutation draws in `h0`.
    pub n_draws: usize,
    /// True when all sign assignments were enumerated exactly.
    pub exact: bool,
    /// Base seed of the permutation generator.
    pub seed: u64,
    /// True when a step-down refinement pass was applied.
    pub step_down_applied: bool,
    /// Wall-clock runtime of the call in seconds.
    pub runtime_secs: f64,
}

impl ClusterTestResult {
    /// Boolean membership masks over the timepoint axis, one per cluster.
    pub fn cluster_masks(&self) -> Vec<ClusterMask> {
        self.clusters
            .iter()
            .map(|c| c.mask(self.metadata.n_timepoints))
            .collect()
    }

    /// Indices of clusters with p-value at or below `alpha`.
    pub fn significant(&self, alpha: f64) -> Vec<usize> {
        self.p_values
            .iter()
            .enumerate()
            .filter(|(_, &p)| p <= alpha)
            .map(|(i, _)| i)
            .collect()
    }

    /// Union mask of all clusters significant at `alpha`.
    pub fn significance_mask(&self, alpha: f64) -> ClusterMask {
        let mut mask = ClusterMask::from_elem(self.metadata.n_timepoints, false);
        for idx in self.significant(alpha) {
            let cluster = &self.clusters[idx];
            for j in cluster.start..cluster.end {
                mask[j] = true;
            }
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    fn make_result() -> ClusterTestResult {
        ClusterTestResult {
            t_obs: Array1::zeros(10),
            clusters: vec![
                Cluster { start: 1, end: 3, mass: 6.0 },
                Cluster { start: 6, end: 9, mass: 7.5 },
            ],
            p_values: vec![0.01, 0.40],
            h0: vec![0.0; 100],
            metadata: Metadata {
                n_epochs: 20,
                n_timepoints: 10,
                tail: Tail::Positive,
                threshold: 2.0,
                n_draws: 100,
                exact: false,
                seed: 1,
                step_down_applied: false,
                runtime_secs: 0.0,
            },
        }
    }

    #[test]
    fn significance_mask_unions_selected_clusters() {
        let result = make_result();
        assert_eq!(result.significant(0.05), vec![0]);

        let mask = result.significance_mask(0.05);
        let expected = [
            false, true, true, false, false, false, false, false, false, false,
        ];
        assert_eq!(mask.as_slice().unwrap(), &expected);

        let mask = result.significance_mask(0.5);
        assert_eq!(mask.iter().filter(|&&m| m).count(), 5);
    }

    #[test]
    fn masks_are_parallel_to_clusters() {
        let result = make_result();
        let masks = result.cluster_masks();
        assert_eq!(masks.len(), 2);
        assert_eq!(masks[0].iter().filter(|&&m| m).count(), 2);
        assert_eq!(masks[1].iter().filter(|&&m| m).count(), 3);
    }
}
