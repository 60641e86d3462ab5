//! ERDS significance scanning: two-tail testing and baseline correction.
//!
//! Motor-imagery ERDS maps show both desynchronization (power decrease)
//! and synchronization (power increase) against baseline, so a channel is
//! scanned with two independent one-tailed tests and the surviving
//! clusters are merged. No correction is applied across the two tests;
//! the merged mask is a screening device, not a family-wise guarantee.

use std::ops::Range;

use crate::config::Threshold;
use crate::error::Error;
use crate::result::ClusterTestResult;
use crate::tester::ClusterPermutationTest;
use crate::types::{ClusterMask, SampleMatrix, Tail};

/// Two-tail ERDS significance scan over one channel's epochs x timepoints
/// matrix.
///
/// # Example
///
/// ```ignore
/// use erds_cluster::ErdsAnalysis;
///
/// let scan = ErdsAnalysis::new()
///     .alpha(0.05)
///     .n_permutations(1024)
///     .seed(1)
///     .scan(&power)?;
///
/// // `scan.mask` marks timepoints inside any cluster with p <= alpha
/// // from either tail.
/// ```
#[derive(Debug, Clone)]
pub struct ErdsAnalysis {
    alpha: f64,
    n_permutations: usize,
    seed: u64,
    threshold: Threshold,
    step_down_p: Option<f64>,
}

/// Result of a two-tail ERDS scan.
#[derive(Debug, Clone)]
pub struct ErdsScan {
    /// Union of cluster masks with p <= alpha across both tails.
    pub mask: ClusterMask,
    /// Full result of the positive-tail (synchronization) test.
    pub positive: ClusterTestResult,
    /// Full result of the negative-tail (desynchronization) test.
    pub negative: ClusterTestResult,
}

impl Default for ErdsAnalysis {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            n_permutations: 1_024,
            seed: 0,
            threshold: Threshold::Auto,
            step_down_p: None,
        }
    }
}

impl ErdsAnalysis {
    /// Create with default configuration (alpha 0.05, auto threshold).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-cluster significance level for the merged mask.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the number of permutation draws per tail.
    pub fn n_permutations(mut self, n: usize) -> Self {
        self.n_permutations = n;
        self
    }

    /// Set the deterministic seed shared by both tail tests.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the cluster-forming threshold magnitude.
    ///
    /// A fixed threshold is applied as `+|t|` for the positive tail and
    /// `-|t|` for the negative tail.
    pub fn threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    /// Enable the step-down refinement pass in both tail tests.
    pub fn step_down_p(mut self, p: f64) -> Self {
        self.step_down_p = Some(p);
        self
    }

    /// Run both one-tailed tests and merge the significant clusters.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when alpha is outside (0, 1) or a tester parameter
    /// is out of range; `InvalidInput` for an unusable sample matrix.
    pub fn scan(&self, data: &SampleMatrix) -> Result<ErdsScan, Error> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(Error::config(format!(
                "alpha must lie in (0, 1) (got {})",
                self.alpha
            )));
        }

        let positive = self.tail_test(Tail::Positive).run(data)?;
        let negative = self.tail_test(Tail::Negative).run(data)?;

        let mut mask = positive.significance_mask(self.alpha);
        mask.zip_mut_with(&negative.significance_mask(self.alpha), |a, &b| *a |= b);

        Ok(ErdsScan {
            mask,
            positive,
            negative,
        })
    }

    fn tail_test(&self, tail: Tail) -> ClusterPermutationTest {
        let threshold = match (self.threshold, tail) {
            (Threshold::Auto, _) => Threshold::Auto,
            (Threshold::Fixed(t), Tail::Negative) => Threshold::Fixed(-t.abs()),
            (Threshold::Fixed(t), _) => Threshold::Fixed(t.abs()),
        };
        let mut test = ClusterPermutationTest::new()
            .tail(tail)
            .n_permutations(self.n_permutations)
            .seed(self.seed)
            .threshold(threshold);
        if let Some(p) = self.step_down_p {
            test = test.step_down_p(p);
        }
        test
    }
}

/// Rescale each epoch to percent change against its own baseline window.
///
/// Every row becomes `(x - m) / m` where `m` is the row's mean over
/// `baseline` (timepoint indices). This is the percent baseline mode of
/// ERDS maps: -0.5 reads as a 50% power decrease.
///
/// # Errors
///
/// `InvalidInput` when the baseline window is empty, out of bounds, or a
/// row's baseline mean is zero.
pub fn baseline_percent(data: &mut SampleMatrix, baseline: Range<usize>) -> Result<(), Error> {
    if baseline.is_empty() {
        return Err(Error::input("baseline window is empty"));
    }
    if baseline.end > data.ncols() {
        return Err(Error::input(format!(
            "baseline window {}..{} exceeds {} timepoints",
            baseline.start,
            baseline.end,
            data.ncols()
        )));
    }

    for mut row in data.rows_mut() {
        let m = row
            .slice(ndarray::s![baseline.clone()])
            .mean()
            .expect("baseline window is non-empty");
        if m == 0.0 {
            return Err(Error::input("epoch baseline mean is zero"));
        }
        row.mapv_inplace(|x| (x - m) / m);
    }
    Ok(())
}
