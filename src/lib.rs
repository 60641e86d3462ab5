//! # erds-cluster
//!
//! Cluster-based permutation testing for ERDS maps.
//!
//! This crate decides which contiguous time regions of an epochs ×
//! timepoints statistic matrix deviate significantly from zero, using a
//! one-sample sign-flip permutation test with cluster-level correction
//! for multiple comparisons across time. It outputs:
//! - The observed per-timepoint t statistic
//! - Cluster spans with boolean membership masks
//! - A Monte-Carlo p-value per cluster
//! - The null distribution of maximum cluster statistics
//!
//! The typical upstream is a time-frequency decomposition of motor-imagery
//! EEG: one matrix per channel (and frequency slice) of baseline-corrected
//! power, where desynchronization shows up as negative clusters and
//! synchronization as positive ones. Acquisition, filtering, epoching, and
//! TFR computation are out of scope; this crate starts at the matrix.
//!
//! ## Quick Start
//!
//! ```ignore
//! use erds_cluster::{ClusterPermutationTest, Tail};
//! use ndarray::Array2;
//!
//! let data: Array2<f64> = load_channel_power(); // epochs x timepoints
//!
//! let result = ClusterPermutationTest::new()
//!     .tail(Tail::Positive)
//!     .n_permutations(1024)
//!     .seed(1)
//!     .run(&data)?;
//!
//! for idx in result.significant(0.05) {
//!     let c = &result.clusters[idx];
//!     println!("cluster [{}, {}) p = {:.4}", c.start, c.end, result.p_values[idx]);
//! }
//! ```
//!
//! ## Determinism
//!
//! The same seed on the same data reproduces identical output. Each
//! permutation draw seeds its own generator from `(seed, draw_index)`, so
//! the `parallel` feature changes wall-clock time, never results.
//!
//! ## Two-tailed ERDS scans
//!
//! ```ignore
//! use erds_cluster::ErdsAnalysis;
//!
//! // Runs a positive and a negative one-tailed test and merges clusters
//! // with p <= 0.05 from either (no correction across the two tests).
//! let scan = ErdsAnalysis::new().seed(1).scan(&data)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod error;
mod result;
mod tester;
mod types;

// Functional modules
pub mod bands;
pub mod erds;
pub mod output;
pub mod statistics;

#[cfg(feature = "parallel")]
mod thread_pool;

// Re-exports for public API
pub use bands::{FrequencyBand, MotorChannel};
pub use config::{Config, Threshold};
pub use erds::{baseline_percent, ErdsAnalysis, ErdsScan};
pub use error::Error;
pub use result::{ClusterTestResult, Metadata};
pub use statistics::Cluster;
pub use tester::ClusterPermutationTest;
pub use types::{ClusterMask, SampleMatrix, Tail};

/// Convenience function for a single test with default configuration.
///
/// Runs a cluster permutation test with 1,024 draws, seed 0, and the
/// automatic t threshold.
///
/// # Arguments
///
/// * `data` - Sample matrix, epochs × timepoints
/// * `tail` - Direction of the tested effect
///
/// # Errors
///
/// `InvalidInput` for an unusable matrix (see [`ClusterPermutationTest::run`]).
pub fn test(data: &SampleMatrix, tail: Tail) -> Result<ClusterTestResult, Error> {
    ClusterPermutationTest::new().tail(tail).run(data)
}
