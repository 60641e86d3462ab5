//! Statistical methods for cluster permutation testing.
//!
//! This module provides the core statistical infrastructure:
//! - One-sample t statistics over the epoch axis
//! - Cluster formation along the timepoint axis
//! - Sign-flip permutation null distributions (random or exact)

mod cluster;
mod permutation;
mod tstat;

pub use cluster::{find_clusters, Cluster};
pub use permutation::{counter_rng_seed, plan_draws, DrawPlan};
pub use tstat::one_sample_t;

pub(crate) use permutation::null_distribution;
pub(crate) use tstat::column_sumsq;
