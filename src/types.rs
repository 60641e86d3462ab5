//! Type aliases and common types.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Sample matrix: epochs (rows) by timepoints (columns).
pub type SampleMatrix = Array2<f64>;

/// Boolean mask over the timepoint axis marking cluster membership.
pub type ClusterMask = Array1<bool>;

/// Direction of the tested effect.
///
/// `Positive` tests for values significantly greater than zero,
/// `Negative` for significantly less, `TwoSided` for either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tail {
    /// Test for a positive deviation from zero (tail = +1).
    Positive,
    /// Test for a negative deviation from zero (tail = -1).
    Negative,
    /// Test for a deviation in either direction (tail = 0).
    TwoSided,
}

impl Tail {
    /// Convert from the conventional numeric tail code (+1, -1, 0).
    ///
    /// Any other code is rejected with `InvalidConfig`, matching callers
    /// that carry tail direction as an integer.
    pub fn from_i8(code: i8) -> Result<Self, Error> {
        match code {
            1 => Ok(Tail::Positive),
            -1 => Ok(Tail::Negative),
            0 => Ok(Tail::TwoSided),
            other => Err(Error::config(format!(
                "tail must be one of -1, 0, 1 (got {})",
                other
            ))),
        }
    }

    /// The conventional numeric tail code.
    pub fn as_i8(self) -> i8 {
        match self {
            Tail::Positive => 1,
            Tail::Negative => -1,
            Tail::TwoSided => 0,
        }
    }
}

impl std::fmt::Display for Tail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tail::Positive => write!(f, "positive"),
            Tail::Negative => write!(f, "negative"),
            Tail::TwoSided => write!(f, "two-sided"),
        }
    }
}
