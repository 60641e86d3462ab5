//! Ordered frequency-band and channel labels.
//!
//! ERDS summaries group time-frequency power into canonical EEG bands and
//! present motor channels left-to-right. Both labels carry a fixed declared
//! ordering so grouped output sorts the way the maps are read, instead of
//! alphabetically.

use serde::{Deserialize, Serialize};

/// Canonical EEG frequency band, ordered from slow to fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FrequencyBand {
    /// (0, 3] Hz.
    Delta,
    /// (3, 7] Hz.
    Theta,
    /// (7, 13] Hz.
    Alpha,
    /// (13, 35] Hz.
    Beta,
    /// (35, 140] Hz.
    Gamma,
}

impl FrequencyBand {
    /// All bands in ascending frequency order.
    pub const ALL: [FrequencyBand; 5] = [
        FrequencyBand::Delta,
        FrequencyBand::Theta,
        FrequencyBand::Alpha,
        FrequencyBand::Beta,
        FrequencyBand::Gamma,
    ];

    /// Upper bound of each band in Hz; the lower bound is the previous
    /// band's upper bound (0 Hz for delta). Bounds are right-inclusive.
    const UPPER_HZ: [f64; 5] = [3.0, 7.0, 13.0, 35.0, 140.0];

    /// Classify a frequency into its band, or `None` outside (0, 140] Hz.
    pub fn of(freq_hz: f64) -> Option<FrequencyBand> {
        if !(freq_hz > 0.0 && freq_hz <= 140.0) {
            return None;
        }
        Self::ALL
            .iter()
            .zip(Self::UPPER_HZ)
            .find(|(_, upper)| freq_hz <= *upper)
            .map(|(band, _)| *band)
    }

    /// The band's frequency range in Hz as `(lower_exclusive, upper_inclusive)`.
    pub fn range_hz(self) -> (f64, f64) {
        let idx = Self::ALL.iter().position(|b| *b == self).expect("band is in ALL");
        let lower = if idx == 0 { 0.0 } else { Self::UPPER_HZ[idx - 1] };
        (lower, Self::UPPER_HZ[idx])
    }
}

impl std::fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FrequencyBand::Delta => "delta",
            FrequencyBand::Theta => "theta",
            FrequencyBand::Alpha => "alpha",
            FrequencyBand::Beta => "beta",
            FrequencyBand::Gamma => "gamma",
        };
        write!(f, "{}", name)
    }
}

/// Motor-cortex channel, ordered left to right as plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MotorChannel {
    /// Left motor cortex.
    C3,
    /// Vertex.
    Cz,
    /// Right motor cortex.
    C4,
}

impl MotorChannel {
    /// All channels in plotting order.
    pub const ALL: [MotorChannel; 3] = [MotorChannel::C3, MotorChannel::Cz, MotorChannel::C4];
}

impl std::fmt::Display for MotorChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MotorChannel::C3 => "C3",
            MotorChannel::Cz => "Cz",
            MotorChannel::C4 => "C4",
        };
        write!(f, "{}", name)
    }
}
