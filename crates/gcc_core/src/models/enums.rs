//! Core enums used throughout the crate.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::gcc::ConfigurationError;

/// Frequency-domain weighting applied to the cross-power spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightingKind {
    /// No weighting (plain / Carter GCC).
    #[default]
    Identity,
    /// Phase transform: every bin normalized to unit magnitude.
    Phat,
    /// Smoothed coherence transform: normalized by both auto-spectra.
    Scot,
    /// Roth processor: normalized by the reference auto-spectrum.
    Roth,
}

impl WeightingKind {
    /// All supported weighting kinds.
    pub const ALL: [WeightingKind; 4] = [
        WeightingKind::Identity,
        WeightingKind::Phat,
        WeightingKind::Scot,
        WeightingKind::Roth,
    ];

    /// Canonical lowercase name, as accepted by `FromStr` and the settings file.
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightingKind::Identity => "identity",
            WeightingKind::Phat => "phat",
            WeightingKind::Scot => "scot",
            WeightingKind::Roth => "roth",
        }
    }
}

impl std::fmt::Display for WeightingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightingKind::Identity => write!(f, "Identity"),
            WeightingKind::Phat => write!(f, "PHAT"),
            WeightingKind::Scot => write!(f, "SCOT"),
            WeightingKind::Roth => write!(f, "ROTH"),
        }
    }
}

impl FromStr for WeightingKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "identity" | "none" | "carter" | "standard" => Ok(WeightingKind::Identity),
            "phat" | "gcc-phat" => Ok(WeightingKind::Phat),
            "scot" | "gcc-scot" => Ok(WeightingKind::Scot),
            "roth" => Ok(WeightingKind::Roth),
            _ => Err(ConfigurationError::UnsupportedWeighting(s.to_string())),
        }
    }
}

/// Scaling applied to the correlation sequence after the inverse transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    /// Raw correlation values.
    #[default]
    None,
    /// Divide every lag by the signal length.
    Biased,
    /// Divide lag `l` by `N - |l|` (the number of overlapping samples).
    Unbiased,
}

impl std::fmt::Display for ScaleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleMode::None => write!(f, "None"),
            ScaleMode::Biased => write!(f, "Biased"),
            ScaleMode::Unbiased => write!(f, "Unbiased"),
        }
    }
}

/// How signals are laid out in the transform buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Padding {
    /// N-point transform. The correlation is circular: lags wrap around.
    #[default]
    Circular,
    /// Zero-pad to the next power of two >= 2N - 1, giving linear correlation.
    Linear,
}

impl Padding {
    /// Transform length used for a signal of `len` samples.
    pub fn transform_len(&self, len: usize) -> usize {
        match self {
            Padding::Circular => len,
            Padding::Linear => (2 * len).saturating_sub(1).max(1).next_power_of_two(),
        }
    }
}

/// Which value counts as the correlation peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeakMode {
    /// Largest value.
    #[default]
    Max,
    /// Largest absolute value (tolerates polarity inversion).
    AbsMax,
}
