//! Core types for generalized cross-correlation.

use std::ops::Range;

use rustfft::num_complex::Complex;
use serde::{Deserialize, Serialize};

/// A finite, non-empty sequence of real samples.
///
/// Built once per correlation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Vec<f64>,
}

impl Signal {
    /// Create a signal, rejecting empty input and non-finite samples.
    pub fn new(samples: Vec<f64>) -> GccResult<Self> {
        if samples.is_empty() {
            return Err(ConfigurationError::ZeroLength);
        }
        if let Some(index) = samples.iter().position(|x| !x.is_finite()) {
            return Err(ConfigurationError::NonFiniteSample { index });
        }
        Ok(Self { samples })
    }

    /// Create a signal by copying a slice.
    pub fn from_slice(samples: &[f64]) -> GccResult<Self> {
        Self::new(samples.to_vec())
    }

    /// The samples.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed signal; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Arithmetic mean of the samples.
    pub fn mean(&self) -> f64 {
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Sum of absolute sample values. Bounds every DFT bin magnitude.
    pub fn abs_sum(&self) -> f64 {
        self.samples.iter().map(|x| x.abs()).sum()
    }

    /// Sum of squared samples.
    pub fn energy(&self) -> f64 {
        self.samples.iter().map(|x| x * x).sum()
    }

    /// Copy of this signal with its mean subtracted.
    pub fn without_dc(&self) -> Signal {
        let mean = self.mean();
        Signal {
            samples: self.samples.iter().map(|x| x - mean).collect(),
        }
    }
}

/// Complex DFT coefficients of a [`Signal`], indexed by frequency bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    bins: Vec<Complex<f64>>,
}

impl Spectrum {
    pub fn new(bins: Vec<Complex<f64>>) -> Self {
        Self { bins }
    }

    pub fn bins(&self) -> &[Complex<f64>] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Power `|X[k]|^2` of a single bin.
    pub fn power(&self, k: usize) -> f64 {
        self.bins[k].norm_sqr()
    }
}

/// Elementwise product of one spectrum with the conjugate of another.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossPowerSpectrum {
    bins: Vec<Complex<f64>>,
}

impl CrossPowerSpectrum {
    pub fn new(bins: Vec<Complex<f64>>) -> Self {
        Self { bins }
    }

    pub fn bins(&self) -> &[Complex<f64>] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Largest bin magnitude.
    pub fn max_magnitude(&self) -> f64 {
        self.bins.iter().map(|c| c.norm()).fold(0.0, f64::max)
    }
}

/// Cross-power spectrum after a weighting function has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSpectrum {
    bins: Vec<Complex<f64>>,
}

impl WeightedSpectrum {
    pub fn new(bins: Vec<Complex<f64>>) -> Self {
        Self { bins }
    }

    pub fn bins(&self) -> &[Complex<f64>] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

/// Correlation values indexed by lag.
///
/// Position `i` holds lag `i - len / 2`, so lag 0 sits at [`center`](Self::center)
/// and lags span `[-len/2, len - len/2)`. With circular padding the values wrap:
/// lag `-len/2` and lag `+len/2` are the same DFT bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSequence {
    values: Vec<f64>,
}

impl CorrelationSequence {
    /// Wrap lag-centered values.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index of lag 0.
    pub fn center(&self) -> usize {
        self.values.len() / 2
    }

    /// Range of lags covered by this sequence.
    pub fn lags(&self) -> Range<isize> {
        let center = self.center() as isize;
        -center..(self.values.len() as isize - center)
    }

    /// Lag stored at `index`.
    pub fn lag_of_index(&self, index: usize) -> isize {
        index as isize - self.center() as isize
    }

    /// Index storing `lag`, if the lag is in range.
    pub fn index_of_lag(&self, lag: isize) -> Option<usize> {
        if self.lags().contains(&lag) {
            Some((lag + self.center() as isize) as usize)
        } else {
            None
        }
    }

    /// Correlation value at `lag`, if the lag is in range.
    pub fn at_lag(&self, lag: isize) -> Option<f64> {
        self.index_of_lag(lag).map(|i| self.values[i])
    }

    /// Iterate `(lag, value)` pairs from the most negative lag upwards.
    pub fn iter(&self) -> impl Iterator<Item = (isize, f64)> + '_ {
        self.lags().zip(self.values.iter().copied())
    }
}

/// Delay estimate derived from the correlation peak.
///
/// Positive lag means the delayed signal arrives after the reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagEstimate {
    /// Integer lag of the peak in samples. Always present.
    pub lag_samples: isize,
    /// Index of the peak in the correlation sequence.
    pub peak_index: usize,
    /// Correlation value at the peak.
    pub peak_value: f64,
    /// Parabolic sub-sample lag, when interpolation was requested.
    pub subsample_lag: Option<f64>,
    /// `lag_samples / sample_rate`, when a sample rate was given.
    pub delay_seconds: Option<f64>,
    /// `subsample_lag / sample_rate`, when both are available.
    pub subsample_delay_seconds: Option<f64>,
    /// Peak quality score (0 - 100).
    pub confidence: f64,
}

impl LagEstimate {
    /// Create an integer-lag estimate with no timing or refinement attached.
    pub fn new(lag_samples: isize, peak_index: usize, peak_value: f64) -> Self {
        Self {
            lag_samples,
            peak_index,
            peak_value,
            subsample_lag: None,
            delay_seconds: None,
            subsample_delay_seconds: None,
            confidence: 0.0,
        }
    }

    /// Attach a sub-sample lag.
    pub fn with_subsample_lag(mut self, lag: f64) -> Self {
        self.subsample_lag = Some(lag);
        self
    }

    /// Convert lags to seconds at the given sample rate.
    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.delay_seconds = Some(self.lag_samples as f64 / sample_rate);
        self.subsample_delay_seconds = self.subsample_lag.map(|lag| lag / sample_rate);
        self
    }

    /// Set the confidence score.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Best available lag: sub-sample if present, integer otherwise.
    pub fn best_lag(&self) -> f64 {
        self.subsample_lag.unwrap_or(self.lag_samples as f64)
    }
}

/// Non-fatal numerical conditions observed during one correlation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NumericalWarning {
    /// The inverse transform left an imaginary part above tolerance.
    ImaginaryResidue { max_imaginary: f64, tolerance: f64 },
    /// Bins whose magnitude fell below the division floor.
    FlooredBins {
        weighting: String,
        count: usize,
        exact_zeros: usize,
        floor: f64,
    },
    /// Correlation values that are NaN or infinite.
    NonFiniteValues { count: usize },
}

impl std::fmt::Display for NumericalWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumericalWarning::ImaginaryResidue {
                max_imaginary,
                tolerance,
            } => write!(
                f,
                "Imaginary residue {:.3e} after inverse transform exceeds tolerance {:.3e}",
                max_imaginary, tolerance
            ),
            NumericalWarning::FlooredBins {
                weighting,
                count,
                exact_zeros,
                floor,
            } => write!(
                f,
                "{}: {} bins below floor {:.3e} ({} exactly zero)",
                weighting, count, floor, exact_zeros
            ),
            NumericalWarning::NonFiniteValues { count } => {
                write!(f, "{} correlation values are not finite", count)
            }
        }
    }
}

/// Warnings collected while running one correlation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    warnings: Vec<NumericalWarning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and emit it through `tracing`.
    pub fn push(&mut self, warning: NumericalWarning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[NumericalWarning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn has_imaginary_residue(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, NumericalWarning::ImaginaryResidue { .. }))
    }

    pub fn floored_bins(&self) -> usize {
        self.warnings
            .iter()
            .map(|w| match w {
                NumericalWarning::FlooredBins { count, .. } => *count,
                _ => 0,
            })
            .sum()
    }
}

/// Invalid input or configuration, raised before any transform runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// Signal has no samples.
    #[error("Signal length must be non-zero")]
    ZeroLength,

    /// Reference and delayed signals differ in length.
    #[error("Signal length mismatch: reference has {reference} samples, delayed has {delayed}")]
    LengthMismatch { reference: usize, delayed: usize },

    /// Signal length differs from the length fixed at setup.
    #[error("Signal length {actual} does not match configured length {expected}")]
    UnexpectedLength { expected: usize, actual: usize },

    /// NaN or infinite sample.
    #[error("Non-finite sample at index {index}")]
    NonFiniteSample { index: usize },

    /// Sample magnitudes so large that the cross-power spectrum would
    /// overflow `f64`.
    #[error("Sample magnitudes too large: cross-power bound {bound:.3e} overflows")]
    AmplitudeOverflow { bound: f64 },

    /// Weighting name not recognised.
    #[error("Unsupported weighting: {0}")]
    UnsupportedWeighting(String),

    /// Sample rate is zero, negative or not finite.
    #[error("Sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f64),

    /// Imaginary residue tolerance is negative or not finite.
    #[error("Imaginary tolerance must be non-negative and finite, got {0}")]
    InvalidTolerance(f64),

    /// Spectra passed to the cross-power builder differ in length.
    #[error("Spectrum length mismatch: {lhs} vs {rhs}")]
    SpectrumLengthMismatch { lhs: usize, rhs: usize },
}

/// Type alias for correlation results.
pub type GccResult<T> = Result<T, ConfigurationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_rejects_empty_and_non_finite() {
        assert_eq!(Signal::new(vec![]), Err(ConfigurationError::ZeroLength));
        assert_eq!(
            Signal::new(vec![0.0, f64::NAN, 1.0]),
            Err(ConfigurationError::NonFiniteSample { index: 1 })
        );
        assert!(Signal::new(vec![0.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn signal_abs_sum() {
        let signal = Signal::new(vec![1.0, -2.5, 0.5]).unwrap();
        assert_eq!(signal.abs_sum(), 4.0);
    }

    #[test]
    fn signal_removes_dc() {
        let signal = Signal::new(vec![1.0, 2.0, 3.0, 6.0]).unwrap();
        assert!((signal.mean() - 3.0).abs() < 1e-12);
        let centered = signal.without_dc();
        assert!(centered.mean().abs() < 1e-12);
        assert_eq!(centered.samples()[0], -2.0);
    }

    #[test]
    fn correlation_sequence_even_length_lags() {
        let seq = CorrelationSequence::new((0..8).map(|i| i as f64).collect());
        assert_eq!(seq.center(), 4);
        assert_eq!(seq.lags(), -4..4);
        assert_eq!(seq.at_lag(0), Some(4.0));
        assert_eq!(seq.at_lag(-4), Some(0.0));
        assert_eq!(seq.at_lag(3), Some(7.0));
        assert_eq!(seq.at_lag(4), None);
        assert_eq!(seq.lag_of_index(0), -4);
    }

    #[test]
    fn correlation_sequence_odd_length_is_symmetric() {
        let seq = CorrelationSequence::new(vec![0.0; 7]);
        assert_eq!(seq.lags(), -3..4);
        assert_eq!(seq.index_of_lag(3), Some(6));
        assert_eq!(seq.index_of_lag(-3), Some(0));
        assert_eq!(seq.iter().count(), 7);
    }

    #[test]
    fn lag_estimate_converts_to_seconds() {
        let estimate = LagEstimate::new(48, 10, 1.0)
            .with_subsample_lag(48.25)
            .with_sample_rate(48_000.0);
        assert!((estimate.delay_seconds.unwrap() - 0.001).abs() < 1e-12);
        assert!((estimate.subsample_delay_seconds.unwrap() - 48.25 / 48_000.0).abs() < 1e-12);
        assert_eq!(estimate.best_lag(), 48.25);
    }

    #[test]
    fn diagnostics_sums_floored_bins() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());
        diagnostics.push(NumericalWarning::FlooredBins {
            weighting: "PHAT".to_string(),
            count: 3,
            exact_zeros: 1,
            floor: 1e-12,
        });
        assert_eq!(diagnostics.floored_bins(), 3);
        assert!(!diagnostics.has_imaginary_residue());
    }
}
