//! GCC pipeline: two signals in, correlation sequence and lag estimate out.
//!
//! Stages, in order:
//!
//! 1. Validate lengths, samples and configuration. Nothing is transformed
//!    until every check passes.
//! 2. Forward transform of both signals with a cached plan.
//! 3. Cross-power spectrum `delayed * conj(reference)`.
//! 4. Weighting (Identity, PHAT, SCOT, ROTH or a custom [`Weighting`]).
//! 5. Inverse transform, residue check, lag centering and scaling.
//! 6. Peak search and lag estimate.
//!
//! # Sign convention
//!
//! The first argument is the reference and the second the delayed signal.
//! If `delayed[n] = reference[n - d]` the estimated lag is `+d`. Swapping the
//! arguments mirrors the correlation sequence and negates the lag.
//!
//! # Circular correlation
//!
//! With [`Padding::Circular`] the transform has exactly N points and the
//! correlation wraps: a delay `d` and a delay `d - N` are indistinguishable,
//! and only lags in `[-N/2, N/2)` are reported. Use [`Padding::Linear`] when
//! the signals are not periodic and wrap-around would alias distant lags.
//!
//! A pure single tone is inherently ambiguous: its correlation repeats every
//! period, so any delay is only recovered modulo the tone period.

use std::borrow::Cow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::GccSection;
use crate::models::{Padding, PeakMode, ScaleMode, WeightingKind};

use super::cross_spectrum::cross_power;
use super::peak::{estimate_lag, PeakOptions};
use super::synthesis::{synthesize, DEFAULT_IMAGINARY_TOLERANCE};
use super::transform::{PlanCache, TransformPlan};
use super::types::{
    ConfigurationError, CorrelationSequence, Diagnostics, GccResult, LagEstimate, Signal,
};
use super::weighting::{create_weighting, SpectralContext, Weighting};

/// Configuration for a GCC correlator.
#[derive(Debug, Clone, PartialEq)]
pub struct GccConfig {
    /// Frequency-domain weighting.
    pub weighting: WeightingKind,
    /// Sample rate in Hz, for reporting the delay in seconds.
    pub sample_rate: Option<f64>,
    /// Whether to refine the peak with parabolic interpolation.
    pub subsample: bool,
    /// Scaling applied after the inverse transform.
    pub scale: ScaleMode,
    /// Circular (N-point) or zero-padded linear correlation.
    pub padding: Padding,
    /// Signed or absolute peak search.
    pub peak_mode: PeakMode,
    /// Restrict the peak search to `|lag| <= max_lag`.
    pub max_lag: Option<usize>,
    /// Subtract each signal's mean before transforming.
    pub remove_dc: bool,
    /// Relative tolerance for the imaginary residue check.
    pub imaginary_tolerance: f64,
}

impl Default for GccConfig {
    fn default() -> Self {
        Self {
            weighting: WeightingKind::Identity,
            sample_rate: None,
            subsample: false,
            scale: ScaleMode::None,
            padding: Padding::Circular,
            peak_mode: PeakMode::Max,
            max_lag: None,
            remove_dc: false,
            imaginary_tolerance: DEFAULT_IMAGINARY_TOLERANCE,
        }
    }
}

impl GccConfig {
    /// Default configuration with PHAT weighting.
    pub fn phat() -> Self {
        Self::default().with_weighting(WeightingKind::Phat)
    }

    pub fn with_weighting(mut self, weighting: WeightingKind) -> Self {
        self.weighting = weighting;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    pub fn with_subsample(mut self, subsample: bool) -> Self {
        self.subsample = subsample;
        self
    }

    pub fn with_scale(mut self, scale: ScaleMode) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_peak_mode(mut self, peak_mode: PeakMode) -> Self {
        self.peak_mode = peak_mode;
        self
    }

    pub fn with_max_lag(mut self, max_lag: usize) -> Self {
        self.max_lag = Some(max_lag);
        self
    }

    pub fn with_remove_dc(mut self, remove_dc: bool) -> Self {
        self.remove_dc = remove_dc;
        self
    }

    pub fn with_imaginary_tolerance(mut self, tolerance: f64) -> Self {
        self.imaginary_tolerance = tolerance;
        self
    }

    /// Check the parts of the configuration that do not depend on the signals.
    pub fn validate(&self) -> GccResult<()> {
        if let Some(rate) = self.sample_rate {
            if !(rate.is_finite() && rate > 0.0) {
                return Err(ConfigurationError::InvalidSampleRate(rate));
            }
        }
        if !(self.imaginary_tolerance.is_finite() && self.imaginary_tolerance >= 0.0) {
            return Err(ConfigurationError::InvalidTolerance(self.imaginary_tolerance));
        }
        Ok(())
    }

    fn peak_options(&self) -> PeakOptions {
        PeakOptions {
            mode: self.peak_mode,
            max_lag: self.max_lag,
            subsample: self.subsample,
            sample_rate: self.sample_rate,
            circular: self.padding == Padding::Circular,
        }
    }
}

impl TryFrom<&GccSection> for GccConfig {
    type Error = ConfigurationError;

    fn try_from(section: &GccSection) -> Result<Self, Self::Error> {
        let config = GccConfig {
            weighting: section.weighting.parse()?,
            sample_rate: section.sample_rate,
            subsample: section.subsample,
            scale: section.scale,
            padding: section.padding,
            peak_mode: section.peak_mode,
            max_lag: section.max_lag,
            remove_dc: section.remove_dc,
            imaginary_tolerance: section.imaginary_tolerance,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Everything one correlation produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GccOutput {
    /// Lag-centered correlation, exactly N values.
    pub correlation: CorrelationSequence,
    /// Peak location and derived delay.
    pub lag: LagEstimate,
    /// Non-fatal numerical warnings.
    pub diagnostics: Diagnostics,
}

/// A correlator for signals of one fixed length.
///
/// The length and the transform plan are fixed at construction. A `Gcc` is
/// `Send + Sync` and can serve any number of threads at once.
pub struct Gcc {
    len: usize,
    config: GccConfig,
    weighting: Box<dyn Weighting>,
    cache: Arc<PlanCache>,
    plan: Arc<TransformPlan>,
}

impl Gcc {
    /// Create a correlator for `len`-sample signals with its own plan cache.
    pub fn new(len: usize, config: GccConfig) -> GccResult<Self> {
        Self::with_cache(len, config, Arc::new(PlanCache::new()))
    }

    /// Create a correlator that shares `cache` with other correlators.
    pub fn with_cache(len: usize, config: GccConfig, cache: Arc<PlanCache>) -> GccResult<Self> {
        let weighting = create_weighting(config.weighting);
        Self::with_weighting(len, config, weighting, cache)
    }

    /// Create a correlator with a custom weighting.
    ///
    /// `config.weighting` is ignored in favour of `weighting`.
    pub fn with_weighting(
        len: usize,
        config: GccConfig,
        weighting: Box<dyn Weighting>,
        cache: Arc<PlanCache>,
    ) -> GccResult<Self> {
        if len == 0 {
            return Err(ConfigurationError::ZeroLength);
        }
        config.validate()?;

        let plan = cache.plan(config.padding.transform_len(len));
        tracing::debug!(
            "GCC correlator ready: {} samples, {}-point transform, {} weighting",
            len,
            plan.len(),
            weighting.name()
        );

        Ok(Self {
            len,
            config,
            weighting,
            cache,
            plan,
        })
    }

    /// Create a correlator from the `[gcc]` settings section.
    pub fn from_settings(len: usize, section: &GccSection) -> GccResult<Self> {
        Self::new(len, GccConfig::try_from(section)?)
    }

    /// Signal length fixed at construction.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn config(&self) -> &GccConfig {
        &self.config
    }

    /// Name of the active weighting.
    pub fn weighting_name(&self) -> &str {
        self.weighting.name()
    }

    /// The plan cache this correlator draws from.
    pub fn cache(&self) -> &Arc<PlanCache> {
        &self.cache
    }

    /// Correlate `delayed` against `reference`.
    ///
    /// Fails with a [`ConfigurationError`] before any transform if the
    /// lengths differ, are zero, differ from [`len`](Self::len), or a sample
    /// is not finite.
    pub fn correlate(&self, reference: &[f64], delayed: &[f64]) -> GccResult<GccOutput> {
        if reference.len() != delayed.len() {
            return Err(ConfigurationError::LengthMismatch {
                reference: reference.len(),
                delayed: delayed.len(),
            });
        }

        let reference = Signal::from_slice(reference)?;
        let delayed = Signal::from_slice(delayed)?;
        self.correlate_signals(&reference, &delayed)
    }

    /// Correlate two validated signals.
    pub fn correlate_signals(&self, reference: &Signal, delayed: &Signal) -> GccResult<GccOutput> {
        if reference.len() != delayed.len() {
            return Err(ConfigurationError::LengthMismatch {
                reference: reference.len(),
                delayed: delayed.len(),
            });
        }
        if reference.len() != self.len {
            return Err(ConfigurationError::UnexpectedLength {
                expected: self.len,
                actual: reference.len(),
            });
        }

        let (reference, delayed) = if self.config.remove_dc {
            (
                Cow::Owned(reference.without_dc()),
                Cow::Owned(delayed.without_dc()),
            )
        } else {
            (Cow::Borrowed(reference), Cow::Borrowed(delayed))
        };
        self.check_amplitude(&reference, &delayed)?;

        let mut diagnostics = Diagnostics::new();

        let reference_spectrum = self.plan.forward(reference.samples());
        let delayed_spectrum = self.plan.forward(delayed.samples());

        let cross = cross_power(&delayed_spectrum, &reference_spectrum)?;
        let context = SpectralContext {
            reference: &reference_spectrum,
            delayed: &delayed_spectrum,
        };
        let weighted = self.weighting.apply(&cross, &context, &mut diagnostics);
        if weighted.len() != cross.len() {
            return Err(ConfigurationError::SpectrumLengthMismatch {
                lhs: weighted.len(),
                rhs: cross.len(),
            });
        }

        let correlation = synthesize(
            &self.plan,
            &weighted,
            self.len,
            self.config.scale,
            self.config.padding,
            self.config.imaginary_tolerance,
            &mut diagnostics,
        );
        let lag = estimate_lag(&correlation, &self.config.peak_options())?;

        tracing::trace!(
            "{} correlation of {} samples: lag {} ({} warnings)",
            self.weighting.name(),
            self.len,
            lag.lag_samples,
            diagnostics.warnings().len()
        );

        Ok(GccOutput {
            correlation,
            lag,
            diagnostics,
        })
    }
}

impl Gcc {
    /// Reject signals whose spectra would overflow `f64`.
    ///
    /// Every bin of a spectrum is bounded by the signal's absolute sum, so
    /// the products and powers the weightings form stay finite when the
    /// squared bounds, times the transform length, do.
    fn check_amplitude(&self, reference: &Signal, delayed: &Signal) -> GccResult<()> {
        let reference_bound = reference.abs_sum();
        let delayed_bound = delayed.abs_sum();
        let bound = (reference_bound * delayed_bound)
            .max(reference_bound * reference_bound)
            .max(delayed_bound * delayed_bound);

        if (bound * bound * self.plan.len() as f64).is_finite() {
            Ok(())
        } else {
            Err(ConfigurationError::AmplitudeOverflow { bound })
        }
    }
}

impl std::fmt::Debug for Gcc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gcc")
            .field("len", &self.len)
            .field("config", &self.config)
            .field("weighting", &self.weighting.name())
            .field("transform_len", &self.plan.len())
            .finish()
    }
}

/// One-off correlation of two signals.
///
/// Builds a fresh correlator each call; use [`Gcc`] directly to reuse plans.
pub fn gcc(reference: &[f64], delayed: &[f64], config: &GccConfig) -> GccResult<GccOutput> {
    if reference.len() != delayed.len() {
        return Err(ConfigurationError::LengthMismatch {
            reference: reference.len(),
            delayed: delayed.len(),
        });
    }
    Gcc::new(reference.len(), config.clone())?.correlate(reference, delayed)
}
