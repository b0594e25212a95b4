//! Generalized Cross-Correlation of two equal-length real signals.
//!
//! # Architecture
//!
//! The pipeline is a chain of small stages that [`Gcc`] composes:
//!
//! 1. **Spectral Transform** (`transform`): forward and inverse DFT through
//!    plans held in a shareable [`PlanCache`].
//!
//! 2. **Cross-Power Spectrum** (`cross_spectrum`): bin-wise product of one
//!    spectrum with the conjugate of the other.
//!
//! 3. **Weighting** (`weighting`): Identity, PHAT, SCOT or ROTH, or any
//!    custom [`Weighting`] implementation.
//!
//! 4. **Synthesis** (`synthesis`): inverse transform, imaginary residue
//!    check, lag centering and optional bias scaling.
//!
//! 5. **Peak Estimation** (`peak`): integer lag, optional parabolic
//!    refinement, delay in seconds and a confidence score.
//!
//! The output always has exactly N values with lag 0 at index `N / 2`.
//! In circular mode the correlation wraps around: a shift of `d` and of
//! `d - N` look the same. A pure single tone only determines the delay
//! modulo its period.
//!
//! # Usage
//!
//! ```ignore
//! use gcc_core::gcc::{Gcc, GccConfig};
//!
//! let correlator = Gcc::new(reference.len(), GccConfig::phat().with_sample_rate(48_000.0))?;
//! let output = correlator.correlate(&reference, &delayed)?;
//!
//! println!("delay: {} samples", output.lag.lag_samples);
//! for warning in output.diagnostics.warnings() {
//!     eprintln!("{}", warning);
//! }
//! ```

pub mod batch;
mod confidence;
mod cross_spectrum;
mod peak;
mod pipeline;
mod synthesis;
#[cfg(test)]
mod test_signals;
mod transform;
pub mod types;
pub mod weighting;

// Re-export main types from types module
pub use types::{
    ConfigurationError, CorrelationSequence, CrossPowerSpectrum, Diagnostics, GccResult,
    LagEstimate, NumericalWarning, Signal, Spectrum, WeightedSpectrum,
};

// Re-export pipeline stages
pub use confidence::peak_confidence;
pub use cross_spectrum::cross_power;
pub use peak::{estimate_lag, find_peak, fit_parabola, fit_parabola_circular, PeakOptions};
pub use synthesis::{
    apply_scale, center_lags, check_imaginary_residue, synthesize, DEFAULT_IMAGINARY_TOLERANCE,
};
pub use transform::{PlanCache, TransformPlan};

// Re-export weighting trait, implementations and factories
pub use weighting::{
    create_weighting, weighting_by_name, Identity, Phat, Roth, Scot, SpectralContext, Weighting,
};

// Re-export the orchestrator
pub use batch::correlate_pairs;
pub use pipeline::{gcc, Gcc, GccConfig, GccOutput};
