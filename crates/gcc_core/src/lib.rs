//! GCC Core - Generalized Cross-Correlation and time delay estimation
//!
//! Correlates two equal-length real signals in the frequency domain with a
//! choice of weighting (Identity, PHAT, SCOT, ROTH) and estimates the delay
//! between them from the correlation peak.
//!
//! ```no_run
//! use gcc_core::{Gcc, GccConfig};
//!
//! let reference = vec![0.0; 1024];
//! let delayed = vec![0.0; 1024];
//! let correlator = Gcc::new(1024, GccConfig::phat()).unwrap();
//! let output = correlator.correlate(&reference, &delayed).unwrap();
//! println!("lag = {}", output.lag.lag_samples);
//! ```

pub mod config;
pub mod gcc;
pub mod logging;
pub mod models;

pub use gcc::{
    correlate_pairs, ConfigurationError, CorrelationSequence, Diagnostics, Gcc, GccConfig,
    GccOutput, GccResult, LagEstimate, NumericalWarning,
};
pub use models::{Padding, PeakMode, ScaleMode, WeightingKind};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
