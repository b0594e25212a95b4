//! Frequency-domain weighting functions.
//!
//! This module defines the `Weighting` trait and its implementations.
//! A weighting sees the cross-power spectrum plus both auto-spectra, so new
//! variants can be added here without touching the rest of the pipeline.

mod identity;
mod phat;
mod roth;
mod scot;

pub use identity::Identity;
pub use phat::Phat;
pub use roth::Roth;
pub use scot::Scot;

use rustfft::num_complex::Complex;

use crate::gcc::types::{
    CrossPowerSpectrum, Diagnostics, GccResult, NumericalWarning, Spectrum, WeightedSpectrum,
};
use crate::models::WeightingKind;

/// Spectra of the two input signals, for weightings that need auto-spectra.
#[derive(Debug, Clone, Copy)]
pub struct SpectralContext<'a> {
    /// Spectrum of the reference signal.
    pub reference: &'a Spectrum,
    /// Spectrum of the delayed signal.
    pub delayed: &'a Spectrum,
}

/// Trait for GCC weighting functions.
///
/// Implementations must return a spectrum of the same length as `cross`
/// and must not produce non-finite values for finite input.
pub trait Weighting: Send + Sync {
    /// Name of this weighting.
    fn name(&self) -> &str;

    /// Short description of the weighting.
    fn description(&self) -> &str;

    /// Weight the cross-power spectrum bin by bin.
    fn apply(
        &self,
        cross: &CrossPowerSpectrum,
        context: &SpectralContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> WeightedSpectrum;
}

/// Factory for the built-in weightings.
pub fn create_weighting(kind: WeightingKind) -> Box<dyn Weighting> {
    match kind {
        WeightingKind::Identity => Box::new(Identity),
        WeightingKind::Phat => Box::new(Phat),
        WeightingKind::Scot => Box::new(Scot),
        WeightingKind::Roth => Box::new(Roth),
    }
}

/// Factory by name. Unknown names are a configuration error.
pub fn weighting_by_name(name: &str) -> GccResult<Box<dyn Weighting>> {
    let kind: WeightingKind = name.parse()?;
    Ok(create_weighting(kind))
}

/// Divide every bin by its denominator, floored at machine epsilon scaled by
/// the largest denominator.
///
/// Bins below the floor are reported as a single `FlooredBins` warning.
pub(crate) fn normalize_bins(
    weighting: &str,
    bins: &[Complex<f64>],
    denominators: &[f64],
    diagnostics: &mut Diagnostics,
) -> WeightedSpectrum {
    debug_assert_eq!(bins.len(), denominators.len());

    let peak = denominators.iter().copied().fold(0.0, f64::max);
    let floor = if peak > 0.0 {
        f64::EPSILON * peak
    } else {
        f64::MIN_POSITIVE
    };

    let mut floored = 0;
    let mut exact_zeros = 0;
    let weighted: Vec<Complex<f64>> = bins
        .iter()
        .zip(denominators.iter())
        .map(|(&bin, &denominator)| {
            if denominator < floor {
                floored += 1;
                if denominator == 0.0 {
                    exact_zeros += 1;
                }
            }
            bin / denominator.max(floor)
        })
        .collect();

    if floored > 0 {
        diagnostics.push(NumericalWarning::FlooredBins {
            weighting: weighting.to_string(),
            count: floored,
            exact_zeros,
            floor,
        });
    }

    WeightedSpectrum::new(weighted)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_creates_every_kind() {
        assert_eq!(create_weighting(WeightingKind::Identity).name(), "Identity");
        assert_eq!(create_weighting(WeightingKind::Phat).name(), "PHAT");
        assert_eq!(create_weighting(WeightingKind::Scot).name(), "SCOT");
        assert_eq!(create_weighting(WeightingKind::Roth).name(), "ROTH");
    }

    #[test]
    fn factory_by_name_rejects_unknown() {
        assert!(weighting_by_name("phat").is_ok());
        assert!(weighting_by_name("ht").is_err());
    }

    #[test]
    fn normalize_guards_zero_denominators() {
        let bins = vec![Complex::new(2.0, 0.0), Complex::new(0.0, 0.0), Complex::new(0.0, 3.0)];
        let mut diagnostics = Diagnostics::new();

        let weighted = normalize_bins("test", &bins, &[2.0, 0.0, 3.0], &mut diagnostics);

        assert_eq!(weighted.len(), 3);
        assert!(weighted.bins().iter().all(|c| c.re.is_finite() && c.im.is_finite()));
        assert!((weighted.bins()[0].norm() - 1.0).abs() < 1e-12);
        assert_eq!(weighted.bins()[1], Complex::new(0.0, 0.0));
        assert_eq!(diagnostics.floored_bins(), 1);
    }

    #[test]
    fn normalize_all_zero_stays_finite() {
        let bins = vec![Complex::new(0.0, 0.0); 4];
        let mut diagnostics = Diagnostics::new();

        let weighted = normalize_bins("test", &bins, &[0.0; 4], &mut diagnostics);

        assert!(weighted.bins().iter().all(|c| *c == Complex::new(0.0, 0.0)));
        match &diagnostics.warnings()[0] {
            NumericalWarning::FlooredBins {
                count, exact_zeros, ..
            } => {
                assert_eq!(*count, 4);
                assert_eq!(*exact_zeros, 4);
            }
            other => panic!("unexpected warning {:?}", other),
        }
    }
}
