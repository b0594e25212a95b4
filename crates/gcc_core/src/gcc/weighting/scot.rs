//! SCOT (Smoothed Coherence Transform) weighting.
//!
//! Similar to PHAT but normalizes by the geometric mean of the two
//! auto-spectra instead of the cross-spectrum magnitude. Better than PHAT
//! when one signal is noisier than the other.

use crate::gcc::types::{CrossPowerSpectrum, Diagnostics, WeightedSpectrum};

use super::{normalize_bins, SpectralContext, Weighting};

/// GCC-SCOT weighting: `C[k] / sqrt(|A[k]|^2 |B[k]|^2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scot;

impl Weighting for Scot {
    fn name(&self) -> &str {
        "SCOT"
    }

    fn description(&self) -> &str {
        "Smoothed Coherence Transform - weights by signal coherence"
    }

    fn apply(
        &self,
        cross: &CrossPowerSpectrum,
        context: &SpectralContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> WeightedSpectrum {
        let weights: Vec<f64> = (0..cross.len())
            .map(|k| (context.reference.power(k) * context.delayed.power(k)).sqrt())
            .collect();
        normalize_bins(self.name(), cross.bins(), &weights, diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcc::cross_spectrum::cross_power;
    use crate::gcc::weighting::test_support::spectra;

    #[test]
    fn scot_matches_phat_for_raw_spectra() {
        // Without spectral averaging |A||B| == |A conj(B)|, so every bin is unit magnitude
        let (reference, delayed) = spectra(&[(2.0, 1.0), (0.5, -0.5)], &[(1.0, 3.0), (4.0, 0.0)]);
        let cross = cross_power(&delayed, &reference).unwrap();
        let context = SpectralContext {
            reference: &reference,
            delayed: &delayed,
        };
        let mut diagnostics = Diagnostics::new();

        let weighted = Scot.apply(&cross, &context, &mut diagnostics);

        for w in weighted.bins() {
            assert!((w.norm() - 1.0).abs() < 1e-12);
        }
        assert!(diagnostics.is_empty());
    }
}
