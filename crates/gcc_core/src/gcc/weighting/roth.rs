//! Roth processor weighting.

use crate::gcc::types::{CrossPowerSpectrum, Diagnostics, WeightedSpectrum};

use super::{normalize_bins, SpectralContext, Weighting};

/// ROTH weighting: `C[k] / |A[k]|^2`, with `A` the reference spectrum.
///
/// Suppresses frequencies where the reference carries little energy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Roth;

impl Weighting for Roth {
    fn name(&self) -> &str {
        "ROTH"
    }

    fn description(&self) -> &str {
        "Roth processor - normalized by the reference auto-spectrum"
    }

    fn apply(
        &self,
        cross: &CrossPowerSpectrum,
        context: &SpectralContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> WeightedSpectrum {
        let weights: Vec<f64> = (0..cross.len())
            .map(|k| context.reference.power(k))
            .collect();
        normalize_bins(self.name(), cross.bins(), &weights, diagnostics)
    }
}
