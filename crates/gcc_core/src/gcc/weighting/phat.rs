//! PHAT (Phase Transform) weighting.
//!
//! Keeps only the phase of every cross-power bin, which sharpens the
//! correlation peak and makes it robust to reverberation and level
//! differences between the two signals.

use crate::gcc::types::{CrossPowerSpectrum, Diagnostics, WeightedSpectrum};

use super::{normalize_bins, SpectralContext, Weighting};

/// GCC-PHAT weighting: `C[k] / max(|C[k]|, eps)`.
///
/// `eps` is machine epsilon scaled by the largest bin magnitude, so only
/// bins that are numerically zero relative to the spectrum get floored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Phat;

impl Weighting for Phat {
    fn name(&self) -> &str {
        "PHAT"
    }

    fn description(&self) -> &str {
        "Phase Transform - unit magnitude in every bin"
    }

    fn apply(
        &self,
        cross: &CrossPowerSpectrum,
        _context: &SpectralContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> WeightedSpectrum {
        let magnitudes: Vec<f64> = cross.bins().iter().map(|c| c.norm()).collect();
        normalize_bins(self.name(), cross.bins(), &magnitudes, diagnostics)
    }
}
