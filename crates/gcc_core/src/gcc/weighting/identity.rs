//! Identity weighting (plain / Carter GCC).

use crate::gcc::types::{CrossPowerSpectrum, Diagnostics, WeightedSpectrum};

use super::{SpectralContext, Weighting};

/// Leaves the cross-power spectrum untouched.
///
/// The result is the ordinary cross-correlation. Any bias correction is the
/// synthesizer's job (see `ScaleMode`), not this weighting's.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Weighting for Identity {
    fn name(&self) -> &str {
        "Identity"
    }

    fn description(&self) -> &str {
        "Standard cross-correlation (no weighting)"
    }

    fn apply(
        &self,
        cross: &CrossPowerSpectrum,
        _context: &SpectralContext<'_>,
        _diagnostics: &mut Diagnostics,
    ) -> WeightedSpectrum {
        WeightedSpectrum::new(cross.bins().to_vec())
    }
}
