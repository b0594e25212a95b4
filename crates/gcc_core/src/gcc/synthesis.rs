//! Correlation synthesizer.
//!
//! Turns a weighted spectrum back into a lag-indexed correlation sequence:
//!
//! 1. Inverse transform (normalized by the transform length).
//! 2. Check the imaginary residue. Real inputs with a conjugate-symmetric
//!    weighting give a real result, so a large imaginary part means a broken
//!    weighting. It is reported, never silently dropped.
//! 3. Reorder the circular output so lag 0 sits in the middle. Raw index `i`
//!    holds lag `i` for the first half and lag `i - L` for the wrapped tail.
//! 4. Apply the optional bias scaling. This is the only place scaling happens.
//! 5. Report any non-finite value, which only a custom weighting can cause.

use rustfft::num_complex::Complex;

use crate::models::{Padding, ScaleMode};

use super::transform::TransformPlan;
use super::types::{CorrelationSequence, Diagnostics, NumericalWarning, WeightedSpectrum};

/// Default relative tolerance for the imaginary residue check.
pub const DEFAULT_IMAGINARY_TOLERANCE: f64 = 1e-9;

/// Inverse-transform `weighted` and build a centered sequence of `len` lags.
pub fn synthesize(
    plan: &TransformPlan,
    weighted: &WeightedSpectrum,
    len: usize,
    scale: ScaleMode,
    padding: Padding,
    imaginary_tolerance: f64,
    diagnostics: &mut Diagnostics,
) -> CorrelationSequence {
    let raw = plan.inverse(weighted.bins());
    check_imaginary_residue(&raw, imaginary_tolerance, diagnostics);

    let real: Vec<f64> = raw.iter().map(|c| c.re).collect();
    let mut values = center_lags(&real, len);
    apply_scale(&mut values, scale, padding);

    let non_finite = values.iter().filter(|v| !v.is_finite()).count();
    if non_finite > 0 {
        diagnostics.push(NumericalWarning::NonFiniteValues { count: non_finite });
    }

    CorrelationSequence::new(values)
}

/// Push an `ImaginaryResidue` warning if `max|Im|` exceeds
/// `tolerance * max(max|Re|, 1)`.
pub fn check_imaginary_residue(
    raw: &[Complex<f64>],
    tolerance: f64,
    diagnostics: &mut Diagnostics,
) -> bool {
    let max_imaginary = raw.iter().map(|c| c.im.abs()).fold(0.0, f64::max);
    let max_real = raw.iter().map(|c| c.re.abs()).fold(0.0, f64::max);

    let limit = tolerance * max_real.max(1.0);
    if max_imaginary > limit {
        diagnostics.push(NumericalWarning::ImaginaryResidue {
            max_imaginary,
            tolerance: limit,
        });
        return false;
    }
    true
}

/// Reorder a circular correlation of length `L >= len` into `len` centered lags.
///
/// Output index `i` holds lag `i - len / 2`, read from raw index
/// `(i - len / 2) mod L`.
pub fn center_lags(raw: &[f64], len: usize) -> Vec<f64> {
    let transform_len = raw.len() as isize;
    let half = (len / 2) as isize;

    (0..len as isize)
        .map(|i| raw[(i - half).rem_euclid(transform_len) as usize])
        .collect()
}

/// Scale centered correlation values in place.
///
/// `Biased` divides by the sequence length `N`. `Unbiased` divides lag `l`
/// by its overlap `N - |l|` (clamped to at least 1) for a linear
/// correlation. A circular correlation overlaps all `N` samples at every
/// lag, so there `Unbiased` is the same as `Biased`.
pub fn apply_scale(values: &mut [f64], scale: ScaleMode, padding: Padding) {
    let n = values.len();
    let half = (n / 2) as isize;

    match (scale, padding) {
        (ScaleMode::None, _) => {}
        (ScaleMode::Biased, _) | (ScaleMode::Unbiased, Padding::Circular) => {
            let m = n as f64;
            for value in values.iter_mut() {
                *value /= m;
            }
        }
        (ScaleMode::Unbiased, Padding::Linear) => {
            for (i, value) in values.iter_mut().enumerate() {
                let lag = i as isize - half;
                let overlap = (n as isize - lag.abs()).max(1);
                *value /= overlap as f64;
            }
        }
    }
}
