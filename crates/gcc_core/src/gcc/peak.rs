//! Peak search and lag estimation.
//!
//! The integer lag of the largest correlation value is always reported.
//! Quadratic (parabolic) interpolation through the peak and its two
//! neighbors can be requested on top for sub-sample resolution.

use std::cmp::Ordering;

use crate::models::PeakMode;

use super::confidence::peak_confidence;
use super::types::{ConfigurationError, CorrelationSequence, GccResult, LagEstimate};

/// How to search the correlation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeakOptions {
    /// Signed maximum or absolute maximum.
    pub mode: PeakMode,
    /// Only consider lags with `|lag| <= max_lag`.
    pub max_lag: Option<usize>,
    /// Refine the peak with parabolic interpolation.
    pub subsample: bool,
    /// Sample rate in Hz, for converting lags to seconds.
    pub sample_rate: Option<f64>,
    /// The sequence is a circular correlation, so the first and last lags
    /// are neighbours.
    pub circular: bool,
}

/// Locate the peak of `sequence`.
///
/// Returns `(index, score)` where score is the value (or its magnitude for
/// [`PeakMode::AbsMax`]). Ties go to the smallest `|lag|`, then to the
/// smallest signed lag, so the result never depends on scan order.
pub fn find_peak(
    sequence: &CorrelationSequence,
    mode: PeakMode,
    max_lag: Option<usize>,
) -> Option<(usize, f64)> {
    let mut best: Option<(isize, usize, f64)> = None;
    for (index, (lag, value)) in sequence.iter().enumerate() {
        if max_lag.is_some_and(|limit| lag.unsigned_abs() > limit) {
            continue;
        }
        let score = score(value, mode);
        let replace = match best {
            None => true,
            Some((best_lag, _, best_score)) => match score.partial_cmp(&best_score) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Equal) => {
                    (lag.abs(), lag) < (best_lag.abs(), best_lag)
                }
                _ => false,
            },
        };
        if replace {
            best = Some((lag, index, score));
        }
    }

    best.map(|(_, index, score)| (index, score))
}

/// Sub-sample offset of the parabola through `values[peak - 1..=peak + 1]`.
///
/// Returns `None` at the sequence edges and `Some(0.0)` when the three
/// points do not form a maximum. The offset is clamped to `[-0.5, 0.5]`.
pub fn fit_parabola(values: &[f64], peak_index: usize) -> Option<f64> {
    if peak_index == 0 || peak_index + 1 >= values.len() {
        return None;
    }

    let y0 = values[peak_index - 1];
    let y1 = values[peak_index];
    let y2 = values[peak_index + 1];

    Some(parabola_offset(y0, y1, y2))
}

/// Like [`fit_parabola`], but the sequence wraps around, so edge peaks use
/// the neighbour from the other end.
///
/// Returns `None` only for sequences shorter than three values.
pub fn fit_parabola_circular(values: &[f64], peak_index: usize) -> Option<f64> {
    let len = values.len();
    if len < 3 || peak_index >= len {
        return None;
    }

    let y0 = values[(peak_index + len - 1) % len];
    let y1 = values[peak_index];
    let y2 = values[(peak_index + 1) % len];

    Some(parabola_offset(y0, y1, y2))
}

/// Vertex of the parabola through `(-1, y0)`, `(0, y1)`, `(1, y2)`,
/// clamped to `[-0.5, 0.5]`. Zero when the points do not form a maximum.
fn parabola_offset(y0: f64, y1: f64, y2: f64) -> f64 {
    // y = a x^2 + b x + c; vertex at -b / 2a
    let a = (y0 + y2) / 2.0 - y1;
    let b = (y2 - y0) / 2.0;

    if a >= -1e-12 * y1.abs().max(1e-300) {
        return 0.0;
    }

    (-b / (2.0 * a)).clamp(-0.5, 0.5)
}

/// Estimate the lag of `sequence` according to `options`.
pub fn estimate_lag(
    sequence: &CorrelationSequence,
    options: &PeakOptions,
) -> GccResult<LagEstimate> {
    let (peak_index, _) = find_peak(sequence, options.mode, options.max_lag)
        .ok_or(ConfigurationError::ZeroLength)?;

    let lag = sequence.lag_of_index(peak_index);
    let peak_value = sequence.values()[peak_index];

    let scores: Vec<f64> = sequence
        .values()
        .iter()
        .map(|&v| score(v, options.mode))
        .collect();

    let mut estimate = LagEstimate::new(lag, peak_index, peak_value)
        .with_confidence(peak_confidence(&scores, peak_index));

    if options.subsample {
        let fitted = if options.circular {
            fit_parabola_circular(&scores, peak_index)
        } else {
            fit_parabola(&scores, peak_index)
        };
        // Edge peaks of a linear correlation keep the integer lag
        let offset = fitted.unwrap_or(0.0);
        estimate = estimate.with_subsample_lag(lag as f64 + offset);
    }

    if let Some(rate) = options.sample_rate {
        estimate = estimate.with_sample_rate(rate);
    }

    tracing::trace!(
        "Peak at lag {} (index {}, value {:.6}, confidence {:.1})",
        estimate.lag_samples,
        peak_index,
        peak_value,
        estimate.confidence
    );

    Ok(estimate)
}

fn score(value: f64, mode: PeakMode) -> f64 {
    match mode {
        PeakMode::Max => value,
        PeakMode::AbsMax => value.abs(),
    }
}
