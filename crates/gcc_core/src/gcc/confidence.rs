//! Peak quality score.
//!
//! Combines three ratios on the correlation magnitude:
//! prominence over the median, uniqueness against the best value outside
//! the peak's neighborhood, and SNR against the spread of the lower 90%.

const RATIO_EPSILON: f64 = 1e-9;

/// Confidence (0 - 100) that `peak_index` is a genuine, unique peak.
///
/// A sequence holding any non-finite value scores 0.
pub fn peak_confidence(values: &[f64], peak_index: usize) -> f64 {
    if values.is_empty() || peak_index >= values.len() {
        return 0.0;
    }
    if values.iter().any(|v| !v.is_finite()) {
        return 0.0;
    }

    let magnitudes: Vec<f64> = values.iter().map(|x| x.abs()).collect();
    let peak_value = magnitudes[peak_index];

    let mut sorted = magnitudes.clone();
    sorted.sort_by(f64::total_cmp);

    // Prominence over noise floor
    let noise_floor = sorted[sorted.len() / 2];
    let prominence_ratio = peak_value / (noise_floor + RATIO_EPSILON);

    // Uniqueness vs second-best, excluding 1% of the sequence around the peak
    let neighbor_range = (magnitudes.len() / 100).max(1);
    let start_mask = peak_index.saturating_sub(neighbor_range);
    let end_mask = (peak_index + neighbor_range + 1).min(magnitudes.len());

    let second_best = magnitudes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i < start_mask || *i >= end_mask)
        .map(|(_, &v)| v)
        .max_by(f64::total_cmp)
        .unwrap_or(noise_floor);
    let uniqueness_ratio = peak_value / (second_best + RATIO_EPSILON);

    // SNR against the lower 90% of values
    let threshold = sorted[(sorted.len() * 90) / 100];
    let background: Vec<f64> = magnitudes.iter().copied().filter(|&x| x < threshold).collect();
    let background_std = if background.len() > 10 {
        let mean = background.iter().sum::<f64>() / background.len() as f64;
        let variance =
            background.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / background.len() as f64;
        variance.sqrt()
    } else {
        RATIO_EPSILON
    };
    let snr_ratio = peak_value / (background_std + RATIO_EPSILON);

    let confidence = (prominence_ratio * 5.0) + (uniqueness_ratio * 8.0) + (snr_ratio * 1.5);
    (confidence / 3.0).clamp(0.0, 100.0)
}
