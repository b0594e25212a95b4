//! Parallel correlation of many independent signal pairs.

use rayon::prelude::*;

use super::pipeline::{Gcc, GccOutput};
use super::types::GccResult;

/// Correlate every `(reference, delayed)` pair with one correlator.
///
/// Pairs run in parallel on the rayon pool. The result vector is in input
/// order and each pair succeeds or fails on its own.
pub fn correlate_pairs(gcc: &Gcc, pairs: &[(Vec<f64>, Vec<f64>)]) -> Vec<GccResult<GccOutput>> {
    tracing::debug!(
        "Correlating {} pairs of {} samples ({} weighting)",
        pairs.len(),
        gcc.len(),
        gcc.weighting_name()
    );

    let results: Vec<GccResult<GccOutput>> = pairs
        .par_iter()
        .map(|(reference, delayed)| gcc.correlate(reference, delayed))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        tracing::warn!("{} of {} pairs failed validation", failed, pairs.len());
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcc::pipeline::GccConfig;
    use crate::gcc::test_signals::{circular_shift, noise};
    use crate::gcc::types::ConfigurationError;

    #[test]
    fn preserves_input_order() {
        let gcc = Gcc::new(128, GccConfig::phat()).unwrap();
        let shifts: Vec<isize> = (-20..20).step_by(3).collect();
        let pairs: Vec<(Vec<f64>, Vec<f64>)> = shifts
            .iter()
            .enumerate()
            .map(|(i, &shift)| {
                let a = noise(128, i as u64 + 1);
                let b = circular_shift(&a, shift);
                (a, b)
            })
            .collect();

        let results = correlate_pairs(&gcc, &pairs);

        assert_eq!(results.len(), shifts.len());
        for (result, &shift) in results.iter().zip(&shifts) {
            assert_eq!(result.as_ref().unwrap().lag.lag_samples, shift);
        }
    }

    #[test]
    fn failures_are_isolated() {
        let gcc = Gcc::new(32, GccConfig::default()).unwrap();
        let good = noise(32, 3);
        let mut bad = noise(32, 4);
        bad[0] = f64::INFINITY;
        let pairs = vec![
            (good.clone(), good.clone()),
            (good.clone(), bad),
            (good.clone(), good[..16].to_vec()),
        ];

        let results = correlate_pairs(&gcc, &pairs);

        assert!(results[0].is_ok());
        assert_eq!(
            results[1],
            Err(ConfigurationError::NonFiniteSample { index: 0 })
        );
        assert!(matches!(
            results[2],
            Err(ConfigurationError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn matches_sequential_results() {
        let gcc = Gcc::new(64, GccConfig::default().with_subsample(true)).unwrap();
        let pairs: Vec<(Vec<f64>, Vec<f64>)> = (0..8)
            .map(|i| (noise(64, i), noise(64, i + 100)))
            .collect();

        let parallel = correlate_pairs(&gcc, &pairs);

        for ((reference, delayed), result) in pairs.iter().zip(parallel) {
            assert_eq!(result, gcc.correlate(reference, delayed));
        }
    }

    #[test]
    fn empty_batch() {
        let gcc = Gcc::new(8, GccConfig::default()).unwrap();
        assert!(correlate_pairs(&gcc, &[]).is_empty());
    }
}
