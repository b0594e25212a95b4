//! Cross-power spectrum builder.

use super::types::{ConfigurationError, CrossPowerSpectrum, GccResult, Spectrum};

/// Cross-power spectrum `lhs[k] * conj(rhs[k])`.
///
/// Swapping the arguments conjugates every bin, which mirrors the
/// correlation around lag 0. The pipeline always passes the delayed signal
/// as `lhs` and the reference as `rhs`, so a positive lag means the delayed
/// signal arrives after the reference.
pub fn cross_power(lhs: &Spectrum, rhs: &Spectrum) -> GccResult<CrossPowerSpectrum> {
    if lhs.len() != rhs.len() {
        return Err(ConfigurationError::SpectrumLengthMismatch {
            lhs: lhs.len(),
            rhs: rhs.len(),
        });
    }

    let bins = lhs
        .bins()
        .iter()
        .zip(rhs.bins().iter())
        .map(|(a, b)| a * b.conj())
        .collect();

    Ok(CrossPowerSpectrum::new(bins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::num_complex::Complex;

    fn spectrum(values: &[(f64, f64)]) -> Spectrum {
        Spectrum::new(values.iter().map(|&(re, im)| Complex::new(re, im)).collect())
    }

    #[test]
    fn multiplies_by_conjugate() {
        let a = spectrum(&[(1.0, 2.0), (0.0, 1.0)]);
        let b = spectrum(&[(3.0, -1.0), (2.0, 0.0)]);

        let cross = cross_power(&a, &b).unwrap();
        // (1 + 2i)(3 + i) = 1 + 7i
        assert_eq!(cross.bins()[0], Complex::new(1.0, 7.0));
        // (i)(2) = 2i
        assert_eq!(cross.bins()[1], Complex::new(0.0, 2.0));
    }

    #[test]
    fn swapping_arguments_conjugates() {
        let a = spectrum(&[(1.0, 2.0), (-0.5, 0.25), (4.0, 0.0)]);
        let b = spectrum(&[(3.0, -1.0), (2.0, 1.5), (0.0, -2.0)]);

        let ab = cross_power(&a, &b).unwrap();
        let ba = cross_power(&b, &a).unwrap();
        for (x, y) in ab.bins().iter().zip(ba.bins().iter()) {
            assert_eq!(*x, y.conj());
        }
    }

    #[test]
    fn rejects_length_mismatch() {
        let a = spectrum(&[(1.0, 0.0); 4]);
        let b = spectrum(&[(1.0, 0.0); 3]);
        assert_eq!(
            cross_power(&a, &b),
            Err(ConfigurationError::SpectrumLengthMismatch { lhs: 4, rhs: 3 })
        );
    }
}
