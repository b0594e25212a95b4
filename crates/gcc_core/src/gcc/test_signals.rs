//! Deterministic test signals.

use std::f64::consts::PI;

/// Uniform noise in `[-0.5, 0.5)` from a 64-bit LCG.
pub fn noise(len: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 11) as f64 / (1u64 << 53) as f64) - 0.5
        })
        .collect()
}

/// Linear chirp sweeping `f0` to `f1` cycles per buffer.
pub fn chirp(len: usize, f0: f64, f1: f64) -> Vec<f64> {
    (0..len)
        .map(|n| {
            let t = n as f64 / len as f64;
            (2.0 * PI * (f0 * t + 0.5 * (f1 - f0) * t * t)).sin()
        })
        .collect()
}

/// Pure tone with a whole number of cycles per buffer.
pub fn tone(len: usize, cycles: f64) -> Vec<f64> {
    (0..len)
        .map(|n| (2.0 * PI * cycles * n as f64 / len as f64).sin())
        .collect()
}

/// Unit impulse at `position`.
pub fn impulse(len: usize, position: usize) -> Vec<f64> {
    let mut samples = vec![0.0; len];
    samples[position] = 1.0;
    samples
}

/// `out[n] = x[(n - shift) mod N]`, i.e. `x` delayed by `shift` samples.
pub fn circular_shift(x: &[f64], shift: isize) -> Vec<f64> {
    let n = x.len() as isize;
    (0..n)
        .map(|i| x[(i - shift).rem_euclid(n) as usize])
        .collect()
}

/// `x` delayed by `shift >= 0` samples with zeros shifted in.
pub fn zero_fill_delay(x: &[f64], shift: usize) -> Vec<f64> {
    let mut out = vec![0.0; shift.min(x.len())];
    out.extend_from_slice(&x[..x.len().saturating_sub(shift)]);
    out
}
