//! Forward and inverse DFT over fixed-length real buffers.
//!
//! FFT plans are expensive to build and free to reuse, so they live in a
//! [`PlanCache`] keyed by transform length. The cache is an ordinary value:
//! wrap it in an `Arc` to share it between correlators or threads, or give
//! each test its own.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

use super::types::Spectrum;

/// Forward and inverse FFT plans for one transform length.
pub struct TransformPlan {
    len: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl TransformPlan {
    /// Transform length.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Complex DFT of a real signal, zero-padded to the plan length.
    pub fn forward(&self, samples: &[f64]) -> Spectrum {
        debug_assert!(samples.len() <= self.len);

        let mut buffer: Vec<Complex<f64>> =
            samples.iter().map(|&x| Complex::new(x, 0.0)).collect();
        buffer.resize(self.len, Complex::new(0.0, 0.0));

        self.forward.process(&mut buffer);
        Spectrum::new(buffer)
    }

    /// Normalized inverse DFT. Imaginary parts are kept for inspection.
    pub fn inverse(&self, bins: &[Complex<f64>]) -> Vec<Complex<f64>> {
        debug_assert_eq!(bins.len(), self.len);

        let mut buffer = bins.to_vec();
        self.inverse.process(&mut buffer);

        let scale = 1.0 / self.len as f64;
        for value in &mut buffer {
            *value *= scale;
        }
        buffer
    }
}

impl std::fmt::Debug for TransformPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformPlan").field("len", &self.len).finish()
    }
}

/// Process-wide store of transform plans, keyed by length.
///
/// Plans are immutable once inserted, so any number of threads can hold
/// and run the same plan concurrently.
pub struct PlanCache {
    planner: Mutex<FftPlanner<f64>>,
    plans: RwLock<HashMap<usize, Arc<TransformPlan>>>,
}

impl PlanCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            planner: Mutex::new(FftPlanner::new()),
            plans: RwLock::new(HashMap::new()),
        }
    }

    /// Get the plan for `len`, building it on first use.
    pub fn plan(&self, len: usize) -> Arc<TransformPlan> {
        {
            let plans = self.plans.read();
            if let Some(plan) = plans.get(&len) {
                return Arc::clone(plan);
            }
        }

        let mut plans = self.plans.write();
        // Another thread may have built it while we waited for the write lock
        if let Some(plan) = plans.get(&len) {
            return Arc::clone(plan);
        }

        let mut planner = self.planner.lock();
        let plan = Arc::new(TransformPlan {
            len,
            forward: planner.plan_fft_forward(len),
            inverse: planner.plan_fft_inverse(len),
        });
        drop(planner);

        tracing::debug!("Built FFT plan for {} points", len);
        plans.insert(len, Arc::clone(&plan));
        plan
    }

    /// Whether a plan for `len` is cached.
    pub fn contains(&self, len: usize) -> bool {
        self.plans.read().contains_key(&len)
    }

    /// Number of cached plans.
    pub fn len(&self) -> usize {
        self.plans.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.read().is_empty()
    }

    /// Drop every cached plan. Plans already handed out stay valid.
    pub fn clear(&self) {
        self.plans.write().clear();
    }
}

impl Default for PlanCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PlanCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut lens: Vec<usize> = self.plans.read().keys().copied().collect();
        lens.sort_unstable();
        f.debug_struct("PlanCache").field("lens", &lens).finish()
    }
}
