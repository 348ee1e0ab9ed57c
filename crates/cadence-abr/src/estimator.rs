use std::collections::VecDeque;

use super::AbrOptions;

/// Trait for throughput smoothing strategies.
///
/// Allows testing the engine with mock estimators.
#[cfg_attr(test, unimock::unimock(api = EstimatorMock))]
pub trait Estimator {
    /// Smoothed throughput in kbit/s, given the raw value of the current observation.
    fn estimate_kbps(&self, current_kbps: Option<f64>) -> Option<f64>;

    /// Push a raw throughput sample in kbit/s.
    fn push_sample(&mut self, kbps: f64);
}

/// Bounded history of the most recent throughput samples.
///
/// The smoothed value is a recency-weighted mean: the i-th oldest of `n`
/// samples (1-indexed) weighs `i / n`, normalised by the sum of weights.
/// With fewer than `min_samples` retained the raw current value is used.
#[derive(Clone, Debug)]
pub struct ThroughputHistory {
    samples: VecDeque<f64>,
    capacity: usize,
    min_samples: usize,
}

impl ThroughputHistory {
    pub fn new(cfg: &AbrOptions) -> Self {
        Self::with_capacity(cfg.history_size, cfg.min_smoothing_samples)
    }

    pub fn with_capacity(capacity: usize, min_samples: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            min_samples: min_samples.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Retained samples, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    /// Only finite, strictly positive samples are retained.
    pub fn push_sample(&mut self, kbps: f64) {
        if !(kbps.is_finite() && kbps > 0.0) {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(kbps);
    }

    pub fn estimate_kbps(&self, current_kbps: Option<f64>) -> Option<f64> {
        if self.samples.len() < self.min_samples {
            return current_kbps;
        }
        Some(self.weighted_mean())
    }

    #[expect(clippy::cast_precision_loss)] // history sizes are tiny
    fn weighted_mean(&self) -> f64 {
        let n = self.samples.len() as f64;
        let mut total_weight = 0.0;
        let mut acc = 0.0;
        for (i, kbps) in self.samples.iter().enumerate() {
            let weight = (i + 1) as f64 / n;
            total_weight += weight;
            acc += kbps * weight;
        }
        acc / total_weight
    }
}

impl Estimator for ThroughputHistory {
    fn estimate_kbps(&self, current_kbps: Option<f64>) -> Option<f64> {
        self.estimate_kbps(current_kbps)
    }

    fn push_sample(&mut self, kbps: f64) {
        self.push_sample(kbps);
    }
}
