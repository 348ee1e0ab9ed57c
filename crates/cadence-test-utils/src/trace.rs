//! Synthetic network telemetry.

use std::time::Duration;

use cadence_abr::Observation;
use web_time::Instant;

use crate::Xorshift64;

/// Telemetry the host would report at one decision opportunity.
#[derive(Clone, Copy, Debug)]
pub struct TraceStep {
    /// Offset from the session start.
    pub offset: Duration,
    pub throughput_kbps: Option<f64>,
    pub buffer_level_secs: Option<f64>,
}

impl TraceStep {
    pub fn observation(&self, current_index: usize, session_start: Instant) -> Observation {
        let mut obs = Observation::new(current_index, session_start + self.offset);
        obs.throughput_kbps = self.throughput_kbps;
        obs.buffer_level_secs = self.buffer_level_secs;
        obs
    }
}

#[derive(Clone, Debug, Default)]
pub struct NetworkTrace {
    steps: Vec<TraceStep>,
}

impl NetworkTrace {
    pub fn new(steps: Vec<TraceStep>) -> Self {
        Self { steps }
    }

    /// Random telemetry, including a share of missing and garbage readings.
    pub fn random(seed: u64, len: usize, interval: Duration) -> Self {
        let mut rng = Xorshift64::new(seed);
        let steps = (0..len)
            .map(|i| {
                let throughput_kbps = if rng.chance(0.05) {
                    None
                } else if rng.chance(0.03) {
                    Some(f64::NAN)
                } else {
                    Some(rng.range_f64(-100.0, 20_000.0))
                };
                let buffer_level_secs = if rng.chance(0.05) {
                    Some(-1.0)
                } else if rng.chance(0.03) {
                    None
                } else {
                    Some(rng.range_f64(0.0, 15.0))
                };
                TraceStep {
                    offset: interval * i as u32,
                    throughput_kbps,
                    buffer_level_secs,
                }
            })
            .collect();
        Self { steps }
    }

    /// Piecewise-constant throughput sampled every `interval`, no buffer readings.
    pub fn profile(phases: &[(f64, Duration)], interval: Duration) -> Self {
        let mut steps = Vec::new();
        let mut offset = Duration::ZERO;
        for &(kbps, length) in phases {
            let end = offset + length;
            while offset < end {
                steps.push(TraceStep {
                    offset,
                    throughput_kbps: Some(kbps),
                    buffer_level_secs: None,
                });
                offset += interval;
            }
        }
        Self { steps }
    }

    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TraceStep> {
        self.steps.iter()
    }
}
