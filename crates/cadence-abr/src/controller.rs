use std::{cmp::Ordering, collections::VecDeque, fmt, time::Duration};

use web_time::Instant;

use super::{
    AbrOptions, AbrResult, BufferTier, Estimator, Observation, Representation, Representations,
    ThroughputHistory,
};

/// Why a decision landed where it did.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SwitchReason {
    MaintainCurrent,
    CriticalBuffer,
    LowBufferInsufficientThroughput,
    SafeBufferSteppingUp,
    SafeBufferSteppingDown,
    SafeBufferOptimal,
    HighBufferIncreasing,
    HighBufferControlledDecrease,
    RateLimited,
}

impl SwitchReason {
    /// Short human-readable label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MaintainCurrent => "maintain current quality",
            Self::CriticalBuffer => "critical buffer level",
            Self::LowBufferInsufficientThroughput => "low buffer, insufficient throughput",
            Self::SafeBufferSteppingUp => "safe buffer, stepping up",
            Self::SafeBufferSteppingDown => "safe buffer, stepping down",
            Self::SafeBufferOptimal => "safe buffer, optimal quality",
            Self::HighBufferIncreasing => "high buffer, increasing quality",
            Self::HighBufferControlledDecrease => "high buffer, controlled decrease",
            Self::RateLimited => "rate limited",
        }
    }
}

impl fmt::Display for SwitchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How strongly the host should honor a decision against competing heuristics.
///
/// Engine decisions are authoritative, so the only level is `Strong`: the
/// host applies the target rather than blending it with another rule.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwitchPriority {
    Strong,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SwitchDecision {
    pub target_index: usize,
    pub reason: SwitchReason,
    pub priority: SwitchPriority,
    /// Whether `target_index` differs from the (clamped) current index.
    pub changed: bool,
    /// Smoothed throughput the decision was based on, if telemetry was usable.
    pub smoothed_kbps: Option<f64>,
}

impl SwitchDecision {
    /// Resolve the target index into the ladder entry it names.
    pub fn representation<'a>(&self, ladder: &'a Representations) -> Option<&'a Representation> {
        ladder.get(self.target_index)
    }
}

/// Read-only diagnostics. Never feeds back into decisions.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineStats {
    pub switch_count: u64,
    pub last_switch_at: Option<Instant>,
    pub last_quality_index: Option<usize>,
    /// Most recent decided indices, oldest first.
    pub quality_history: Vec<usize>,
    pub session_elapsed: Duration,
    pub switches_per_sec: f64,
}

/// Buffer-tiered, throughput-budget rate adaptation for one media type.
///
/// Owned exclusively by one playback session; calls must be serialised by
/// the caller. Audio and video each need their own instance.
pub struct RateAdaptationEngine<E: Estimator = ThroughputHistory> {
    cfg: AbrOptions,
    estimator: E,
    session_start: Instant,
    last_switch_at: Option<Instant>,
    switch_count: u64,
    last_quality_index: Option<usize>,
    quality_history: VecDeque<usize>,
}

impl RateAdaptationEngine<ThroughputHistory> {
    #[must_use]
    pub fn new(cfg: AbrOptions, session_start: Instant) -> Self {
        let estimator = ThroughputHistory::new(&cfg);
        Self::with_estimator(cfg, estimator, session_start)
    }

    /// Like [`RateAdaptationEngine::new`], rejecting unusable options.
    ///
    /// # Errors
    ///
    /// [`AbrError::InvalidOptions`](crate::AbrError::InvalidOptions) from [`AbrOptions::validate`].
    pub fn try_new(cfg: AbrOptions, session_start: Instant) -> AbrResult<Self> {
        cfg.validate()?;
        Ok(Self::new(cfg, session_start))
    }
}

impl<E: Estimator> RateAdaptationEngine<E> {
    pub fn with_estimator(cfg: AbrOptions, estimator: E, session_start: Instant) -> Self {
        let quality_history = VecDeque::with_capacity(cfg.quality_history_size);
        Self {
            cfg,
            estimator,
            session_start,
            last_switch_at: None,
            switch_count: 0,
            last_quality_index: None,
            quality_history,
        }
    }

    pub fn options(&self) -> &AbrOptions {
        &self.cfg
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    pub fn session_start(&self) -> Instant {
        self.session_start
    }

    /// Choose the representation to request next.
    ///
    /// Never fails: unusable telemetry holds the current quality and an
    /// out-of-range current index is clamped first.
    pub fn decide(&mut self, obs: &Observation, ladder: &Representations) -> SwitchDecision {
        let current = ladder.clamp_index(obs.current_index);
        if current != obs.current_index {
            tracing::debug!(
                requested = obs.current_index,
                clamped = current,
                "ABR decide: current index out of range"
            );
        }
        if self.last_quality_index.is_none() {
            self.last_quality_index = Some(current);
        }

        let throughput = obs.valid_throughput();
        if let Some(kbps) = throughput.filter(|kbps| *kbps > 0.0) {
            self.estimator.push_sample(kbps);
        }

        let smoothed = throughput
            .and_then(|kbps| self.estimator.estimate_kbps(Some(kbps)))
            .filter(|kbps| kbps.is_finite() && *kbps > 0.0);

        let (Some(buffer_secs), Some(smoothed_kbps)) = (obs.valid_buffer(), smoothed) else {
            tracing::debug!(
                current,
                buffer = ?obs.buffer_level_secs,
                throughput = ?obs.throughput_kbps,
                "ABR decide: invalid telemetry, holding"
            );
            return self.finish(obs.now, ladder, current, current, SwitchReason::MaintainCurrent, None);
        };

        let elapsed = obs.now.saturating_duration_since(self.session_start);
        let margin = self.cfg.margin_at(elapsed);
        let tier = self.cfg.buffer_tiers.classify(buffer_secs);

        let (mut target, mut reason) = match tier {
            BufferTier::Critical => self.critical(ladder, smoothed_kbps),
            BufferTier::Low => Self::low(ladder, current, smoothed_kbps * margin),
            BufferTier::Safe => Self::safe(ladder, current, smoothed_kbps * margin),
            BufferTier::High => Self::high(
                ladder,
                current,
                smoothed_kbps * margin * self.cfg.high_buffer_boost,
            ),
        };

        if tier != BufferTier::Critical
            && target != current
            && let Some(since_last) = self.within_min_interval(obs.now)
        {
            tracing::debug!(
                current,
                suppressed = target,
                since_last_switch_ms = since_last.as_millis(),
                "ABR decide: rate limited"
            );
            target = current;
            reason = SwitchReason::RateLimited;
        }

        tracing::debug!(
            buffer_secs,
            smoothed_kbps,
            margin,
            ?tier,
            current,
            target,
            %reason,
            "ABR decide"
        );

        self.finish(obs.now, ladder, current, target, reason, Some(smoothed_kbps))
    }

    /// Highest representation within the critical budget, else the lowest.
    fn critical(&self, ladder: &Representations, smoothed_kbps: f64) -> (usize, SwitchReason) {
        let budget = smoothed_kbps * self.cfg.critical_utilization;
        (
            ladder.highest_within(budget).unwrap_or(0),
            SwitchReason::CriticalBuffer,
        )
    }

    fn low(ladder: &Representations, current: usize, budget: f64) -> (usize, SwitchReason) {
        if current > 0 && ladder.kbps_at(current) > budget {
            (current - 1, SwitchReason::LowBufferInsufficientThroughput)
        } else {
            (current, SwitchReason::MaintainCurrent)
        }
    }

    fn safe(ladder: &Representations, current: usize, budget: f64) -> (usize, SwitchReason) {
        let best = ladder.highest_within(budget).unwrap_or(0);
        if best > current + 1 {
            (current + 1, SwitchReason::SafeBufferSteppingUp)
        } else if best + 1 < current {
            (current - 1, SwitchReason::SafeBufferSteppingDown)
        } else {
            (best, SwitchReason::SafeBufferOptimal)
        }
    }

    fn high(ladder: &Representations, current: usize, budget: f64) -> (usize, SwitchReason) {
        let best = ladder.highest_within(budget).unwrap_or(0);
        match best.cmp(&current) {
            Ordering::Greater => (best, SwitchReason::HighBufferIncreasing),
            // best < current, so current >= 1
            Ordering::Less => (
                best.max(current - 1),
                SwitchReason::HighBufferControlledDecrease,
            ),
            Ordering::Equal => (current, SwitchReason::MaintainCurrent),
        }
    }

    /// Time since the last switch, if it is shorter than the minimum interval.
    fn within_min_interval(&self, now: Instant) -> Option<Duration> {
        self.last_switch_at
            .map(|at| now.saturating_duration_since(at))
            .filter(|since| *since < self.cfg.min_switch_interval)
    }

    fn finish(
        &mut self,
        now: Instant,
        ladder: &Representations,
        current: usize,
        target: usize,
        reason: SwitchReason,
        smoothed_kbps: Option<f64>,
    ) -> SwitchDecision {
        let target = ladder.clamp_index(target);
        let changed = target != current;

        if changed {
            self.last_switch_at = Some(now);
            self.switch_count += 1;
            tracing::info!(
                from = current,
                to = target,
                %reason,
                switch = self.switch_count,
                rate = self.switch_rate(now),
                "ABR switch"
            );
        }

        if self.cfg.quality_history_size > 0 {
            if self.quality_history.len() == self.cfg.quality_history_size {
                self.quality_history.pop_front();
            }
            self.quality_history.push_back(target);
        }
        self.last_quality_index = Some(target);

        SwitchDecision {
            target_index: target,
            reason,
            priority: SwitchPriority::Strong,
            changed,
            smoothed_kbps,
        }
    }

    #[expect(clippy::cast_precision_loss)] // switch counts are small
    fn switch_rate(&self, now: Instant) -> f64 {
        let elapsed = now
            .saturating_duration_since(self.session_start)
            .as_secs_f64();
        if elapsed > 0.0 {
            self.switch_count as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn stats(&self, now: Instant) -> EngineStats {
        EngineStats {
            switch_count: self.switch_count,
            last_switch_at: self.last_switch_at,
            last_quality_index: self.last_quality_index,
            quality_history: self.quality_history.iter().copied().collect(),
            session_elapsed: now.saturating_duration_since(self.session_start),
            switches_per_sec: self.switch_rate(now),
        }
    }
}
