use std::{fmt, time::Duration};

use web_time::Instant;

use crate::error::{AbrError, AbrResult};

/// Kind of media a ladder belongs to.
///
/// Each media type is adapted by its own engine; history and switch timers
/// are never shared between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MediaType {
    Video,
    Audio,
    Text,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable quality level of a media stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Representation {
    /// Ordinal position in the ascending-bitrate ladder.
    pub index: usize,
    pub bitrate_bps: u64,
}

impl Representation {
    /// Bitrate in kbit/s, the unit throughput observations are expressed in.
    #[expect(clippy::cast_precision_loss)] // bitrate precision loss is negligible for ABR
    pub fn bitrate_kbps(&self) -> f64 {
        self.bitrate_bps as f64 / 1000.0
    }
}

/// Ordered, non-empty set of representations for one media type.
///
/// Construction is the only place a ladder can be rejected: an empty or
/// unordered ladder is a caller contract violation and fails here, so the
/// engine itself never sees one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Representations {
    items: Vec<Representation>,
}

impl Representations {
    /// Build a ladder from bitrates (bits per second) in ascending order.
    ///
    /// # Errors
    ///
    /// [`AbrError::EmptyLadder`] when no bitrates are given,
    /// [`AbrError::UnorderedLadder`] when a bitrate is lower than its predecessor.
    pub fn new<I>(bitrates_bps: I) -> AbrResult<Self>
    where
        I: IntoIterator<Item = u64>,
    {
        let mut items: Vec<Representation> = Vec::new();
        for (index, bitrate_bps) in bitrates_bps.into_iter().enumerate() {
            if let Some(prev) = items.last()
                && bitrate_bps < prev.bitrate_bps
            {
                return Err(AbrError::UnorderedLadder {
                    index,
                    bitrate_bps,
                    previous_bps: prev.bitrate_bps,
                });
            }
            items.push(Representation { index, bitrate_bps });
        }

        if items.is_empty() {
            return Err(AbrError::EmptyLadder);
        }
        Ok(Self { items })
    }

    /// Build a ladder from bitrates given in kbit/s.
    ///
    /// # Errors
    ///
    /// Same as [`Representations::new`].
    pub fn from_kbps<I>(bitrates_kbps: I) -> AbrResult<Self>
    where
        I: IntoIterator<Item = u64>,
    {
        Self::new(bitrates_kbps.into_iter().map(|kbps| kbps.saturating_mul(1000)))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Representation> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Representation> {
        self.items.iter()
    }

    pub fn last_index(&self) -> usize {
        self.items.len() - 1
    }

    /// Clamp an arbitrary index into `[0, len - 1]`.
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.last_index())
    }

    /// Bitrate of the representation at a clamped index, in kbit/s.
    pub(crate) fn kbps_at(&self, index: usize) -> f64 {
        self.items[self.clamp_index(index)].bitrate_kbps()
    }

    /// Highest index whose bitrate fits within `budget_kbps`.
    ///
    /// Scans ascending and keeps the last index satisfying the bound.
    /// Returns `None` when even the lowest representation exceeds the budget.
    pub fn highest_within(&self, budget_kbps: f64) -> Option<usize> {
        let mut found = None;
        for rep in &self.items {
            if rep.bitrate_kbps() <= budget_kbps {
                found = Some(rep.index);
            }
        }
        found
    }
}

impl<'a> IntoIterator for &'a Representations {
    type Item = &'a Representation;
    type IntoIter = std::slice::Iter<'a, Representation>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Snapshot supplied by the host at decision time.
#[derive(Clone, Copy, Debug)]
pub struct Observation {
    /// Current throughput estimate in kbit/s.
    pub throughput_kbps: Option<f64>,
    /// Seconds of downloaded, not yet played media.
    pub buffer_level_secs: Option<f64>,
    /// Index of the active representation. Clamped into range before use.
    pub current_index: usize,
    pub now: Instant,
}

impl Observation {
    pub fn new(current_index: usize, now: Instant) -> Self {
        Self {
            throughput_kbps: None,
            buffer_level_secs: None,
            current_index,
            now,
        }
    }

    #[must_use]
    pub fn with_throughput_kbps(mut self, kbps: f64) -> Self {
        self.throughput_kbps = Some(kbps);
        self
    }

    #[must_use]
    pub fn with_buffer_level_secs(mut self, secs: f64) -> Self {
        self.buffer_level_secs = Some(secs);
        self
    }

    /// Buffer level if present, finite and non-negative.
    pub(crate) fn valid_buffer(&self) -> Option<f64> {
        self.buffer_level_secs
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
    }

    /// Throughput if present, finite and non-negative.
    pub(crate) fn valid_throughput(&self) -> Option<f64> {
        self.throughput_kbps
            .filter(|kbps| kbps.is_finite() && *kbps >= 0.0)
    }
}

/// Buffer occupancy partition driving the decision policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferTier {
    /// Imminent stall: immediate, possibly multi-step downgrade.
    Critical,
    /// Only a single step down is considered.
    Low,
    /// Budget-based target, moved at most one step per decision.
    Safe,
    /// Inflated budget, unrestricted upgrades, single-step downgrades.
    High,
}

/// Lower bounds (seconds) of the low, safe and high tiers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BufferTiers {
    /// Below this the buffer is critical.
    pub critical_secs: f64,
    /// Below this (and at or above `critical_secs`) the buffer is low.
    pub low_secs: f64,
    /// Below this (and at or above `low_secs`) the buffer is safe; above is high.
    pub safe_secs: f64,
}

impl Default for BufferTiers {
    fn default() -> Self {
        Self {
            critical_secs: 2.0,
            low_secs: 4.0,
            safe_secs: 6.0,
        }
    }
}

impl BufferTiers {
    pub fn classify(&self, buffer_level_secs: f64) -> BufferTier {
        if buffer_level_secs < self.critical_secs {
            BufferTier::Critical
        } else if buffer_level_secs < self.low_secs {
            BufferTier::Low
        } else if buffer_level_secs < self.safe_secs {
            BufferTier::Safe
        } else {
            BufferTier::High
        }
    }
}

/// Rate-adaptation configuration.
#[derive(Clone)]
pub struct AbrOptions {
    /// Buffer tier boundaries.
    pub buffer_tiers: BufferTiers,
    /// Fraction of smoothed throughput usable while the buffer is critical.
    pub critical_utilization: f64,
    /// Throughput utilization margin after the startup period.
    pub throughput_margin: f64,
    /// Throughput utilization margin during the startup period.
    pub startup_margin: f64,
    /// Length of the conservative startup period.
    pub startup_period: Duration,
    /// Budget inflation applied when the buffer is high.
    pub high_buffer_boost: f64,
    /// Minimum interval between switches outside the critical tier.
    pub min_switch_interval: Duration,
    /// Number of throughput samples kept for smoothing.
    pub history_size: usize,
    /// Below this many samples the raw current throughput is used.
    pub min_smoothing_samples: usize,
    /// Number of past decisions kept for diagnostics.
    pub quality_history_size: usize,
}

impl Default for AbrOptions {
    fn default() -> Self {
        Self {
            buffer_tiers: BufferTiers::default(),
            critical_utilization: 0.6,
            throughput_margin: 0.85,
            startup_margin: 0.75,
            startup_period: Duration::from_secs(30),
            high_buffer_boost: 1.1,
            min_switch_interval: Duration::from_secs(10),
            history_size: 10,
            min_smoothing_samples: 4,
            quality_history_size: 10,
        }
    }
}

impl fmt::Debug for AbrOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbrOptions")
            .field("critical_secs", &self.buffer_tiers.critical_secs)
            .field("low_secs", &self.buffer_tiers.low_secs)
            .field("safe_secs", &self.buffer_tiers.safe_secs)
            .field("critical_utilization", &self.critical_utilization)
            .field("throughput_margin", &self.throughput_margin)
            .field("startup_margin", &self.startup_margin)
            .field("startup_period", &self.startup_period)
            .field("high_buffer_boost", &self.high_buffer_boost)
            .field("min_switch_interval", &self.min_switch_interval)
            .field("history_size", &self.history_size)
            .field("min_smoothing_samples", &self.min_smoothing_samples)
            .finish_non_exhaustive()
    }
}

impl AbrOptions {
    /// Margin in effect `elapsed` after the session started.
    pub fn margin_at(&self, elapsed: Duration) -> f64 {
        if elapsed < self.startup_period {
            self.startup_margin
        } else {
            self.throughput_margin
        }
    }

    /// Reject configurations the decision policy cannot work with.
    ///
    /// # Errors
    ///
    /// [`AbrError::InvalidOptions`] naming the offending field.
    pub fn validate(&self) -> AbrResult<()> {
        let tiers = &self.buffer_tiers;
        if !(tiers.critical_secs >= 0.0
            && tiers.critical_secs < tiers.low_secs
            && tiers.low_secs < tiers.safe_secs)
        {
            return Err(AbrError::InvalidOptions(format!(
                "buffer tiers must be non-negative and strictly ascending: {tiers:?}"
            )));
        }
        for (name, value) in [
            ("critical_utilization", self.critical_utilization),
            ("throughput_margin", self.throughput_margin),
            ("startup_margin", self.startup_margin),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(AbrError::InvalidOptions(format!(
                    "{name} must be in (0, 1], got {value}"
                )));
            }
        }
        if !(self.high_buffer_boost >= 1.0 && self.high_buffer_boost.is_finite()) {
            return Err(AbrError::InvalidOptions(format!(
                "high_buffer_boost must be >= 1, got {}",
                self.high_buffer_boost
            )));
        }
        if self.history_size == 0 {
            return Err(AbrError::InvalidOptions(
                "history_size must be non-zero".to_string(),
            ));
        }
        if self.min_smoothing_samples == 0 {
            return Err(AbrError::InvalidOptions(
                "min_smoothing_samples must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
