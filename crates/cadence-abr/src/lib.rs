//! Adaptive bitrate (ABR) rate-adaptation engine.
//!
//! Given a stream of throughput and buffer-occupancy observations, the
//! engine picks the next representation to request. It is player-agnostic:
//! the host feeds [`Observation`]s and resolves the returned index itself.
//!
//! ## Policy
//!
//! - **Buffer tiers**: critical, low, safe and high buffer levels each have
//!   their own selection policy.
//! - **Smoothing**: recency-weighted average over the last few samples.
//! - **Startup margin**: a more conservative throughput margin early on.
//! - **Hysteresis**: quality moves one step at a time unless the buffer is
//!   critical (down) or high (up).
//! - **Rate limiting**: no switch within the minimum interval of the last one,
//!   except in the critical tier.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use cadence_abr::{AbrOptions, Observation, RateAdaptationEngine, Representations, SwitchReason};
//! use web_time::Instant;
//!
//! let ladder = Representations::from_kbps([500, 1000, 2000, 4000]).unwrap();
//! let start = Instant::now();
//! let mut engine = RateAdaptationEngine::new(AbrOptions::default(), start);
//!
//! let obs = Observation::new(1, start + Duration::from_secs(60))
//!     .with_throughput_kbps(3000.0)
//!     .with_buffer_level_secs(7.0);
//! let decision = engine.decide(&obs, &ladder);
//!
//! assert_eq!(decision.target_index, 2);
//! assert_eq!(decision.reason, SwitchReason::HighBufferIncreasing);
//! ```

#![forbid(unsafe_code)]

mod controller;
mod error;
mod estimator;
mod types;

pub use controller::{
    EngineStats, RateAdaptationEngine, SwitchDecision, SwitchPriority, SwitchReason,
};
pub use error::{AbrError, AbrResult};
pub use estimator::{Estimator, ThroughputHistory};
pub use types::{
    AbrOptions, BufferTier, BufferTiers, MediaType, Observation, Representation, Representations,
};
