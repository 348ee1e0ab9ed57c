#![forbid(unsafe_code)]

//! # Cadence
//!
//! Facade crate for player-agnostic adaptive bitrate selection.
//!
//! ## Quick start
//!
//! ```rust
//! use std::time::Duration;
//!
//! use cadence::prelude::*;
//! use web_time::Instant;
//!
//! let start = Instant::now();
//! let mut session = AbrSession::new(AbrOptions::default(), start);
//! session
//!     .add_media_bitrates(MediaType::Video, [500_000, 1_000_000, 2_000_000, 4_000_000])
//!     .unwrap();
//!
//! let obs = Observation::new(0, start + Duration::from_secs(45))
//!     .with_throughput_kbps(1800.0)
//!     .with_buffer_level_secs(5.0);
//! let decision = session.decide(MediaType::Video, &obs).unwrap();
//! assert_eq!(decision.target_index, 1);
//! ```

// ── Re-export sub-crates ────────────────────────────────────────────────

pub mod abr {
    pub use cadence_abr::*;
}

pub mod events;

// ── Session ─────────────────────────────────────────────────────────────

mod error;
mod session;

pub use error::{SessionError, SessionResult};
pub use session::AbrSession;

// ── Prelude ─────────────────────────────────────────────────────────────

pub mod prelude {
    pub use cadence_abr::{
        AbrOptions, MediaType, Observation, Representations, SwitchDecision, SwitchPriority,
        SwitchReason,
    };
    pub use cadence_events::{AbrEvent, Event, EventBus};

    pub use crate::{AbrSession, SessionError, SessionResult};
}
