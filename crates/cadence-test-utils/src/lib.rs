#![forbid(unsafe_code)]
#![expect(
    clippy::unwrap_used,
    reason = "test utility crate: unwraps are acceptable"
)]
#![expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    reason = "test utility crate: numeric casts are acceptable for synthetic traces"
)]
#![expect(
    clippy::missing_panics_doc,
    reason = "test utility crate: panic documentation not needed"
)]

//! Shared test utilities for the cadence workspace.

pub mod fixtures;
pub mod player;
pub mod rng;
pub mod trace;

pub use fixtures::*;
pub use player::SimulatedPlayer;
pub use rng::*;
pub use trace::{NetworkTrace, TraceStep};
