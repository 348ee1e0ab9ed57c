#![forbid(unsafe_code)]

//! Re-export unified events from cadence-events.

pub use cadence_events::{AbrEvent, Event, EventBus};
