#![forbid(unsafe_code)]

//! Unified event bus for cadence rate-adaptation sessions.

mod abr;
mod bus;
mod event;

pub use abr::AbrEvent;
pub use bus::EventBus;
pub use event::Event;
