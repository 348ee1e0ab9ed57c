#![forbid(unsafe_code)]

use crate::AbrEvent;

/// Unified event for a cadence session.
///
/// Hierarchical: each subsystem has its own variant with a sub-enum.
#[derive(Clone, Debug)]
pub enum Event {
    /// Rate-adaptation event.
    Abr(AbrEvent),
}

impl From<AbrEvent> for Event {
    fn from(e: AbrEvent) -> Self {
        Self::Abr(e)
    }
}
