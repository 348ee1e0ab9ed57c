#![forbid(unsafe_code)]

use cadence_abr::{MediaType, SwitchDecision, SwitchReason};

/// Events emitted by an ABR session.
#[derive(Clone, Debug)]
pub enum AbrEvent {
    /// A ladder was registered for a media type.
    MediaAdded {
        media_type: MediaType,
        representations: usize,
    },
    /// A decision was taken, whether or not it changes quality.
    DecisionMade {
        media_type: MediaType,
        from_index: usize,
        decision: SwitchDecision,
    },
    /// Representation (quality level) changed.
    QualitySwitched {
        media_type: MediaType,
        from_index: usize,
        to_index: usize,
        reason: SwitchReason,
        switch_count: u64,
    },
    /// A media type was removed from the session.
    MediaRemoved { media_type: MediaType },
}

impl AbrEvent {
    pub fn media_type(&self) -> MediaType {
        match self {
            Self::MediaAdded { media_type, .. }
            | Self::DecisionMade { media_type, .. }
            | Self::QualitySwitched { media_type, .. }
            | Self::MediaRemoved { media_type } => *media_type,
        }
    }
}
