use std::collections::BTreeMap;

use cadence_abr::{
    AbrOptions, EngineStats, MediaType, Observation, RateAdaptationEngine, Representations,
    SwitchDecision,
};
use cadence_events::{AbrEvent, EventBus};
use web_time::Instant;

use crate::{SessionError, SessionResult};

struct MediaState {
    engine: RateAdaptationEngine,
    ladder: Representations,
}

/// Rate adaptation for one playback session.
///
/// Holds an independent engine per media type: throughput history and
/// switch timers are never shared between, say, video and audio. The
/// session takes `&mut self` for every decision; callers serialise access.
pub struct AbrSession {
    cfg: AbrOptions,
    session_start: Instant,
    media: BTreeMap<MediaType, MediaState>,
    bus: Option<EventBus>,
}

impl AbrSession {
    #[must_use]
    pub fn new(cfg: AbrOptions, session_start: Instant) -> Self {
        Self {
            cfg,
            session_start,
            media: BTreeMap::new(),
            bus: None,
        }
    }

    /// Like [`AbrSession::new`], rejecting unusable options.
    ///
    /// # Errors
    ///
    /// [`SessionError::Abr`] wrapping the validation failure.
    pub fn try_new(cfg: AbrOptions, session_start: Instant) -> SessionResult<Self> {
        cfg.validate()?;
        Ok(Self::new(cfg, session_start))
    }

    /// Publish decisions and switches to `bus`.
    #[must_use]
    pub fn with_events(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn session_start(&self) -> Instant {
        self.session_start
    }

    /// Register the ladder for a media type and start adapting it.
    ///
    /// # Errors
    ///
    /// [`SessionError::DuplicateMediaType`] if the media type is already registered.
    pub fn add_media(&mut self, media_type: MediaType, ladder: Representations) -> SessionResult<()> {
        if self.media.contains_key(&media_type) {
            return Err(SessionError::DuplicateMediaType(media_type));
        }

        let representations = ladder.len();
        let engine = RateAdaptationEngine::new(self.cfg.clone(), self.session_start);
        self.media.insert(media_type, MediaState { engine, ladder });

        tracing::debug!(%media_type, representations, "ABR session: media added");
        self.publish(AbrEvent::MediaAdded {
            media_type,
            representations,
        });
        Ok(())
    }

    /// Register a ladder given as ascending bitrates in bits per second.
    ///
    /// # Errors
    ///
    /// [`SessionError::Abr`] for an empty or unordered ladder,
    /// [`SessionError::DuplicateMediaType`] as for [`AbrSession::add_media`].
    pub fn add_media_bitrates<I>(&mut self, media_type: MediaType, bitrates_bps: I) -> SessionResult<()>
    where
        I: IntoIterator<Item = u64>,
    {
        let ladder = Representations::new(bitrates_bps)?;
        self.add_media(media_type, ladder)
    }

    /// Stop adapting a media type, discarding its engine state.
    ///
    /// # Errors
    ///
    /// [`SessionError::UnknownMediaType`] if it was never registered.
    pub fn remove_media(&mut self, media_type: MediaType) -> SessionResult<Representations> {
        let state = self
            .media
            .remove(&media_type)
            .ok_or(SessionError::UnknownMediaType(media_type))?;
        tracing::debug!(%media_type, "ABR session: media removed");
        self.publish(AbrEvent::MediaRemoved { media_type });
        Ok(state.ladder)
    }

    pub fn media_types(&self) -> impl Iterator<Item = MediaType> + '_ {
        self.media.keys().copied()
    }

    pub fn ladder(&self, media_type: MediaType) -> Option<&Representations> {
        self.media.get(&media_type).map(|state| &state.ladder)
    }

    /// Decide the next representation for one media type.
    ///
    /// # Errors
    ///
    /// [`SessionError::UnknownMediaType`] if no ladder is registered for it.
    pub fn decide(
        &mut self,
        media_type: MediaType,
        obs: &Observation,
    ) -> SessionResult<SwitchDecision> {
        let state = self
            .media
            .get_mut(&media_type)
            .ok_or(SessionError::UnknownMediaType(media_type))?;

        let from_index = state.ladder.clamp_index(obs.current_index);
        let decision = state.engine.decide(obs, &state.ladder);
        let switch_count = state.engine.stats(obs.now).switch_count;

        if decision.changed {
            self.publish(AbrEvent::QualitySwitched {
                media_type,
                from_index,
                to_index: decision.target_index,
                reason: decision.reason,
                switch_count,
            });
        }
        self.publish(AbrEvent::DecisionMade {
            media_type,
            from_index,
            decision: decision.clone(),
        });

        Ok(decision)
    }

    /// Diagnostics for one media type.
    ///
    /// # Errors
    ///
    /// [`SessionError::UnknownMediaType`] if no ladder is registered for it.
    pub fn stats(&self, media_type: MediaType, now: Instant) -> SessionResult<EngineStats> {
        self.media
            .get(&media_type)
            .map(|state| state.engine.stats(now))
            .ok_or(SessionError::UnknownMediaType(media_type))
    }

    fn publish(&self, event: AbrEvent) {
        if let Some(bus) = &self.bus {
            bus.publish(event);
        }
    }
}
