//! Example: replay a synthetic network trace through an ABR session.
//!
//! A simulated player fetches two-second video segments over a link whose
//! throughput follows a scripted profile (good, collapse, recovery). Every
//! segment the session decides the next representation; switches are
//! printed from the event bus.
//!
//! Run with:
//! ```
//! RUST_LOG=cadence_abr=debug cargo run -p cadence --example trace_replay
//! ```

use std::{error::Error, time::Duration};

use cadence::prelude::*;
use cadence_test_utils::{NetworkTrace, SimulatedPlayer, wide_ladder};
use tracing::{info, metadata::LevelFilter};
use tracing_subscriber::EnvFilter;
use web_time::Instant;

const SEGMENT_SECS: f64 = 2.0;
const MAX_BUFFER_SECS: f64 = 12.0;

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_line_number(false)
        .with_file(false)
        .init();

    let trace = NetworkTrace::profile(
        &[
            (6000.0, Duration::from_secs(60)),
            (700.0, Duration::from_secs(30)),
            (2500.0, Duration::from_secs(40)),
            (9000.0, Duration::from_secs(60)),
        ],
        Duration::from_secs(2),
    );

    let start = Instant::now();
    let bus = EventBus::new(256);
    let mut events = bus.subscribe();
    let mut session = AbrSession::try_new(AbrOptions::default(), start)?.with_events(bus);
    session.add_media(MediaType::Video, wide_ladder())?;

    let mut player = SimulatedPlayer::new(SEGMENT_SECS, MAX_BUFFER_SECS);
    let mut current = 0;
    let mut bits_fetched = 0.0;

    for step in trace.iter() {
        let kbps = step.throughput_kbps.unwrap_or_default();
        let obs = Observation::new(current, start + player.clock())
            .with_throughput_kbps(kbps)
            .with_buffer_level_secs(player.buffer_secs());
        let decision = session.decide(MediaType::Video, &obs)?;
        current = decision.target_index;

        let bitrate_kbps = session
            .ladder(MediaType::Video)
            .and_then(|ladder| decision.representation(ladder))
            .map_or(0.0, |rep| rep.bitrate_kbps());
        player.fetch_segment(bitrate_kbps, kbps);
        bits_fetched += bitrate_kbps * SEGMENT_SECS;

        while let Ok(event) = events.try_recv() {
            if let Event::Abr(AbrEvent::QualitySwitched {
                from_index,
                to_index,
                reason,
                switch_count,
                ..
            }) = event
            {
                info!(
                    at = ?player.clock(),
                    from_index,
                    to_index,
                    %reason,
                    switch_count,
                    buffer = player.buffer_secs(),
                    "switch"
                );
            }
        }
    }

    let stats = session.stats(MediaType::Video, start + player.clock())?;
    info!(
        segments = trace.len(),
        switches = stats.switch_count,
        switches_per_sec = stats.switches_per_sec,
        stall_secs = player.stall_secs(),
        mean_kbps = bits_fetched / (SEGMENT_SECS * trace.len() as f64),
        "replay finished"
    );

    Ok(())
}
