//! Closed-loop runs against the simulated player buffer.

use std::time::Duration;

use cadence_abr::{AbrOptions, Observation, RateAdaptationEngine, Representations};
use cadence_test_utils::{SimulatedPlayer, video_ladder};
use rstest::rstest;
use web_time::Instant;

use crate::common::tracing_setup;

struct Sample {
    at: Duration,
    index: usize,
}

/// Drive one engine until the simulated clock passes `until`.
fn run(
    ladder: &Representations,
    link_kbps: impl Fn(Duration) -> f64,
    until: Duration,
) -> (Vec<Sample>, SimulatedPlayer) {
    let start = Instant::now();
    let mut engine = RateAdaptationEngine::new(AbrOptions::default(), start);
    let mut player = SimulatedPlayer::new(2.0, 12.0);
    let mut current = 0;
    let mut samples = Vec::new();

    for _ in 0..2000 {
        let at = player.clock();
        if at > until {
            break;
        }
        let kbps = link_kbps(at);
        let obs = Observation::new(current, start + at)
            .with_throughput_kbps(kbps)
            .with_buffer_level_secs(player.buffer_secs());
        let d = engine.decide(&obs, ladder);
        current = d.target_index;
        samples.push(Sample { at, index: current });

        let bitrate = ladder.get(current).map_or(0.0, |r| r.bitrate_kbps());
        player.fetch_segment(bitrate, kbps);
    }
    (samples, player)
}

#[rstest]
fn stable_link_converges_to_top_rung_without_stalling(
    _tracing_setup: (),
    video_ladder: Representations,
) {
    let (samples, player) = run(&video_ladder, |_| 6000.0, Duration::from_secs(120));

    assert_eq!(samples.last().map(|s| s.index), Some(3));
    // only the very first segment, fetched on an empty buffer, may stall
    assert!(player.stall_secs() < 1.0, "stalled {}s", player.stall_secs());
}

#[rstest]
fn collapse_then_recovery(_tracing_setup: (), video_ladder: Representations) {
    let link = |at: Duration| {
        if at >= Duration::from_secs(60) && at < Duration::from_secs(120) {
            800.0
        } else {
            6000.0
        }
    };
    let (samples, _) = run(&video_ladder, link, Duration::from_secs(240));

    let lowest_in_collapse = samples
        .iter()
        .filter(|s| s.at >= Duration::from_secs(100) && s.at < Duration::from_secs(120))
        .map(|s| s.index)
        .min();
    assert!(
        lowest_in_collapse.is_some_and(|idx| idx <= 1),
        "expected downgrade during collapse, got {lowest_in_collapse:?}"
    );

    let final_index = samples.last().map(|s| s.index);
    assert!(
        final_index.is_some_and(|idx| idx >= 2),
        "expected recovery, ended at {final_index:?}"
    );
}
