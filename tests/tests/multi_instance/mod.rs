//! Multi-instance tests.
//!
//! Engines and sessions for different streams share nothing: running many of
//! them side by side on separate threads gives exactly the decisions each
//! would make alone.

use std::{thread, time::Duration};

use cadence::prelude::*;
use cadence_abr::RateAdaptationEngine;
use cadence_test_utils::{NetworkTrace, wide_ladder};
use rstest::rstest;
use web_time::Instant;

const STEPS: usize = 400;

/// Replay a random trace, feeding each decision back as the next current index.
fn replay(seed: u64, ladder: &Representations, start: Instant) -> Vec<usize> {
    let trace = NetworkTrace::random(seed, STEPS, Duration::from_millis(1500));
    let mut engine = RateAdaptationEngine::new(AbrOptions::default(), start);
    let mut current = 0;
    trace
        .iter()
        .map(|step| {
            current = engine.decide(&step.observation(current, start), ladder).target_index;
            current
        })
        .collect()
}

#[rstest]
#[case(2)]
#[case(4)]
#[case(8)]
fn concurrent_engines_match_sequential_runs(wide_ladder: Representations, #[case] instances: u64) {
    let start = Instant::now();
    let sequential: Vec<Vec<usize>> = (0..instances)
        .map(|seed| replay(seed + 1, &wide_ladder, start))
        .collect();

    let concurrent: Vec<Vec<usize>> = thread::scope(|s| {
        let handles: Vec<_> = (0..instances)
            .map(|seed| {
                let ladder = &wide_ladder;
                s.spawn(move || replay(seed + 1, ladder, start))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, concurrent);
    assert!(sequential.iter().all(|run| run.len() == STEPS));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sessions_on_blocking_tasks_share_one_bus() {
    let start = Instant::now();
    let bus = EventBus::new(4096);
    let mut rx = bus.subscribe();

    let mut tasks = Vec::new();
    for seed in 1..=4_u64 {
        let bus = bus.clone();
        tasks.push(tokio::task::spawn_blocking(move || {
            let mut session = AbrSession::new(AbrOptions::default(), start).with_events(bus);
            session
                .add_media(MediaType::Video, cadence_test_utils::wide_ladder())
                .unwrap();
            let trace = NetworkTrace::random(seed, 100, Duration::from_secs(2));
            let mut current = 0;
            for step in trace.iter() {
                current = session
                    .decide(MediaType::Video, &step.observation(current, start))
                    .unwrap()
                    .target_index;
            }
            session
                .stats(MediaType::Video, start + Duration::from_secs(200))
                .unwrap()
                .switch_count
        }));
    }

    let mut expected_switches = 0;
    for task in tasks {
        expected_switches += task.await.unwrap();
    }

    let (mut added, mut decisions, mut switches) = (0, 0, 0_u64);
    while let Ok(Event::Abr(event)) = rx.try_recv() {
        match event {
            AbrEvent::MediaAdded { .. } => added += 1,
            AbrEvent::DecisionMade { .. } => decisions += 1,
            AbrEvent::QualitySwitched { .. } => switches += 1,
            AbrEvent::MediaRemoved { .. } => {}
        }
    }
    assert_eq!(added, 4);
    assert_eq!(decisions, 400);
    assert_eq!(switches, expected_switches);
}
