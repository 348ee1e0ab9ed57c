//! Property-style checks over deterministic random traces.

use std::time::Duration;

use cadence_abr::{
    AbrOptions, BufferTier, BufferTiers, Observation, RateAdaptationEngine, Representations,
    SwitchPriority, SwitchReason,
};
use cadence_test_utils::{NetworkTrace, Xorshift64, wide_ladder};
use rstest::rstest;

use crate::common::{clock, obs};

#[rstest]
#[case(1)]
#[case(7)]
#[case(42)]
#[case(0xDEAD_BEEF)]
fn target_always_in_range(wide_ladder: Representations, #[case] seed: u64) {
    let (start, _) = clock();
    let mut engine = RateAdaptationEngine::new(AbrOptions::default(), start);
    let mut rng = Xorshift64::new(seed ^ 0x5555);
    let trace = NetworkTrace::random(seed, 500, Duration::from_millis(700));

    for step in trace.iter() {
        // occasionally hand the engine an out-of-range current index
        let current = rng.range_usize(0, wide_ladder.len() + 3);
        let d = engine.decide(&step.observation(current, start), &wide_ladder);

        assert!(d.target_index <= wide_ladder.last_index());
        assert_eq!(d.priority, SwitchPriority::Strong);
        assert!(engine.estimator().len() <= AbrOptions::default().history_size);
        assert_eq!(d.changed, d.target_index != wide_ladder.clamp_index(current));
    }
}

#[rstest]
#[case(3)]
#[case(99)]
fn unusable_buffer_always_holds(wide_ladder: Representations, #[case] seed: u64) {
    let (start, _) = clock();
    let mut engine = RateAdaptationEngine::new(AbrOptions::default(), start);
    let trace = NetworkTrace::random(seed, 300, Duration::from_secs(1));

    for step in trace.iter() {
        let usable = step
            .buffer_level_secs
            .is_some_and(|secs| secs.is_finite() && secs >= 0.0);
        if usable {
            continue;
        }
        let d = engine.decide(&step.observation(5, start), &wide_ladder);
        assert_eq!(d.target_index, 5);
        assert_eq!(d.reason, SwitchReason::MaintainCurrent);
    }
}

#[rstest]
fn safe_tier_response_is_monotone_in_throughput(wide_ladder: Representations) {
    let (start, now) = clock();
    for current in 0..wide_ladder.len() {
        let mut previous = 0;
        for step in 1..=300 {
            let kbps = f64::from(step) * 25.0;
            let mut engine = RateAdaptationEngine::new(AbrOptions::default(), start);
            let d = engine.decide(&obs(current, kbps, 5.0, now), &wide_ladder);

            assert!(
                d.target_index >= previous,
                "current {current}: {kbps} kbit/s chose {} after {previous}",
                d.target_index
            );
            assert!(d.target_index.abs_diff(current) <= 1);
            previous = d.target_index;
        }
    }
}

#[rstest]
fn non_critical_tiers_never_jump_down_more_than_one(wide_ladder: Representations) {
    let (start, now) = clock();
    let tiers = BufferTiers::default();
    let mut rng = Xorshift64::new(2024);

    for _ in 0..2000 {
        let current = rng.range_usize(0, wide_ladder.len());
        let buffer = rng.range_f64(0.0, 20.0);
        let kbps = rng.range_f64(10.0, 10_000.0);
        let mut engine = RateAdaptationEngine::new(AbrOptions::default(), start);
        let d = engine.decide(&obs(current, kbps, buffer, now), &wide_ladder);

        match tiers.classify(buffer) {
            BufferTier::Critical => {}
            BufferTier::Low => assert!(d.target_index <= current && current - d.target_index <= 1),
            BufferTier::Safe => assert!(d.target_index.abs_diff(current) <= 1),
            BufferTier::High => assert!(d.target_index + 1 >= current),
        }
    }
}

#[rstest]
fn no_switch_inside_min_interval_outside_critical(wide_ladder: Representations) {
    let (start, now) = clock();
    let mut engine = RateAdaptationEngine::new(AbrOptions::default(), start);
    let mut rng = Xorshift64::new(77);
    let mut current = 0;
    let mut last_switch = None;

    for i in 0..400_u32 {
        let at = now + Duration::from_millis(u64::from(i) * 1500);
        let buffer = rng.range_f64(2.0, 15.0);
        let o = Observation::new(current, at)
            .with_throughput_kbps(rng.range_f64(100.0, 8000.0))
            .with_buffer_level_secs(buffer);
        let d = engine.decide(&o, &wide_ladder);

        if d.changed {
            if let Some(prev) = last_switch {
                assert!(at.duration_since(prev) >= Duration::from_secs(10));
            }
            last_switch = Some(at);
        }
        current = d.target_index;
    }
    assert!(last_switch.is_some(), "trace should provoke at least one switch");
}
