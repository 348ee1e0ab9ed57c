// Common fixtures and helpers for integration tests

use std::time::Duration;

use cadence_abr::Observation;
use rstest::fixture;
use web_time::Instant;

/// Installs a test-writer subscriber once; later calls are no-ops.
#[fixture]
pub fn tracing_setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::default()
                .add_directive("warn".parse().expect("valid directive")),
        )
        .with_test_writer()
        .try_init();
}

/// Session start and an instant safely past the startup period.
pub fn clock() -> (Instant, Instant) {
    let start = Instant::now();
    (start, start + Duration::from_secs(60))
}

pub fn obs(current: usize, kbps: f64, buffer: f64, now: Instant) -> Observation {
    Observation::new(current, now)
        .with_throughput_kbps(kbps)
        .with_buffer_level_secs(buffer)
}
