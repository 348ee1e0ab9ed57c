//! Closed-loop playback buffer model.

use std::time::Duration;

/// Minimal model of a player's buffer.
///
/// Each fetched segment drains the buffer for its download time and then
/// adds its media duration. Download time beyond the buffered media counts
/// as stall. The buffer is capped; time spent waiting at the cap is idle.
#[derive(Clone, Debug)]
pub struct SimulatedPlayer {
    segment_secs: f64,
    max_buffer_secs: f64,
    buffer_secs: f64,
    stall_secs: f64,
    clock: Duration,
}

impl SimulatedPlayer {
    pub fn new(segment_secs: f64, max_buffer_secs: f64) -> Self {
        Self {
            segment_secs,
            max_buffer_secs,
            buffer_secs: 0.0,
            stall_secs: 0.0,
            clock: Duration::ZERO,
        }
    }

    pub fn buffer_secs(&self) -> f64 {
        self.buffer_secs
    }

    pub fn stall_secs(&self) -> f64 {
        self.stall_secs
    }

    /// Simulated time since playback started.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Download one segment at `bitrate_kbps` over a link of `throughput_kbps`.
    ///
    /// Returns the download duration.
    pub fn fetch_segment(&mut self, bitrate_kbps: f64, throughput_kbps: f64) -> Duration {
        let download_secs = self.segment_secs * bitrate_kbps / throughput_kbps.max(1.0);

        self.buffer_secs -= download_secs;
        if self.buffer_secs < 0.0 {
            self.stall_secs += -self.buffer_secs;
            self.buffer_secs = 0.0;
        }
        self.buffer_secs += self.segment_secs;

        let idle_secs = (self.buffer_secs - self.max_buffer_secs).max(0.0);
        self.buffer_secs -= idle_secs;

        self.clock += Duration::from_secs_f64(download_secs + idle_secs);
        Duration::from_secs_f64(download_secs)
    }
}
