//! Ladder fixtures.

use cadence_abr::Representations;
use rstest::fixture;

/// Video ladder: 500, 1000, 2000 and 4000 kbit/s.
#[fixture]
pub fn video_ladder() -> Representations {
    Representations::from_kbps([500, 1000, 2000, 4000]).unwrap()
}

/// Audio ladder: 64, 128 and 256 kbit/s.
#[fixture]
pub fn audio_ladder() -> Representations {
    Representations::from_kbps([64, 128, 256]).unwrap()
}

/// A denser ten-rung video ladder.
#[fixture]
pub fn wide_ladder() -> Representations {
    Representations::from_kbps([235, 375, 560, 750, 1050, 1750, 2350, 3000, 4300, 5800]).unwrap()
}
