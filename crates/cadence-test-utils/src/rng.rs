//! Deterministic PRNG for reproducible property checks.

/// Minimal xorshift64 PRNG.
///
/// Use a fixed seed so generated traces are identical across runs.
pub struct Xorshift64(u64);

impl Xorshift64 {
    /// A zero seed would lock the generator at zero; it is remapped.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self(if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed })
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    /// Returns `f64` in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Returns `f64` in `[min, max)`.
    pub fn range_f64(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_f64()
    }

    /// Returns `usize` in `[min, max)`.
    pub fn range_usize(&mut self, min: usize, max: usize) -> usize {
        min + ((max - min) as f64 * self.next_f64()) as usize
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}
