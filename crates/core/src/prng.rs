//! Deterministic PRNG used for origin sampling.
//!
//! Anything that draws random origins goes through [`UniformSource`], so a
//! pass can be replayed exactly by replaying the source. [`Xorshift64`] is the
//! stock implementation: pure integer arithmetic, identical sequences on
//! every platform.

use serde::{Deserialize, Serialize};

/// A source of uniform samples in [0, 1).
///
/// Holding the source fixed makes a whole generation pass reproducible.
pub trait UniformSource {
    /// Next sample in [0, 1).
    fn next_f64(&mut self) -> f64;

    /// Next sample in [min, max).
    fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}

/// Xorshift64 PRNG with shifts (13, 7, 17).
///
/// Seed 0 is a fixed point of the algorithm and is replaced with a non-zero
/// fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

impl UniformSource for Xorshift64 {
    /// Upper 53 bits of `next_u64()` scaled by 2^-53.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}
