//! Reproducible description of one generated piece.
//!
//! A [`Recipe`] captures the config, the noise seed and the origin seed.
//! Feeding the same recipe to the same build produces bit-identical paths,
//! so a recipe saved next to an export is enough to regenerate it.

use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::error::FlowError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub config: GenerationConfig,
    pub noise_seed: u32,
    /// Seed for the origin sampler's [`Xorshift64`](crate::prng::Xorshift64).
    pub origin_seed: u64,
}

impl Recipe {
    pub fn new(config: GenerationConfig, noise_seed: u32, origin_seed: u64) -> Self {
        Self {
            config,
            noise_seed,
            origin_seed,
        }
    }

    /// Validates the embedded config.
    pub fn validate(&self) -> Result<(), FlowError> {
        self.config.validate()
    }
}
