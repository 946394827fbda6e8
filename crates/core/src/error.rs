//! Error types for seis.

use thiserror::Error;

/// Errors produced while configuring or running a generation pass.
///
/// A path stopping early on a collision is normal control flow and never
/// surfaces here.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A configuration value failed validation. Raised eagerly, before any
    /// path is generated.
    #[error("invalid config '{name}': {reason}")]
    InvalidConfig { name: String, reason: String },

    /// The noise generator could not be constructed (unknown generator name,
    /// or no entropy available to derive a seed).
    #[error("noise source unavailable: {0}")]
    NoiseSourceUnavailable(String),
}

impl FlowError {
    /// Shorthand for building an [`FlowError::InvalidConfig`].
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        FlowError::InvalidConfig {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}
