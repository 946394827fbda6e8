//! Maps raw noise scalars to headings in radians.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::math::{clamp, map_range};

/// Affine `(in_min, in_max) -> (out_min, out_max)` mapping from noise value
/// to heading angle.
///
/// No clamping happens unless `clamp` is set; out-of-range noise values
/// extrapolate to out-of-range angles, and callers that need wraparound
/// normalise themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionMap {
    pub in_min: f64,
    pub in_max: f64,
    pub out_min: f64,
    pub out_max: f64,
    #[serde(default)]
    pub clamp: bool,
}

impl Default for DirectionMap {
    /// `[-1, 1] -> [0, 2pi]`, unclamped.
    fn default() -> Self {
        Self {
            in_min: -1.0,
            in_max: 1.0,
            out_min: 0.0,
            out_max: TAU,
            clamp: false,
        }
    }
}

impl DirectionMap {
    pub fn new(in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> Self {
        Self {
            in_min,
            in_max,
            out_min,
            out_max,
            clamp: false,
        }
    }

    /// Same mapping with output clamping switched on or off.
    pub fn with_clamp(self, clamp: bool) -> Self {
        Self { clamp, ..self }
    }

    /// Rejects non-finite bounds and an empty input domain.
    pub fn validate(&self) -> Result<(), FlowError> {
        for (name, v) in [
            ("map.in_min", self.in_min),
            ("map.in_max", self.in_max),
            ("map.out_min", self.out_min),
            ("map.out_max", self.out_max),
        ] {
            if !v.is_finite() {
                return Err(FlowError::invalid(name, format!("must be finite, got {v}")));
            }
        }
        if self.in_min == self.in_max {
            return Err(FlowError::invalid(
                "map",
                format!("in_min and in_max must differ, both are {}", self.in_min),
            ));
        }
        Ok(())
    }

    /// Heading for a raw noise value.
    #[inline]
    pub fn angle(&self, raw: f64) -> f64 {
        let theta = map_range(raw, self.in_min, self.in_max, self.out_min, self.out_max);
        if self.clamp {
            clamp(theta, self.out_min, self.out_max)
        } else {
            theta
        }
    }
}

/// One-shot form of [`DirectionMap::angle`] with validation.
///
/// Returns `FlowError::InvalidConfig` when `in_min == in_max`.
pub fn map_to_angle(
    raw: f64,
    in_min: f64,
    in_max: f64,
    out_min: f64,
    out_max: f64,
) -> Result<f64, FlowError> {
    let map = DirectionMap::new(in_min, in_max, out_min, out_max);
    map.validate()?;
    Ok(map.angle(raw))
}
