//! Uniform origin sampling inside a disc.

use seis_core::geometry::Point;
use seis_core::prng::UniformSource;

/// Safety cap on rejected draws. The square-vs-disc rejection rate is about
/// 21.5%, so this is only reached when the random source is broken.
pub const MAX_ORIGIN_DRAWS: usize = 1_000_000;

/// Draws path origins uniformly over the area of a disc centred on `(0, 0)`.
///
/// Uses rejection sampling: independent uniforms in `[-1, 1)^2`, redrawn
/// until the point lies in the unit disc, then scaled by `r`. Testing on the
/// unit square keeps the acceptance check finite for any finite radius.
#[derive(Debug, Clone, Copy)]
pub struct OriginSampler {
    radius: f64,
}

impl OriginSampler {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Next origin. A non-positive radius returns `(0, 0)` without touching
    /// the random source.
    pub fn sample<R: UniformSource + ?Sized>(&self, rng: &mut R) -> Point {
        let r = self.radius;
        if r <= 0.0 || r.is_nan() {
            return Point::ZERO;
        }
        for _ in 0..MAX_ORIGIN_DRAWS {
            let x = rng.next_range(-1.0, 1.0);
            let y = rng.next_range(-1.0, 1.0);
            if x * x + y * y <= 1.0 {
                return Point::new(x * r, y * r);
            }
        }
        tracing::warn!(
            target: "seis::origin",
            radius = r,
            draws = MAX_ORIGIN_DRAWS,
            "origin.rejection_cap_reached"
        );
        Point::ZERO
    }
}
