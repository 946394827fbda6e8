//! Steps a path forward through the noise field.
//!
//! Headings are recomputed from the current tail every step. There is no
//! stored velocity, so any apparent smoothness comes from the spatial
//! structure of the noise alone.

use glam::DVec2;
use seis_core::config::GenerationConfig;
use seis_core::direction::DirectionMap;
use seis_core::geometry::{Path, Point};
use seis_core::noise_field::{NoiseField, Octave};

/// Immutable stepping context: the noise field plus the parameters that turn
/// a position into the next vertex.
///
/// Borrowed by every step of a pass; nothing here changes while paths grow.
#[derive(Debug, Clone, Copy)]
pub struct PathWalker<'a> {
    noise: &'a NoiseField,
    octaves: &'a [Octave],
    phase: f64,
    map: &'a DirectionMap,
    step_length: f64,
}

impl<'a> PathWalker<'a> {
    pub fn new(
        noise: &'a NoiseField,
        octaves: &'a [Octave],
        phase: f64,
        map: &'a DirectionMap,
        step_length: f64,
    ) -> Self {
        Self {
            noise,
            octaves,
            phase,
            map,
            step_length,
        }
    }

    /// Walker using the octaves, phase, map and step length of `config`.
    pub fn from_config(config: &'a GenerationConfig, noise: &'a NoiseField) -> Self {
        Self::new(
            noise,
            &config.octaves,
            config.phase,
            &config.map,
            config.step_length,
        )
    }

    /// Heading in radians at `at`.
    pub fn heading(&self, at: Point) -> f64 {
        let raw = self.noise.chained(at.x, at.y, self.octaves, self.phase);
        self.map.angle(raw)
    }

    /// The vertex one step on from `tail`, without touching any path:
    /// `tail + step_length * (cos theta, sin theta)`.
    pub fn propose(&self, tail: Point) -> Point {
        let dir = DVec2::from_angle(self.heading(tail));
        (DVec2::from(tail) + dir * self.step_length).into()
    }

    /// Appends the next vertex to `path` and returns it.
    pub fn step(&self, path: &mut Path) -> Point {
        let next = self.propose(path.tail());
        path.push(next);
        next
    }

    /// Grows a fresh path from `origin` for exactly `steps` steps.
    pub fn walk(&self, origin: Point, steps: usize) -> Path {
        let mut path = Path::new(origin);
        for _ in 0..steps {
            self.step(&mut path);
        }
        path
    }
}
