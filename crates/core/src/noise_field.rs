//! Seeded continuous 3D noise and the coordinate-chained octave composition
//! that drives path headings.
//!
//! A [`NoiseField`] wraps one generator from the `noise` crate. The same
//! `(kind, seed, octaves, point)` always produces the same scalar, which is
//! what makes exported artwork reproducible.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use noise::{NoiseFn, OpenSimplex, Perlin, SuperSimplex};
use serde::{Deserialize, Serialize};

use crate::error::FlowError;

/// Which continuous noise function backs a [`NoiseField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoiseKind {
    #[default]
    OpenSimplex,
    SuperSimplex,
    Perlin,
}

impl NoiseKind {
    const NAMES: &'static [&'static str] = &["open-simplex", "super-simplex", "perlin"];

    /// Looks a generator up by its kebab-case name.
    ///
    /// Returns `FlowError::NoiseSourceUnavailable` for names this build does
    /// not provide.
    pub fn from_name(name: &str) -> Result<Self, FlowError> {
        match name {
            "open-simplex" => Ok(NoiseKind::OpenSimplex),
            "super-simplex" => Ok(NoiseKind::SuperSimplex),
            "perlin" => Ok(NoiseKind::Perlin),
            other => Err(FlowError::NoiseSourceUnavailable(format!(
                "unknown noise generator '{other}' (available: {})",
                Self::NAMES.join(", ")
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NoiseKind::OpenSimplex => "open-simplex",
            NoiseKind::SuperSimplex => "super-simplex",
            NoiseKind::Perlin => "perlin",
        }
    }

    pub fn list_names() -> &'static [&'static str] {
        Self::NAMES
    }
}

impl fmt::Display for NoiseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One layer of the chained composition: the query point is divided by
/// `scale`, and the layer's output is weighted by `amplitude` before it
/// becomes the next layer's third coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Octave {
    pub scale: f64,
    pub amplitude: f64,
}

impl Octave {
    pub fn new(scale: f64, amplitude: f64) -> Self {
        Self { scale, amplitude }
    }
}

enum Backend {
    OpenSimplex(OpenSimplex),
    SuperSimplex(SuperSimplex),
    Perlin(Perlin),
}

/// A seeded 3D noise generator. Output is treated as lying in [-1, 1].
///
/// Re-seeding never happens implicitly: [`NoiseField::reseed`] builds a new,
/// uncorrelated field and leaves this one untouched.
pub struct NoiseField {
    kind: NoiseKind,
    seed: u32,
    backend: Backend,
}

impl NoiseField {
    pub fn new(kind: NoiseKind, seed: u32) -> Self {
        let backend = match kind {
            NoiseKind::OpenSimplex => Backend::OpenSimplex(OpenSimplex::new(seed)),
            NoiseKind::SuperSimplex => Backend::SuperSimplex(SuperSimplex::new(seed)),
            NoiseKind::Perlin => Backend::Perlin(Perlin::new(seed)),
        };
        Self {
            kind,
            seed,
            backend,
        }
    }

    /// Builds a field seeded from the system clock.
    ///
    /// Returns `FlowError::NoiseSourceUnavailable` if the clock reads before
    /// the UNIX epoch.
    pub fn from_entropy(kind: NoiseKind) -> Result<Self, FlowError> {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| FlowError::NoiseSourceUnavailable(format!("no clock entropy: {e}")))?;
        let nanos = since_epoch.as_nanos() as u64;
        let seed = (nanos ^ (nanos >> 32)) as u32;
        tracing::debug!(target: "seis::noise", seed, kind = kind.name(), "noise.seed_from_entropy");
        Ok(Self::new(kind, seed))
    }

    /// A new field of the same kind with an independent seed.
    pub fn reseed(&self, seed: u32) -> Self {
        Self::new(self.kind, seed)
    }

    pub fn kind(&self) -> NoiseKind {
        self.kind
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Raw noise at `(x, y, z)`.
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let p = [x, y, z];
        match &self.backend {
            Backend::OpenSimplex(n) => n.get(p),
            Backend::SuperSimplex(n) => n.get(p),
            Backend::Perlin(n) => n.get(p),
        }
    }

    /// Coordinate-chained composition over `octaves`, outermost first.
    ///
    /// Each layer's output becomes the third coordinate of the next outer
    /// layer's query rather than being summed in output space:
    ///
    /// ```text
    /// inner    = sample(x / s_n, y / s_n, a_n)
    /// middle   = sample(x / s_k, y / s_k, inner * a_k)
    /// outer    = sample(x / s_1, y / s_1, middle * a_1 + phase)
    /// ```
    ///
    /// With a single octave this is `sample(x / s, y / s, phase)`. Scales are
    /// validated non-zero by the config before a field is ever queried.
    pub fn chained(&self, x: f64, y: f64, octaves: &[Octave], phase: f64) -> f64 {
        let mut inner: Option<f64> = None;
        for (i, octave) in octaves.iter().enumerate().rev() {
            let outermost = i == 0;
            let z = match inner {
                None if outermost => phase,
                None => octave.amplitude,
                Some(v) if outermost => v * octave.amplitude + phase,
                Some(v) => v * octave.amplitude,
            };
            inner = Some(self.sample(x / octave.scale, y / octave.scale, z));
        }
        inner.unwrap_or(0.0)
    }
}

impl fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseField")
            .field("kind", &self.kind)
            .field("seed", &self.seed)
            .finish()
    }
}
