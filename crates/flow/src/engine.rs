//! The generation pass: sample an origin, grow it through the noise field,
//! commit it, repeat.
//!
//! A pass is a deterministic function of the config, the noise seed and the
//! random source used for origins. Collision-triggered early stops are normal
//! control flow; the only failures are configuration errors, raised before
//! the first path is started.

use seis_core::config::GenerationConfig;
use seis_core::error::FlowError;
use seis_core::geometry::{Path, Point};
use seis_core::noise_field::NoiseField;
use seis_core::prng::{UniformSource, Xorshift64};
use seis_core::recipe::Recipe;
use serde_json::{json, Value};

use crate::collision::PathSet;
use crate::origin::OriginSampler;
use crate::walker::PathWalker;

/// How many origins are drawn for one path before that path is skipped.
pub const ORIGIN_PLACEMENT_ATTEMPTS: usize = 32;

/// Owns a validated config and the noise field for a run of passes.
///
/// "Randomize" is [`FlowFieldEngine::reseed`] or
/// [`FlowFieldEngine::randomize`] followed by a fresh
/// [`FlowFieldEngine::generate`]; each pass returns a brand-new [`PathSet`].
#[derive(Debug)]
pub struct FlowFieldEngine {
    config: GenerationConfig,
    noise: NoiseField,
}

impl FlowFieldEngine {
    /// Validates `config` and builds its noise field with `noise_seed`.
    pub fn new(config: GenerationConfig, noise_seed: u32) -> Result<Self, FlowError> {
        config.validate()?;
        let noise = NoiseField::new(config.noise, noise_seed);
        Ok(Self { config, noise })
    }

    /// Validates `config` and adopts an existing noise field as-is.
    pub fn with_noise(config: GenerationConfig, noise: NoiseField) -> Result<Self, FlowError> {
        config.validate()?;
        Ok(Self { config, noise })
    }

    pub fn from_recipe(recipe: &Recipe) -> Result<Self, FlowError> {
        Self::new(recipe.config.clone(), recipe.noise_seed)
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Swaps in an independent noise field of the same kind.
    pub fn reseed(&mut self, seed: u32) {
        self.noise = self.noise.reseed(seed);
    }

    /// Reseeds from the system clock.
    pub fn randomize(&mut self) -> Result<(), FlowError> {
        self.noise = NoiseField::from_entropy(self.config.noise)?;
        Ok(())
    }

    /// Current parameters plus the noise seed, for display or export naming.
    pub fn params(&self) -> Value {
        let mut params = self.config.to_json();
        params["noise_seed"] = json!(self.noise.seed());
        params
    }

    /// Runs one pass, drawing origins from `rng`.
    pub fn generate<R: UniformSource + ?Sized>(&self, rng: &mut R) -> PathSet {
        let config = &self.config;
        tracing::debug!(
            target: "seis::engine",
            path_count = config.path_count,
            max_steps = config.max_steps,
            allow_intersect = config.allow_intersect,
            policy = config.collision.name(),
            noise_seed = self.noise.seed(),
            "engine.generate.start"
        );

        let sampler = OriginSampler::new(config.radius);
        let walker = PathWalker::from_config(config, &self.noise);
        let mut committed = PathSet::for_config(config);

        for i in 0..config.path_count {
            let Some(origin) = self.place_origin(&sampler, &committed, rng) else {
                tracing::warn!(
                    target: "seis::engine",
                    path = i,
                    attempts = ORIGIN_PLACEMENT_ATTEMPTS,
                    "engine.origin.placement_cap_reached"
                );
                committed.skip_origin();
                continue;
            };
            let (path, collided) = self.grow(&walker, &committed, origin);
            if collided {
                tracing::debug!(
                    target: "seis::engine",
                    path = i,
                    vertices = path.len(),
                    "engine.path.collision_stop"
                );
                committed.commit_stopped(path);
            } else {
                committed.commit(path);
            }
        }

        log_summary(&committed);
        committed
    }

    /// Parallel variant of [`FlowFieldEngine::generate`].
    ///
    /// With intersections allowed, paths don't depend on each other:
    /// origins are drawn in order from `rng`, paths are walked concurrently
    /// and committed in index order, giving exactly the sequential result.
    /// With intersections forbidden each path depends on the ones before it,
    /// so this falls back to the sequential pass.
    #[cfg(feature = "parallel")]
    pub fn generate_parallel<R: UniformSource + ?Sized>(&self, rng: &mut R) -> PathSet {
        use rayon::prelude::*;

        let config = &self.config;
        if !config.allow_intersect {
            return self.generate(rng);
        }

        let sampler = OriginSampler::new(config.radius);
        let origins: Vec<Point> = (0..config.path_count).map(|_| sampler.sample(rng)).collect();
        let walker = PathWalker::from_config(config, &self.noise);
        let paths: Vec<Path> = origins
            .par_iter()
            .map(|&origin| walker.walk(origin, config.max_steps))
            .collect();

        let mut committed = PathSet::for_config(config);
        for path in paths {
            committed.commit(path);
        }
        log_summary(&committed);
        committed
    }

    /// Draws an origin that is clear of every committed path, trying up to
    /// [`ORIGIN_PLACEMENT_ATTEMPTS`] draws. `None` when every draw landed on
    /// a committed path; the caller skips that path.
    fn place_origin<R: UniformSource + ?Sized>(
        &self,
        sampler: &OriginSampler,
        committed: &PathSet,
        rng: &mut R,
    ) -> Option<Point> {
        if !committed.is_checked() {
            return Some(sampler.sample(rng));
        }
        (0..ORIGIN_PLACEMENT_ATTEMPTS)
            .map(|_| sampler.sample(rng))
            .find(|&origin| !committed.would_collide(origin, origin))
    }

    /// Grows a path from `origin` for up to `max_steps` steps. Each candidate
    /// vertex is checked against the committed set before it is appended; on
    /// a collision the path keeps what it has and the flag is set.
    fn grow(&self, walker: &PathWalker<'_>, committed: &PathSet, origin: Point) -> (Path, bool) {
        let mut path = Path::new(origin);
        for _ in 0..self.config.max_steps {
            let tail = path.tail();
            let next = walker.propose(tail);
            if committed.would_collide(tail, next) {
                return (path, true);
            }
            path.push(next);
        }
        (path, false)
    }
}

fn log_summary(committed: &PathSet) {
    tracing::info!(
        target: "seis::engine",
        paths = committed.len(),
        vertices = committed.total_vertices(),
        collision_stops = committed.collision_stops(),
        skipped_origins = committed.skipped_origins(),
        "engine.generate.done"
    );
}

/// One-call pass: validates `config`, builds the noise field from
/// `noise_seed` and draws origins from an [`Xorshift64`] seeded with
/// `origin_seed`.
pub fn generate(
    config: &GenerationConfig,
    noise_seed: u32,
    origin_seed: u64,
) -> Result<PathSet, FlowError> {
    let engine = FlowFieldEngine::new(config.clone(), noise_seed)?;
    let mut rng = Xorshift64::new(origin_seed);
    Ok(engine.generate(&mut rng))
}

/// Runs the pass a [`Recipe`] describes.
pub fn generate_recipe(recipe: &Recipe) -> Result<PathSet, FlowError> {
    generate(&recipe.config, recipe.noise_seed, recipe.origin_seed)
}
