#![deny(unsafe_code)]
//! Flow-field path generation.
//!
//! Sits on top of `seis-core`: [`OriginSampler`] draws starting points,
//! [`PathWalker`] steps them through the noise field, [`PathSet`] holds the
//! committed paths behind a [`CollisionIndex`], and [`FlowFieldEngine`]
//! drives the pass. The output is plain geometry; rendering, smoothing and
//! export belong to the caller.

pub mod collision;
pub mod engine;
pub mod origin;
pub mod walker;

pub use collision::{CollisionIndex, PathSet};
pub use engine::{generate, generate_recipe, FlowFieldEngine};
pub use origin::OriginSampler;
pub use walker::PathWalker;
