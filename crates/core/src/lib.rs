#![deny(unsafe_code)]
//! Core types for seis, a noise-driven flow-field path generator.
//!
//! Provides the plain geometry (`Point`, `Path`, `Segment`), the seeded
//! `NoiseField` with its coordinate-chained octave composition, the
//! `DirectionMap` from noise to heading, the `Xorshift64` PRNG behind origin
//! sampling, and `GenerationConfig`/`Recipe` for describing a pass.

pub mod config;
pub mod direction;
pub mod error;
pub mod geometry;
pub mod math;
pub mod noise_field;
pub mod params;
pub mod prng;
pub mod recipe;

pub use config::{CollisionPolicy, GenerationConfig};
pub use direction::DirectionMap;
pub use error::FlowError;
pub use geometry::{Path, Point, Segment};
pub use noise_field::{NoiseField, NoiseKind, Octave};
pub use prng::{UniformSource, Xorshift64};
pub use recipe::Recipe;
