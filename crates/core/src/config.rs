//! Parameters for one generation pass.
//!
//! A [`GenerationConfig`] is immutable for the duration of a pass. Every
//! check runs in [`GenerationConfig::validate`] before the first path is
//! started, so a pass either fails up front or runs to completion.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::direction::DirectionMap;
use crate::error::FlowError;
use crate::noise_field::{NoiseKind, Octave};
use crate::params::ParamReader;

/// Default disc radius for path origins.
const DEFAULT_RADIUS: f64 = 300.0;
/// Default number of paths per pass.
const DEFAULT_PATH_COUNT: usize = 200;
/// Default step cap per path.
const DEFAULT_MAX_STEPS: usize = 100;
/// Default distance between consecutive vertices.
const DEFAULT_STEP_LENGTH: f64 = 2.0;
/// Default stroke width handed to the renderer.
const DEFAULT_STROKE_WIDTH: f64 = 1.0;
/// Default spatial scale of the single default octave.
const DEFAULT_SCALE: f64 = 200.0;

/// Rule deciding whether a path step is rejected against committed paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// The candidate vertex lands on or inside a committed stroke.
    #[default]
    TipContainment,
    /// The candidate segment touches or crosses a committed polyline.
    FullIntersection,
}

impl CollisionPolicy {
    const NAMES: &'static [&'static str] = &["tip-containment", "full-intersection"];

    pub fn from_name(name: &str) -> Result<Self, FlowError> {
        match name {
            "tip-containment" => Ok(CollisionPolicy::TipContainment),
            "full-intersection" => Ok(CollisionPolicy::FullIntersection),
            other => Err(FlowError::invalid(
                "collision",
                format!(
                    "unknown policy '{other}' (available: {})",
                    Self::NAMES.join(", ")
                ),
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CollisionPolicy::TipContainment => "tip-containment",
            CollisionPolicy::FullIntersection => "full-intersection",
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a generation pass needs besides the noise seed and the random
/// source for origins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Radius of the disc origins are drawn from. Non-positive pins every
    /// origin to `(0, 0)`.
    pub radius: f64,
    pub path_count: usize,
    /// Upper bound on steps per path; a path holds at most `max_steps + 1`
    /// vertices.
    pub max_steps: usize,
    pub step_length: f64,
    /// Stroke width the renderer will use. Also the diameter of the region
    /// the tip-containment policy treats as occupied.
    pub stroke_width: f64,
    /// Skip collision checks entirely.
    pub allow_intersect: bool,
    pub collision: CollisionPolicy,
    pub noise: NoiseKind,
    /// Outermost first.
    pub octaves: Vec<Octave>,
    /// Offset folded into the third noise axis of the outermost octave.
    pub phase: f64,
    pub map: DirectionMap,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            path_count: DEFAULT_PATH_COUNT,
            max_steps: DEFAULT_MAX_STEPS,
            step_length: DEFAULT_STEP_LENGTH,
            stroke_width: DEFAULT_STROKE_WIDTH,
            allow_intersect: false,
            collision: CollisionPolicy::default(),
            noise: NoiseKind::default(),
            octaves: vec![Octave::new(DEFAULT_SCALE, 1.0)],
            phase: 0.0,
            map: DirectionMap::default(),
        }
    }
}

impl GenerationConfig {
    /// Overlays a JSON params object on the defaults.
    ///
    /// Scalar keys that are missing or mistyped keep their default. The
    /// structured keys `octaves` and `map` and the names `collision` and
    /// `noise` fail when present but malformed. The result is not validated;
    /// call [`GenerationConfig::validate`] before generating.
    pub fn from_json(params: &Value) -> Result<Self, FlowError> {
        let d = Self::default();
        let r = ParamReader::new(params);

        let collision = match r.str("collision") {
            Some(name) => CollisionPolicy::from_name(name)?,
            None => d.collision,
        };
        let noise = match r.str("noise") {
            Some(name) => NoiseKind::from_name(name)?,
            None => d.noise,
        };

        Ok(Self {
            radius: r.f64("radius", d.radius),
            path_count: r.usize("path_count", d.path_count),
            max_steps: r.usize("max_steps", d.max_steps),
            step_length: r.f64("step_length", d.step_length),
            stroke_width: r.f64("stroke_width", d.stroke_width),
            allow_intersect: r.bool("allow_intersect", d.allow_intersect),
            collision,
            noise,
            octaves: r.parse("octaves")?.unwrap_or(d.octaves),
            phase: r.f64("phase", d.phase),
            map: r.parse("map")?.unwrap_or(d.map),
        })
    }

    /// Fails fast on anything that would make a pass ill-defined.
    ///
    /// A non-positive radius is allowed (origins collapse to `(0, 0)`).
    pub fn validate(&self) -> Result<(), FlowError> {
        if !self.radius.is_finite() {
            return Err(FlowError::invalid(
                "radius",
                format!("must be finite, got {}", self.radius),
            ));
        }
        if self.max_steps == 0 {
            return Err(FlowError::invalid("max_steps", "must be at least 1"));
        }
        if !(self.step_length.is_finite() && self.step_length > 0.0) {
            return Err(FlowError::invalid(
                "step_length",
                format!("must be finite and > 0, got {}", self.step_length),
            ));
        }
        if !(self.stroke_width.is_finite() && self.stroke_width >= 0.0) {
            return Err(FlowError::invalid(
                "stroke_width",
                format!("must be finite and >= 0, got {}", self.stroke_width),
            ));
        }
        if self.octaves.is_empty() {
            return Err(FlowError::invalid("octaves", "at least one octave is required"));
        }
        for (i, octave) in self.octaves.iter().enumerate() {
            if !(octave.scale.is_finite() && octave.scale > 0.0) {
                return Err(FlowError::invalid(
                    &format!("octaves[{i}].scale"),
                    format!("must be finite and > 0, got {}", octave.scale),
                ));
            }
            if !octave.amplitude.is_finite() {
                return Err(FlowError::invalid(
                    &format!("octaves[{i}].amplitude"),
                    format!("must be finite, got {}", octave.amplitude),
                ));
            }
        }
        if !self.phase.is_finite() {
            return Err(FlowError::invalid(
                "phase",
                format!("must be finite, got {}", self.phase),
            ));
        }
        self.map.validate()
    }

    /// Current values as a flat JSON object, in the shape `from_json` reads.
    pub fn to_json(&self) -> Value {
        json!({
            "radius": self.radius,
            "path_count": self.path_count,
            "max_steps": self.max_steps,
            "step_length": self.step_length,
            "stroke_width": self.stroke_width,
            "allow_intersect": self.allow_intersect,
            "collision": self.collision.name(),
            "noise": self.noise.name(),
            "octaves": self.octaves,
            "phase": self.phase,
            "map": self.map,
        })
    }

    /// Schema for a control surface: type, default, bounds and description
    /// of every parameter.
    pub fn param_schema() -> Value {
        let d = Self::default();
        json!({
            "radius": {
                "type": "number",
                "default": d.radius,
                "description": "Radius of the disc path origins are drawn from; <= 0 pins origins to the centre"
            },
            "path_count": {
                "type": "integer",
                "default": d.path_count,
                "min": 0,
                "description": "Number of paths generated per pass"
            },
            "max_steps": {
                "type": "integer",
                "default": d.max_steps,
                "min": 1,
                "description": "Maximum steps per path"
            },
            "step_length": {
                "type": "number",
                "default": d.step_length,
                "exclusive_min": 0.0,
                "description": "Distance between consecutive vertices"
            },
            "stroke_width": {
                "type": "number",
                "default": d.stroke_width,
                "min": 0.0,
                "description": "Rendered stroke width; tip-containment treats half of it as occupied"
            },
            "allow_intersect": {
                "type": "boolean",
                "default": d.allow_intersect,
                "description": "Skip collision checks and let paths cross"
            },
            "collision": {
                "type": "string",
                "default": d.collision.name(),
                "enum": CollisionPolicy::NAMES,
                "description": "Collision policy used when intersections are forbidden"
            },
            "noise": {
                "type": "string",
                "default": d.noise.name(),
                "enum": NoiseKind::list_names(),
                "description": "Continuous noise generator"
            },
            "octaves": {
                "type": "array",
                "default": d.octaves,
                "min_items": 1,
                "description": "Chained layers {scale, amplitude}, outermost first; scale > 0"
            },
            "phase": {
                "type": "number",
                "default": d.phase,
                "description": "Offset on the third noise axis of the outermost layer"
            },
            "map": {
                "type": "object",
                "default": d.map,
                "description": "Affine {in_min, in_max, out_min, out_max, clamp} from noise to heading (radians)"
            }
        })
    }
}
