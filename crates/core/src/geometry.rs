//! Plain 2D geometry: points, polylines and the predicates collision
//! detection is built on.
//!
//! `Point` is an immutable value. A [`Path`] only ever grows at its tail, so
//! geometry that has been handed to a renderer never changes underneath it.

use glam::DVec2;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::FlowError;

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin `(0, 0)`.
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        DVec2::from(*self).distance(DVec2::from(other))
    }

    /// Distance from `(0, 0)`.
    #[inline]
    pub fn length(&self) -> f64 {
        DVec2::from(*self).length()
    }
}

impl From<Point> for DVec2 {
    #[inline]
    fn from(p: Point) -> Self {
        DVec2::new(p.x, p.y)
    }
}

impl From<DVec2> for Point {
    #[inline]
    fn from(v: DVec2) -> Self {
        Point::new(v.x, v.y)
    }
}

/// An ordered polyline that grows by appending at its tail.
///
/// A path always holds at least one vertex (its origin) and never shrinks.
/// Deserializing an empty vertex array is an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Path {
    vertices: Vec<Point>,
}

impl Path {
    /// Starts a path at `origin`.
    pub fn new(origin: Point) -> Self {
        Self {
            vertices: vec![origin],
        }
    }

    /// Appends a vertex at the tail.
    pub fn push(&mut self, p: Point) {
        self.vertices.push(p);
    }

    /// First vertex.
    pub fn origin(&self) -> Point {
        self.vertices[0]
    }

    /// Last vertex. Always present.
    pub fn tail(&self) -> Point {
        self.vertices[self.vertices.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false: a path starts with its origin.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertices in traversal order.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Consecutive vertex pairs. A one-vertex path yields a single
    /// degenerate segment so it still occupies space.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        let degenerate = (self.vertices.len() == 1).then(|| Segment::new(self.origin(), self.origin()));
        degenerate.into_iter().chain(
            self.vertices
                .windows(2)
                .map(|w| Segment::new(w[0], w[1])),
        )
    }
}

impl TryFrom<Vec<Point>> for Path {
    type Error = FlowError;

    fn try_from(vertices: Vec<Point>) -> Result<Self, FlowError> {
        if vertices.is_empty() {
            return Err(FlowError::invalid("path", "needs at least one vertex"));
        }
        Ok(Self { vertices })
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let vertices = Vec::<Point>::deserialize(deserializer)?;
        Path::try_from(vertices).map_err(serde::de::Error::custom)
    }
}

/// A closed line segment `[a, b]`. `a == b` is a valid degenerate segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    #[inline]
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn bounds(&self) -> (Point, Point) {
        (
            Point::new(self.a.x.min(self.b.x), self.a.y.min(self.b.y)),
            Point::new(self.a.x.max(self.b.x), self.a.y.max(self.b.y)),
        )
    }

    /// Shortest distance from `p` to any point of the segment.
    pub fn distance_to(&self, p: Point) -> f64 {
        let a = DVec2::from(self.a);
        let ab = DVec2::from(self.b) - a;
        let ap = DVec2::from(p) - a;
        let len_sq = ab.length_squared();
        if len_sq == 0.0 {
            return ap.length();
        }
        let t = (ap.dot(ab) / len_sq).clamp(0.0, 1.0);
        (ap - ab * t).length()
    }

    /// True when the two closed segments share at least one point.
    /// Touching endpoints and collinear overlap both count.
    pub fn intersects(&self, other: &Segment) -> bool {
        let (p1, p2, p3, p4) = (self.a, self.b, other.a, other.b);
        let d1 = orient(p3, p4, p1);
        let d2 = orient(p3, p4, p2);
        let d3 = orient(p1, p2, p3);
        let d4 = orient(p1, p2, p4);

        if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
            && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
        {
            return true;
        }

        (d1 == 0.0 && within_bounds(p3, p4, p1))
            || (d2 == 0.0 && within_bounds(p3, p4, p2))
            || (d3 == 0.0 && within_bounds(p1, p2, p3))
            || (d4 == 0.0 && within_bounds(p1, p2, p4))
    }
}

/// Signed area of the triangle `(a, b, c)`: positive for a left turn.
#[inline]
fn orient(a: Point, b: Point, c: Point) -> f64 {
    (DVec2::from(b) - DVec2::from(a)).perp_dot(DVec2::from(c) - DVec2::from(a))
}

/// For `p` collinear with `a..b`, whether it lies inside their bounding box.
#[inline]
fn within_bounds(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}
