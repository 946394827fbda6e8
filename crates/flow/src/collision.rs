//! Committed paths and the spatial index collision checks run against.
//!
//! Only paths already committed to a [`PathSet`] are collision targets; a
//! path being grown never collides with itself.

use std::collections::HashMap;

use seis_core::config::{CollisionPolicy, GenerationConfig};
use seis_core::geometry::{Path, Point, Segment};

/// Uniform-grid spatial hash over committed segments.
///
/// A segment is filed under every cell its bounding box overlaps. Any point
/// shared by a segment and a query box therefore lives in a cell both touch,
/// so scanning the query box's cells never misses a hit.
#[derive(Debug, Clone)]
pub struct CollisionIndex {
    cell_size: f64,
    segments: Vec<Segment>,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl CollisionIndex {
    /// Creates an empty index. Non-positive or non-finite cell sizes fall
    /// back to 1.
    pub fn new(cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        Self {
            cell_size,
            segments: Vec::new(),
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of indexed segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Files every segment of `path`, including the degenerate segment of a
    /// one-vertex path.
    pub fn insert_path(&mut self, path: &Path) {
        for seg in path.segments() {
            self.insert(seg);
        }
    }

    pub fn insert(&mut self, seg: Segment) {
        let id = self.segments.len();
        self.segments.push(seg);
        let (min, max) = seg.bounds();
        let (x0, y0) = self.cell_of(min);
        let (x1, y1) = self.cell_of(max);
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                self.cells.entry((cx, cy)).or_default().push(id);
            }
        }
    }

    /// True if any indexed segment comes within `radius` of `p` (inclusive).
    pub fn any_within(&self, p: Point, radius: f64) -> bool {
        let min = Point::new(p.x - radius, p.y - radius);
        let max = Point::new(p.x + radius, p.y + radius);
        self.candidates(min, max)
            .any(|seg| seg.distance_to(p) <= radius)
    }

    /// True if any indexed segment touches or crosses `query`.
    pub fn any_crossing(&self, query: &Segment) -> bool {
        let (min, max) = query.bounds();
        self.candidates(min, max).any(|seg| seg.intersects(query))
    }

    fn cell_of(&self, p: Point) -> (i64, i64) {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
        )
    }

    /// Segments filed under any cell overlapping `[min, max]`. A segment
    /// spanning several cells may be yielded more than once.
    fn candidates(&self, min: Point, max: Point) -> impl Iterator<Item = &Segment> + '_ {
        let (x0, y0) = self.cell_of(min);
        let (x1, y1) = self.cell_of(max);
        (x0..=x1)
            .flat_map(move |cx| (y0..=y1).map(move |cy| (cx, cy)))
            .filter_map(|key| self.cells.get(&key))
            .flatten()
            .map(|&id| &self.segments[id])
    }
}

/// The paths committed during one generation pass.
///
/// Paths are immutable once committed: the set hands out shared references
/// only. When intersections are allowed no index is kept and every check
/// answers `false`.
#[derive(Debug, Clone)]
pub struct PathSet {
    paths: Vec<Path>,
    policy: CollisionPolicy,
    hit_radius: f64,
    index: Option<CollisionIndex>,
    collision_stops: usize,
    skipped_origins: usize,
}

impl PathSet {
    /// A set that checks `policy`, treating everything within
    /// `stroke_width / 2` of a committed path as occupied.
    pub fn new(policy: CollisionPolicy, stroke_width: f64, cell_size: f64) -> Self {
        Self {
            paths: Vec::new(),
            policy,
            hit_radius: stroke_width / 2.0,
            index: Some(CollisionIndex::new(cell_size)),
            collision_stops: 0,
            skipped_origins: 0,
        }
    }

    /// A set that never reports collisions.
    pub fn unchecked() -> Self {
        Self {
            paths: Vec::new(),
            policy: CollisionPolicy::default(),
            hit_radius: 0.0,
            index: None,
            collision_stops: 0,
            skipped_origins: 0,
        }
    }

    /// The set a pass over `config` commits into. Cells are sized to the
    /// larger of the step length and the stroke width so a query touches at
    /// most a handful of cells.
    pub fn for_config(config: &GenerationConfig) -> Self {
        if config.allow_intersect {
            return Self::unchecked();
        }
        let cell = config.step_length.max(config.stroke_width);
        Self::new(config.collision, config.stroke_width, cell)
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    pub fn is_checked(&self) -> bool {
        self.index.is_some()
    }

    /// Whether extending a path from `from` to `to` would run into a
    /// committed path. Pass `from == to` to test a lone point such as an
    /// origin.
    pub fn would_collide(&self, from: Point, to: Point) -> bool {
        let Some(index) = &self.index else {
            return false;
        };
        match self.policy {
            CollisionPolicy::TipContainment => index.any_within(to, self.hit_radius),
            CollisionPolicy::FullIntersection => index.any_crossing(&Segment::new(from, to)),
        }
    }

    /// Adds a finished path. It becomes a collision target for every later
    /// check.
    pub fn commit(&mut self, path: Path) {
        if let Some(index) = &mut self.index {
            index.insert_path(&path);
        }
        self.paths.push(path);
    }

    /// Commits a path whose growth was cut short by a collision.
    pub fn commit_stopped(&mut self, path: Path) {
        self.collision_stops += 1;
        self.commit(path);
    }

    /// Notes a path that was never started because no clear origin was
    /// found.
    pub fn skip_origin(&mut self) {
        self.skipped_origins += 1;
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Path> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn total_vertices(&self) -> usize {
        self.paths.iter().map(Path::len).sum()
    }

    /// How many committed paths stopped early on a collision.
    pub fn collision_stops(&self) -> usize {
        self.collision_stops
    }

    /// How many paths were dropped because every origin drawn for them
    /// landed on a committed path.
    pub fn skipped_origins(&self) -> usize {
        self.skipped_origins
    }

    pub fn into_paths(self) -> Vec<Path> {
        self.paths
    }
}

impl<'a> IntoIterator for &'a PathSet {
    type Item = &'a Path;
    type IntoIter = std::slice::Iter<'a, Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(points: &[(f64, f64)]) -> Path {
        let mut path = Path::new(Point::new(points[0].0, points[0].1));
        for &(x, y) in &points[1..] {
            path.push(Point::new(x, y));
        }
        path
    }

    // -- CollisionIndex --

    #[test]
    fn index_finds_point_near_segment() {
        let mut index = CollisionIndex::new(1.0);
        index.insert(Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0)));
        assert!(index.any_within(Point::new(5.0, 0.4), 0.5));
        assert!(!index.any_within(Point::new(5.0, 0.6), 0.5));
    }

    #[test]
    fn index_radius_is_inclusive() {
        let mut index = CollisionIndex::new(2.0);
        index.insert(Segment::new(Point::new(0.0, 0.0), Point::new(4.0, 0.0)));
        assert!(index.any_within(Point::new(2.0, 0.5), 0.5));
    }

    #[test]
    fn index_finds_long_segment_spanning_many_cells() {
        let mut index = CollisionIndex::new(1.0);
        index.insert(Segment::new(Point::new(-50.0, -50.0), Point::new(50.0, 50.0)));
        assert!(index.any_crossing(&Segment::new(Point::new(10.0, -10.0), Point::new(-10.0, 10.0))));
        assert!(index.any_within(Point::new(30.0, 30.0), 0.1));
    }

    #[test]
    fn index_handles_negative_coordinates() {
        let mut index = CollisionIndex::new(3.0);
        index.insert(Segment::new(Point::new(-7.5, -2.0), Point::new(-7.5, -1.0)));
        assert!(index.any_within(Point::new(-7.4, -1.5), 0.2));
        assert!(!index.any_within(Point::new(7.5, 1.5), 0.2));
    }

    #[test]
    fn index_crossing_ignores_distant_segments() {
        let mut index = CollisionIndex::new(1.0);
        index.insert(Segment::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0)));
        assert!(!index.any_crossing(&Segment::new(Point::new(5.0, 0.0), Point::new(6.0, 1.0))));
    }

    #[test]
    fn invalid_cell_size_falls_back_to_one() {
        assert_eq!(CollisionIndex::new(0.0).cell_size(), 1.0);
        assert_eq!(CollisionIndex::new(f64::NAN).cell_size(), 1.0);
    }

    #[test]
    fn single_vertex_path_is_indexed() {
        let mut index = CollisionIndex::new(1.0);
        index.insert_path(&Path::new(Point::new(2.0, 2.0)));
        assert_eq!(index.len(), 1);
        assert!(index.any_within(Point::new(2.3, 2.0), 0.5));
    }

    // -- PathSet --

    #[test]
    fn tip_policy_detects_landing_inside_stroke() {
        let mut set = PathSet::new(CollisionPolicy::TipContainment, 2.0, 2.0);
        set.commit(line(&[(0.0, 0.0), (10.0, 0.0)]));
        // Candidate tip 0.9 away: inside a stroke of width 2.
        assert!(set.would_collide(Point::new(5.0, 3.0), Point::new(5.0, 0.9)));
        // Tip clear of the stroke even though the segment crosses it.
        assert!(!set.would_collide(Point::new(5.0, 3.0), Point::new(5.0, -3.0)));
    }

    #[test]
    fn full_policy_detects_crossing_segment() {
        let mut set = PathSet::new(CollisionPolicy::FullIntersection, 2.0, 2.0);
        set.commit(line(&[(0.0, 0.0), (10.0, 0.0)]));
        assert!(set.would_collide(Point::new(5.0, 3.0), Point::new(5.0, -3.0)));
        assert!(!set.would_collide(Point::new(5.0, 3.0), Point::new(5.0, 0.9)));
    }

    #[test]
    fn empty_set_never_collides() {
        let set = PathSet::new(CollisionPolicy::TipContainment, 10.0, 1.0);
        assert!(!set.would_collide(Point::ZERO, Point::ZERO));
    }

    #[test]
    fn unchecked_set_never_collides() {
        let mut set = PathSet::unchecked();
        set.commit(line(&[(0.0, 0.0), (10.0, 0.0)]));
        assert!(!set.is_checked());
        assert!(!set.would_collide(Point::new(5.0, 1.0), Point::new(5.0, -1.0)));
    }

    #[test]
    fn for_config_respects_allow_intersect() {
        let mut config = GenerationConfig::default();
        assert!(PathSet::for_config(&config).is_checked());
        config.allow_intersect = true;
        assert!(!PathSet::for_config(&config).is_checked());
        config.allow_intersect = false;
        config.collision = CollisionPolicy::FullIntersection;
        assert_eq!(PathSet::for_config(&config).policy(), CollisionPolicy::FullIntersection);
    }

    #[test]
    fn commit_keeps_order_and_counts() {
        let mut set = PathSet::new(CollisionPolicy::TipContainment, 1.0, 1.0);
        set.commit(line(&[(0.0, 0.0), (1.0, 0.0)]));
        set.commit_stopped(line(&[(5.0, 5.0)]));
        set.commit(line(&[(9.0, 9.0), (9.0, 10.0), (9.0, 11.0)]));
        assert_eq!(set.len(), 3);
        assert_eq!(set.total_vertices(), 6);
        assert_eq!(set.collision_stops(), 1);
        assert_eq!(set.paths()[1].origin(), Point::new(5.0, 5.0));
        let origins: Vec<Point> = set.iter().map(Path::origin).collect();
        assert_eq!(origins.len(), 3);
        assert_eq!((&set).into_iter().count(), 3);
        assert_eq!(set.into_paths().len(), 3);
    }

    #[test]
    fn skipped_origin_counts_without_adding_a_path() {
        let mut set = PathSet::new(CollisionPolicy::TipContainment, 1.0, 1.0);
        set.commit(line(&[(0.0, 0.0)]));
        set.skip_origin();
        assert_eq!(set.len(), 1);
        assert_eq!(set.skipped_origins(), 1);
        assert_eq!(set.collision_stops(), 0);
    }

    #[test]
    fn committed_path_becomes_a_target() {
        let mut set = PathSet::new(CollisionPolicy::TipContainment, 1.0, 1.0);
        let probe = Point::new(0.2, 0.2);
        assert!(!set.would_collide(probe, probe));
        set.commit(line(&[(0.0, 0.0)]));
        assert!(set.would_collide(probe, probe));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn coord() -> impl Strategy<Value = f64> {
            -50.0_f64..50.0
        }

        fn segment() -> impl Strategy<Value = Segment> {
            (coord(), coord(), -3.0_f64..3.0, -3.0_f64..3.0).prop_map(|(x, y, dx, dy)| {
                Segment::new(Point::new(x, y), Point::new(x + dx, y + dy))
            })
        }

        proptest! {
            #[test]
            fn index_matches_brute_force(
                segments in prop::collection::vec(segment(), 1..40),
                query in segment(),
                radius in 0.0_f64..2.0,
                cell in 0.5_f64..5.0,
            ) {
                let mut index = CollisionIndex::new(cell);
                for seg in &segments {
                    index.insert(*seg);
                }
                let brute_cross = segments.iter().any(|s| s.intersects(&query));
                let brute_near = segments.iter().any(|s| s.distance_to(query.b) <= radius);
                prop_assert_eq!(index.any_crossing(&query), brute_cross);
                prop_assert_eq!(index.any_within(query.b, radius), brute_near);
            }
        }
    }
}
