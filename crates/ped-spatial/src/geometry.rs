//! Walkable area and its builder.
//!
//! # Data layout
//!
//! The walkable area is one outer boundary (counter-clockwise) minus zero or
//! more obstacles (clockwise).  Every edge of every ring is a wall.  Walls
//! are numbered in ring order, outer boundary first, and stored in an
//! R-tree (via `rstar`) so per-agent wall queries touch only nearby
//! segments.
//!
//! A `Geometry` is immutable once built.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use ped_core::Point;

use crate::{LineSegment, Polygon, SpatialError, SpatialResult};

// ── R-tree wall entry ─────────────────────────────────────────────────────────

/// Entry stored in the wall index: one segment plus its wall number.
#[derive(Clone)]
struct WallEntry {
    segment: LineSegment,
    index:   u32,
}

impl RTreeObject for WallEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        let (min, max) = self.segment.bounds();
        AABB::from_corners(min, max)
    }
}

impl PointDistance for WallEntry {
    /// Squared Euclidean distance from the query point to the segment.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        self.segment.distance_squared_to(Point::from(*point))
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Immutable walkable area: outer boundary minus obstacles.
///
/// Do not construct directly; use [`GeometryBuilder`].
pub struct Geometry {
    outer:     Polygon,
    obstacles: Vec<Polygon>,
    walls:     Vec<LineSegment>,
    wall_idx:  RTree<WallEntry>,
}

impl Geometry {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn outer(&self) -> &Polygon {
        &self.outer
    }

    pub fn obstacles(&self) -> &[Polygon] {
        &self.obstacles
    }

    /// All wall segments in wall-number order.
    pub fn walls(&self) -> &[LineSegment] {
        &self.walls
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// Walkable area: outer area minus obstacle areas.
    pub fn area(&self) -> f64 {
        self.outer.area() - self.obstacles.iter().map(Polygon::area).sum::<f64>()
    }

    pub fn bounding_box(&self) -> (Point, Point) {
        self.outer.bounding_box()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// `true` if `p` is inside the outer boundary (boundary included) and
    /// not in the interior of any obstacle.
    pub fn contains(&self, p: Point) -> bool {
        self.outer.contains(p) && !self.obstacles.iter().any(|o| o.contains_interior(p))
    }

    /// Distance from `p` to the nearest wall.
    ///
    /// Returns `f64::INFINITY` only for a geometry without walls, which
    /// [`GeometryBuilder::build`] never produces.
    pub fn distance_to_boundary(&self, p: Point) -> f64 {
        self.wall_idx
            .nearest_neighbor(&p.to_array())
            .map_or(f64::INFINITY, |w| w.segment.distance_to(p))
    }

    /// All walls within `radius` of `p`, in ascending wall-number order.
    ///
    /// The fixed order keeps force sums independent of the R-tree layout.
    pub fn walls_within(&self, p: Point, radius: f64) -> Vec<LineSegment> {
        if !(radius >= 0.0) {
            return Vec::new();
        }
        let mut hits: Vec<&WallEntry> = self
            .wall_idx
            .locate_within_distance(p.to_array(), radius * radius)
            .collect();
        hits.sort_unstable_by_key(|w| w.index);
        hits.into_iter().map(|w| w.segment).collect()
    }
}

// ── GeometryBuilder ───────────────────────────────────────────────────────────

/// Collect the outer boundary and obstacles, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use ped_spatial::GeometryBuilder;
///
/// let geo = GeometryBuilder::new([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
///     .add_obstacle([(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)])
///     .build()
///     .unwrap();
/// assert_eq!(geo.wall_count(), 8);
/// assert!((geo.area() - 96.0).abs() < 1e-9);
/// ```
pub struct GeometryBuilder {
    outer:     Vec<Point>,
    obstacles: Vec<Vec<Point>>,
}

impl GeometryBuilder {
    pub fn new<P, I>(outer: I) -> Self
    where
        P: Into<Point>,
        I: IntoIterator<Item = P>,
    {
        Self {
            outer:     outer.into_iter().map(Into::into).collect(),
            obstacles: Vec::new(),
        }
    }

    /// Add an obstacle (hole) ring.
    pub fn add_obstacle<P, I>(mut self, ring: I) -> Self
    where
        P: Into<Point>,
        I: IntoIterator<Item = P>,
    {
        self.obstacles.push(ring.into_iter().map(Into::into).collect());
        self
    }

    /// Validate all rings and produce a [`Geometry`].
    ///
    /// Time complexity: O(V²) for the intersection checks, where V is the
    /// total vertex count.  Geometry is built once per simulation.
    pub fn build(self) -> SpatialResult<Geometry> {
        let mut outer = Polygon::new(self.outer)?;
        outer.orient(true);

        let mut obstacles = Vec::with_capacity(self.obstacles.len());
        for (index, ring) in self.obstacles.into_iter().enumerate() {
            let mut obstacle = Polygon::new(ring)?;
            obstacle.orient(false);

            let inside = obstacle.vertices().iter().all(|&v| outer.contains_interior(v));
            if !inside || obstacle.edges_intersect(&outer) {
                return Err(SpatialError::ObstacleOutsideBoundary { index });
            }
            obstacles.push(obstacle);
        }

        for first in 0..obstacles.len() {
            for second in (first + 1)..obstacles.len() {
                let (a, b) = (&obstacles[first], &obstacles[second]);
                let nested = a.contains(b.vertices()[0]) || b.contains(a.vertices()[0]);
                if nested || a.edges_intersect(b) {
                    return Err(SpatialError::ObstaclesOverlap { first, second });
                }
            }
        }

        let walls: Vec<LineSegment> = outer
            .edges()
            .chain(obstacles.iter().flat_map(Polygon::edges))
            .collect();
        let entries: Vec<WallEntry> = walls
            .iter()
            .enumerate()
            .map(|(i, &segment)| WallEntry { segment, index: i as u32 })
            .collect();
        let wall_idx = RTree::bulk_load(entries);

        Ok(Geometry { outer, obstacles, walls, wall_idx })
    }
}
