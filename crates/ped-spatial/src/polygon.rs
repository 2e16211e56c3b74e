//! Simple polygons: the outer boundary, obstacles, and exit areas.
//!
//! A `Polygon` is stored as an open ring (the closing vertex is implicit).
//! Construction cleans the input ring and rejects anything that is not a
//! simple polygon with positive area, so every query below can assume a
//! well-formed ring.

use ped_core::Point;

use crate::{LineSegment, SpatialError, SpatialResult};

/// Areas below this are treated as degenerate.
const AREA_EPSILON: f64 = 1e-9;

/// Consecutive vertices closer than this are merged.
const DUPLICATE_EPSILON: f64 = 1e-12;

/// Points this close to an edge count as lying on the boundary.
const BOUNDARY_EPSILON: f64 = 1e-9;

/// A validated simple polygon.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// Build a polygon from a ring of points.
    ///
    /// The ring may or may not repeat its first vertex at the end, and
    /// consecutive duplicates are dropped.  The result must have at least
    /// three vertices, non-zero area, and no intersecting edges.
    pub fn new<P, I>(points: I) -> SpatialResult<Self>
    where
        P: Into<Point>,
        I: IntoIterator<Item = P>,
    {
        let mut vertices: Vec<Point> = Vec::new();
        for (index, p) in points.into_iter().map(Into::into).enumerate() {
            if !p.is_finite() {
                return Err(SpatialError::NonFiniteVertex { index });
            }
            if vertices
                .last()
                .is_some_and(|last| last.distance_squared(p) <= DUPLICATE_EPSILON)
            {
                continue;
            }
            vertices.push(p);
        }
        while vertices.len() > 1
            && vertices[0].distance_squared(vertices[vertices.len() - 1]) <= DUPLICATE_EPSILON
        {
            vertices.pop();
        }

        if vertices.len() < 3 {
            return Err(SpatialError::TooFewVertices { got: vertices.len() });
        }

        let polygon = Self { vertices };
        if polygon.area() <= AREA_EPSILON {
            return Err(SpatialError::ZeroArea);
        }
        if let Some((first, second)) = polygon.find_self_intersection() {
            return Err(SpatialError::SelfIntersecting { first, second });
        }
        Ok(polygon)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Edges in ring order; edge `i` runs from vertex `i` to vertex `i + 1`.
    pub fn edges(&self) -> impl Iterator<Item = LineSegment> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| LineSegment::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }

    // ── Measures ──────────────────────────────────────────────────────────

    /// Shoelace area, positive for counter-clockwise rings.
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        let twice: f64 = (0..n)
            .map(|i| self.vertices[i].cross(self.vertices[(i + 1) % n]))
            .sum();
        twice * 0.5
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    #[inline]
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Area centroid.
    pub fn centroid(&self) -> Point {
        let n = self.vertices.len();
        let mut acc = Point::ZERO;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            acc += (a + b) * a.cross(b);
        }
        acc / (6.0 * self.signed_area())
    }

    /// Axis-aligned bounds as `(min, max)` corners.
    pub fn bounding_box(&self) -> (Point, Point) {
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for v in &self.vertices {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
        }
        (min, max)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Distance from `p` to the nearest edge.
    pub fn distance_to_boundary(&self, p: Point) -> f64 {
        self.edges()
            .map(|e| e.distance_squared_to(p))
            .fold(f64::INFINITY, f64::min)
            .sqrt()
    }

    /// `true` if `p` is inside the polygon or on its boundary.
    pub fn contains(&self, p: Point) -> bool {
        self.distance_to_boundary(p) <= BOUNDARY_EPSILON || self.crossing_parity(p)
    }

    /// `true` if `p` is inside the polygon and not on its boundary.
    pub fn contains_interior(&self, p: Point) -> bool {
        self.distance_to_boundary(p) > BOUNDARY_EPSILON && self.crossing_parity(p)
    }

    /// `true` if any edge of `self` touches any edge of `other`.
    pub fn edges_intersect(&self, other: &Polygon) -> bool {
        self.edges().any(|a| other.edges().any(|b| a.intersects(&b)))
    }

    // ── Crate-internal ────────────────────────────────────────────────────

    /// Reverse the ring if needed so that `is_ccw() == ccw`.
    pub(crate) fn orient(&mut self, ccw: bool) {
        if self.is_ccw() != ccw {
            self.vertices.reverse();
        }
    }

    /// Even-odd ray cast towards +x.
    fn crossing_parity(&self, p: Point) -> bool {
        let n = self.vertices.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[j];
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// First pair of non-adjacent edges that touch, if any.
    fn find_self_intersection(&self) -> Option<(usize, usize)> {
        let edges: Vec<LineSegment> = self.edges().collect();
        let n = edges.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let adjacent = j == i + 1 || (i == 0 && j == n - 1);
                if adjacent {
                    // Neighbouring edges share a vertex; they only conflict
                    // when they fold back onto each other.
                    let (shared, a_far, b_far) = if j == i + 1 {
                        (edges[i].p2, edges[i].p1, edges[j].p2)
                    } else {
                        (edges[i].p1, edges[i].p2, edges[j].p1)
                    };
                    let u = a_far - shared;
                    let v = b_far - shared;
                    if u.cross(v) == 0.0 && u.dot(v) > 0.0 {
                        return Some((i, j));
                    }
                    continue;
                }
                if edges[i].intersects(&edges[j]) {
                    return Some((i, j));
                }
            }
        }
        None
    }
}
