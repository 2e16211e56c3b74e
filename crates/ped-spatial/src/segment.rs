//! Line segments: walls of the walkable area and edges of stage polygons.

use ped_core::Point;

/// A closed segment from `p1` to `p2`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSegment {
    pub p1: Point,
    pub p2: Point,
}

impl LineSegment {
    #[inline]
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.p1.distance(self.p2)
    }

    /// Point on the segment nearest to `p`.  A degenerate segment collapses
    /// to `p1`.
    pub fn closest_point(&self, p: Point) -> Point {
        let d = self.p2 - self.p1;
        let len2 = d.norm_squared();
        if len2 == 0.0 {
            return self.p1;
        }
        let t = ((p - self.p1).dot(d) / len2).clamp(0.0, 1.0);
        self.p1 + d * t
    }

    #[inline]
    pub fn distance_squared_to(&self, p: Point) -> f64 {
        self.closest_point(p).distance_squared(p)
    }

    #[inline]
    pub fn distance_to(&self, p: Point) -> f64 {
        self.distance_squared_to(p).sqrt()
    }

    /// `true` if the two closed segments share at least one point
    /// (crossing, touching, or collinear overlap).
    pub fn intersects(&self, other: &LineSegment) -> bool {
        let d1 = orientation(other.p1, other.p2, self.p1);
        let d2 = orientation(other.p1, other.p2, self.p2);
        let d3 = orientation(self.p1, self.p2, other.p1);
        let d4 = orientation(self.p1, self.p2, other.p2);

        if d1 * d2 < 0.0 && d3 * d4 < 0.0 {
            return true;
        }
        (d1 == 0.0 && on_segment(other.p1, other.p2, self.p1))
            || (d2 == 0.0 && on_segment(other.p1, other.p2, self.p2))
            || (d3 == 0.0 && on_segment(self.p1, self.p2, other.p1))
            || (d4 == 0.0 && on_segment(self.p1, self.p2, other.p2))
    }

    /// Axis-aligned bounds as `(min, max)` corners.
    #[inline]
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        (
            [self.p1.x.min(self.p2.x), self.p1.y.min(self.p2.y)],
            [self.p1.x.max(self.p2.x), self.p1.y.max(self.p2.y)],
        )
    }
}

#[inline]
fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(c - a)
}

/// `c` is collinear with `a`–`b`; is it within their bounding box?
#[inline]
fn on_segment(a: Point, b: Point, c: Point) -> bool {
    c.x >= a.x.min(b.x) && c.x <= a.x.max(b.x) && c.y >= a.y.min(b.y) && c.y <= a.y.max(b.y)
}
