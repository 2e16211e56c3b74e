//! Planar vector type used for positions, orientations, and velocities.
//!
//! `Point` uses `f64` throughout.  Crowd scenarios are metre-scale and run
//! for tens of thousands of iterations with `dt` around 0.01 s, so the extra
//! precision keeps the explicit integration free of visible drift.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use crate::{CoreError, CoreResult};

/// A 2-D point or vector in metres (or metres per second for velocities).
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z-component of the 3-D cross product.  Positive when `other` lies
    /// counter-clockwise of `self`.
    #[inline]
    pub fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn norm_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn norm(self) -> f64 {
        self.norm_squared().sqrt()
    }

    #[inline]
    pub fn distance_squared(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Unit vector in the direction of `self`.
    ///
    /// Divides by the norm unconditionally: the zero vector yields NaN
    /// components.  Force computations rely on this so that degenerate
    /// input (two agents on the same spot) surfaces as a non-finite result
    /// instead of being silently clamped.
    #[inline]
    pub fn normalized(self) -> Point {
        self / self.norm()
    }

    /// Unit vector in the direction of `self`, or `None` when the norm is
    /// below `eps`.
    #[inline]
    pub fn try_normalized(self, eps: f64) -> Option<Point> {
        let n = self.norm();
        (n > eps).then(|| self / n)
    }

    /// Normalise a caller-supplied direction, rejecting zero-length and
    /// non-finite vectors.
    pub fn to_unit(self, what: &'static str) -> CoreResult<Point> {
        if !self.is_finite() {
            return Err(CoreError::DegenerateVector { what, x: self.x, y: self.y });
        }
        self.try_normalized(f64::EPSILON)
            .ok_or(CoreError::DegenerateVector { what, x: self.x, y: self.y })
    }

    /// Counter-clockwise perpendicular `(-y, x)`.
    #[inline]
    pub fn orthogonal(self) -> Point {
        Point::new(-self.y, self.x)
    }

    /// Rescale to at most `max` length, preserving direction.
    #[inline]
    pub fn clamp_norm(self, max: f64) -> Point {
        let n = self.norm();
        if n > max && n > 0.0 { self * (max / n) } else { self }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    #[inline]
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    #[inline]
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    #[inline]
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;
    #[inline]
    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Point {
    type Output = Point;
    #[inline]
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl From<[f64; 2]> for Point {
    #[inline]
    fn from([x, y]: [f64; 2]) -> Self {
        Point::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.x, self.y)
    }
}
