//! Core geometry types and the closed-form constructions of the tree.
//!
//! Everything here is pure: given known vertices, derive the unknown ones.
//! Coordinates are canvas pixels with Y increasing downward.
//!
//! ## Rust Lesson #3: Structs & Derives
//!
//! `#[derive(Debug, Clone, Copy, PartialEq)]` on a two-float struct gives us
//! a value type that is copied implicitly, printed with `{:?}` and compared
//! with `==`. No heap, no identity - a `Point` is just its coordinates.

use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Edges shorter than this are treated as degenerate and never expanded.
pub const MIN_EDGE_LENGTH: f64 = 1e-6;

/// Apex coordinates with a magnitude below this are snapped to exactly 0.
pub const SNAP_THRESHOLD: f64 = 1e-6;

/// Smallest and largest triangle angle the apex construction accepts (degrees).
pub const MIN_ANGLE_DEGREES: f64 = 1.0;
pub const MAX_ANGLE_DEGREES: f64 = 89.0;

/// A 2D point with x,y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One side of a square-to-be-drawn, from `p1` to `p2`.
///
/// The order matters: the square grows on the side the rotated vector
/// `p1 - p2` points to, see [`compute_square`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub p1: Point,
    pub p2: Point,
}

/// The result of building a triangle on a known edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleApex {
    /// The computed third vertex.
    pub apex: Point,
    /// `(apex, p1)` and `(p2, apex)`: the edges the next level grows from.
    pub children: [Edge; 2],
}

// ============================================================================
// IMPLEMENTATIONS
// ============================================================================

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        (*self - other).length()
    }

    /// Length of this point treated as a vector from the origin.
    #[inline]
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// The vector rotated by +90° in the math convention: `(-y, x)`.
    #[inline]
    pub fn perpendicular(&self) -> Point {
        Point::new(-self.y, self.x)
    }

    /// The vector rotated by `radians` (counter-clockwise in a Y-up frame,
    /// so clockwise on screen).
    #[inline]
    pub fn rotated(&self, radians: f64) -> Point {
        let (sin, cos) = radians.sin_cos();
        Point::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Zero out coordinates whose magnitude is below [`SNAP_THRESHOLD`].
    #[inline]
    fn snapped(self) -> Point {
        let snap = |v: f64| if v.abs() < SNAP_THRESHOLD { 0.0 } else { v };
        Point::new(snap(self.x), snap(self.y))
    }
}

// ## Rust Lesson #24: Operator Overloading
//
// Implementing `std::ops::Add` lets us write `a + b` for our own type.
// Because `Point` is `Copy`, the operands are copied, not moved away.

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    #[inline]
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
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
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl Edge {
    #[inline]
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.p1.distance(self.p2)
    }

    /// True when the edge is too short or not finite to build a square on.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.p1.is_finite() && self.p2.is_finite()) || self.length() < MIN_EDGE_LENGTH
    }

    /// The four square vertices in drawing order `p1, p2, p3, p4`.
    pub fn square(&self) -> [Point; 4] {
        let (p3, p4) = compute_square(self.p1, self.p2);
        [self.p1, self.p2, p3, p4]
    }
}

// ============================================================================
// CONSTRUCTIONS
// ============================================================================

/// Derive the two unknown corners of the square that has `p1`-`p2` as a side.
///
/// With `v = p1 - p2` and its perpendicular `n = (-v.y, v.x)`, the corners are
/// `p3 = p2 + n` and `p4 = p1 + n`. The vertex order `p1, p2, p3, p4` walks the
/// square without crossing itself.
#[inline]
pub fn compute_square(p1: Point, p2: Point) -> (Point, Point) {
    let n = (p1 - p2).perpendicular();
    (p2 + n, p1 + n)
}

/// Build the triangle on side `p1`-`p2` and return its apex plus the two
/// child edges.
///
/// The interior angle at `p1` is `90 - angle` and at `p2` it is `angle`
/// (swapped when `mirror` is set), so the apex angle is always 90°. The law of
/// sines gives `|apex - p1| = L * sin(angle_at_p2) / sin(angle_at_apex)`, and
/// the apex is the base vector rotated by the angle at `p1`, rescaled to that
/// length.
///
/// `angle` is clamped to `[1, 89]` degrees first.
pub fn compute_triangle_apex(p1: Point, p2: Point, angle: f64, mirror: bool) -> TriangleApex {
    let angle = angle.clamp(MIN_ANGLE_DEGREES, MAX_ANGLE_DEGREES);

    let mut at_p1 = (90.0 - angle).to_radians();
    let mut at_p2 = angle.to_radians();
    if mirror {
        std::mem::swap(&mut at_p1, &mut at_p2);
    }
    let at_apex = std::f64::consts::PI - at_p1 - at_p2;

    let base = p2 - p1;
    let length = base.length();
    let side = length * at_p2.sin() / at_apex.sin();

    let apex = (p1 + base.rotated(at_p1) * (side / length)).snapped();

    TriangleApex {
        apex,
        children: [Edge::new(apex, p1), Edge::new(p2, apex)],
    }
}
