use robust::{incircle, orient2d, Coord};

use super::{near, Point2};

/// Turn direction of an ordered point triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
    Collinear,
}

impl Orientation {
    /// Returns the opposite turn direction. Collinear stays collinear.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
            Self::Collinear => Self::Collinear,
        }
    }
}

fn coord(p: &Point2) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

/// Exact orientation of the triple `(a, b, c)`.
#[must_use]
pub fn orientation(a: &Point2, b: &Point2, c: &Point2) -> Orientation {
    let det = orient2d(coord(a), coord(b), coord(c));
    if det > 0.0 {
        Orientation::CounterClockwise
    } else if det < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Returns `true` if `d` lies strictly inside the circumcircle of `a`, `b`, `c`.
///
/// The triple may be given in either winding. A collinear triple has no
/// circumcircle and yields `false`.
#[must_use]
pub fn in_circle(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> bool {
    let det = match orientation(a, b, c) {
        Orientation::CounterClockwise => incircle(coord(a), coord(b), coord(c), coord(d)),
        Orientation::Clockwise => incircle(coord(a), coord(c), coord(b), coord(d)),
        Orientation::Collinear => return false,
    };
    det > 0.0
}

/// Sine of the smallest turn [`is_collinear`] tells apart from a straight line.
const TURN_RESOLUTION: f64 = 1e-12;

/// Tolerant collinearity test used when pruning shell vertices.
///
/// The triple counts as collinear when `a` coincides with `b` or `c`, when
/// both `b` and `c` share `a`'s x coordinate, when the exact orientation is
/// zero, or when the turn at `b` is below floating-point resolution.
#[must_use]
pub fn is_collinear(a: &Point2, b: &Point2, c: &Point2, tolerance: f64) -> bool {
    if near(a, c, tolerance) || near(a, b, tolerance) {
        return true;
    }
    if (b.x - a.x).abs() <= tolerance && (c.x - a.x).abs() <= tolerance {
        return true;
    }
    if orientation(a, b, c) == Orientation::Collinear {
        return true;
    }
    let (ab, ac) = (b - a, c - a);
    ac.perp(&ab).abs() <= TURN_RESOLUTION * ac.norm() * ab.norm()
}

/// Returns `true` if `p` lies strictly inside the triangle `(a, b, c)`.
///
/// Points on an edge or at a vertex are not inside.
#[must_use]
pub fn strictly_inside_triangle(p: &Point2, a: &Point2, b: &Point2, c: &Point2) -> bool {
    let o0 = orientation(a, b, p);
    if o0 == Orientation::Collinear {
        return false;
    }
    o0 == orientation(b, c, p) && o0 == orientation(c, a, p)
}

/// Returns `true` if `p` lies inside or on the boundary of the triangle.
#[must_use]
pub fn inside_or_on_triangle(p: &Point2, a: &Point2, b: &Point2, c: &Point2) -> bool {
    let turns = [orientation(a, b, p), orientation(b, c, p), orientation(c, a, p)];
    let has_cw = turns.contains(&Orientation::Clockwise);
    let has_ccw = turns.contains(&Orientation::CounterClockwise);
    !(has_cw && has_ccw)
}

/// Returns `true` if `p` lies on the ray leaving `origin` through `through`.
///
/// `origin` itself is not on the ray.
#[must_use]
pub fn on_ray(origin: &Point2, through: &Point2, p: &Point2) -> bool {
    orientation(origin, through, p) == Orientation::Collinear
        && (through - origin).dot(&(p - origin)) > 0.0
}
