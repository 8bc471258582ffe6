use super::predicates::{orientation, Orientation};
use super::Point2;

/// Parameter slack used to keep endpoint touches as intersections.
const PARAM_EPS: f64 = 1e-12;

/// Bounded segment-segment intersection.
///
/// Returns the parameters `(t, u)` of the crossing along `a0 -> a1` and
/// `b0 -> b1`, clamped to `[0, 1]`. Parallel and collinear segments yield
/// `None`.
#[must_use]
pub fn segment_segment_params(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;

    let cross = da.x * db.y - da.y * db.x;
    if cross == 0.0 {
        return None;
    }

    let w = b0 - a0;
    let t = (w.x * db.y - w.y * db.x) / cross;
    let u = (w.x * da.y - w.y * da.x) / cross;

    let range = -PARAM_EPS..=1.0 + PARAM_EPS;
    if range.contains(&t) && range.contains(&u) {
        Some((t.clamp(0.0, 1.0), u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Returns `true` if the segments cross at a single point interior to both.
///
/// Touching at an endpoint or overlapping collinearly is not a proper
/// crossing.
#[must_use]
pub fn segments_cross_properly(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let o1 = orientation(a0, a1, b0);
    let o2 = orientation(a0, a1, b1);
    let o3 = orientation(b0, b1, a0);
    let o4 = orientation(b0, b1, a1);
    o1 != Orientation::Collinear
        && o2 == o1.reversed()
        && o3 != Orientation::Collinear
        && o4 == o3.reversed()
}

/// Linear interpolation along the segment `a -> b`.
#[must_use]
pub fn point_at(a: &Point2, b: &Point2, t: f64) -> Point2 {
    a + (b - a) * t
}
