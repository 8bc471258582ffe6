use super::{lexicographic, Point2};

/// Computes the signed area of a ring (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Signed area of the triangle `(a, b, c)`. Negative when clockwise.
#[must_use]
pub fn triangle_signed_area(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)) * 0.5
}

/// Index of the lexicographically lowest vertex (smallest x, then smallest y).
#[must_use]
pub fn lowest_vertex(points: &[Point2]) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| lexicographic(a, b))
        .map(|(i, _)| i)
}

/// Rotates a ring so it starts at its lexicographically lowest vertex.
///
/// Ensures deterministic output regardless of where the input ring starts.
#[must_use]
pub fn rotate_to_canonical_start(points: &[Point2]) -> Vec<Point2> {
    let Some(best) = lowest_vertex(points) else {
        return Vec::new();
    };
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}

/// Returns the ring with the requested winding, keeping its first vertex.
#[must_use]
pub fn with_winding(points: &[Point2], clockwise: bool) -> Vec<Point2> {
    let is_clockwise = signed_area(points) < 0.0;
    if is_clockwise == clockwise || points.is_empty() {
        return points.to_vec();
    }
    let mut reversed = Vec::with_capacity(points.len());
    reversed.push(points[0]);
    reversed.extend(points[1..].iter().rev());
    reversed
}
