use super::Point2;

/// Returns the minimum distance from point `p` to the segment `a`-`b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return ((p.x - a.x).powi(2) + (p.y - a.y).powi(2)).sqrt();
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq;
    let t = t.clamp(0.0, 1.0);

    let closest_x = a.x + t * dx;
    let closest_y = a.y + t * dy;

    ((p.x - closest_x).powi(2) + (p.y - closest_y).powi(2)).sqrt()
}

/// Squared Euclidean distance between two points.
#[must_use]
pub fn distance_sq(a: &Point2, b: &Point2) -> f64 {
    (a - b).norm_squared()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_to_segment_perpendicular() {
        let d = point_to_segment_dist(
            &Point2::new(5.0, 3.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(10.0, 0.0),
        );
        assert!((d - 3.0).abs() < 1e-10);
    }

    #[test]
    fn point_to_segment_beyond_end() {
        let d = point_to_segment_dist(
            &Point2::new(13.0, 4.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(10.0, 0.0),
        );
        assert!((d - 5.0).abs() < 1e-10);
    }

    #[test]
    fn point_to_degenerate_segment() {
        let a = Point2::new(1.0, 1.0);
        let d = point_to_segment_dist(&Point2::new(4.0, 5.0), &a, &a);
        assert!((d - 5.0).abs() < 1e-10);
    }

    #[test]
    fn squared_distance() {
        let d = distance_sq(&Point2::new(1.0, 2.0), &Point2::new(4.0, 6.0));
        assert!((d - 25.0).abs() < 1e-10);
    }
}
