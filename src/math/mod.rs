pub mod angle;
pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;
pub mod predicates;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Default distance tolerance for coincidence, collinearity and boundary tests.
pub const TOLERANCE: f64 = 1e-4;

/// Returns `true` if the two points agree within `tolerance` on each axis.
#[must_use]
pub fn near(a: &Point2, b: &Point2, tolerance: f64) -> bool {
    (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance
}

/// Total lexicographic order on points: by x, then by y.
#[must_use]
pub fn lexicographic(a: &Point2, b: &Point2) -> std::cmp::Ordering {
    a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
}

/// Bit pattern of a point, usable as a hash key. Negative zero maps to zero.
#[must_use]
pub fn coord_key(p: &Point2) -> [u64; 2] {
    [(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_is_per_axis() {
        let a = Point2::new(0.0, 0.0);
        assert!(near(&a, &Point2::new(1e-5, -1e-5), TOLERANCE));
        assert!(!near(&a, &Point2::new(1e-3, 0.0), TOLERANCE));
    }

    #[test]
    fn signed_zero_shares_key() {
        assert_eq!(
            coord_key(&Point2::new(-0.0, 1.0)),
            coord_key(&Point2::new(0.0, 1.0))
        );
    }

    #[test]
    fn lexicographic_order() {
        use std::cmp::Ordering;
        let a = Point2::new(0.0, 5.0);
        assert_eq!(lexicographic(&a, &Point2::new(1.0, 0.0)), Ordering::Less);
        assert_eq!(lexicographic(&a, &Point2::new(0.0, 4.0)), Ordering::Greater);
    }
}
