use crate::error::GeometryError;
use crate::math::polygon_2d::{rotate_to_canonical_start, signed_area, with_winding};
use crate::math::Point2;

/// Axis-aligned bounding box of a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point2,
    pub max: Point2,
}

impl Aabb {
    /// Smallest box containing all `points`, or `None` for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Point2]) -> Option<Self> {
        let first = points.first()?;
        let mut aabb = Self {
            min: *first,
            max: *first,
        };
        for p in &points[1..] {
            aabb.min.x = aabb.min.x.min(p.x);
            aabb.min.y = aabb.min.y.min(p.y);
            aabb.max.x = aabb.max.x.max(p.x);
            aabb.max.y = aabb.max.y.max(p.y);
        }
        Some(aabb)
    }

    /// Returns a copy grown by `margin` on every side.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: Point2::new(self.min.x - margin, self.min.y - margin),
            max: Point2::new(self.max.x + margin, self.max.y + margin),
        }
    }

    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// A simple closed ring of straight segments.
///
/// Stored open: the last vertex connects back to the first and no closing
/// duplicate is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    points: Vec<Point2>,
}

impl Ring {
    /// Creates a ring, dropping a repeated closing vertex if present.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for NaN or infinite coordinates,
    /// `GeometryError::TooFewPoints` for fewer than three vertices and
    /// `GeometryError::ZeroArea` if the ring encloses no area.
    pub fn new(mut points: Vec<Point2>) -> Result<Self, GeometryError> {
        if let Some(bad) = points.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(GeometryError::NonFinite { x: bad.x, y: bad.y });
        }
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            return Err(GeometryError::TooFewPoints {
                count: points.len(),
            });
        }
        if signed_area(&points) == 0.0 {
            return Err(GeometryError::ZeroArea);
        }
        Ok(Self { points })
    }

    /// Creates a ring from `(x, y)` pairs.
    ///
    /// # Errors
    ///
    /// See [`Ring::new`].
    pub fn from_coords(coords: &[(f64, f64)]) -> Result<Self, GeometryError> {
        Self::new(coords.iter().map(|&(x, y)| Point2::new(x, y)).collect())
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shoelace area, positive for counter-clockwise rings.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.points)
    }

    #[must_use]
    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    /// Bounding box. A validated ring always has one.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(&self.points).unwrap_or(Aabb {
            min: Point2::origin(),
            max: Point2::origin(),
        })
    }

    /// Iterates the ring's segments, including the closing one.
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Returns the same ring starting at its lowest vertex with the requested
    /// winding.
    #[must_use]
    pub fn normalized(&self, clockwise: bool) -> Self {
        let rotated = rotate_to_canonical_start(&self.points);
        Self {
            points: with_winding(&rotated, clockwise),
        }
    }

    /// Even-odd crossing test. Points on the boundary may report either side.
    #[must_use]
    pub fn contains_point(&self, p: &Point2) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn closing_vertex_is_dropped() {
        let ring =
            Ring::from_coords(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)])
                .unwrap();
        assert_eq!(ring.len(), 4);
        assert!(ring.is_clockwise());
    }

    #[test]
    fn rejects_short_ring() {
        let err = Ring::from_coords(&[(0.0, 0.0), (1.0, 1.0), (0.0, 0.0)]).unwrap_err();
        assert!(matches!(err, GeometryError::TooFewPoints { count: 2 }));
    }

    #[test]
    fn rejects_non_finite() {
        let err = Ring::from_coords(&[(0.0, 0.0), (f64::NAN, 1.0), (1.0, 0.0)]).unwrap_err();
        assert!(matches!(err, GeometryError::NonFinite { .. }));
    }

    #[test]
    fn rejects_zero_area() {
        let err = Ring::from_coords(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]).unwrap_err();
        assert!(matches!(err, GeometryError::ZeroArea));
    }

    #[test]
    fn normalization_rotates_and_orients() {
        let ring = Ring::from_coords(&[(10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)])
            .unwrap();
        let cw = ring.normalized(true);
        assert_eq!(cw.points()[0], Point2::new(0.0, 0.0));
        assert_eq!(cw.points()[1], Point2::new(0.0, 10.0));
        assert!(cw.is_clockwise());

        let ccw = ring.normalized(false);
        assert_eq!(ccw.points()[0], Point2::new(0.0, 0.0));
        assert_eq!(ccw.points()[1], Point2::new(10.0, 0.0));
        assert!(!ccw.is_clockwise());
    }

    #[test]
    fn crossing_test() {
        let ring = Ring::from_coords(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0)]).unwrap();
        assert!(ring.contains_point(&Point2::new(2.0, 2.0)));
        assert!(!ring.contains_point(&Point2::new(5.0, 2.0)));
        assert!(!ring.contains_point(&Point2::new(-1.0, 2.0)));
    }

    #[test]
    fn aabb_of_ring() {
        let ring = Ring::from_coords(&[(1.0, 2.0), (3.0, -1.0), (-2.0, 0.5)]).unwrap();
        let aabb = ring.aabb();
        assert_eq!(aabb.min, Point2::new(-2.0, -1.0));
        assert_eq!(aabb.max, Point2::new(3.0, 2.0));
        assert!(aabb.contains(&Point2::new(0.0, 0.0)));
        assert!(!aabb.contains(&Point2::new(0.0, 3.0)));
        assert!(aabb.expanded(1.5).contains(&Point2::new(0.0, 3.0)));
    }
}
