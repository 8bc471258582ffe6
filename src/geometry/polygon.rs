use super::ring::Ring;
use crate::error::GeometryError;
use crate::math::Point2;

/// A polygon: one exterior ring and any number of hole rings.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    exterior: Ring,
    holes: Vec<Ring>,
}

impl Polygon {
    #[must_use]
    pub fn new(exterior: Ring, holes: Vec<Ring>) -> Self {
        Self { exterior, holes }
    }

    /// Builds a polygon from `(x, y)` pairs.
    ///
    /// # Errors
    ///
    /// Returns a `GeometryError` if any ring is invalid.
    pub fn from_coords(
        exterior: &[(f64, f64)],
        holes: &[&[(f64, f64)]],
    ) -> Result<Self, GeometryError> {
        let exterior = Ring::from_coords(exterior)?;
        let holes = holes
            .iter()
            .map(|h| Ring::from_coords(h))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { exterior, holes })
    }

    /// Builds a polygon from point lists.
    ///
    /// # Errors
    ///
    /// Returns a `GeometryError` if any ring is invalid.
    pub fn from_points(exterior: &[Point2], holes: &[Vec<Point2>]) -> Result<Self, GeometryError> {
        let exterior = Ring::new(exterior.to_vec())?;
        let holes = holes
            .iter()
            .map(|h| Ring::new(h.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { exterior, holes })
    }

    #[must_use]
    pub fn exterior(&self) -> &Ring {
        &self.exterior
    }

    #[must_use]
    pub fn holes(&self) -> &[Ring] {
        &self.holes
    }

    /// Enclosed area: exterior minus holes.
    #[must_use]
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| h.signed_area().abs()).sum();
        self.exterior.signed_area().abs() - holes
    }

    /// Total number of ring vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.exterior.len() + self.holes.iter().map(Ring::len).sum::<usize>()
    }

    /// Canonical form used by triangulation: clockwise exterior,
    /// counter-clockwise holes, every ring starting at its lowest vertex.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            exterior: self.exterior.normalized(true),
            holes: self.holes.iter().map(|h| h.normalized(false)).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn area_subtracts_holes() {
        let poly = Polygon::from_coords(
            &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            &[&[(2.0, 2.0), (2.0, 4.0), (4.0, 4.0), (4.0, 2.0)]],
        )
        .unwrap();
        assert!((poly.area() - 96.0).abs() < 1e-12);
        assert_eq!(poly.vertex_count(), 8);
    }

    #[test]
    fn normalized_windings() {
        let poly = Polygon::from_coords(
            &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            &[&[(2.0, 2.0), (2.0, 4.0), (4.0, 4.0), (4.0, 2.0)]],
        )
        .unwrap()
        .normalized();
        assert!(poly.exterior().is_clockwise());
        assert!(!poly.holes()[0].is_clockwise());
        assert_eq!(poly.holes()[0].points()[0], Point2::new(2.0, 2.0));
        assert_eq!(poly.holes()[0].points()[1], Point2::new(4.0, 2.0));
    }

    #[test]
    fn invalid_hole_is_reported() {
        let err = Polygon::from_coords(
            &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)],
            &[&[(1.0, 1.0), (2.0, 2.0)]],
        )
        .unwrap_err();
        assert!(matches!(err, GeometryError::TooFewPoints { .. }));
    }
}
