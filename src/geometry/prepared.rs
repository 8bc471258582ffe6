use super::polygon::Polygon;
use super::ring::{Aabb, Ring};
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::intersect_2d::{point_at, segment_segment_params};
use crate::math::predicates::strictly_inside_triangle;
use crate::math::Point2;

/// Sub-intervals shorter than this are not sampled.
const MIN_INTERVAL: f64 = 1e-12;

/// Position of a point relative to a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

/// A polygon with cached ring bounds, answering coverage queries.
///
/// "Covers" is inclusive: a segment or triangle is covered when none of its
/// points lie outside the polygon. Points within `tolerance` of a ring count
/// as boundary.
#[derive(Debug, Clone)]
pub struct PreparedPolygon {
    polygon: Polygon,
    bounds: Vec<Aabb>,
    tolerance: f64,
}

impl PreparedPolygon {
    #[must_use]
    pub fn new(polygon: &Polygon, tolerance: f64) -> Self {
        let bounds = rings(polygon)
            .map(|r| r.aabb().expanded(tolerance))
            .collect();
        Self {
            polygon: polygon.clone(),
            bounds,
            tolerance,
        }
    }

    #[must_use]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Classifies `p` against the polygon.
    #[must_use]
    pub fn locate(&self, p: &Point2) -> Location {
        for (ring, bounds) in rings(&self.polygon).zip(&self.bounds) {
            if !bounds.contains(p) {
                continue;
            }
            if ring
                .edges()
                .any(|(a, b)| point_to_segment_dist(p, &a, &b) <= self.tolerance)
            {
                return Location::Boundary;
            }
        }
        if !self.polygon.exterior().contains_point(p) {
            return Location::Exterior;
        }
        let in_hole = self
            .polygon
            .holes()
            .iter()
            .zip(&self.bounds[1..])
            .any(|(hole, bounds)| bounds.contains(p) && hole.contains_point(p));
        if in_hole {
            Location::Exterior
        } else {
            Location::Interior
        }
    }

    #[must_use]
    pub fn covers_point(&self, p: &Point2) -> bool {
        self.locate(p) != Location::Exterior
    }

    /// Returns `true` if every point of the segment `a`-`b` is covered.
    ///
    /// The segment is split wherever it meets a ring; the endpoints and the
    /// midpoint of each piece are then classified.
    #[must_use]
    pub fn covers_segment(&self, a: &Point2, b: &Point2) -> bool {
        if !self.covers_point(a) || !self.covers_point(b) {
            return false;
        }
        let d = b - a;
        let len_sq = d.norm_squared();
        let seg_bounds = Aabb::from_points(&[*a, *b])
            .map(|bb| bb.expanded(self.tolerance));

        let mut params = vec![0.0, 1.0];
        for (ring, bounds) in rings(&self.polygon).zip(&self.bounds) {
            if seg_bounds.is_some_and(|bb| !bb.intersects(bounds)) {
                continue;
            }
            for (p, q) in ring.edges() {
                if let Some((t, _)) = segment_segment_params(a, b, &p, &q) {
                    params.push(t);
                } else if len_sq > 0.0 {
                    // Parallel edge: split at its endpoints when they touch.
                    for v in [p, q] {
                        if point_to_segment_dist(&v, a, b) <= self.tolerance {
                            let t = (v - a).dot(&d) / len_sq;
                            params.push(t.clamp(0.0, 1.0));
                        }
                    }
                }
            }
        }
        params.sort_by(f64::total_cmp);

        params.windows(2).all(|w| {
            w[1] - w[0] <= MIN_INTERVAL || self.covers_point(&point_at(a, b, (w[0] + w[1]) * 0.5))
        })
    }

    /// Returns `true` if the closed triangle `(a, b, c)` is covered.
    ///
    /// All three sides must be covered and no ring vertex or ring edge
    /// midpoint may sit strictly inside the triangle, away from its sides.
    #[must_use]
    pub fn covers_triangle(&self, a: &Point2, b: &Point2, c: &Point2) -> bool {
        if !(self.covers_segment(a, b) && self.covers_segment(b, c) && self.covers_segment(c, a)) {
            return false;
        }
        let tri_bounds = Aabb::from_points(&[*a, *b, *c]);
        let pokes_in = |p: &Point2| {
            tri_bounds.is_some_and(|bb| bb.contains(p))
                && strictly_inside_triangle(p, a, b, c)
                && point_to_segment_dist(p, a, b) > self.tolerance
                && point_to_segment_dist(p, b, c) > self.tolerance
                && point_to_segment_dist(p, c, a) > self.tolerance
        };
        !rings(&self.polygon).any(|ring| {
            ring.edges()
                .any(|(p, q)| pokes_in(&p) || pokes_in(&nalgebra::center(&p, &q)))
        })
    }
}

fn rings(polygon: &Polygon) -> impl Iterator<Item = &Ring> {
    std::iter::once(polygon.exterior()).chain(polygon.holes())
}
