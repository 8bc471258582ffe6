use tracing::trace;

use super::shell::PolygonShell;
use super::{EarTest, Triangle};
use crate::error::TriangulationError;
use crate::geometry::PreparedPolygon;
use crate::math::angle::angle_between_oriented;
use crate::math::predicates::{
    inside_or_on_triangle, is_collinear, on_ray, orientation, strictly_inside_triangle,
    Orientation,
};
use crate::math::Point2;

/// Triangles cut from a ring, plus bookkeeping for diagnostics.
#[derive(Debug, Default)]
pub(crate) struct Clipped {
    pub(crate) triangles: Vec<Triangle>,
    pub(crate) pruned: usize,
}

/// Repeatedly cuts convex ears off a clockwise ring until it is exhausted.
pub(crate) struct EarClipper<'a> {
    shell: PolygonShell,
    prepared: &'a PreparedPolygon,
    ear_test: EarTest,
    tolerance: f64,
}

impl<'a> EarClipper<'a> {
    pub(crate) fn new(
        ring: Vec<Point2>,
        prepared: &'a PreparedPolygon,
        ear_test: EarTest,
        tolerance: f64,
    ) -> Self {
        Self {
            shell: PolygonShell::new(ring),
            prepared,
            ear_test,
            tolerance,
        }
    }

    /// Clips the ring. Emitted triangles are clockwise.
    pub(crate) fn clip(mut self) -> Result<Clipped, TriangulationError> {
        let mut out = Clipped {
            triangles: Vec::with_capacity(self.shell.len().saturating_sub(2)),
            pruned: 0,
        };
        if self.shell.len() < 3 {
            return Ok(out);
        }

        let mut scans = 0;
        loop {
            let mut corner = self.shell.corner();
            let mut skipped = 0;
            while !self.is_convex(&corner) {
                if is_collinear(&corner[0], &corner[1], &corner[2], self.tolerance) {
                    trace!(x = corner[1].x, y = corner[1].y, "pruned collinear vertex");
                    self.shell.remove();
                    out.pruned += 1;
                    if self.shell.len() < 3 {
                        return Ok(out);
                    }
                    skipped = 0;
                }
                skipped += 1;
                if skipped > self.shell.len() + 1 {
                    return Err(self.no_ear());
                }
                self.shell.advance(true);
                corner = self.shell.corner();
            }

            scans += 1;
            if scans > 2 * self.shell.len() {
                return Err(self.no_ear());
            }

            if self.is_valid_ear() {
                out.triangles.push(Triangle::new(corner[0], corner[1], corner[2]));
                self.shell.remove();
                scans = 0;
                if self.shell.len() < 3 {
                    return Ok(out);
                }
            } else {
                self.shell.advance(true);
            }
        }
    }

    /// Clockwise and not prunable as collinear.
    fn is_convex(&self, corner: &[Point2; 3]) -> bool {
        orientation(&corner[0], &corner[1], &corner[2]) == Orientation::Clockwise
            && !is_collinear(&corner[0], &corner[1], &corner[2], self.tolerance)
    }

    fn no_ear(&self) -> TriangulationError {
        TriangulationError::NoValidEarFound {
            remaining: self.shell.len(),
        }
    }

    fn is_valid_ear(&self) -> bool {
        match self.ear_test {
            EarTest::Local => self.is_valid_ear_local(),
            EarTest::Covering => self.is_valid_ear_covering(),
        }
    }

    /// The shell check, plus containment in the input polygon. The polygon
    /// does not shrink as ears are cut, so containment alone would accept
    /// ears overlapping triangles already emitted.
    fn is_valid_ear_covering(&self) -> bool {
        let [c0, c1, c2] = self.shell.corner();
        self.is_valid_ear_local()
            && self.prepared.covers_segment(&c0, &c2)
            && self.prepared.covers_triangle(&c0, &c1, &c2)
    }

    /// Checks the candidate ear against the remaining shell only.
    ///
    /// A vertex strictly inside the ear invalidates it. A vertex on one of
    /// the ear's sides, or one that repeats a corner (bridges and pinch points
    /// produce these), is judged by its two incident ring edges: the ear is
    /// rejected when either edge enters the ear, or when a repeated corner
    /// closes the wedge from the outside.
    fn is_valid_ear_local(&self) -> bool {
        let ear = self.shell.corner();
        let [c0, c1, c2] = ear;
        let wedges = [(c2, c0, c1), (c0, c1, c2), (c1, c2, c0)];
        let spans = wedges.map(|(from, tail, to)| angle_between_oriented(&from, &tail, &to));

        for (prev, cur) in self.shell.walk() {
            let v = self.shell.coordinate(cur);
            let prev = self.shell.coordinate(prev);
            let next = self.shell.coordinate(self.shell.successor(cur));
            match wedges.iter().position(|(_, tail, _)| *tail == v) {
                Some(k) => {
                    let (from, tail, to) = wedges[k];
                    let span = spans[k];
                    let within = |a: f64| a > 0.0 && a < span;
                    let outgoing = angle_between_oriented(&from, &tail, &next);
                    let incoming = angle_between_oriented(&from, &tail, &prev);
                    let closes = on_ray(&tail, &from, &next) && on_ray(&tail, &to, &prev);
                    if within(outgoing) || within(incoming) || closes {
                        return false;
                    }
                }
                None => {
                    if strictly_inside_triangle(&v, &c0, &c1, &c2) {
                        return false;
                    }
                    if inside_or_on_triangle(&v, &c0, &c1, &c2)
                        && enters_from_side(&v, [&prev, &next], &ear)
                    {
                        return false;
                    }
                }
            }
        }
        true
    }
}

/// For a vertex lying on a side of `ear`, whether one of its neighbors sits
/// on the ear's side of that edge, so the ring edge runs into the ear.
fn enters_from_side(v: &Point2, neighbors: [&Point2; 2], ear: &[Point2; 3]) -> bool {
    for k in 0..3 {
        let (a, b, opposite) = (&ear[k], &ear[(k + 1) % 3], &ear[(k + 2) % 3]);
        if orientation(a, b, v) == Orientation::Collinear {
            let inward = orientation(a, b, opposite);
            return neighbors.iter().any(|w| orientation(a, b, w) == inward);
        }
    }
    false
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Polygon, Ring};
    use crate::math::TOLERANCE;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn clip_ring(coords: &[(f64, f64)], ear_test: EarTest) -> Result<Clipped, TriangulationError> {
        let ring = Ring::from_coords(coords).unwrap().normalized(true);
        let prepared = PreparedPolygon::new(&Polygon::new(ring.clone(), Vec::new()), TOLERANCE);
        EarClipper::new(ring.points().to_vec(), &prepared, ear_test, TOLERANCE).clip()
    }

    fn area(triangles: &[Triangle]) -> f64 {
        triangles.iter().map(Triangle::area).sum()
    }

    #[test]
    fn single_triangle() {
        for ear_test in [EarTest::Local, EarTest::Covering] {
            let out = clip_ring(&[(10.0, 20.0), (10.0, 10.0), (20.0, 20.0)], ear_test).unwrap();
            assert_eq!(out.triangles.len(), 1);
            assert_eq!(
                out.triangles[0].vertices,
                [p(10.0, 10.0), p(10.0, 20.0), p(20.0, 20.0)]
            );
        }
    }

    #[test]
    fn rectangle_emission_order() {
        let out = clip_ring(
            &[(10.0, 20.0), (10.0, 10.0), (30.0, 10.0), (30.0, 20.0)],
            EarTest::Local,
        )
        .unwrap();
        let tris: Vec<_> = out.triangles.iter().map(|t| t.vertices).collect();
        assert_eq!(
            tris,
            vec![
                [p(10.0, 10.0), p(10.0, 20.0), p(30.0, 20.0)],
                [p(10.0, 10.0), p(30.0, 20.0), p(30.0, 10.0)],
            ]
        );
    }

    #[test]
    fn convex_quad() {
        for ear_test in [EarTest::Local, EarTest::Covering] {
            let out = clip_ring(&[(3.0, -1.0), (2.0, 2.0), (5.0, 3.0), (6.0, 0.0)], ear_test)
                .unwrap();
            let tris: Vec<_> = out.triangles.iter().map(|t| t.vertices).collect();
            assert_eq!(
                tris,
                vec![
                    [p(2.0, 2.0), p(5.0, 3.0), p(6.0, 0.0)],
                    [p(2.0, 2.0), p(6.0, 0.0), p(3.0, -1.0)],
                ]
            );
        }
    }

    #[test]
    fn emitted_triangles_are_clockwise() {
        let out = clip_ring(
            &[(0.0, 0.0), (0.0, 10.0), (5.0, 10.0), (5.0, 5.0), (10.0, 5.0), (10.0, 0.0)],
            EarTest::Local,
        )
        .unwrap();
        assert_eq!(out.triangles.len(), 4);
        assert!(out.triangles.iter().all(|t| t.signed_area() < 0.0));
        assert!((area(&out.triangles) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn collinear_vertices_are_pruned() {
        let out = clip_ring(
            &[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)],
            EarTest::Local,
        )
        .unwrap();
        assert_eq!(out.pruned, 1);
        assert_eq!(out.triangles.len(), 2);
        assert!((area(&out.triangles) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn joined_ring_with_repeated_vertices() {
        let ring: Vec<Point2> = [
            (0.0, 0.0),
            (0.0, 5.0),
            (3.0, 5.0),
            (5.0, 3.0),
            (7.0, 5.0),
            (5.0, 7.0),
            (3.0, 5.0),
            (0.0, 5.0),
            (5.0, 10.0),
            (10.0, 5.0),
            (10.0, 0.0),
        ]
        .iter()
        .map(|&(x, y)| p(x, y))
        .collect();
        let poly = Polygon::from_coords(
            &[(0.0, 0.0), (0.0, 5.0), (5.0, 10.0), (10.0, 5.0), (10.0, 0.0)],
            &[&[(5.0, 3.0), (7.0, 5.0), (5.0, 7.0), (3.0, 5.0)]],
        )
        .unwrap();
        let prepared = PreparedPolygon::new(&poly, TOLERANCE);

        let local = EarClipper::new(ring.clone(), &prepared, EarTest::Local, TOLERANCE)
            .clip()
            .unwrap();
        let tris: Vec<_> = local.triangles.iter().map(|t| t.vertices).collect();
        assert_eq!(
            tris,
            vec![
                [p(0.0, 0.0), p(0.0, 5.0), p(3.0, 5.0)],
                [p(0.0, 0.0), p(3.0, 5.0), p(5.0, 3.0)],
                [p(5.0, 7.0), p(3.0, 5.0), p(0.0, 5.0)],
                [p(5.0, 7.0), p(0.0, 5.0), p(5.0, 10.0)],
                [p(5.0, 7.0), p(5.0, 10.0), p(10.0, 5.0)],
                [p(10.0, 5.0), p(10.0, 0.0), p(0.0, 0.0)],
                [p(10.0, 5.0), p(0.0, 0.0), p(5.0, 3.0)],
                [p(10.0, 5.0), p(5.0, 3.0), p(7.0, 5.0)],
                [p(10.0, 5.0), p(7.0, 5.0), p(5.0, 7.0)],
            ]
        );

        let covering = EarClipper::new(ring, &prepared, EarTest::Covering, TOLERANCE)
            .clip()
            .unwrap();
        assert_eq!(covering.triangles.len(), 9);
        assert!((area(&covering.triangles) - 67.0).abs() < 1e-9);
    }

    #[test]
    fn ring_edge_entering_from_an_ear_side() {
        let ear = [p(9.0, 1.0), p(9.0, 9.0), p(10.5, 9.0)];
        let v = p(9.0, 2.5);
        assert!(enters_from_side(&v, [&p(9.0, 1.0), &p(9.5, 2.5)], &ear));
        assert!(!enters_from_side(&v, [&p(9.0, 1.0), &p(8.5, 2.5)], &ear));
        assert!(!enters_from_side(&v, [&p(9.0, 0.0), &p(9.0, 4.0)], &ear));
    }

    #[test]
    fn hole_vertex_on_a_diagonal_blocks_the_ear() {
        let poly = Polygon::from_coords(
            &[(0.0, 0.0), (0.0, 12.0), (12.0, 12.0), (12.0, 0.0)],
            &[
                &[(9.0, 1.0), (9.0, 2.5), (9.5, 2.5), (9.5, 1.0)],
                &[(9.0, 9.0), (9.0, 10.5), (10.5, 9.0)],
            ],
        )
        .unwrap()
        .normalized();
        let prepared = PreparedPolygon::new(&poly, TOLERANCE);
        let ring = vec![
            p(0.0, 0.0),
            p(0.0, 12.0),
            p(12.0, 12.0),
            p(9.0, 10.5),
            p(9.0, 9.0),
            p(10.5, 9.0),
            p(9.0, 10.5),
            p(12.0, 12.0),
            p(12.0, 0.0),
            p(9.0, 1.0),
            p(9.5, 1.0),
            p(9.5, 2.5),
            p(9.0, 2.5),
            p(9.0, 1.0),
            p(12.0, 0.0),
        ];
        for ear_test in [EarTest::Local, EarTest::Covering] {
            let out = EarClipper::new(ring.clone(), &prepared, ear_test, TOLERANCE)
                .clip()
                .unwrap();
            assert_eq!(out.triangles.len(), 12);
            assert_eq!(out.pruned, 1);
            assert!((area(&out.triangles) - 142.125).abs() < 1e-9);
        }
    }

    #[test]
    fn self_crossing_ring_has_no_valid_ear() {
        for ear_test in [EarTest::Local, EarTest::Covering] {
            let err = clip_ring(&[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 2.0)], ear_test)
                .unwrap_err();
            assert!(matches!(err, TriangulationError::NoValidEarFound { .. }));
        }
    }

    #[test]
    fn short_ring_yields_nothing() {
        let ring = vec![p(0.0, 0.0), p(1.0, 1.0)];
        let poly = Polygon::from_coords(&[(0.0, 0.0), (0.0, 1.0), (1.0, 0.0)], &[]).unwrap();
        let prepared = PreparedPolygon::new(&poly, TOLERANCE);
        let out = EarClipper::new(ring, &prepared, EarTest::Local, TOLERANCE)
            .clip()
            .unwrap();
        assert!(out.triangles.is_empty());
    }
}
