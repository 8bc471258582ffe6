use std::collections::HashSet;

use tracing::debug;

use crate::error::TriangulationError;
use crate::geometry::{PreparedPolygon, Ring};
use crate::math::angle::wedge_margin;
use crate::math::distance_2d::{distance_sq, point_to_segment_dist};
use crate::math::intersect_2d::segments_cross_properly;
use crate::math::{coord_key, near, Point2};

/// A possible bridge from a hole anchor to a shell vertex.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    dist_sq: f64,
    dy: f64,
    anchor: usize,
    target: Point2,
}

/// Splices every hole of a polygon into its exterior ring.
///
/// Each hole is connected to the growing ring by a bridge segment walked in
/// both directions, which yields a single degenerate ring that encloses the
/// same region. The polygon must already be normalized (clockwise exterior,
/// counter-clockwise holes).
pub(crate) struct HoleJoiner<'a> {
    prepared: &'a PreparedPolygon,
    ring: Vec<Point2>,
    bridges: Vec<(Point2, Point2)>,
}

impl<'a> HoleJoiner<'a> {
    pub(crate) fn new(prepared: &'a PreparedPolygon) -> Self {
        Self {
            prepared,
            ring: prepared.polygon().exterior().points().to_vec(),
            bridges: Vec::new(),
        }
    }

    /// Joins all holes and returns the combined ring.
    pub(crate) fn join(mut self) -> Result<Vec<Point2>, TriangulationError> {
        let prepared = self.prepared;
        let holes = prepared.polygon().holes();
        for index in join_order(holes) {
            self.join_hole(index, &holes[index])?;
        }
        Ok(self.ring)
    }

    fn join_hole(&mut self, index: usize, hole: &Ring) -> Result<(), TriangulationError> {
        let points = hole.points();
        let anchors = anchor_indices(points, self.prepared.tolerance());

        let chosen = self
            .candidates(points, &anchors)
            .into_iter()
            .find(|c| self.is_valid_bridge(&points[c.anchor], &c.target));
        let Some(chosen) = chosen else {
            let anchor = points[anchors.first().copied().unwrap_or(0)];
            return Err(TriangulationError::HoleJoinFailure {
                hole: index,
                x: anchor.x,
                y: anchor.y,
            });
        };

        let anchor = points[chosen.anchor];
        let position = self.attach_position(&chosen.target, &anchor);
        debug!(
            hole = index,
            anchor_x = anchor.x,
            anchor_y = anchor.y,
            x = chosen.target.x,
            y = chosen.target.y,
            "joined hole"
        );

        let n = points.len();
        let section = std::iter::once(chosen.target)
            .chain((0..=n).map(|k| points[(chosen.anchor + k) % n]));
        self.ring.splice(position..position, section);
        self.bridges.push((anchor, chosen.target));
        Ok(())
    }

    /// All anchor/shell-vertex pairs, nearest first.
    fn candidates(&self, hole: &[Point2], anchors: &[usize]) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for &anchor in anchors {
            let a = hole[anchor];
            for target in self.ring.iter().rev() {
                if !seen.insert((anchor, coord_key(target))) {
                    continue;
                }
                candidates.push(Candidate {
                    dist_sq: distance_sq(&a, target),
                    dy: (a.y - target.y).abs(),
                    anchor,
                    target: *target,
                });
            }
        }
        candidates.sort_by(|l, r| l.dist_sq.total_cmp(&r.dist_sq).then(l.dy.total_cmp(&r.dy)));
        candidates
    }

    fn is_valid_bridge(&self, anchor: &Point2, target: &Point2) -> bool {
        self.prepared.covers_segment(anchor, target)
            && !self.passes_through_vertex(anchor, target)
            && !self
                .bridges
                .iter()
                .any(|(a, b)| segments_cross_properly(anchor, target, a, b))
    }

    /// Whether a polygon vertex other than the endpoints lies on the bridge.
    ///
    /// Such a bridge runs along or touches another boundary, and the slit
    /// would overlap that boundary in the joined ring.
    fn passes_through_vertex(&self, anchor: &Point2, target: &Point2) -> bool {
        let tol = self.prepared.tolerance();
        let polygon = self.prepared.polygon();
        std::iter::once(polygon.exterior())
            .chain(polygon.holes())
            .flat_map(Ring::points)
            .any(|q| {
                !near(q, anchor, tol)
                    && !near(q, target, tol)
                    && point_to_segment_dist(q, anchor, target) < tol
            })
    }

    /// Picks which occurrence of `target` in the ring receives the hole.
    ///
    /// A coordinate can appear several times once earlier holes have been
    /// joined through it. The bridge must leave from the occurrence whose
    /// interior wedge it enters most centrally, otherwise the joined ring
    /// would cross itself.
    fn attach_position(&self, target: &Point2, anchor: &Point2) -> usize {
        let n = self.ring.len();
        (0..n)
            .filter(|&i| self.ring[i] == *target)
            .map(|i| {
                let prev = self.ring[(i + n - 1) % n];
                let next = self.ring[(i + 1) % n];
                (wedge_margin(&prev, target, &next, anchor), i)
            })
            .max_by(|l, r| l.0.total_cmp(&r.0).then(l.1.cmp(&r.1)))
            .map_or(0, |(_, i)| i)
    }
}

/// Holes sorted left to right by their bounding box, upper first on ties.
fn join_order(holes: &[Ring]) -> Vec<usize> {
    let bounds: Vec<_> = holes.iter().map(Ring::aabb).collect();
    let mut order: Vec<usize> = (0..holes.len()).collect();
    order.sort_by(|&l, &r| {
        bounds[l]
            .min
            .x
            .total_cmp(&bounds[r].min.x)
            .then(bounds[r].min.y.total_cmp(&bounds[l].min.y))
            .then(l.cmp(&r))
    });
    order
}

/// Hole vertices lying on the hole's leftmost vertical line.
fn anchor_indices(hole: &[Point2], tolerance: f64) -> Vec<usize> {
    let min_x = hole.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    (0..hole.len())
        .filter(|&i| (hole[i].x - min_x).abs() < tolerance)
        .collect()
}
