use tracing::{debug, warn};

use super::{TriMesh, TriangleId};
use crate::math::predicates::{in_circle, orientation, Orientation};
use crate::math::Point2;

/// Flip counts of a [`DelaunayImprover`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImproveReport {
    /// Number of flips made in each pass, in order.
    pub flips_per_pass: Vec<usize>,
    /// `true` if the last pass made no flips.
    pub converged: bool,
}

impl ImproveReport {
    #[must_use]
    pub fn total_flips(&self) -> usize {
        self.flips_per_pass.iter().sum()
    }

    #[must_use]
    pub fn passes(&self) -> usize {
        self.flips_per_pass.len()
    }
}

/// Improves triangle shape by flipping diagonals that fail the empty
/// circumcircle test.
///
/// Only the diagonal of a strictly convex quadrilateral is flipped, so the
/// covered region and the boundary never change.
#[derive(Debug, Clone, Copy)]
pub struct DelaunayImprover {
    max_passes: usize,
}

impl Default for DelaunayImprover {
    fn default() -> Self {
        Self {
            max_passes: Self::DEFAULT_MAX_PASSES,
        }
    }
}

impl DelaunayImprover {
    pub const DEFAULT_MAX_PASSES: usize = 20;

    #[must_use]
    pub fn new(max_passes: usize) -> Self {
        Self { max_passes }
    }

    /// Sweeps all adjacent pairs, flipping where needed, until a pass makes
    /// no flip or the pass cap is reached.
    pub fn improve(&self, mesh: &mut TriMesh) -> ImproveReport {
        let ids = mesh.ids().to_vec();
        let mut report = ImproveReport::default();

        for pass in 1..=self.max_passes {
            let mut flips = 0;
            for &id in &ids {
                for edge in 0..3 {
                    if improve_pair(mesh, id, edge) {
                        flips += 1;
                    }
                }
            }
            report.flips_per_pass.push(flips);
            debug!(pass, flips, "delaunay improvement pass");
            if flips == 0 {
                report.converged = true;
                break;
            }
        }

        if !report.converged {
            warn!(
                passes = self.max_passes,
                "delaunay improvement stopped before converging"
            );
        }
        report
    }
}

/// Returns `true` if no shared edge of the mesh would be flipped.
#[must_use]
pub fn is_delaunay(mesh: &TriMesh) -> bool {
    mesh.ids().iter().all(|&id| {
        (0..3).all(|edge| match Quad::across(mesh, id, edge) {
            Some(quad) => !(quad.is_strictly_convex() && quad.violates_delaunay()),
            None => true,
        })
    })
}

fn improve_pair(mesh: &mut TriMesh, id: TriangleId, edge: usize) -> bool {
    let Some(quad) = Quad::across(mesh, id, edge) else {
        return false;
    };
    if !quad.is_strictly_convex() || !quad.violates_delaunay() {
        return false;
    }
    mesh.flip(id, edge).is_ok()
}

/// Two triangles sharing the edge `adj0`-`adj1`, with apexes `opp0` and `opp1`.
#[derive(Debug, Clone, Copy)]
struct Quad {
    adj0: Point2,
    adj1: Point2,
    opp0: Point2,
    opp1: Point2,
}

impl Quad {
    fn across(mesh: &TriMesh, id: TriangleId, edge: usize) -> Option<Self> {
        let t0 = mesh.triangle(id).ok()?;
        let t1 = mesh.triangle(t0.neighbors[edge]?).ok()?;
        let j = t1.neighbor_index(id)?;
        Some(Self {
            adj0: t0.vertices[edge],
            adj1: t0.vertices[(edge + 1) % 3],
            opp0: t0.vertices[(edge + 2) % 3],
            opp1: t1.vertices[(j + 2) % 3],
        })
    }

    /// The apex diagonal separates the shared edge's endpoints.
    fn is_strictly_convex(&self) -> bool {
        let o0 = orientation(&self.opp0, &self.opp1, &self.adj0);
        o0 != Orientation::Collinear
            && orientation(&self.opp0, &self.opp1, &self.adj1) == o0.reversed()
    }

    fn violates_delaunay(&self) -> bool {
        in_circle(&self.opp0, &self.adj0, &self.adj1, &self.opp1)
            || in_circle(&self.opp1, &self.adj1, &self.adj0, &self.opp0)
    }
}
