mod ear_clipper;
mod hole_joiner;
pub mod shell;

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::debug;

use crate::error::{Result, TriangulationError};
use crate::geometry::{Polygon, PreparedPolygon};
use crate::math::polygon_2d::triangle_signed_area;
use crate::math::{coord_key, Point2, TOLERANCE};
use crate::mesh::{DelaunayImprover, ImproveReport, TriMesh};

use ear_clipper::EarClipper;
use hole_joiner::HoleJoiner;

/// How candidate ears are validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EarTest {
    /// Checks only the vertices still on the shell. Fast, and sufficient for
    /// valid input.
    #[default]
    Local,
    /// Runs the shell check and also asks the polygon whether it covers the
    /// ear. Slower, tolerant of shells whose local geometry is ambiguous.
    Covering,
}

/// Parameters controlling triangulation.
#[derive(Debug, Clone, Copy)]
pub struct TriangulationParams {
    /// Distance below which coordinates are treated as coincident.
    pub tolerance: f64,
    /// Ear validation strategy.
    pub ear_test: EarTest,
    /// Run Delaunay edge flipping after clipping.
    pub improve: bool,
    /// Upper bound on improvement passes.
    pub max_improve_passes: usize,
}

impl Default for TriangulationParams {
    fn default() -> Self {
        Self {
            tolerance: TOLERANCE,
            ear_test: EarTest::Local,
            improve: false,
            max_improve_passes: DelaunayImprover::DEFAULT_MAX_PASSES,
        }
    }
}

/// An output triangle. Vertices are clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Point2; 3],
}

impl Triangle {
    #[must_use]
    pub fn new(a: Point2, b: Point2, c: Point2) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Negative for clockwise triangles.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        let [a, b, c] = &self.vertices;
        triangle_signed_area(a, b, c)
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    #[must_use]
    pub fn centroid(&self) -> Point2 {
        let [a, b, c] = self.vertices;
        Point2::from((a.coords + b.coords + c.coords) / 3.0)
    }
}

/// Result of triangulating one polygon.
#[derive(Debug, Clone, Default)]
pub struct Triangulation {
    /// Triangles in emission order.
    pub triangles: Vec<Triangle>,
    /// Present when the Delaunay improvement pass ran.
    pub improvement: Option<ImproveReport>,
}

impl Triangulation {
    /// Sum of triangle areas.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.triangles.iter().map(Triangle::area).sum()
    }

    /// Builds the adjacency mesh of the triangles.
    #[must_use]
    pub fn to_mesh(&self) -> TriMesh {
        TriMesh::from_triangles(&self.triangles)
    }

    /// Shared-vertex form for rendering.
    #[must_use]
    pub fn to_indexed_mesh(&self) -> IndexedMesh {
        IndexedMesh::from_triangles(&self.triangles)
    }
}

/// A triangle list with deduplicated vertices.
#[derive(Debug, Clone, Default)]
pub struct IndexedMesh {
    /// Vertex positions.
    pub vertices: Vec<Point2>,
    /// Triangle indices (each triple defines a clockwise triangle).
    pub indices: Vec<[u32; 3]>,
}

impl IndexedMesh {
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_triangles(triangles: &[Triangle]) -> Self {
        let mut mesh = Self::default();
        let mut lookup: HashMap<[u64; 2], u32> = HashMap::new();
        for t in triangles {
            let idx = t.vertices.map(|v| {
                *lookup.entry(coord_key(&v)).or_insert_with(|| {
                    mesh.vertices.push(v);
                    (mesh.vertices.len() - 1) as u32
                })
            });
            mesh.indices.push(idx);
        }
        mesh
    }
}

/// Triangulates a polygon with holes.
pub struct Triangulate<'a> {
    polygon: &'a Polygon,
    params: TriangulationParams,
}

impl<'a> Triangulate<'a> {
    /// Creates a new `Triangulate` operation with default parameters.
    #[must_use]
    pub fn new(polygon: &'a Polygon) -> Self {
        Self {
            polygon,
            params: TriangulationParams::default(),
        }
    }

    /// Sets custom triangulation parameters.
    #[must_use]
    pub fn with_params(mut self, params: TriangulationParams) -> Self {
        self.params = params;
        self
    }

    /// Enables or disables the Delaunay improvement pass.
    #[must_use]
    pub fn improve(mut self, improve: bool) -> Self {
        self.params.improve = improve;
        self
    }

    /// Returns the single ring obtained by bridging every hole into the
    /// normalized exterior.
    ///
    /// # Errors
    ///
    /// Returns `TriangulationError::HoleJoinFailure` if a hole cannot be
    /// bridged.
    pub fn joined_ring(&self) -> Result<Vec<Point2>> {
        let polygon = self.polygon.normalized();
        let prepared = PreparedPolygon::new(&polygon, self.params.tolerance);
        Ok(join_holes(&prepared)?)
    }

    /// Executes the triangulation.
    ///
    /// # Errors
    ///
    /// Returns `TriangulationError::HoleJoinFailure` if a hole cannot be
    /// bridged and `TriangulationError::NoValidEarFound` if the ring cannot be
    /// clipped, which indicates invalid input.
    pub fn execute(&self) -> Result<Triangulation> {
        let polygon = self.polygon.normalized();
        let prepared = PreparedPolygon::new(&polygon, self.params.tolerance);
        let ring = join_holes(&prepared)?;
        let ring_len = ring.len();

        let clipped =
            EarClipper::new(ring, &prepared, self.params.ear_test, self.params.tolerance).clip()?;
        debug_assert_eq!(clipped.triangles.len() + clipped.pruned, ring_len - 2);
        let mut triangulation = Triangulation {
            triangles: clipped.triangles,
            improvement: None,
        };

        if self.params.improve {
            let mut mesh = triangulation.to_mesh();
            let report = DelaunayImprover::new(self.params.max_improve_passes).improve(&mut mesh);
            triangulation.triangles = mesh.to_triangles();
            triangulation.improvement = Some(report);
        }

        debug!(
            holes = polygon.holes().len(),
            ring = ring_len,
            pruned = clipped.pruned,
            triangles = triangulation.triangles.len(),
            "triangulated polygon"
        );
        Ok(triangulation)
    }
}

fn join_holes(
    prepared: &PreparedPolygon,
) -> std::result::Result<Vec<Point2>, TriangulationError> {
    if prepared.polygon().holes().is_empty() {
        return Ok(prepared.polygon().exterior().points().to_vec());
    }
    HoleJoiner::new(prepared).join()
}

/// Triangulates several independent polygons in parallel.
pub struct TriangulateAll<'a> {
    polygons: &'a [Polygon],
    params: TriangulationParams,
}

impl<'a> TriangulateAll<'a> {
    /// Creates a new `TriangulateAll` operation with default parameters.
    #[must_use]
    pub fn new(polygons: &'a [Polygon]) -> Self {
        Self {
            polygons,
            params: TriangulationParams::default(),
        }
    }

    /// Sets custom triangulation parameters, shared by every polygon.
    #[must_use]
    pub fn with_params(mut self, params: TriangulationParams) -> Self {
        self.params = params;
        self
    }

    /// Triangulates each polygon, keeping results in input order.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by any polygon.
    pub fn execute_each(&self) -> Result<Vec<Triangulation>> {
        self.polygons
            .par_iter()
            .map(|polygon| Triangulate::new(polygon).with_params(self.params).execute())
            .collect()
    }

    /// Triangulates every polygon and concatenates the triangles in input
    /// order.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by any polygon.
    pub fn execute(&self) -> Result<Vec<Triangle>> {
        Ok(self
            .execute_each()?
            .into_iter()
            .flat_map(|t| t.triangles)
            .collect())
    }
}

/// Triangulates the region inside `exterior` and outside every hole.
///
/// Rings may be given in either winding, closed or open.
///
/// # Errors
///
/// Returns a `GeometryError` for malformed rings and a `TriangulationError`
/// when the polygon cannot be triangulated.
pub fn triangulate(
    exterior: &[Point2],
    holes: &[Vec<Point2>],
    improve: bool,
) -> Result<Vec<Triangle>> {
    let polygon = Polygon::from_points(exterior, holes)?;
    Ok(Triangulate::new(&polygon).improve(improve).execute()?.triangles)
}
