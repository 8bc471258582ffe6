mod improve;

pub use improve::{is_delaunay, DelaunayImprover, ImproveReport};

use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};

use crate::error::MeshError;
use crate::math::predicates::{inside_or_on_triangle, orientation, Orientation};
use crate::math::{coord_key, lexicographic, Point2};
use crate::triangulate::Triangle;

new_key_type! {
    /// Handle to a triangle in a [`TriMesh`].
    pub struct TriangleId;
}

/// A mesh triangle with its adjacency.
///
/// Vertices are clockwise. `neighbors[i]` is the triangle across the edge
/// from `vertices[i]` to `vertices[(i + 1) % 3]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleData {
    pub vertices: [Point2; 3],
    pub neighbors: [Option<TriangleId>; 3],
}

impl TriangleData {
    /// Position of `other` in the neighbor slots.
    #[must_use]
    pub fn neighbor_index(&self, other: TriangleId) -> Option<usize> {
        self.neighbors.iter().position(|n| *n == Some(other))
    }
}

/// Orientation-independent identity of an edge, built from exact coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeKey([[u64; 2]; 2]);

impl EdgeKey {
    #[must_use]
    pub fn new(a: &Point2, b: &Point2) -> Self {
        if lexicographic(a, b).is_le() {
            Self([coord_key(a), coord_key(b)])
        } else {
            Self([coord_key(b), coord_key(a)])
        }
    }
}

/// Arena of triangles linked through shared edges.
///
/// Triangles are addressed by generational [`TriangleId`] handles and keep
/// their insertion order.
#[derive(Debug, Default)]
pub struct TriMesh {
    triangles: SlotMap<TriangleId, TriangleData>,
    order: Vec<TriangleId>,
}

impl TriMesh {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mesh, linking triangles that share an edge.
    #[must_use]
    pub fn from_triangles(triangles: &[Triangle]) -> Self {
        let mut builder = TriMeshBuilder::default();
        for t in triangles {
            builder.add(t.vertices);
        }
        builder.finish()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Triangle handles in insertion order.
    #[must_use]
    pub fn ids(&self) -> &[TriangleId] {
        &self.order
    }

    /// Returns the triangle data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns `MeshError::TriangleNotFound` for a stale or foreign handle.
    pub fn triangle(&self, id: TriangleId) -> Result<&TriangleData, MeshError> {
        self.triangles.get(id).ok_or(MeshError::TriangleNotFound)
    }

    fn triangle_mut(&mut self, id: TriangleId) -> Result<&mut TriangleData, MeshError> {
        self.triangles.get_mut(id).ok_or(MeshError::TriangleNotFound)
    }

    /// Iterates triangles in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (TriangleId, &TriangleData)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.triangles.get(id).map(|t| (id, t)))
    }

    /// Copies the triangles out in insertion order.
    #[must_use]
    pub fn to_triangles(&self) -> Vec<Triangle> {
        self.iter()
            .map(|(_, t)| Triangle::new(t.vertices[0], t.vertices[1], t.vertices[2]))
            .collect()
    }

    /// Returns `true` if every neighbor link is mirrored by the neighbor.
    #[must_use]
    pub fn is_adjacency_symmetric(&self) -> bool {
        self.iter().all(|(id, t)| {
            t.neighbors.iter().flatten().all(|&n| {
                self.triangles
                    .get(n)
                    .is_some_and(|other| other.neighbor_index(id).is_some())
            })
        })
    }

    /// Replaces the diagonal shared by `t0` (at edge `edge`) and its neighbor
    /// with the other diagonal of their quadrilateral.
    ///
    /// Both triangles keep their handles and stay clockwise; outer neighbors
    /// are relinked. Returns the neighbor's handle.
    ///
    /// # Errors
    ///
    /// Returns `MeshError::NotAdjacent` if there is no triangle across the
    /// edge, or `MeshError::TriangleNotFound` for a stale handle.
    pub fn flip(&mut self, t0: TriangleId, edge: usize) -> Result<TriangleId, MeshError> {
        let first = self.triangle(t0)?.clone();
        let t1 = first.neighbors[edge % 3].ok_or(MeshError::NotAdjacent)?;
        let second = self.triangle(t1)?.clone();
        let j = second.neighbor_index(t0).ok_or(MeshError::NotAdjacent)?;

        let i = edge % 3;
        let adj0 = first.vertices[i];
        let adj1 = first.vertices[(i + 1) % 3];
        let opp0 = first.vertices[(i + 2) % 3];
        let opp1 = second.vertices[(j + 2) % 3];

        let na = first.neighbors[(i + 1) % 3];
        let nb = first.neighbors[(i + 2) % 3];
        let nc = second.neighbors[(j + 1) % 3];
        let nd = second.neighbors[(j + 2) % 3];

        *self.triangle_mut(t0)? = TriangleData {
            vertices: [opp0, adj0, opp1],
            neighbors: [nb, nc, Some(t1)],
        };
        *self.triangle_mut(t1)? = TriangleData {
            vertices: [opp1, adj1, opp0],
            neighbors: [nd, na, Some(t0)],
        };
        if let Some(nc) = nc {
            self.relink(nc, t1, t0)?;
        }
        if let Some(na) = na {
            self.relink(na, t0, t1)?;
        }
        Ok(t1)
    }

    fn relink(&mut self, id: TriangleId, from: TriangleId, to: TriangleId) -> Result<(), MeshError> {
        let t = self.triangle_mut(id)?;
        let slot = t.neighbor_index(from).ok_or(MeshError::NotAdjacent)?;
        t.neighbors[slot] = Some(to);
        Ok(())
    }

    /// Finds a triangle containing `p`, walking neighbor links from `start`.
    ///
    /// Falls back to scanning every triangle when the walk leaves the mesh
    /// or does not settle. Points on a shared edge may resolve to either side.
    #[must_use]
    pub fn locate(&self, p: &Point2, start: Option<TriangleId>) -> Option<TriangleId> {
        let mut current = start
            .filter(|id| self.triangles.contains_key(*id))
            .or_else(|| self.order.first().copied())?;

        // A straight walk visits each triangle at most once.
        for _ in 0..=self.len() {
            let t = &self.triangles[current];
            let exit = (0..3).find(|&i| {
                orientation(&t.vertices[i], &t.vertices[(i + 1) % 3], p)
                    == Orientation::CounterClockwise
            });
            match exit {
                None => return Some(current),
                Some(i) => match t.neighbors[i] {
                    Some(next) => current = next,
                    None => break,
                },
            }
        }
        self.iter()
            .find(|(_, t)| inside_or_on_triangle(p, &t.vertices[0], &t.vertices[1], &t.vertices[2]))
            .map(|(id, _)| id)
    }
}

/// Incrementally assembles a [`TriMesh`].
///
/// Each new triangle is linked to an earlier one through any edge they share.
/// Edges still unmatched after the last insertion are boundary edges.
#[derive(Debug, Default)]
pub struct TriMeshBuilder {
    mesh: TriMesh,
    open_edges: HashMap<EdgeKey, (TriangleId, usize)>,
}

impl TriMeshBuilder {
    /// Inserts a clockwise triangle and returns its handle.
    pub fn add(&mut self, vertices: [Point2; 3]) -> TriangleId {
        let id = self.mesh.triangles.insert(TriangleData {
            vertices,
            neighbors: [None; 3],
        });
        self.mesh.order.push(id);

        for i in 0..3 {
            let key = EdgeKey::new(&vertices[i], &vertices[(i + 1) % 3]);
            match self.open_edges.remove(&key) {
                Some((other, j)) => {
                    self.mesh.triangles[other].neighbors[j] = Some(id);
                    self.mesh.triangles[id].neighbors[i] = Some(other);
                }
                None => {
                    self.open_edges.insert(key, (id, i));
                }
            }
        }
        id
    }

    /// Number of edges not yet shared by two triangles.
    #[must_use]
    pub fn open_edge_count(&self) -> usize {
        self.open_edges.len()
    }

    #[must_use]
    pub fn finish(self) -> TriMesh {
        self.mesh
    }
}

/// Point location that starts each walk at the previous answer.
///
/// Efficient for spatially coherent query sequences.
#[derive(Debug)]
pub struct TriangleLocator<'a> {
    mesh: &'a TriMesh,
    last: Option<TriangleId>,
}

impl<'a> TriangleLocator<'a> {
    #[must_use]
    pub fn new(mesh: &'a TriMesh) -> Self {
        Self { mesh, last: None }
    }

    pub fn locate(&mut self, p: &Point2) -> Option<TriangleId> {
        let found = self.mesh.locate(p, self.last)?;
        self.last = Some(found);
        Some(found)
    }
}
