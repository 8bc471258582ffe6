use thiserror::Error;

/// Top-level error type for the triangulation crate.
#[derive(Debug, Error)]
pub enum PolytriError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Triangulation(#[from] TriangulationError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Errors raised while validating input rings and polygons.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("ring has {count} distinct vertices, at least 3 are required")]
    TooFewPoints { count: usize },

    #[error("non-finite coordinate ({x}, {y})")]
    NonFinite { x: f64, y: f64 },

    #[error("ring encloses zero area")]
    ZeroArea,
}

/// Errors raised by hole joining and ear clipping.
#[derive(Debug, Error)]
pub enum TriangulationError {
    /// No bridge from the hole's anchor vertices to the shell was covered by
    /// the polygon.
    #[error("unable to join hole {hole} at ({x}, {y}) to the shell")]
    HoleJoinFailure { hole: usize, x: f64, y: f64 },

    /// The clipper scanned the whole ring without finding a clippable ear.
    #[error("no valid ear found, {remaining} vertices left in the shell")]
    NoValidEarFound { remaining: usize },
}

/// Errors related to the triangle mesh arena.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("triangle not found in mesh")]
    TriangleNotFound,

    #[error("triangles do not share an edge")]
    NotAdjacent,
}

/// Convenience type alias for results using [`PolytriError`].
pub type Result<T> = std::result::Result<T, PolytriError>;
