pub mod error;
pub mod geometry;
pub mod math;
pub mod mesh;
pub mod triangulate;

pub use error::{PolytriError, Result};
pub use geometry::{Polygon, Ring};
pub use triangulate::{
    triangulate, EarTest, Triangle, Triangulate, TriangulateAll, Triangulation,
    TriangulationParams,
};
