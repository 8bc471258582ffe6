pub mod polygon;
pub mod prepared;
pub mod ring;

pub use polygon::Polygon;
pub use prepared::{Location, PreparedPolygon};
pub use ring::{Aabb, Ring};
