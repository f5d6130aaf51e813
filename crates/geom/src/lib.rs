//! Shared demo geometry: planar polygons, bounding boxes, segment queries,
//! OBJ parsing and the flat buffer conversions handed to a renderer.

pub mod bounds;
pub mod buffers;
pub mod obj;
pub mod polygon;
pub mod primitives;
pub mod segment;

pub use bounds::Aabb;
pub use polygon::{Polygon, UvVertex};
pub use segment::Segment;
