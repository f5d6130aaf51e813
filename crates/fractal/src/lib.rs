//! Escape-time fractal layers and their extrusion into stratified voxel
//! shell meshes.

pub mod layer;
pub mod mesh;

pub use layer::Layer;
pub use mesh::{ColorMesh, extrude_layer};
