//! Core demo math: transform stack, composition, fly camera.

pub use glam::{DMat3, DMat4, DQuat, DVec2, DVec3, DVec4, dvec2, dvec3};

pub mod camera;
pub mod transform;

pub use camera::{CameraInput, FlyCamera};
pub use transform::{
    Axis, Transform, TransformId, TransformList, TransformOp, format_matrix, perspective_matrix,
};
