//! Articulated arm demo: a parent-indexed scene graph plus an analytic
//! two-segment inverse-kinematics solver driving it.

pub mod rig;
pub mod scene;

pub use rig::ArmRig;
pub use scene::{NodeSnapshot, Scene, SceneNode};
