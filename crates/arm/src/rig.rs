//! Two-segment arm rig with an analytic inverse-kinematics solve: yaw the
//! shoulder toward the target, then solve the planar two-link triangle.

use geom::primitives::cuboid;
use glam::{DMat4, DVec3, dvec3};

use crate::scene::Scene;

/// The rig is modeled in inches; world units are meters.
const INCHES: f64 = 0.0254;
const UPPER_ARM_LENGTH: f64 = 72.0 * INCHES;
const FOREARM_LENGTH: f64 = 48.0 * INCHES;
/// The shoulder pivot sits this far below the world origin.
const SHOULDER_DROP: f64 = 10.0 * INCHES;

const ARM_GIRTH: f64 = 3.0 * INCHES;
const MARKER_SIZE: f64 = 4.0 * INCHES;

pub struct ArmRig {
    scene: Scene,
    target: DVec3,
    target_node: usize,
    shoulder_node: usize,
    upper_node: usize,
    forearm_node: usize,
}

impl ArmRig {
    /// Build the procedural rig: target marker, pedestal, shoulder yaw
    /// pivot, upper arm and forearm, chained parent-first.
    pub fn new() -> Self {
        let mut scene = Scene::new();

        let target_node = scene.add(
            cuboid(DVec3::ZERO, DVec3::splat(MARKER_SIZE / 2.0)),
            None,
            DMat4::IDENTITY,
        );
        let base = scene.add(
            cuboid(
                dvec3(0.0, -SHOULDER_DROP, 0.0),
                dvec3(6.0 * INCHES, SHOULDER_DROP.max(INCHES), 6.0 * INCHES),
            ),
            None,
            DMat4::IDENTITY,
        );
        let shoulder_node = scene.add(vec![], Some(base), DMat4::IDENTITY);
        let upper_node = scene.add(
            arm_segment(UPPER_ARM_LENGTH),
            Some(shoulder_node),
            DMat4::from_translation(dvec3(0.0, -SHOULDER_DROP, 0.0)),
        );
        let forearm_node = scene.add(
            arm_segment(FOREARM_LENGTH),
            Some(upper_node),
            DMat4::from_translation(dvec3(UPPER_ARM_LENGTH, 0.0, 0.0)),
        );

        let mut rig = Self {
            scene,
            target: dvec3(UPPER_ARM_LENGTH, 0.0, 0.0),
            target_node,
            shoulder_node,
            upper_node,
            forearm_node,
        };
        rig.solve();
        rig
    }

    pub fn set_target(&mut self, target: DVec3) {
        self.target = target;
        self.solve();
    }

    pub fn set_target_x(&mut self, x: f64) {
        self.target.x = x;
        self.solve();
    }

    pub fn set_target_y(&mut self, y: f64) {
        self.target.y = y;
        self.solve();
    }

    pub fn set_target_z(&mut self, z: f64) {
        self.target.z = z;
        self.solve();
    }

    pub fn target(&self) -> DVec3 {
        self.target
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// World position of the forearm tip under the current joint transforms.
    pub fn end_effector(&self) -> DVec3 {
        self.scene.snapshots()[self.forearm_node]
            .world
            .transform_point3(dvec3(FOREARM_LENGTH, 0.0, 0.0))
    }

    fn solve(&mut self) {
        self.scene.node_mut(self.target_node).dynamic = DMat4::from_translation(self.target);

        // Yaw the shoulder so the arm plane contains the target.
        let yaw = f64::atan2(self.target.z, self.target.x);
        self.scene.node_mut(self.shoulder_node).dynamic = DMat4::from_rotation_y(-yaw);

        let delta_y = self.target.y + SHOULDER_DROP;
        let dist_in_plane = (self.target.x.powi(2) + self.target.z.powi(2)).sqrt();
        let dist_to_target = (dist_in_plane.powi(2) + delta_y.powi(2)).sqrt();
        let (shoulder_angle, elbow_angle) =
            planar_angles(dist_to_target, dist_in_plane, delta_y);

        // Out-of-reach targets solve to NaN; leave the joints where they are.
        if !shoulder_angle.is_nan() {
            self.scene.node_mut(self.upper_node).dynamic =
                DMat4::from_rotation_z(-shoulder_angle);
        }
        if !elbow_angle.is_nan() {
            // The solved angle is the interior elbow angle; the joint bends
            // by its supplement.
            self.scene.node_mut(self.forearm_node).dynamic =
                DMat4::from_rotation_z(std::f64::consts::PI - elbow_angle);
        } else {
            log::debug!("IK target {:?} out of reach", self.target);
        }
    }
}

impl Default for ArmRig {
    fn default() -> Self {
        Self::new()
    }
}

/// Split the pivot-to-target distance at the foot of the elbow's
/// perpendicular and read the joint angles off the two right triangles.
/// Returns (shoulder elevation relative to the target line, interior elbow
/// angle); both are NaN when the target is out of reach.
fn planar_angles(dist_to_target: f64, dist_in_plane: f64, delta_y: f64) -> (f64, f64) {
    let n = (-UPPER_ARM_LENGTH.powi(2) + FOREARM_LENGTH.powi(2) + dist_to_target.powi(2))
        / (2.0 * dist_to_target);
    let m = dist_to_target - n;
    let h = (FOREARM_LENGTH.powi(2) - n.powi(2)).sqrt();
    let elbow = (n / h).atan() + (m / h).atan();
    let shoulder = (h / m).atan() - (delta_y / dist_in_plane).atan();
    (shoulder, elbow)
}

fn arm_segment(length: f64) -> Vec<geom::Polygon> {
    cuboid(
        dvec3(length / 2.0, 0.0, 0.0),
        dvec3(length / 2.0, ARM_GIRTH / 2.0, ARM_GIRTH / 2.0),
    )
}
