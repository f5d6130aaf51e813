//! First-person fly camera: velocity-integrated WASD movement plus
//! cursor-driven look, producing a world-to-camera matrix.

use crate::{DMat4, DQuat, DVec3, dvec3};

const ROTATION_SCALE: f64 = 0.01;
const ACCELERATION: f64 = 15.0;
const DAMPING: f64 = 0.15;
const FOV_Y_RAD: f64 = std::f64::consts::FRAC_PI_3;
const Z_NEAR: f64 = 0.01;
const Z_FAR: f64 = 100.0;
/// Depth-range compression factor. Shrinking z after projection does not move
/// anything on screen; it just keeps far geometry inside the clip volume.
const Z_SQUASH: f64 = 0.01;

/// Per-frame control sample consumed by [`FlyCamera::update`].
#[derive(Clone, Copy, Debug)]
pub struct CameraInput {
    /// When false the frame is ignored and velocity resets, so regaining
    /// focus does not jump the camera.
    pub active: bool,
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub cursor_dx: f64,
    pub cursor_dy: f64,
    pub delta_time_ms: u32,
}

impl Default for CameraInput {
    fn default() -> Self {
        Self {
            active: true,
            forward: false,
            back: false,
            left: false,
            right: false,
            cursor_dx: 0.0,
            cursor_dy: 0.0,
            delta_time_ms: 16,
        }
    }
}

/// Free-flying first-person camera.
#[derive(Clone, Copy, Debug)]
pub struct FlyCamera {
    pub position: DVec3,
    /// Unit view direction.
    pub direction: DVec3,
    pub velocity: DVec3,
    pub aspect_ratio: f64,
}

impl FlyCamera {
    pub fn new(position: DVec3, direction: DVec3) -> Self {
        Self {
            position,
            direction: direction.normalize(),
            velocity: DVec3::ZERO,
            aspect_ratio: 1.0,
        }
    }

    /// Rotate the view direction from cursor deltas about the given up.
    pub fn turn(&mut self, cursor_dx: f64, cursor_dy: f64, up: DVec3) {
        let right = self.direction.cross(up);
        let spin =
            DQuat::from_scaled_axis(up * (ROTATION_SCALE * cursor_dx) + right * (ROTATION_SCALE * cursor_dy));
        self.direction = (spin * self.direction).normalize();
    }

    /// Integrate key input into velocity. Held keys accelerate along the
    /// forward/right axes; released axes are damped, including the vertical
    /// component (otherwise turning mid-glide leaves residual drift).
    pub fn accelerate(&mut self, input: &CameraInput, up: DVec3, dt: f64) {
        let forwards = self.direction;
        let right = forwards.cross(up);
        if input.forward {
            self.velocity += ACCELERATION * dt * forwards;
        } else if input.back {
            self.velocity -= ACCELERATION * dt * forwards;
        } else {
            self.velocity -= DAMPING * self.velocity.dot(forwards) * forwards;
        }
        if input.right {
            self.velocity += ACCELERATION * dt * right;
        } else if input.left {
            self.velocity -= ACCELERATION * dt * right;
        } else {
            self.velocity -= DAMPING * self.velocity.dot(right) * right;
        }
        let camera_up = forwards.cross(right);
        self.velocity -= DAMPING * self.velocity.dot(camera_up) * camera_up;
    }

    #[inline]
    pub fn update(&mut self, input: &CameraInput) {
        self.update_with_up(input, DVec3::Y);
    }

    /// Advance one frame with an explicit up vector (the maze walker feeds a
    /// room-dependent up here).
    pub fn update_with_up(&mut self, input: &CameraInput, up: DVec3) {
        if !input.active {
            self.velocity = DVec3::ZERO;
            return;
        }
        let dt = input.delta_time_ms as f64 / 1000.0;
        self.turn(input.cursor_dx, input.cursor_dy, up);
        self.position += self.velocity * dt;
        self.accelerate(input, up, dt);
    }

    #[inline]
    pub fn view_matrix(&self) -> DMat4 {
        self.view_matrix_with_up(DVec3::Y)
    }

    /// World-to-camera matrix: depth squash, GL-style perspective, look-at
    /// from the origin toward the view direction, camera translation.
    pub fn view_matrix_with_up(&self, up: DVec3) -> DMat4 {
        DMat4::from_scale(dvec3(1.0, 1.0, Z_SQUASH))
            * DMat4::perspective_rh_gl(FOV_Y_RAD, self.aspect_ratio.max(1e-6), Z_NEAR, Z_FAR)
            * DMat4::look_at_rh(DVec3::ZERO, self.direction, up)
            * DMat4::from_translation(-self.position)
    }
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(DVec3::ZERO, dvec3(0.0, 0.0, -1.0))
    }
}
