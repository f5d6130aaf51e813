//! First-person walker: a fly camera constrained by the maze's walls and
//! handed between rooms through their exit faces.

use geom::Segment;
use glam::{DMat4, DVec3, dvec3};
use mathcore::{CameraInput, FlyCamera};

use crate::{Maze, RoomId};

/// How close the camera may get to a wall before a move is cancelled.
const WALL_CLEARANCE: f64 = 0.1;

pub struct Walker {
    camera: FlyCamera,
    maze: Maze,
    room: RoomId,
}

impl Walker {
    /// Start in the middle of the first junction.
    pub fn new(maze: Maze) -> Self {
        let start = maze.start();
        Self {
            camera: FlyCamera::new(start.point, dvec3(0.0, 0.0, -1.0)),
            room: RoomId::Junction(0),
            maze,
        }
    }

    /// Up vector of the current room at the camera position.
    pub fn up(&self) -> DVec3 {
        self.maze.room(self.room).up_at(self.camera.position)
    }

    /// Advance one frame. The camera's proposed move either crosses an exit
    /// face (handing the walker to the neighboring room), stays clear of the
    /// current room's faces, or is cancelled.
    pub fn update(&mut self, input: &CameraInput) {
        if !input.active {
            self.camera.velocity = DVec3::ZERO;
            return;
        }
        let up = self.up();
        let dt = input.delta_time_ms as f64 / 1000.0;
        self.camera.turn(input.cursor_dx, input.cursor_dy, up);

        let proposed = self.camera.position + self.camera.velocity * dt;
        let travel = Segment::new(self.camera.position, proposed);
        let room = self.maze.room(self.room);

        let crossed = room
            .exits()
            .iter()
            .find(|(_, door)| travel.crosses(door))
            .map(|(next, _)| *next);
        if let Some(next) = crossed {
            log::debug!("walker crossed into {:?}", next);
            self.room = next;
            self.camera.position = proposed;
        } else {
            let blocked = room.faces().iter().any(|face| {
                travel.crosses(face) || face.distance_to_point(proposed) < WALL_CLEARANCE
            });
            if !blocked {
                self.camera.position = proposed;
            }
        }

        self.camera.accelerate(input, up, dt);
    }

    /// World-to-camera matrix with the room-dependent up.
    pub fn view_matrix(&self) -> DMat4 {
        self.camera.view_matrix_with_up(self.up())
    }

    pub fn camera(&self) -> &FlyCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut FlyCamera {
        &mut self.camera
    }

    pub fn room(&self) -> RoomId {
        self.room
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }
}
