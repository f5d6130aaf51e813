//! Procedural 3D maze: a randomly grown network of junction discs joined by
//! twisting corridors, realized into polygon rooms a first-person walker can
//! move through.

use geom::{Polygon, buffers};
use glam::{DQuat, DVec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

mod plan;
mod rooms;
mod walker;

pub use plan::{ConnectorId, MazePlan};
pub use rooms::{CorridorRoom, DeadEndRoom, JunctionRoom, Room};
pub use walker::Walker;

pub(crate) const CORRIDOR_WIDTH: f64 = 3.0;
pub(crate) const CORRIDOR_HEIGHT: f64 = 4.0;
pub(crate) const JUNCTION_RADIUS: f64 = 2.0;
pub(crate) const CORRIDOR_SUBDIVISIONS: usize = 20;
pub(crate) const MIN_CORRIDOR_LENGTH: f64 = 20.0;
pub(crate) const MAX_CORRIDOR_LENGTH: f64 = 60.0;
pub(crate) const MIN_TWIST_DEGREES: f64 = -120.0;
pub(crate) const MAX_TWIST_DEGREES: f64 = 120.0;
/// Connectors sprouted at this depth become dead ends unconditionally, so
/// growth always terminates.
pub(crate) const MAX_GROWTH_DEPTH: usize = 6;

/// Widest doorway pair that still fits side by side on the junction rim.
pub(crate) fn min_angle_between_corridors() -> f64 {
    2.0 * f64::atan((CORRIDOR_WIDTH / 2.0) / JUNCTION_RADIUS)
}

/// Identifies one room of the realized maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoomId {
    Junction(usize),
    Corridor(usize),
    DeadEnd(usize),
}

/// Spherical interpolation between two unit vectors; `t` may run slightly
/// outside [0, 1] when a walker overshoots a corridor end.
pub(crate) fn slerp_unit(a: DVec3, b: DVec3, t: f64) -> DVec3 {
    let arc = DQuat::from_rotation_arc(a, b);
    (DQuat::IDENTITY.slerp(arc, t) * a).normalize()
}

/// Fully realized maze: polygon rooms plus the exit faces wiring them up.
pub struct Maze {
    junctions: Vec<JunctionRoom>,
    corridors: Vec<CorridorRoom>,
    dead_ends: Vec<DeadEndRoom>,
}

impl Maze {
    /// Grow and realize a maze from entropy.
    pub fn generate() -> Self {
        Self::from_plan(&MazePlan::grow(&mut rand::thread_rng()))
    }

    /// Deterministic variant used by tests and the CLI `--seed` flag.
    pub fn generate_with_seed(seed: u64) -> Self {
        Self::from_plan(&MazePlan::grow(&mut StdRng::seed_from_u64(seed)))
    }

    pub fn from_plan(plan: &MazePlan) -> Self {
        let maze = Self {
            junctions: plan
                .junctions()
                .iter()
                .map(|j| JunctionRoom::build(j, plan))
                .collect(),
            corridors: plan
                .corridors()
                .iter()
                .map(|c| CorridorRoom::build(c, plan))
                .collect(),
            dead_ends: plan
                .dead_ends()
                .iter()
                .map(|d| DeadEndRoom::build(d, plan))
                .collect(),
        };
        log::info!(
            "Realized maze: {} junctions, {} corridors, {} dead ends, {} faces",
            maze.junctions.len(),
            maze.corridors.len(),
            maze.dead_ends.len(),
            maze.faces().len(),
        );
        maze
    }

    pub fn room(&self, id: RoomId) -> &dyn Room {
        match id {
            RoomId::Junction(i) => &self.junctions[i],
            RoomId::Corridor(i) => &self.corridors[i],
            RoomId::DeadEnd(i) => &self.dead_ends[i],
        }
    }

    /// The junction the walker starts in.
    pub fn start(&self) -> &JunctionRoom {
        &self.junctions[0]
    }

    pub fn junctions(&self) -> &[JunctionRoom] {
        &self.junctions
    }

    pub fn corridors(&self) -> &[CorridorRoom] {
        &self.corridors
    }

    pub fn dead_ends(&self) -> &[DeadEndRoom] {
        &self.dead_ends
    }

    /// Every displayed face of every room.
    pub fn faces(&self) -> Vec<Polygon> {
        self.corridors
            .iter()
            .flat_map(|c| c.faces())
            .chain(self.junctions.iter().flat_map(|j| j.faces()))
            .chain(self.dead_ends.iter().flat_map(|d| d.faces()))
            .cloned()
            .collect()
    }

    pub fn positions_f32(&self) -> Vec<f32> {
        buffers::positions_f32(&self.faces())
    }

    pub fn normals_f32(&self) -> Vec<f32> {
        buffers::normals_f32(&self.faces())
    }

    pub fn uvs_f32(&self) -> Vec<f32> {
        buffers::uvs_f32(&self.faces())
    }
}

/// Sample a twist angle (radians) for the far end of a new corridor.
pub(crate) fn sample_twist<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(MIN_TWIST_DEGREES..MAX_TWIST_DEGREES).to_radians()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_produces_a_tree() {
        for seed in [1, 7, 42] {
            let plan = MazePlan::grow(&mut StdRng::seed_from_u64(seed));
            // Every corridor adds exactly one new connector to the single
            // starting junction.
            assert_eq!(
                plan.corridors().len(),
                plan.junctions().len() + plan.dead_ends().len() - 1,
                "seed {seed}"
            );
            // The root always sprouts three corridors.
            assert!(plan.corridors().len() >= 3);
        }
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = MazePlan::grow(&mut StdRng::seed_from_u64(5));
        let b = MazePlan::grow(&mut StdRng::seed_from_u64(5));
        assert_eq!(a.junctions().len(), b.junctions().len());
        assert_eq!(a.dead_ends().len(), b.dead_ends().len());
        let pa = a.junctions()[0].point;
        let pb = b.junctions()[0].point;
        assert_eq!(pa, pb);
    }

    #[test]
    fn realized_rooms_have_expected_face_counts() {
        let maze = Maze::generate_with_seed(3);
        for junction in maze.junctions() {
            // Floor, ceiling, and one wall per doorway.
            assert_eq!(junction.faces().len(), 2 + junction.exits().len());
            assert!(junction.exits().len() >= 2);
        }
        for corridor in maze.corridors() {
            assert_eq!(corridor.faces().len(), 4 * CORRIDOR_SUBDIVISIONS);
            assert_eq!(corridor.exits().len(), 2);
        }
        for dead_end in maze.dead_ends() {
            assert_eq!(dead_end.faces().len(), 1);
            assert_eq!(dead_end.exits().len(), 1);
        }
    }

    #[test]
    fn buffers_stay_in_step() {
        let maze = Maze::generate_with_seed(11);
        let vertices = buffers::triangle_vertex_count(&maze.faces());
        assert!(vertices > 0);
        assert_eq!(maze.positions_f32().len(), vertices * 4);
        assert_eq!(maze.normals_f32().len(), vertices * 4);
        assert_eq!(maze.uvs_f32().len(), vertices * 2);
    }

    #[test]
    fn slerp_unit_endpoints_and_midpoint() {
        let a = DVec3::Y;
        let b = DVec3::X;
        assert!(slerp_unit(a, b, 0.0).abs_diff_eq(a, 1e-12));
        assert!(slerp_unit(a, b, 1.0).abs_diff_eq(b, 1e-9));
        let mid = slerp_unit(a, b, 0.5);
        assert!((mid.length() - 1.0).abs() < 1e-12);
        assert!((mid.dot(a) - mid.dot(b)).abs() < 1e-9);
    }
}
