//! Abstract maze plan: junctions, dead ends and the corridors joining them,
//! each feature reduced to a point and an up vector. Room geometry is built
//! from the plan in [`crate::rooms`].

use glam::{DQuat, DVec3};
use rand::Rng;

use crate::{
    MAX_CORRIDOR_LENGTH, MAX_GROWTH_DEPTH, MIN_CORRIDOR_LENGTH, min_angle_between_corridors,
    sample_twist,
};

/// Identifies something a corridor can attach to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectorId {
    Junction(usize),
    DeadEnd(usize),
}

impl ConnectorId {
    pub fn room(self) -> crate::RoomId {
        match self {
            ConnectorId::Junction(id) => crate::RoomId::Junction(id),
            ConnectorId::DeadEnd(id) => crate::RoomId::DeadEnd(id),
        }
    }
}

/// Where a corridor end attaches, and which way is up there.
#[derive(Clone, Copy, Debug)]
pub struct Coupling {
    pub point: DVec3,
    pub up: DVec3,
}

/// A disc-shaped meeting point of two or more corridors.
#[derive(Clone, Debug)]
pub struct Junction {
    pub id: usize,
    pub point: DVec3,
    /// Unit floor normal of the disc.
    pub up: DVec3,
    pub(crate) corridor_ids: Vec<usize>,
}

/// A corridor end that goes nowhere.
#[derive(Clone, Debug)]
pub struct DeadEnd {
    pub id: usize,
    pub point: DVec3,
    pub up: DVec3,
    pub(crate) corridor_id: Option<usize>,
}

/// A straight corridor between two connectors.
#[derive(Clone, Copy, Debug)]
pub struct Corridor {
    pub start: ConnectorId,
    pub end: ConnectorId,
}

pub(crate) trait Connector {
    fn point(&self) -> DVec3;
    /// Where a corridor toward `far_end` should attach. Not necessarily
    /// [`Self::point`]: junctions couple on their rim.
    fn coupling(&self, far_end: DVec3) -> Coupling;
    fn attach(&mut self, corridor_id: usize);
}

impl Connector for Junction {
    fn point(&self) -> DVec3 {
        self.point
    }

    fn coupling(&self, far_end: DVec3) -> Coupling {
        let toward = (far_end - self.point).normalize();
        Coupling {
            point: self.point + toward * crate::JUNCTION_RADIUS,
            up: self.up,
        }
    }

    fn attach(&mut self, corridor_id: usize) {
        self.corridor_ids.push(corridor_id);
    }
}

impl Connector for DeadEnd {
    fn point(&self) -> DVec3 {
        self.point
    }

    fn coupling(&self, _far_end: DVec3) -> Coupling {
        Coupling {
            point: self.point,
            up: self.up,
        }
    }

    fn attach(&mut self, corridor_id: usize) {
        assert!(self.corridor_id.is_none(), "dead end already attached");
        self.corridor_id = Some(corridor_id);
    }
}

/// The grown plan. Always a tree: every corridor adds one new connector.
#[derive(Default)]
pub struct MazePlan {
    junctions: Vec<Junction>,
    dead_ends: Vec<DeadEnd>,
    corridors: Vec<Corridor>,
}

impl MazePlan {
    /// Grow a plan from a single junction at the origin.
    ///
    /// The root sprouts three corridors at randomized rim angles; every
    /// junction grown from a corridor sprouts two more. Each new connector is
    /// a dead end with probability one half, and unconditionally once the
    /// branch depth reaches [`MAX_GROWTH_DEPTH`].
    pub fn grow<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut plan = Self::default();
        let root = plan.add_junction(DVec3::ZERO, DVec3::Y);

        let min_angle = min_angle_between_corridors();
        let inbound = DVec3::X;
        let angle_1 = rng.gen_range(min_angle..2.0 * min_angle);
        let angle_2 = angle_1 + rng.gen_range(min_angle..2.0 * min_angle);
        for angle in [0.0, angle_1, angle_2] {
            plan.branch(root, inbound, angle, 0, rng);
        }

        log::debug!(
            "Grew maze plan: {} junctions, {} dead ends, {} corridors",
            plan.junctions.len(),
            plan.dead_ends.len(),
            plan.corridors.len()
        );
        plan
    }

    /// Sprout one corridor out of `from`, rotated `angle` radians (about the
    /// junction's up) away from the direction the junction was entered from.
    fn branch<R: Rng + ?Sized>(
        &mut self,
        from: usize,
        inbound: DVec3,
        angle: f64,
        depth: usize,
        rng: &mut R,
    ) {
        let length = rng.gen_range(MIN_CORRIDOR_LENGTH..MAX_CORRIDOR_LENGTH);
        let twist = sample_twist(rng);

        let (outbound, far_point, far_up) = {
            let junction = &self.junctions[from];
            let outbound = DQuat::from_axis_angle(junction.up, angle) * inbound;
            let far_point = junction.point + outbound * length;
            // Roll the far up about the corridor axis; it stays perpendicular
            // to the corridor.
            let far_up = DQuat::from_axis_angle(outbound, twist) * junction.up;
            (outbound, far_point, far_up)
        };

        if depth >= MAX_GROWTH_DEPTH || rng.gen_bool(0.5) {
            let dead_end = self.add_dead_end(far_point, far_up);
            self.add_corridor(ConnectorId::Junction(from), dead_end);
        } else {
            let next = self.add_junction(far_point, far_up);
            self.add_corridor(ConnectorId::Junction(from), ConnectorId::Junction(next));

            let min_angle = min_angle_between_corridors();
            let angle_1 = rng.gen_range(min_angle..1.5 * min_angle);
            let angle_2 = angle_1 + rng.gen_range(min_angle..1.5 * min_angle);
            self.branch(next, -outbound, angle_1, depth + 1, rng);
            self.branch(next, -outbound, angle_2, depth + 1, rng);
        }
    }

    fn add_junction(&mut self, point: DVec3, up: DVec3) -> usize {
        let id = self.junctions.len();
        self.junctions.push(Junction {
            id,
            point,
            up,
            corridor_ids: Vec::new(),
        });
        id
    }

    fn add_dead_end(&mut self, point: DVec3, up: DVec3) -> ConnectorId {
        let id = self.dead_ends.len();
        self.dead_ends.push(DeadEnd {
            id,
            point,
            up,
            corridor_id: None,
        });
        ConnectorId::DeadEnd(id)
    }

    fn add_corridor(&mut self, start: ConnectorId, end: ConnectorId) -> usize {
        let id = self.corridors.len();
        self.corridors.push(Corridor { start, end });
        self.connector_mut(start).attach(id);
        self.connector_mut(end).attach(id);
        id
    }

    #[inline]
    pub(crate) fn connector(&self, id: ConnectorId) -> &dyn Connector {
        match id {
            ConnectorId::Junction(i) => &self.junctions[i],
            ConnectorId::DeadEnd(i) => &self.dead_ends[i],
        }
    }

    #[inline]
    fn connector_mut(&mut self, id: ConnectorId) -> &mut dyn Connector {
        match id {
            ConnectorId::Junction(i) => &mut self.junctions[i],
            ConnectorId::DeadEnd(i) => &mut self.dead_ends[i],
        }
    }

    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }

    pub fn dead_ends(&self) -> &[DeadEnd] {
        &self.dead_ends
    }

    pub fn corridors(&self) -> &[Corridor] {
        &self.corridors
    }
}
