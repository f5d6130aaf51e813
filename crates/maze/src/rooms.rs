//! Realizes plan features into polygon rooms: junction discs with walls
//! between doorways, skinned corridor tubes, dead-end caps.

use geom::{Polygon, UvVertex};
use glam::{DVec3, dvec2};

use crate::plan::{Corridor, Coupling, DeadEnd, Junction, MazePlan};
use crate::{
    CORRIDOR_HEIGHT, CORRIDOR_SUBDIVISIONS, CORRIDOR_WIDTH, JUNCTION_RADIUS, RoomId, slerp_unit,
};

/// Texture length per world unit along corridor walls.
const UV_SCALE: f64 = 0.2;

/// One room of the realized maze.
pub trait Room {
    /// Faces to render and collide with.
    fn faces(&self) -> &[Polygon];
    /// Invisible faces that hand the walker over to the tagged room when
    /// crossed.
    fn exits(&self) -> &[(RoomId, Polygon)];
    /// Which way is up for a walker standing at `position`.
    fn up_at(&self, position: DVec3) -> DVec3;
}

/// Corridor-sized opening in a room boundary.
struct Doorway {
    top_left: DVec3,
    bottom_left: DVec3,
    top_right: DVec3,
    bottom_right: DVec3,
}

impl Doorway {
    fn at(point: DVec3, up: DVec3, forwards: DVec3) -> Self {
        let right = forwards.cross(up);
        let half_up = up * (CORRIDOR_HEIGHT / 2.0);
        let half_right = right * (CORRIDOR_WIDTH / 2.0);
        Self {
            top_right: point + half_up + half_right,
            bottom_right: point - half_up + half_right,
            bottom_left: point - half_up - half_right,
            top_left: point + half_up - half_right,
        }
    }

    fn polygon(&self) -> Polygon {
        Polygon::new(vec![
            self.bottom_left,
            self.bottom_right,
            self.top_right,
            self.top_left,
        ])
    }
}

/// Disc-shaped room where corridors meet.
pub struct JunctionRoom {
    faces: Vec<Polygon>,
    exits: Vec<(RoomId, Polygon)>,
    pub point: DVec3,
    pub up: DVec3,
}

impl JunctionRoom {
    pub(crate) fn build(junction: &Junction, plan: &MazePlan) -> Self {
        assert!(
            junction.corridor_ids.len() >= 2,
            "junction {} has fewer than two corridors",
            junction.id
        );

        // Order the corridors by angle around the disc so doorways and the
        // walls between them don't criss-cross.
        let mut departures: Vec<(usize, DVec3)> = junction
            .corridor_ids
            .iter()
            .map(|&corridor_id| {
                let corridor = &plan.corridors()[corridor_id];
                let far = if corridor.start == crate::ConnectorId::Junction(junction.id) {
                    plan.connector(corridor.end).point()
                } else {
                    plan.connector(corridor.start).point()
                };
                (corridor_id, (far - junction.point).normalize())
            })
            .collect();

        let forwards = departures[0].1;
        let right = junction.up.cross(forwards);
        departures.sort_by(|(_, a), (_, b)| {
            f64::atan2(a.dot(forwards), a.dot(right))
                .total_cmp(&f64::atan2(b.dot(forwards), b.dot(right)))
        });

        let floor_to_ceiling = junction.up * CORRIDOR_HEIGHT;
        let mut exits: Vec<(RoomId, Polygon)> = Vec::new();
        let mut floor_points: Vec<DVec3> = Vec::new();
        for (corridor_id, toward) in departures {
            let door = Doorway::at(
                junction.point + toward * JUNCTION_RADIUS,
                junction.up,
                toward,
            );
            exits.push((RoomId::Corridor(corridor_id), door.polygon()));
            floor_points.push(door.bottom_left);
            floor_points.push(door.bottom_right);
        }

        // Walls fill the rim between neighboring doorways (wrapping around).
        let mut faces: Vec<Polygon> = Vec::new();
        let wall_pairs = floor_points[1..]
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .chain(std::iter::once((
                *floor_points.last().expect("junction has doorways"),
                floor_points[0],
            )));
        let walls: Vec<Polygon> = wall_pairs
            .map(|(a, b)| {
                Polygon::new(vec![a, b, b + floor_to_ceiling, a + floor_to_ceiling])
            })
            .collect();

        let floor = Polygon::new(floor_points);
        let ceiling = Polygon::new(
            floor
                .points()
                .iter()
                .map(|p| *p + floor_to_ceiling)
                .collect(),
        );
        faces.push(floor);
        faces.push(ceiling);
        faces.extend(walls);

        Self {
            faces,
            exits,
            point: junction.point,
            up: junction.up,
        }
    }
}

impl Room for JunctionRoom {
    fn faces(&self) -> &[Polygon] {
        &self.faces
    }

    fn exits(&self) -> &[(RoomId, Polygon)] {
        &self.exits
    }

    fn up_at(&self, _position: DVec3) -> DVec3 {
        self.up
    }
}

/// One twisted rectangular cross-section along a corridor.
struct Frame {
    top_right: UvVertex,
    bottom_right: UvVertex,
    bottom_left: UvVertex,
    top_left: UvVertex,
    /// Same position as `top_right`, but carrying the wrapped-around UV so
    /// the texture seam closes.
    top_right_repeat: UvVertex,
}

/// Tube-shaped room between two connectors.
pub struct CorridorRoom {
    faces: Vec<Polygon>,
    exits: Vec<(RoomId, Polygon)>,
    start: Coupling,
    end: Coupling,
}

impl CorridorRoom {
    pub(crate) fn build(corridor: &Corridor, plan: &MazePlan) -> Self {
        let start_connector = plan.connector(corridor.start);
        let end_connector = plan.connector(corridor.end);
        let axis = end_connector.point() - start_connector.point();
        let start = start_connector.coupling(end_connector.point());
        let end = end_connector.coupling(start_connector.point());

        // Growth keeps connector ups perpendicular to the corridor axis; the
        // skinning below depends on it.
        assert!(
            start.up.dot(axis).abs() < 1e-6,
            "corridor start up not perpendicular to axis (dot {})",
            start.up.dot(axis)
        );
        assert!(
            end.up.dot(axis).abs() < 1e-6,
            "corridor end up not perpendicular to axis (dot {})",
            end.up.dot(axis)
        );

        let corridor_dir = axis.normalize();
        let inner_vec = end.point - start.point;

        let frames: Vec<Frame> = (0..=CORRIDOR_SUBDIVISIONS)
            .map(|i| {
                let percent = i as f64 / CORRIDOR_SUBDIVISIONS as f64;
                let up = slerp_unit(start.up, end.up, percent);
                let right = -up.cross(corridor_dir);
                let center = start.point + percent * inner_vec;
                let half_up = up * (CORRIDOR_HEIGHT / 2.0);
                let half_right = right * (CORRIDOR_WIDTH / 2.0);
                let u = percent * UV_SCALE * inner_vec.length();
                let v = |distance: f64| distance * UV_SCALE;
                Frame {
                    top_right: UvVertex {
                        position: center + half_up + half_right,
                        uv: dvec2(u, v(0.0)),
                    },
                    bottom_right: UvVertex {
                        position: center - half_up + half_right,
                        uv: dvec2(u, v(CORRIDOR_HEIGHT)),
                    },
                    bottom_left: UvVertex {
                        position: center - half_up - half_right,
                        uv: dvec2(u, v(CORRIDOR_WIDTH + CORRIDOR_HEIGHT)),
                    },
                    top_left: UvVertex {
                        position: center + half_up - half_right,
                        uv: dvec2(u, v(CORRIDOR_WIDTH + 2.0 * CORRIDOR_HEIGHT)),
                    },
                    top_right_repeat: UvVertex {
                        position: center + half_up + half_right,
                        uv: dvec2(u, v(2.0 * CORRIDOR_WIDTH + 2.0 * CORRIDOR_HEIGHT)),
                    },
                }
            })
            .collect();

        let faces: Vec<Polygon> = frames
            .windows(2)
            .flat_map(|pair| {
                let (front, back) = (&pair[0], &pair[1]);
                [
                    // Right wall
                    Polygon::from_uv_vertices(vec![
                        front.top_right,
                        back.top_right,
                        back.bottom_right,
                        front.bottom_right,
                    ]),
                    // Floor
                    Polygon::from_uv_vertices(vec![
                        front.bottom_right,
                        back.bottom_right,
                        back.bottom_left,
                        front.bottom_left,
                    ]),
                    // Left wall
                    Polygon::from_uv_vertices(vec![
                        front.bottom_left,
                        back.bottom_left,
                        back.top_left,
                        front.top_left,
                    ]),
                    // Ceiling, closing the texture seam with the repeat UV
                    Polygon::from_uv_vertices(vec![
                        front.top_left,
                        back.top_left,
                        back.top_right_repeat,
                        front.top_right_repeat,
                    ]),
                ]
            })
            .collect();

        let cap = |frame: &Frame| {
            Polygon::new(vec![
                frame.top_right.position,
                frame.bottom_right.position,
                frame.bottom_left.position,
                frame.top_left.position,
            ])
        };
        let exits = vec![
            (corridor.start.room(), cap(frames.first().expect("frames"))),
            (corridor.end.room(), cap(frames.last().expect("frames"))),
        ];

        Self {
            faces,
            exits,
            start,
            end,
        }
    }
}

impl Room for CorridorRoom {
    fn faces(&self) -> &[Polygon] {
        &self.faces
    }

    fn exits(&self) -> &[(RoomId, Polygon)] {
        &self.exits
    }

    fn up_at(&self, position: DVec3) -> DVec3 {
        let along = self.end.point - self.start.point;
        let percent = (position - self.start.point).dot(along) / along.length_squared();
        slerp_unit(self.start.up, self.end.up, percent)
    }
}

/// Single-doorway cap closing off an unfinished corridor.
pub struct DeadEndRoom {
    faces: Vec<Polygon>,
    exits: Vec<(RoomId, Polygon)>,
    up: DVec3,
}

impl DeadEndRoom {
    pub(crate) fn build(dead_end: &DeadEnd, plan: &MazePlan) -> Self {
        let corridor_id = dead_end
            .corridor_id
            .expect("dead end was never attached to a corridor");
        let corridor = &plan.corridors()[corridor_id];
        let other = if corridor.start == crate::ConnectorId::DeadEnd(dead_end.id) {
            plan.connector(corridor.end)
        } else {
            plan.connector(corridor.start)
        };
        let toward_corridor = (other.point() - dead_end.point).normalize();
        let door = Doorway::at(dead_end.point, dead_end.up, toward_corridor);

        Self {
            faces: vec![door.polygon()],
            exits: vec![(RoomId::Corridor(corridor_id), door.polygon())],
            up: dead_end.up,
        }
    }
}

impl Room for DeadEndRoom {
    fn faces(&self) -> &[Polygon] {
        &self.faces
    }

    fn exits(&self) -> &[(RoomId, Polygon)] {
        &self.exits
    }

    fn up_at(&self, _position: DVec3) -> DVec3 {
        self.up
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Maze, MazePlan};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn corridor_frames_span_the_couplings() {
        let maze = Maze::generate_with_seed(4);
        for corridor in maze.corridors() {
            // End caps sit on the coupling points.
            let (_, start_cap) = &corridor.exits()[0];
            let center: DVec3 = start_cap.points().iter().sum::<DVec3>() / 4.0;
            assert!(center.abs_diff_eq(corridor.start.point, 1e-6));

            let (_, end_cap) = &corridor.exits()[1];
            let center: DVec3 = end_cap.points().iter().sum::<DVec3>() / 4.0;
            assert!(center.abs_diff_eq(corridor.end.point, 1e-6));
        }
    }

    #[test]
    fn corridor_up_interpolates_between_ends() {
        let maze = Maze::generate_with_seed(4);
        let corridor = &maze.corridors()[0];
        let up_start = corridor.up_at(corridor.start.point);
        let up_end = corridor.up_at(corridor.end.point);
        assert!(up_start.abs_diff_eq(corridor.start.up, 1e-9));
        assert!(up_end.abs_diff_eq(corridor.end.up, 1e-6));
    }

    #[test]
    fn junction_exits_are_corridor_sized() {
        let plan = MazePlan::grow(&mut StdRng::seed_from_u64(8));
        let maze = Maze::from_plan(&plan);
        for junction in maze.junctions() {
            for (room, door) in junction.exits() {
                assert!(matches!(room, RoomId::Corridor(_)));
                assert_eq!(door.points().len(), 4);
                let w = (door.points()[1] - door.points()[0]).length();
                let h = (door.points()[2] - door.points()[1]).length();
                assert!((w - CORRIDOR_WIDTH).abs() < 1e-9);
                assert!((h - CORRIDOR_HEIGHT).abs() < 1e-9);
            }
        }
    }
}
