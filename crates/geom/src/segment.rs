//! Line segments and the segment-vs-polygon crossing query used for exit
//! detection and wall collision.

use glam::DVec3;

use crate::bounds::Aabb;
use crate::polygon::Polygon;

const PLANE_EPS: f64 = 1e-9;

/// Directed line segment between two points.
#[derive(Clone, Copy, Debug)]
pub struct Segment {
    pub start: DVec3,
    pub end: DVec3,
}

impl Segment {
    #[inline]
    pub fn new(start: DVec3, end: DVec3) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&[self.start, self.end])
    }

    /// Whether the segment passes through the polygon (touching counts).
    ///
    /// Both endpoints are expressed in the face frame; endpoints strictly on
    /// the same side of the plane cannot cross. Otherwise the plane hit point
    /// is interpolated and tested against the polygon outline.
    pub fn crosses(&self, polygon: &Polygon) -> bool {
        if !polygon.bounds().intersects(&self.bounds()) {
            return false;
        }
        let a = polygon.to_face_frame(self.start - polygon.origin());
        let b = polygon.to_face_frame(self.end - polygon.origin());

        let a_off = a.z.abs() > PLANE_EPS;
        let b_off = b.z.abs() > PLANE_EPS;
        if a_off && b_off && a.z.signum() == b.z.signum() {
            return false;
        }

        // Both endpoints (numerically) on the plane: test the midpoint.
        let t = if (b.z - a.z).abs() <= PLANE_EPS {
            0.5
        } else {
            -a.z / (b.z - a.z)
        };
        if !(0.0..=1.0).contains(&t) {
            return false;
        }
        let hit = a.truncate().lerp(b.truncate(), t);
        polygon.contains_relative(hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec3;

    fn unit_quad() -> Polygon {
        Polygon::new(vec![
            dvec3(0.0, 0.0, 0.0),
            dvec3(1.0, 0.0, 0.0),
            dvec3(1.0, 1.0, 0.0),
            dvec3(0.0, 1.0, 0.0),
        ])
    }

    #[test]
    fn crossing_through_the_middle() {
        let quad = unit_quad();
        let seg = Segment::new(dvec3(0.5, 0.5, 1.0), dvec3(0.5, 0.5, -1.0));
        assert!(seg.crosses(&quad));
        assert!(seg.reversed().crosses(&quad));
    }

    #[test]
    fn touching_the_plane_counts() {
        let quad = unit_quad();
        let seg = Segment::new(dvec3(0.5, 0.5, 1.0), dvec3(0.5, 0.5, 0.0));
        assert!(seg.crosses(&quad));
    }

    #[test]
    fn stopping_short_does_not_cross() {
        let quad = unit_quad();
        let seg = Segment::new(dvec3(0.5, 0.5, 1.0), dvec3(0.5, 0.5, 0.1));
        assert!(!seg.crosses(&quad));
        let seg = Segment::new(dvec3(0.5, 0.5, -1.0), dvec3(0.5, 0.5, -0.1));
        assert!(!seg.crosses(&quad));
    }

    #[test]
    fn passing_outside_the_outline_does_not_cross() {
        let quad = unit_quad();
        let seg = Segment::new(dvec3(1.5, 1.5, 1.0), dvec3(1.5, 1.5, -1.0));
        assert!(!seg.crosses(&quad));
    }

    #[test]
    fn crossing_a_triangle_near_an_uncovered_corner() {
        let tri = Polygon::new(vec![
            dvec3(0.0, 0.0, 0.0),
            dvec3(1.0, 0.0, 0.0),
            dvec3(1.0, 1.0, 0.0),
        ]);
        // Inside the triangle's bounding box but outside the triangle.
        let seg = Segment::new(dvec3(0.05, 0.95, 1.0), dvec3(0.05, 0.95, -1.0));
        assert!(!seg.crosses(&tri));
        // Inside the triangle proper.
        let seg = Segment::new(dvec3(0.8, 0.4, 1.0), dvec3(0.8, 0.4, -1.0));
        assert!(seg.crosses(&tri));
    }
}
