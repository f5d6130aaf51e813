//! Planar convex polygon with a cached face frame for triangulation and
//! proximity queries.

use glam::{DMat3, DVec2, DVec3};

use crate::bounds::Aabb;

/// Position plus texture coordinate, for polygons that carry UVs.
#[derive(Clone, Copy, Debug)]
pub struct UvVertex {
    pub position: DVec3,
    pub uv: DVec2,
}

/// Planar convex polygon, three or more points, wound consistently.
#[derive(Clone, Debug)]
pub struct Polygon {
    points: Vec<DVec3>,
    uvs: Vec<DVec2>,
    bounds: Aabb,
    /// Unit vector out of the front of the face.
    normal: DVec3,
    /// Rotates a world-space offset from `points[0]` into the face frame
    /// (in-plane x, in-plane y, normal).
    world_to_face: DMat3,
    /// Each point in face-frame coordinates (z is zero by construction).
    points_relative: Vec<DVec2>,
}

impl Polygon {
    pub fn new(points: Vec<DVec3>) -> Self {
        let uvs = vec![DVec2::ZERO; points.len()];
        Self::build(points, uvs)
    }

    pub fn from_uv_vertices(vertices: Vec<UvVertex>) -> Self {
        let points = vertices.iter().map(|v| v.position).collect();
        let uvs = vertices.iter().map(|v| v.uv).collect();
        Self::build(points, uvs)
    }

    fn build(points: Vec<DVec3>, uvs: Vec<DVec2>) -> Self {
        assert!(points.len() >= 3, "polygon needs 3 or more points");
        let x = (points[1] - points[0]).normalize();
        let normal = (points[2] - points[1]).cross(x).normalize();
        let y = normal.cross(x).normalize();
        let world_to_face = DMat3::from_cols(x, y, normal).transpose();

        let points_relative = points
            .iter()
            .map(|p| (world_to_face * (*p - points[0])).truncate())
            .collect();

        Self {
            bounds: Aabb::from_points(&points),
            uvs,
            normal,
            world_to_face,
            points_relative,
            points,
        }
    }

    #[inline]
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    #[inline]
    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    #[inline]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    #[inline]
    pub fn origin(&self) -> DVec3 {
        self.points[0]
    }

    #[inline]
    pub fn points_relative(&self) -> &[DVec2] {
        &self.points_relative
    }

    /// Express a world-space offset from [`Self::origin`] in the face frame.
    #[inline]
    pub fn to_face_frame(&self, offset: DVec3) -> DVec3 {
        self.world_to_face * offset
    }

    /// Fan-triangulate into a flat point soup (3 points per triangle).
    pub fn triangles(&self) -> Vec<DVec3> {
        self.points[1..]
            .windows(2)
            .flat_map(|pair| [self.points[0], pair[0], pair[1]])
            .collect()
    }

    /// UVs matching [`Self::triangles`]; zero for polygons built without UVs.
    pub fn uv_triangles(&self) -> Vec<DVec2> {
        self.uvs[1..]
            .windows(2)
            .flat_map(|pair| [self.uvs[0], pair[0], pair[1]])
            .collect()
    }

    /// Whether a face-frame 2D point lies inside the polygon (boundary
    /// included). Relies on convexity: the point must not fall strictly
    /// outside any edge.
    pub(crate) fn contains_relative(&self, p: DVec2) -> bool {
        let pts = &self.points_relative;
        let mut sign = 0.0f64;
        for i in 0..pts.len() {
            let a = pts[i];
            let b = pts[(i + 1) % pts.len()];
            let cross = (b - a).perp_dot(p - a);
            if cross.abs() <= 1e-9 {
                continue;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        true
    }

    /// Distance from a world-space point to the polygon (0 on the face).
    pub fn distance_to_point(&self, p: DVec3) -> f64 {
        let local = self.to_face_frame(p - self.origin());
        let planar = local.truncate();
        if self.contains_relative(planar) {
            return local.z.abs();
        }
        // Closest point is on the boundary; measure against every edge.
        let pts = &self.points_relative;
        let mut best = f64::INFINITY;
        for i in 0..pts.len() {
            let a = pts[i];
            let b = pts[(i + 1) % pts.len()];
            let d = point_segment_distance_2d(planar, a, b);
            if d < best {
                best = d;
            }
        }
        (best * best + local.z * local.z).sqrt()
    }
}

fn point_segment_distance_2d(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{dvec2, dvec3};

    fn unit_quad() -> Polygon {
        Polygon::new(vec![
            dvec3(0.0, 0.0, 0.0),
            dvec3(1.0, 0.0, 0.0),
            dvec3(1.0, 1.0, 0.0),
            dvec3(0.0, 1.0, 0.0),
        ])
    }

    #[test]
    fn normal_comes_from_winding() {
        let quad = unit_quad();
        assert!(quad.normal().abs_diff_eq(dvec3(0.0, 0.0, -1.0), 1e-12));

        let flipped = Polygon::new(vec![
            dvec3(0.0, 1.0, 0.0),
            dvec3(1.0, 1.0, 0.0),
            dvec3(1.0, 0.0, 0.0),
            dvec3(0.0, 0.0, 0.0),
        ]);
        assert!(flipped.normal().abs_diff_eq(dvec3(0.0, 0.0, 1.0), 1e-12));
    }

    #[test]
    fn relative_points_are_planar() {
        let quad = unit_quad();
        for (p, rel) in quad.points().iter().zip(quad.points_relative()) {
            let local = quad.to_face_frame(*p - quad.origin());
            assert!(local.z.abs() < 1e-12);
            assert!(rel.abs_diff_eq(local.truncate(), 1e-12));
        }
    }

    #[test]
    fn fan_triangulation_counts() {
        let quad = unit_quad();
        assert_eq!(quad.triangles().len(), 6);
        assert_eq!(quad.uv_triangles().len(), 6);

        let tri = Polygon::new(vec![
            dvec3(0.0, 0.0, 0.0),
            dvec3(1.0, 0.0, 0.0),
            dvec3(0.0, 1.0, 0.0),
        ]);
        assert_eq!(tri.triangles().len(), 3);
    }

    #[test]
    fn uvs_survive_triangulation() {
        let quad = Polygon::from_uv_vertices(vec![
            UvVertex {
                position: dvec3(0.0, 0.0, 0.0),
                uv: dvec2(0.0, 0.0),
            },
            UvVertex {
                position: dvec3(1.0, 0.0, 0.0),
                uv: dvec2(1.0, 0.0),
            },
            UvVertex {
                position: dvec3(1.0, 1.0, 0.0),
                uv: dvec2(1.0, 1.0),
            },
            UvVertex {
                position: dvec3(0.0, 1.0, 0.0),
                uv: dvec2(0.0, 1.0),
            },
        ]);
        let uvs = quad.uv_triangles();
        assert_eq!(uvs[0], dvec2(0.0, 0.0));
        assert_eq!(uvs[2], dvec2(1.0, 1.0));
    }

    #[test]
    fn distance_to_point() {
        let quad = unit_quad();
        // Straight above the interior.
        assert!((quad.distance_to_point(dvec3(0.5, 0.5, 2.0)) - 2.0).abs() < 1e-12);
        // On the face.
        assert!(quad.distance_to_point(dvec3(0.25, 0.75, 0.0)) < 1e-12);
        // Past an edge, in the plane.
        assert!((quad.distance_to_point(dvec3(2.0, 0.5, 0.0)) - 1.0).abs() < 1e-12);
        // Past a corner, off the plane: 3-4-5 style diagonal.
        let d = quad.distance_to_point(dvec3(1.0 + 3.0, 0.5, 4.0));
        assert!((d - 5.0).abs() < 1e-12);
    }
}
