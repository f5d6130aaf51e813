//! Flattening polygons into the plain numeric buffers the rendering side
//! consumes: homogeneous positions and normals, 2D texture coordinates.

use glam::DVec3;

use crate::polygon::Polygon;

fn push_xyzw(out: &mut Vec<f32>, v: DVec3) {
    out.extend_from_slice(&[v.x as f32, v.y as f32, v.z as f32, 1.0]);
}

/// Fan-triangulated vertex positions, 4 floats (xyzw, w = 1) per vertex.
pub fn positions_f32(polygons: &[Polygon]) -> Vec<f32> {
    let mut out = Vec::with_capacity(triangle_vertex_count(polygons) * 4);
    for polygon in polygons {
        for point in polygon.triangles() {
            push_xyzw(&mut out, point);
        }
    }
    out
}

/// Face normal repeated for every triangulated vertex, 4 floats per vertex.
pub fn normals_f32(polygons: &[Polygon]) -> Vec<f32> {
    let mut out = Vec::with_capacity(triangle_vertex_count(polygons) * 4);
    for polygon in polygons {
        let normal = polygon.normal();
        for _ in 0..polygon.triangles().len() {
            push_xyzw(&mut out, normal);
        }
    }
    out
}

/// Texture coordinates matching [`positions_f32`], 2 floats per vertex.
pub fn uvs_f32(polygons: &[Polygon]) -> Vec<f32> {
    let mut out = Vec::with_capacity(triangle_vertex_count(polygons) * 2);
    for polygon in polygons {
        for uv in polygon.uv_triangles() {
            out.push(uv.x as f32);
            out.push(uv.y as f32);
        }
    }
    out
}

/// Number of vertices produced by fan-triangulating all polygons.
pub fn triangle_vertex_count(polygons: &[Polygon]) -> usize {
    polygons.iter().map(|p| (p.points().len() - 2) * 3).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec3;

    fn quads() -> Vec<Polygon> {
        vec![
            Polygon::new(vec![
                dvec3(0.0, 0.0, 0.0),
                dvec3(1.0, 0.0, 0.0),
                dvec3(1.0, 1.0, 0.0),
                dvec3(0.0, 1.0, 0.0),
            ]),
            Polygon::new(vec![
                dvec3(0.0, 0.0, 1.0),
                dvec3(1.0, 0.0, 1.0),
                dvec3(1.0, 1.0, 1.0),
            ]),
        ]
    }

    #[test]
    fn buffer_lengths_line_up() {
        let polygons = quads();
        let vertices = triangle_vertex_count(&polygons);
        assert_eq!(vertices, 9);
        assert_eq!(positions_f32(&polygons).len(), vertices * 4);
        assert_eq!(normals_f32(&polygons).len(), vertices * 4);
        assert_eq!(uvs_f32(&polygons).len(), vertices * 2);
    }

    #[test]
    fn positions_are_homogeneous() {
        let polygons = quads();
        let positions = positions_f32(&polygons);
        for chunk in positions.chunks_exact(4) {
            assert_eq!(chunk[3], 1.0);
        }
    }
}
