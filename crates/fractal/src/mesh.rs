//! Extrudes an intensity layer into a stack of voxel strata, keeping only
//! the faces on the outside of the solid.

use geom::Polygon;
use glam::{DVec3, dvec3};

use crate::layer::{CHANNELS, Layer};

/// Number of intensity thresholds the layer is sliced into.
pub const STRATA: usize = 50;
const STRATUM_HEIGHT: f64 = 1.0;
/// Overall mesh footprint in world units; cells are scaled to fit.
const FOOTPRINT: f64 = 100.0;
const BASE_COLOR: DVec3 = DVec3::new(0.0, 0.0, 0.5);

/// Triangle soup with a color per vertex, both as xyzw-packed f32 buffers.
pub struct ColorMesh {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

impl ColorMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 4
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }
}

/// Is the cell at `(index, stratum)`, offset by the given deltas, filled?
///
/// Above the top stratum counts as filled (those faces can never be seen);
/// everything else out of range is empty.
fn filled_at(
    strata: &[Vec<bool>],
    dimension: usize,
    index: usize,
    stratum: usize,
    d_row: isize,
    d_col: isize,
    d_stratum: isize,
) -> bool {
    let row = (index / dimension) as isize + d_row;
    let col = (index % dimension) as isize + d_col;
    let s = stratum as isize + d_stratum;
    if s < 0 {
        return true;
    }
    if row < 0
        || col < 0
        || row >= dimension as isize
        || col >= dimension as isize
        || s >= STRATA as isize
    {
        return false;
    }
    strata[s as usize][dimension * row as usize + col as usize]
}

/// Slice the layer into boolean strata and emit the exposed cell faces,
/// colored by stratum depth.
pub fn extrude_layer(layer: &Layer) -> ColorMesh {
    let dimension = layer.dimension;
    assert_eq!(
        dimension * dimension * CHANNELS,
        layer.pixels.len(),
        "layer is not square"
    );

    let threshold = (255 / STRATA) as u8;
    let strata: Vec<Vec<bool>> = (0..STRATA)
        .map(|n| {
            layer
                .pixels
                .chunks_exact(CHANNELS)
                .map(|px| px[0] > threshold * n as u8)
                .collect()
        })
        .collect();

    let scale = FOOTPRINT / dimension as f64;
    let centering = dimension as f64 / 2.0;
    let half = 0.5 * STRATUM_HEIGHT;

    let mut faces: Vec<(Polygon, DVec3)> = Vec::new();
    for (n, stratum) in strata.iter().enumerate() {
        let shade = DVec3::splat(n as f64 / STRATA as f64);
        let color = BASE_COLOR + shade;
        for (i, &filled) in stratum.iter().enumerate() {
            if !filled {
                continue;
            }
            let row = (i / dimension) as f64;
            let col = (i % dimension) as f64;
            let offset = dvec3(row - centering, -(n as f64) * STRATUM_HEIGHT, col - centering);

            let corner = |sx: f64, sy: f64, sz: f64| {
                (dvec3(sx * 0.5, sy * half, sz * 0.5) + offset) * scale
            };
            let frb = corner(1.0, -1.0, 1.0);
            let flb = corner(-1.0, -1.0, 1.0);
            let frt = corner(1.0, 1.0, 1.0);
            let flt = corner(-1.0, 1.0, 1.0);
            let brb = corner(1.0, -1.0, -1.0);
            let blb = corner(-1.0, -1.0, -1.0);
            let brt = corner(1.0, 1.0, -1.0);
            let blt = corner(-1.0, 1.0, -1.0);

            let mut emit = |points: Vec<DVec3>| faces.push((Polygon::new(points), color));

            // +col side
            if !filled_at(&strata, dimension, i, n, 0, 1, 0) {
                emit(vec![frt, frb, flb, flt]);
            }
            // -col side
            if !filled_at(&strata, dimension, i, n, 0, -1, 0) {
                emit(vec![brt, blt, blb, brb]);
            }
            // -row side
            if !filled_at(&strata, dimension, i, n, -1, 0, 0) {
                emit(vec![flt, flb, blb, blt]);
            }
            // +row side
            if !filled_at(&strata, dimension, i, n, 1, 0, 0) {
                emit(vec![frt, brt, brb, frb]);
            }
            // Above
            if !filled_at(&strata, dimension, i, n, 0, 0, -1) {
                emit(vec![frt, flt, blt, brt]);
            }
            // Below
            if !filled_at(&strata, dimension, i, n, 0, 0, 1) {
                emit(vec![frb, brb, blb, flb]);
            }
        }
    }

    log::info!(
        "Extruded layer (dim {dimension}) into {} faces",
        faces.len()
    );

    let mut positions = Vec::new();
    let mut colors = Vec::new();
    for (polygon, color) in &faces {
        for point in polygon.triangles() {
            positions.extend_from_slice(&[point.x as f32, point.y as f32, point.z as f32, 1.0]);
            colors.extend_from_slice(&[color.x as f32, color.y as f32, color.z as f32, 1.0]);
        }
    }
    ColorMesh { positions, colors }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer_with_red(dimension: usize, reds: &[u8]) -> Layer {
        assert_eq!(reds.len(), dimension * dimension);
        let pixels = reds
            .iter()
            .flat_map(|&r| [r, 0, 0, 255])
            .collect();
        Layer { dimension, pixels }
    }

    #[test]
    fn empty_layer_produces_no_faces() {
        let layer = layer_with_red(2, &[0, 0, 0, 0]);
        let mesh = extrude_layer(&layer);
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn single_cell_two_strata_exposes_nine_faces() {
        // Red 6 passes thresholds 0 and 5, so exactly two strata fill.
        // Each stratum shows four sides; the top of the upper stratum is
        // hidden by the "filled above" rule and only the lower stratum's
        // underside is exposed: 4 + 4 + 1 = 9 quads.
        let mut reds = vec![0u8; 9];
        reds[4] = 6;
        let layer = layer_with_red(3, &reds);
        let mesh = extrude_layer(&layer);
        assert_eq!(mesh.triangle_count(), 9 * 2);
        assert_eq!(mesh.positions.len(), mesh.colors.len());
    }

    #[test]
    fn deeper_strata_are_brighter() {
        let mut reds = vec![0u8; 9];
        reds[4] = 255;
        let layer = layer_with_red(3, &reds);
        let mesh = extrude_layer(&layer);
        // Colors carry the stratum shade in the red channel: first faces come
        // from stratum 0 (shade 0), later ones from deeper strata.
        let first = mesh.colors[0];
        let last = mesh.colors[mesh.colors.len() - 4];
        assert_eq!(first, 0.0);
        assert!(last > first);
    }

    #[test]
    fn interior_faces_are_culled() {
        // A full 2x2 slab one stratum deep: only outer faces remain.
        let layer = layer_with_red(2, &[3, 3, 3, 3]);
        let mesh = extrude_layer(&layer);
        // 4 cells x 6 faces = 24 without culling; the 4 interior side pairs
        // remove 8, the 4 hidden tops remove 4: 12 faces remain.
        assert_eq!(mesh.triangle_count(), 12 * 2);
    }
}
