//! Procedural polygon primitives shared by the demos.

use glam::{DVec3, dvec3};

use crate::polygon::Polygon;

/// Cube of six quads centered on the origin, used as a distant backdrop
/// around a scene. Face normals point away from the origin.
pub fn skybox(scale: f64) -> Vec<Polygon> {
    cuboid(DVec3::ZERO, DVec3::splat(0.5 * scale))
}

/// Axis-aligned box with outward face normals.
pub fn cuboid(center: DVec3, half_extents: DVec3) -> Vec<Polygon> {
    let h = half_extents;
    let corner = |sx: f64, sy: f64, sz: f64| center + dvec3(sx * h.x, sy * h.y, sz * h.z);

    let frb = corner(1.0, -1.0, 1.0);
    let flb = corner(-1.0, -1.0, 1.0);
    let frt = corner(1.0, 1.0, 1.0);
    let flt = corner(-1.0, 1.0, 1.0);
    let brb = corner(1.0, -1.0, -1.0);
    let blb = corner(-1.0, -1.0, -1.0);
    let brt = corner(1.0, 1.0, -1.0);
    let blt = corner(-1.0, 1.0, -1.0);

    vec![
        // +Z
        Polygon::new(vec![frt, frb, flb, flt]),
        // +X
        Polygon::new(vec![frt, brt, brb, frb]),
        // -X
        Polygon::new(vec![flt, flb, blb, blt]),
        // +Y
        Polygon::new(vec![frt, flt, blt, brt]),
        // -Y
        Polygon::new(vec![frb, brb, blb, flb]),
        // -Z
        Polygon::new(vec![brt, blt, blb, brb]),
    ]
}
