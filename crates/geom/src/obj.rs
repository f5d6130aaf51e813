//! Minimal OBJ parser producing a polygon soup for the demo scenes.
//!
//! Positions and texture coordinates are honored; normal directives are
//! skipped because [`Polygon`] derives its face normal from the winding.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use glam::{DVec2, DVec3, dvec2, dvec3};

use crate::polygon::{Polygon, UvVertex};

/// Load polygons from an OBJ file on disk.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<Vec<Polygon>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open OBJ file: {}", path.as_ref().display()))?;
    load_obj_from_reader(BufReader::new(file))
}

/// Load polygons from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> Result<Vec<Polygon>> {
    parse_obj(reader)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> Result<Vec<Polygon>> {
    parse_obj(io::Cursor::new(contents))
}

fn parse_obj<R: BufRead>(reader: R) -> Result<Vec<Polygon>> {
    let mut positions: Vec<DVec3> = Vec::new();
    let mut texcoords: Vec<DVec2> = Vec::new();
    let mut polygons: Vec<Polygon> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let tag = parts
            .next()
            .ok_or_else(|| anyhow!("Malformed OBJ line {}: '{}'", line_no + 1, trimmed))?;

        match tag {
            "v" => {
                let x = parse_f64(parts.next(), line_no, "x coordinate")?;
                let y = parse_f64(parts.next(), line_no, "y coordinate")?;
                let z = parse_f64(parts.next(), line_no, "z coordinate")?;
                positions.push(dvec3(x, y, z));
            }
            "vt" => {
                let u = parse_f64(parts.next(), line_no, "u coordinate")?;
                let v = parse_f64(parts.next(), line_no, "v coordinate")?;
                texcoords.push(dvec2(u, v));
            }
            "f" => {
                let mut face: Vec<(DVec3, Option<DVec2>)> = Vec::new();
                for token in parts {
                    let (vi, vti) =
                        parse_face_vertex(token, positions.len(), texcoords.len(), line_no)?;
                    let position = positions.get(vi).copied().ok_or_else(|| {
                        anyhow!("Position index out of bounds on line {}", line_no + 1)
                    })?;
                    face.push((position, vti.map(|i| texcoords[i])));
                }
                if face.len() < 3 {
                    continue;
                }
                if face.iter().all(|(_, uv)| uv.is_some()) {
                    polygons.push(Polygon::from_uv_vertices(
                        face.into_iter()
                            .map(|(position, uv)| UvVertex {
                                position,
                                uv: uv.unwrap_or_default(),
                            })
                            .collect(),
                    ));
                } else {
                    polygons.push(Polygon::new(face.into_iter().map(|(p, _)| p).collect()));
                }
            }
            _ => {
                // Ignore other directives (vn/o/g/s/usemtl/etc.)
            }
        }
    }

    if polygons.is_empty() {
        anyhow::bail!("OBJ contained no faces");
    }

    log::debug!("Parsed OBJ: {} polygons", polygons.len());
    Ok(polygons)
}

fn parse_f64(value: Option<&str>, line_no: usize, what: &str) -> Result<f64> {
    let token = value.ok_or_else(|| anyhow!("Missing {} on line {}", what, line_no + 1))?;
    token
        .parse::<f64>()
        .with_context(|| format!("Failed to parse {} on line {}", what, line_no + 1))
}

fn parse_face_vertex(
    token: &str,
    pos_count: usize,
    tex_count: usize,
    line_no: usize,
) -> Result<(usize, Option<usize>)> {
    let mut split = token.split('/');
    let pos = split
        .next()
        .ok_or_else(|| anyhow!("Malformed face element '{}' on line {}", token, line_no + 1))?;
    let pos_idx = resolve_index(pos, pos_count, line_no)?;

    let tex_idx = match split.next() {
        Some(value) if !value.is_empty() => Some(resolve_index(value, tex_count, line_no)?),
        _ => None,
    };

    Ok((pos_idx, tex_idx))
}

fn resolve_index(token: &str, len: usize, line_no: usize) -> Result<usize> {
    let raw = token
        .parse::<i32>()
        .with_context(|| format!("Invalid index '{}' on line {}", token, line_no + 1))?;
    if raw == 0 {
        anyhow::bail!("OBJ indices are 1-based; found 0 on line {}", line_no + 1);
    }

    let idx = if raw > 0 {
        (raw - 1) as isize
    } else {
        (len as isize) + (raw as isize)
    };

    if idx < 0 || idx as usize >= len {
        anyhow::bail!(
            "OBJ index {} resolved out of bounds (len={}) on line {}",
            raw,
            len,
            line_no + 1
        );
    }

    Ok(idx as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_triangle() {
        let src = r#"
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0
            v 0.0 1.0 0.0
            vt 0.0 0.0
            vt 1.0 0.0
            vt 0.0 1.0
            f 1/1 2/2 3/3
        "#;
        let polygons = load_obj_from_str(src).expect("parse triangle");
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].points().len(), 3);
        assert_eq!(polygons[0].uv_triangles().len(), 3);
    }

    #[test]
    fn quads_stay_polygons() {
        let src = r#"
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0
            v 1.0 1.0 0.0
            v 0.0 1.0 0.0
            f 1 2 3 4
        "#;
        let polygons = load_obj_from_str(src).expect("parse quad");
        assert_eq!(polygons[0].points().len(), 4);
        assert_eq!(polygons[0].triangles().len(), 6);
    }

    #[test]
    fn negative_indices_resolve_from_the_end() {
        let src = "
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0
            v 0.0 1.0 0.0
            f -3 -2 -1
        ";
        let polygons = load_obj_from_str(src).expect("parse with negative indices");
        assert_eq!(polygons[0].points()[2], dvec3(0.0, 1.0, 0.0));
    }

    #[test]
    fn out_of_bounds_index_is_an_error() {
        let src = "
            v 0.0 0.0 0.0
            f 1 2 3
        ";
        assert!(load_obj_from_str(src).is_err());
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(load_obj_from_str("# nothing here").is_err());
    }
}
