//! Tagged transform ops, the ordered transform list, and matrix composition.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DMat4, dvec3};

/// Coordinate axis selector shared by the rotate/reflect/skew ops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// The two axes spanning the plane orthogonal to `self`, in X/Y/Z order.
    pub fn others(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
            Axis::Z => write!(f, "Z"),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown axis '{0}', expected one of x/y/z")]
pub struct ParseAxisError(String);

impl FromStr for Axis {
    type Err = ParseAxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(ParseAxisError(other.to_string())),
        }
    }
}

/// Transform identity within one [`TransformList`] (dense counter, never reused).
pub type TransformId = u32;

/// Kind-specific parameters of a single transform.
///
/// Serialized with an internal `kind` tag so lists saved by an earlier session
/// revive into the same variants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformOp {
    Scale { x: f64, y: f64, z: f64 },
    Translate { x: f64, y: f64, z: f64 },
    Rotate { angle_degrees: f64, axis: Axis },
    Reflect { axis: Axis },
    Skew { s: f64, t: f64, axis: Axis },
    Invert { target: TransformId },
}

/// One entry of the ordered transform list.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub id: TransformId,
    #[serde(flatten)]
    pub op: TransformOp,
}

impl Transform {
    /// Homogeneous matrix of this transform.
    ///
    /// `all` is the full sibling list; `Invert` resolves its target there and
    /// degrades to the identity when the id is missing.
    pub fn matrix(&self, all: &[Transform]) -> DMat4 {
        self.matrix_bounded(all, all.len())
    }

    fn matrix_bounded(&self, all: &[Transform], fuel: usize) -> DMat4 {
        match self.op {
            TransformOp::Scale { x, y, z } => DMat4::from_scale(dvec3(x, y, z)),
            TransformOp::Translate { x, y, z } => DMat4::from_translation(dvec3(x, y, z)),
            TransformOp::Rotate {
                angle_degrees,
                axis,
            } => {
                let rad = angle_degrees.to_radians();
                match axis {
                    Axis::X => DMat4::from_rotation_x(rad),
                    Axis::Y => DMat4::from_rotation_y(rad),
                    Axis::Z => DMat4::from_rotation_z(rad),
                }
            }
            TransformOp::Reflect { axis } => {
                let mut m = DMat4::IDENTITY;
                match axis {
                    Axis::X => m.x_axis.x = -1.0,
                    Axis::Y => m.y_axis.y = -1.0,
                    Axis::Z => m.z_axis.z = -1.0,
                }
                m
            }
            TransformOp::Skew { s, t, axis } => {
                // Shear the named coordinate by the two others.
                let mut m = DMat4::IDENTITY;
                match axis {
                    Axis::X => {
                        m.y_axis.x = s;
                        m.z_axis.x = t;
                    }
                    Axis::Y => {
                        m.x_axis.y = s;
                        m.z_axis.y = t;
                    }
                    Axis::Z => {
                        m.x_axis.z = s;
                        m.y_axis.z = t;
                    }
                }
                m
            }
            TransformOp::Invert { target } => {
                // A lookup chain longer than the list means the references
                // cycle; that degrades to the identity like a missing id.
                if fuel == 0 {
                    return DMat4::IDENTITY;
                }
                match find(all, target) {
                    Some(t) => t.matrix_bounded(all, fuel - 1).inverse(),
                    None => DMat4::IDENTITY,
                }
            }
        }
    }

    /// Human-readable label matching the demo UI.
    pub fn label(&self, all: &[Transform]) -> String {
        self.label_bounded(all, all.len())
    }

    fn label_bounded(&self, all: &[Transform], fuel: usize) -> String {
        match self.op {
            TransformOp::Scale { x, y, z } => format!("Scale({x:.2}, {y:.2}, {z:.2})"),
            TransformOp::Translate { x, y, z } => {
                format!("Translate({x:.2}, {y:.2}, {z:.2})")
            }
            TransformOp::Rotate {
                angle_degrees,
                axis,
            } => format!("Rotate{axis}({angle_degrees:.2}\u{b0})"),
            TransformOp::Reflect { axis } => {
                let (a, b) = axis.others();
                format!("Reflect({a}-{b} Plane)")
            }
            TransformOp::Skew { s, t, axis } => {
                let (a, b) = axis.others();
                format!("Skew{a}{b}(s={s:.2}, t={t:.2})")
            }
            TransformOp::Invert { target } => {
                let resolved = if fuel == 0 { None } else { find(all, target) };
                match resolved {
                    Some(t) => format!("Invert({})", t.label_bounded(all, fuel - 1)),
                    None => "Invert(Unknown)".to_string(),
                }
            }
        }
    }
}

fn find(all: &[Transform], id: TransformId) -> Option<&Transform> {
    all.iter().find(|t| t.id == id)
}

/// Ordered transform list; list order is composition order.
///
/// Owns the id counter, so identities stay unique per list instead of relying
/// on process-wide state.
#[derive(Clone, Debug, Default)]
pub struct TransformList {
    transforms: Vec<Transform>,
    next_id: TransformId,
}

impl TransformList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revive a previously serialized list; the id counter resumes past the
    /// highest restored id so new entries never collide.
    pub fn from_saved(saved: Vec<Transform>) -> Self {
        let next_id = saved.iter().map(|t| t.id).max().unwrap_or(0);
        Self {
            transforms: saved,
            next_id,
        }
    }

    /// Append a transform, returning its freshly assigned id.
    pub fn push(&mut self, op: TransformOp) -> TransformId {
        self.next_id += 1;
        let id = self.next_id;
        self.transforms.push(Transform { id, op });
        id
    }

    /// Replace the element at `index` with a copy carrying the new op.
    /// The id is preserved; stored entries are never mutated in place.
    pub fn set_op(&mut self, index: usize, op: TransformOp) -> bool {
        match self.transforms.get(index) {
            Some(&Transform { id, .. }) => {
                self.transforms[index] = Transform { id, op };
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<Transform> {
        if index < self.transforms.len() {
            Some(self.transforms.remove(index))
        } else {
            None
        }
    }

    /// Swap with the previous entry; no-op at the top.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.transforms.len() {
            return false;
        }
        self.transforms.swap(index - 1, index);
        true
    }

    /// Swap with the next entry; no-op at the bottom.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.transforms.len() {
            return false;
        }
        self.transforms.swap(index, index + 1);
        true
    }

    pub fn get(&self, index: usize) -> Option<&Transform> {
        self.transforms.get(index)
    }

    pub fn as_slice(&self) -> &[Transform] {
        &self.transforms
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Fold the list into one combined matrix.
    ///
    /// Each step pre-multiplies (`m * acc`) so the transform listed first is
    /// applied to a point first; the perspective matrix is pre-multiplied last.
    pub fn compose(&self, perspective_amount: f64) -> DMat4 {
        let combined = self
            .transforms
            .iter()
            .fold(DMat4::IDENTITY, |acc, t| t.matrix(&self.transforms) * acc);
        perspective_matrix(perspective_amount) * combined
    }
}

/// Identity matrix with the w-row z-column entry set to `amount`.
pub fn perspective_matrix(amount: f64) -> DMat4 {
    let mut m = DMat4::IDENTITY;
    m.z_axis.w = amount;
    m
}

/// Monospace dump of the 16 components in column-major order: two decimals,
/// padded to width 5, four per line.
pub fn format_matrix(m: &DMat4) -> String {
    let cells: Vec<String> = m
        .to_cols_array()
        .iter()
        .map(|v| format!("{v:>5.2}"))
        .collect();
    let mut out = String::new();
    for row in cells.chunks(4) {
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out
}
