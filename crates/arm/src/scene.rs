//! Parent-indexed scene graph. Nodes are appended parent-first, so world
//! transforms accumulate in a single in-order pass.

use geom::{Polygon, buffers};
use glam::DMat4;

/// One rigid piece of the scene.
pub struct SceneNode {
    /// Index of the parent node; a node parented to itself is a root.
    parent: usize,
    polygons: Vec<Polygon>,
    /// Static rig offset relative to the parent.
    pub initial: DMat4,
    /// Animated transform applied after `initial`.
    pub dynamic: DMat4,
}

/// Per-node result of resolving the transform hierarchy.
#[derive(Clone, Copy, Debug)]
pub struct NodeSnapshot {
    pub world: DMat4,
    pub triangle_vertices: usize,
}

#[derive(Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node. `parent` must refer to an already-added node; `None`
    /// makes a root.
    pub fn add(&mut self, polygons: Vec<Polygon>, parent: Option<usize>, initial: DMat4) -> usize {
        let index = self.nodes.len();
        let parent = parent.unwrap_or(index);
        assert!(parent <= index, "parent must be added before its child");
        self.nodes.push(SceneNode {
            parent,
            polygons,
            initial,
            dynamic: DMat4::IDENTITY,
        });
        index
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> &SceneNode {
        &self.nodes[index]
    }

    pub fn node_mut(&mut self, index: usize) -> &mut SceneNode {
        &mut self.nodes[index]
    }

    /// World transform of every node: `parent_world * initial * dynamic`.
    /// Parents precede children in the node list, so one pass suffices.
    pub fn snapshots(&self) -> Vec<NodeSnapshot> {
        let mut snapshots: Vec<NodeSnapshot> = Vec::with_capacity(self.nodes.len());
        for (i, node) in self.nodes.iter().enumerate() {
            let parent_world = if node.parent == i {
                DMat4::IDENTITY
            } else {
                snapshots[node.parent].world
            };
            snapshots.push(NodeSnapshot {
                world: parent_world * node.initial * node.dynamic,
                triangle_vertices: buffers::triangle_vertex_count(&node.polygons),
            });
        }
        snapshots
    }

    /// Flat vertex buffer of one node's mesh (object space).
    pub fn positions_f32(&self, index: usize) -> Vec<f32> {
        buffers::positions_f32(&self.nodes[index].polygons)
    }

    pub fn normals_f32(&self, index: usize) -> Vec<f32> {
        buffers::normals_f32(&self.nodes[index].polygons)
    }

    pub fn uvs_f32(&self, index: usize) -> Vec<f32> {
        buffers::uvs_f32(&self.nodes[index].polygons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom::primitives::cuboid;
    use glam::{DVec3, dvec3};

    #[test]
    fn world_transforms_accumulate_down_the_chain() {
        let mut scene = Scene::new();
        let root = scene.add(vec![], None, DMat4::from_translation(dvec3(1.0, 0.0, 0.0)));
        let child = scene.add(
            vec![],
            Some(root),
            DMat4::from_translation(dvec3(0.0, 2.0, 0.0)),
        );
        let grandchild = scene.add(
            vec![],
            Some(child),
            DMat4::from_translation(dvec3(0.0, 0.0, 3.0)),
        );

        let snapshots = scene.snapshots();
        let origin = snapshots[grandchild]
            .world
            .transform_point3(DVec3::ZERO);
        assert!(origin.abs_diff_eq(dvec3(1.0, 2.0, 3.0), 1e-12));
    }

    #[test]
    fn dynamic_transforms_apply_in_the_parent_frame() {
        let mut scene = Scene::new();
        let root = scene.add(vec![], None, DMat4::IDENTITY);
        scene.node_mut(root).dynamic = DMat4::from_rotation_z(std::f64::consts::FRAC_PI_2);
        let child = scene.add(
            vec![],
            Some(root),
            DMat4::from_translation(dvec3(1.0, 0.0, 0.0)),
        );

        let snapshots = scene.snapshots();
        let origin = snapshots[child].world.transform_point3(DVec3::ZERO);
        // Rotating the root 90 degrees about Z carries the child's +X offset
        // onto +Y.
        assert!(origin.abs_diff_eq(dvec3(0.0, 1.0, 0.0), 1e-12));
    }

    #[test]
    fn roots_ignore_other_nodes() {
        let mut scene = Scene::new();
        scene.add(vec![], None, DMat4::from_translation(dvec3(5.0, 0.0, 0.0)));
        let lone = scene.add(vec![], None, DMat4::IDENTITY);
        let snapshots = scene.snapshots();
        assert_eq!(snapshots[lone].world, DMat4::IDENTITY);
    }

    #[test]
    fn buffers_come_per_node() {
        let mut scene = Scene::new();
        let a = scene.add(
            cuboid(DVec3::ZERO, DVec3::splat(1.0)),
            None,
            DMat4::IDENTITY,
        );
        assert_eq!(scene.positions_f32(a).len(), 36 * 4);
        assert_eq!(scene.normals_f32(a).len(), 36 * 4);
        assert_eq!(scene.uvs_f32(a).len(), 36 * 2);
        assert_eq!(scene.snapshots()[a].triangle_vertices, 36);
    }
}
