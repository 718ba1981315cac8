// Flattened scene graph for the lab model.
//
// Nodes are stored in glTF order. Each node owns its material parameters so
// that per-node overrides never leak into siblings sharing a mesh.

use glam::{Mat4, Quat, Vec3};

use crate::core::constants::{MODEL_OFFSET, MODEL_ROTATION_Y, MODEL_SCALE};
use crate::core::error::SceneError;
use crate::core::materials::MaterialParams;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    #[inline]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

#[derive(Clone, Debug, Default)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub local: Transform,
    pub mesh: Option<usize>,
    pub skin: Option<usize>,
    pub material: MaterialParams,
}

#[derive(Clone, Debug, Default)]
pub struct Skin {
    pub joints: Vec<usize>,
    pub inverse_bind: Vec<Mat4>,
}

#[derive(Clone, Debug)]
pub struct SceneGraph {
    pub nodes: Vec<SceneNode>,
    pub roots: Vec<usize>,
    pub skins: Vec<Skin>,
    pub root_transform: Mat4,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            skins: Vec::new(),
            root_transform: Mat4::IDENTITY,
        }
    }
}

/// Placement of the whole lab in world space: scaled, turned about Y, then shifted.
pub fn lab_placement() -> Mat4 {
    Mat4::from_scale_rotation_translation(
        Vec3::splat(MODEL_SCALE),
        Quat::from_rotation_y(MODEL_ROTATION_Y),
        Vec3::from(MODEL_OFFSET),
    )
}

impl SceneGraph {
    /// World matrix of every node, indexed like `nodes`.
    pub fn world_matrices(&self) -> Vec<Mat4> {
        let mut world = vec![Mat4::IDENTITY; self.nodes.len()];
        let mut stack: Vec<(usize, Mat4)> = self
            .roots
            .iter()
            .rev()
            .map(|&root| (root, self.root_transform))
            .collect();
        while let Some((index, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get(index) else {
                continue;
            };
            let node_world = parent_world * node.local.to_matrix();
            world[index] = node_world;
            for &child in node.children.iter().rev() {
                stack.push((child, node_world));
            }
        }
        world
    }

    /// Look up a direct child of the scene root by name.
    pub fn find_top_level(&self, name: &str) -> Result<usize, SceneError> {
        self.roots
            .iter()
            .copied()
            .find(|&i| self.nodes.get(i).is_some_and(|n| n.name == name))
            .ok_or_else(|| SceneError::MissingNode {
                name: name.to_string(),
            })
    }

    /// Skinning matrices for `skin` as bound to the mesh on `mesh_node`.
    ///
    /// Each matrix maps bind-pose mesh space to the current pose, expressed in
    /// the mesh node's own space so the node's world matrix can be applied after.
    pub fn joint_matrices(&self, skin: usize, world: &[Mat4], mesh_node: usize) -> Vec<Mat4> {
        let Some(skin) = self.skins.get(skin) else {
            return Vec::new();
        };
        let inverse_mesh = world
            .get(mesh_node)
            .map(|m| m.inverse())
            .unwrap_or(Mat4::IDENTITY);
        skin.joints
            .iter()
            .enumerate()
            .map(|(i, &joint)| {
                let joint_world = world.get(joint).copied().unwrap_or(Mat4::IDENTITY);
                let inverse_bind = skin.inverse_bind.get(i).copied().unwrap_or(Mat4::IDENTITY);
                inverse_mesh * joint_world * inverse_bind
            })
            .collect()
    }
}

/// Order `(item, node)` pairs by the node's world origin, farthest from `eye`
/// first. `world` is the frame's `world_matrices` output.
pub fn back_to_front(
    items: impl IntoIterator<Item = (usize, usize)>,
    world: &[Mat4],
    eye: Vec3,
) -> Vec<usize> {
    let mut order: Vec<(usize, f32)> = items
        .into_iter()
        .map(|(item, node)| {
            let origin = world
                .get(node)
                .map(|m| m.w_axis.truncate())
                .unwrap_or(Vec3::ZERO);
            (item, origin.distance_squared(eye))
        })
        .collect();
    order.sort_by(|a, b| b.1.total_cmp(&a.1));
    order.into_iter().map(|(item, _)| item).collect()
}
