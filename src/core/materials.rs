use fnv::FnvHashMap;

use crate::core::constants::{
    CLEAR_PLASTIC_NODES, CLEAR_PLASTIC_OPACITY, PLASTIC_ROUGHNESS, TINTED_PLASTIC_NODES,
    TINTED_PLASTIC_OPACITY,
};
use crate::core::error::SceneError;
use crate::core::scene::SceneGraph;

/// Per-node copy of the baked material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialParams {
    pub opacity: f32,
    pub roughness: f32,
    pub transparent: bool,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            roughness: 1.0,
            transparent: false,
        }
    }
}

/// Fixed-function state a node draws with. Transparent plastic blends but,
/// like the opaque parts, writes depth and culls back faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawState {
    pub blend: bool,
    pub depth_write: bool,
    pub cull_back_faces: bool,
}

impl DrawState {
    pub const OPAQUE: Self = Self {
        blend: false,
        depth_write: true,
        cull_back_faces: true,
    };
    pub const TRANSPARENT: Self = Self {
        blend: true,
        depth_write: true,
        cull_back_faces: true,
    };
}

impl MaterialParams {
    pub fn draw_state(&self) -> DrawState {
        if self.transparent {
            DrawState::TRANSPARENT
        } else {
            DrawState::OPAQUE
        }
    }
}

/// A named group of nodes whose material becomes see-through.
#[derive(Clone, Debug)]
pub struct MaterialOverride {
    pub names: &'static [&'static str],
    pub opacity: f32,
    pub roughness: f32,
}

impl MaterialOverride {
    pub fn params(&self) -> MaterialParams {
        MaterialParams {
            opacity: self.opacity,
            roughness: self.roughness,
            transparent: true,
        }
    }
}

pub fn lab_overrides() -> Vec<MaterialOverride> {
    vec![
        MaterialOverride {
            names: CLEAR_PLASTIC_NODES,
            opacity: CLEAR_PLASTIC_OPACITY,
            roughness: PLASTIC_ROUGHNESS,
        },
        MaterialOverride {
            names: TINTED_PLASTIC_NODES,
            opacity: TINTED_PLASTIC_OPACITY,
            roughness: PLASTIC_ROUGHNESS,
        },
    ]
}

/// Apply override groups in order. Every name is resolved before any node
/// changes, so a missing name leaves the graph untouched.
pub fn apply_overrides(
    graph: &mut SceneGraph,
    groups: &[MaterialOverride],
) -> Result<usize, SceneError> {
    let mut resolved: FnvHashMap<usize, MaterialParams> = FnvHashMap::default();
    let mut order = Vec::new();
    for group in groups {
        for name in group.names {
            let index = graph.find_top_level(name)?;
            if resolved.insert(index, group.params()).is_none() {
                order.push(index);
            }
        }
    }
    for &index in &order {
        graph.nodes[index].material = resolved[&index];
    }
    log::info!("[scene] transparent overrides applied to {} nodes", order.len());
    Ok(order.len())
}
