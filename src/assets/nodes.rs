use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::errors::{PoseError, Result};
use crate::scene::{NodeHandle, Scene};

/// A node of the source asset, as decoded by the loader.
///
/// A node may carry both a matrix and separate TRS components; both are
/// applied, matrix first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceNode {
    pub name: String,
    /// Column-major 4x4 matrix.
    pub matrix: Option<[f32; 16]>,
    pub translation: Option<[f32; 3]>,
    /// `[x, y, z, w]`
    pub rotation: Option<[f32; 4]>,
    pub scale: Option<[f32; 3]>,
    pub children: Vec<usize>,
    pub mesh: Option<usize>,
}

impl SourceNode {
    /// `matrix * T * R * S`, rotation normalized.
    #[must_use]
    pub fn local_xform(&self) -> Mat4 {
        let matrix = self.matrix.map_or(Mat4::IDENTITY, |m| Mat4::from_cols_array(&m));
        let translation = self.translation.map_or(Vec3::ZERO, Vec3::from_array);
        let rotation = self
            .rotation
            .map_or(Quat::IDENTITY, |r| Quat::from_array(r).normalize());
        let scale = self.scale.map_or(Vec3::ONE, Vec3::from_array);

        matrix * Mat4::from_scale_rotation_translation(scale, rotation, translation)
    }
}

/// Adds source node `index` and all its descendants as bones under `parent`.
/// Returns the handle of the bone created for `index`.
pub fn populate_skeleton_subgraph(
    scene: &mut Scene,
    nodes: &[SourceNode],
    parent: NodeHandle,
    index: usize,
) -> Result<NodeHandle> {
    let source = nodes.get(index).ok_or_else(|| PoseError::SourceNodeOutOfBounds {
        context: "skeleton subgraph".to_string(),
        index,
    })?;

    let bone = scene.add_child_bone(parent, source.local_xform())?;
    if let Some(node) = scene.get_node_mut(bone) {
        node.gltf_node_index = Some(index);
        node.name.clone_from(&source.name);
    }

    for &child in &source.children {
        if scene.is_ancestor_of_index(bone, child) {
            log::warn!("Source node {child} appears twice on its own path, skipping");
            continue;
        }
        populate_skeleton_subgraph(scene, nodes, bone, child)?;
    }

    Ok(bone)
}

/// Finds the skeleton root of a skin starting at `start`: the first child
/// reached depth-first that is listed in `joints`.
///
/// A skin's `skeleton` property is not required to point at the root joint,
/// so the hierarchy is searched instead.
#[must_use]
pub fn find_skeleton_root(nodes: &[SourceNode], joints: &[usize], start: usize) -> Option<usize> {
    let node = nodes.get(start)?;

    for &child in &node.children {
        if joints.contains(&child) {
            return Some(child);
        }
        if let Some(found) = find_skeleton_root(nodes, joints, child) {
            return Some(found);
        }
    }

    None
}

impl Scene {
    /// `true` if `index` is the source index of `handle` or of one of its
    /// ancestors. Guards recursive population against malformed cycles.
    #[must_use]
    pub(crate) fn is_ancestor_of_index(&self, handle: NodeHandle, index: usize) -> bool {
        let mut current = Some(handle);
        while let Some(h) = current {
            let Some(node) = self.get_node(h) else {
                return false;
            };
            if node.gltf_node_index == Some(index) {
                return true;
            }
            current = node.parent;
        }
        false
    }
}
