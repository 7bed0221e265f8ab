use glam::Mat4;
use rustc_hash::FxHashMap;

use crate::scene::{NodeHandle, Scene};

/// Flat joint list of a skin, ordered like the skin's `joints` array so that
/// `joint_matrices[i]` matches joint index `i` in the skinning shader.
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub name: String,

    // === Core Data ===
    /// One entry per skin joint; `None` when the joint is not in the graph.
    pub bones: Vec<Option<NodeHandle>>,

    // Inverse Bind Matrices
    // Transform vertices from mesh space to bone-local space. Static after load.
    pub(crate) inverse_bind_matrices: Vec<Mat4>,

    // === Runtime Data ===
    pub(crate) joint_matrices: Vec<Mat4>,
}

impl Skeleton {
    /// Collects the bones below `root` and orders them by `joints` (source
    /// node indices). Missing inverse bind matrices default to identity.
    #[must_use]
    pub fn from_graph(
        name: &str,
        scene: &Scene,
        root: NodeHandle,
        joints: &[usize],
        mut inverse_bind_matrices: Vec<Mat4>,
    ) -> Self {
        let by_index: FxHashMap<usize, NodeHandle> = scene
            .collect_bones(root)
            .into_iter()
            .filter_map(|handle| {
                let index = scene.get_node(handle)?.gltf_node_index?;
                Some((index, handle))
            })
            .collect();

        let bones: Vec<Option<NodeHandle>> = joints
            .iter()
            .map(|joint| {
                let bone = by_index.get(joint).copied();
                if bone.is_none() {
                    log::debug!("Skeleton '{name}': joint {joint} has no bone in the graph");
                }
                bone
            })
            .collect();

        if inverse_bind_matrices.len() != bones.len() {
            log::warn!(
                "Skeleton '{name}': {} inverse bind matrices for {} joints",
                inverse_bind_matrices.len(),
                bones.len()
            );
            inverse_bind_matrices.resize(bones.len(), Mat4::IDENTITY);
        }

        Self {
            name: name.to_string(),
            joint_matrices: vec![Mat4::IDENTITY; bones.len()],
            bones,
            inverse_bind_matrices,
        }
    }

    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.bones.len()
    }

    /// Updates the per-joint skinning matrices.
    ///
    /// `inverse_model` is the inverse world matrix of the skinned mesh, so
    /// the result maps mesh-space vertices to posed mesh-space vertices:
    /// `inverse_model * bone.world_xform * inverse_bind`.
    /// Must run after the transform pass of the frame.
    pub fn compute_joint_matrices(&mut self, scene: &Scene, inverse_model: Mat4) {
        for (i, bone) in self.bones.iter().enumerate() {
            let Some(bone_node) = bone.and_then(|handle| scene.get_node(handle)) else {
                continue;
            };
            self.joint_matrices[i] = inverse_model * bone_node.world_xform * self.inverse_bind_matrices[i];
        }
    }

    #[inline]
    #[must_use]
    pub fn joint_matrices(&self) -> &[Mat4] {
        &self.joint_matrices
    }

    /// Joint matrices as raw bytes, column-major, ready for a storage buffer.
    #[inline]
    #[must_use]
    pub fn joint_matrices_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.joint_matrices)
    }
}
