use glam::Mat4;

use crate::scene::NodeHandle;
use crate::scene::pose::Pose;

/// What a node represents in the viewer's mesh/skeleton graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKind {
    Mesh,
    Bone,
    #[default]
    Empty,
}

/// A scene graph node.
///
/// # Hierarchy
///
/// Children are owned through the [`Scene`](crate::scene::Scene) arena and
/// listed here by handle; `parent` is a non-owning back-reference.
///
/// # Transforms
///
/// - `local_xform`: bind pose relative to the parent, set at load time
/// - `pose`: animated state, written by channels
/// - `world_xform`: derived by the transform system every frame
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub name: String,

    // === Core Hierarchy ===
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    // === Transforms ===
    pub local_xform: Mat4,
    pub(crate) world_xform: Mat4,
    pub pose: Pose,

    // === Source correlation ===
    /// Index of the node in the source asset.
    pub gltf_node_index: Option<usize>,
    /// Index of the mesh in the source asset.
    pub gltf_mesh_id: Option<usize>,
}

impl Node {
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name: String::new(),
            parent: None,
            children: Vec::new(),
            local_xform: Mat4::IDENTITY,
            world_xform: Mat4::IDENTITY,
            pose: Pose::new(),
            gltf_node_index: None,
            gltf_mesh_id: None,
        }
    }

    /// A bone with the given bind pose.
    #[must_use]
    pub fn bone(local_xform: Mat4) -> Self {
        Self::new(NodeKind::Bone).with_local_xform(local_xform)
    }

    #[must_use]
    pub fn mesh(gltf_mesh_id: usize) -> Self {
        Self {
            gltf_mesh_id: Some(gltf_mesh_id),
            ..Self::new(NodeKind::Mesh)
        }
    }

    #[must_use]
    pub fn with_local_xform(mut self, local_xform: Mat4) -> Self {
        self.local_xform = local_xform;
        self
    }

    #[must_use]
    pub fn with_gltf_index(mut self, index: usize) -> Self {
        self.gltf_node_index = Some(index);
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn is_bone(&self) -> bool {
        self.kind == NodeKind::Bone
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// World matrix from the latest transform pass.
    /// Stale if the pose changed since.
    #[inline]
    #[must_use]
    pub fn world_xform(&self) -> &Mat4 {
        &self.world_xform
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new(NodeKind::Empty)
    }
}
