use glam::Mat4;
use slotmap::SlotMap;

use crate::errors::{PoseError, Result};
use crate::scene::NodeHandle;
use crate::scene::node::{Node, NodeKind};
use crate::scene::transform_system;

/// Scene graph arena.
///
/// Owns every node; hierarchy is expressed with handles so that removing or
/// re-parenting a subtree never leaves dangling references. Handles held by
/// animation channels simply stop resolving once their node is removed.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub(crate) nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Adds a node as a new tree root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn add_to_parent(&mut self, mut child: Node, parent: NodeHandle) -> Result<NodeHandle> {
        if !self.nodes.contains_key(parent) {
            return Err(PoseError::NodeNotFound(parent));
        }

        child.parent = Some(parent);
        let handle = self.nodes.insert(child);
        self.nodes[parent].children.push(handle);

        Ok(handle)
    }

    /// Creates a bone with the given bind pose under `parent`.
    pub fn add_child_bone(&mut self, parent: NodeHandle, local_xform: Mat4) -> Result<NodeHandle> {
        self.add_to_parent(Node::bone(local_xform), parent)
    }

    /// Moves `child` (with its subtree) under `parent`.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) -> Result<()> {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return Err(PoseError::SelfAttachment(child));
        }
        if !self.nodes.contains_key(child) {
            return Err(PoseError::NodeNotFound(child));
        }
        if !self.nodes.contains_key(parent) {
            return Err(PoseError::NodeNotFound(parent));
        }
        if self.is_ancestor_of(child, parent) {
            log::warn!("Attaching {child:?} under its own descendant {parent:?} would create a cycle");
            return Err(PoseError::CyclicAttachment { child, parent });
        }

        self.detach(child);

        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);

        Ok(())
    }

    /// Removes a node and its whole subtree.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) {
            return;
        }

        self.detach(handle);

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }
    }

    /// Unlinks `handle` from its parent (or from the root list).
    fn detach(&mut self, handle: NodeHandle) {
        match self.nodes.get(handle).and_then(|n| n.parent) {
            Some(parent) => {
                if let Some(parent) = self.nodes.get_mut(parent) {
                    parent.children.retain(|&c| c != handle);
                }
            }
            None => self.root_nodes.retain(|&r| r != handle),
        }
        if let Some(node) = self.nodes.get_mut(handle) {
            node.parent = None;
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &Node)> {
        self.nodes.iter()
    }

    /// `true` if `ancestor` is `node` or lies on its parent chain.
    #[must_use]
    pub fn is_ancestor_of(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = Some(node);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.get(handle).and_then(|n| n.parent);
        }
        false
    }

    /// Depth-first pre-order walk of the subtree below `root`, `root` first.
    #[must_use]
    pub fn depth_first(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut order = Vec::new();
        let mut stack = vec![root];

        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            order.push(handle);
            stack.extend(node.children.iter().rev().copied());
        }

        order
    }

    /// First node below `root` (depth-first, `root` included) carrying the
    /// given source-node index.
    #[must_use]
    pub fn get_node_with_index(&self, root: NodeHandle, index: usize) -> Option<NodeHandle> {
        self.depth_first(root)
            .into_iter()
            .find(|&handle| self.nodes[handle].gltf_node_index == Some(index))
    }

    /// Every bone below `root`, in depth-first order.
    #[must_use]
    pub fn collect_bones(&self, root: NodeHandle) -> Vec<NodeHandle> {
        self.depth_first(root)
            .into_iter()
            .filter(|&handle| self.nodes[handle].kind == NodeKind::Bone)
            .collect()
    }

    // ========================================================================
    // Pose editing
    // ========================================================================

    /// Puts every pose below `root` back to its neutral state.
    pub fn reset_poses(&mut self, root: NodeHandle) {
        for handle in self.depth_first(root) {
            self.nodes[handle].pose.reset();
        }
    }

    /// Sizes the node's morph weights to `count`, all zero.
    pub fn resize_blend_weights(&mut self, handle: NodeHandle, count: usize) -> Result<()> {
        let node = self.nodes.get_mut(handle).ok_or(PoseError::NodeNotFound(handle))?;
        node.pose.blend_weights.clear();
        node.pose.blend_weights.resize(count, 0.0);
        Ok(())
    }

    pub fn set_target_names(&mut self, handle: NodeHandle, names: Vec<String>) -> Result<()> {
        let node = self.nodes.get_mut(handle).ok_or(PoseError::NodeNotFound(handle))?;
        node.pose.target_names = names;
        Ok(())
    }

    /// Writes the pose that places `handle` at `world` given its parent's
    /// current world matrix (the manipulator path of the viewer).
    pub fn set_pose_from_world(&mut self, handle: NodeHandle, world: Mat4) -> Result<()> {
        let parent_world = self
            .nodes
            .get(handle)
            .ok_or(PoseError::NodeNotFound(handle))?
            .parent
            .and_then(|parent| self.nodes.get(parent))
            .map_or(Mat4::IDENTITY, |parent| parent.world_xform);

        let local = parent_world.inverse() * world;
        self.nodes[handle].pose.set_from_matrix(local);
        Ok(())
    }

    // ========================================================================
    // Transform propagation
    // ========================================================================

    /// Recomputes world matrices of `handle` and its subtree.
    pub fn propagate(&mut self, handle: NodeHandle, parent_world: Mat4) {
        transform_system::propagate_iterative(&mut self.nodes, handle, parent_world);
    }

    /// Recomputes world matrices of every tree from an identity parent.
    pub fn update_world_transforms(&mut self) {
        transform_system::update_hierarchy(&mut self.nodes, &self.root_nodes);
    }

    /// Recomputes one subtree using its parent's current world matrix.
    pub fn update_subtree(&mut self, handle: NodeHandle) {
        transform_system::update_subtree(&mut self.nodes, handle);
    }
}
