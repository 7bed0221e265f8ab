//! Transform System
//!
//! Turns per-node poses into world matrices. Borrows only the node arena so
//! it can run while other parts of the [`Scene`](crate::scene::Scene) are
//! borrowed elsewhere.
//!
//! Per node:
//! 1. `pose_matrix = T(pose.translation) * R(pose.rotation) * S(pose.scale)`
//! 2. an exactly-identity `pose_matrix` means "not animated" and is replaced
//!    by the bind pose `local_xform`
//! 3. bones: `world = parent_world * local_xform * inverse(local_xform) * pose_matrix`,
//!    other nodes: `world = parent_world * local_xform`
//! 4. children inherit `world` as their parent matrix
//!
//! Must run after every clip has applied its pose for the frame.

use glam::Mat4;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// The node's animated matrix, falling back to the bind pose when the pose
/// is untouched.
#[inline]
#[must_use]
pub fn pose_matrix(node: &Node) -> Mat4 {
    node.pose.animated_matrix().unwrap_or(node.local_xform)
}

/// World matrix of `node` under `parent_world`.
#[must_use]
pub fn compute_world_matrix(node: &Node, parent_world: Mat4) -> Mat4 {
    if !node.is_bone() {
        return parent_world * node.local_xform;
    }

    let pose = pose_matrix(node);
    let local = node.local_xform;

    // A singular bind pose (zero scale) has no inverse; local * inverse(local)
    // collapses to identity in the invertible case, so use that directly.
    if local.determinant() == 0.0 {
        return parent_world * pose;
    }

    parent_world * local * local.inverse() * pose
}

/// Updates `handle` and its whole subtree, recursively.
pub fn propagate(nodes: &mut SlotMap<NodeHandle, Node>, handle: NodeHandle, parent_world: Mat4) {
    let world = {
        let Some(node) = nodes.get_mut(handle) else {
            return;
        };
        let world = compute_world_matrix(node, parent_world);
        node.world_xform = world;
        world
    };

    let mut i = 0;
    while let Some(&child) = nodes.get(handle).and_then(|node| node.children.get(i)) {
        propagate(nodes, child, world);
        i += 1;
    }
}

/// Same result as [`propagate`], using an explicit stack so that deep
/// skeletons cannot overflow the call stack.
pub fn propagate_iterative(nodes: &mut SlotMap<NodeHandle, Node>, handle: NodeHandle, parent_world: Mat4) {
    let mut stack: Vec<(NodeHandle, Mat4)> = Vec::with_capacity(64);
    stack.push((handle, parent_world));

    while let Some((node_handle, parent_world)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };

        let world = compute_world_matrix(node, parent_world);
        node.world_xform = world;

        // Reverse so children are visited in declaration order.
        for &child in node.children.iter().rev() {
            stack.push((child, world));
        }
    }
}

/// Updates every tree rooted in `roots` from an identity parent.
pub fn update_hierarchy(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    for &root in roots {
        propagate_iterative(nodes, root, Mat4::IDENTITY);
    }
}

/// Refreshes one subtree using the parent's current world matrix.
pub fn update_subtree(nodes: &mut SlotMap<NodeHandle, Node>, handle: NodeHandle) {
    let parent_world = nodes
        .get(handle)
        .and_then(|node| node.parent)
        .and_then(|parent| nodes.get(parent))
        .map_or(Mat4::IDENTITY, |parent| parent.world_xform);

    propagate_iterative(nodes, handle, parent_world);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::node::NodeKind;
    use glam::{Quat, Vec3};

    #[test]
    fn test_hierarchy_update() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();

        let parent = Node::new(NodeKind::Empty)
            .with_local_xform(Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)));
        let parent_handle = nodes.insert(parent);

        let mut child = Node::bone(Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)));
        child.parent = Some(parent_handle);
        let child_handle = nodes.insert(child);

        nodes[parent_handle].children.push(child_handle);

        update_hierarchy(&mut nodes, &[parent_handle]);

        let child_world_pos = nodes[child_handle].world_xform.w_axis.truncate();
        assert!((child_world_pos.x - 1.0).abs() < 1e-5);
        assert!((child_world_pos.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn recursive_and_iterative_agree() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();

        let root = nodes.insert(Node::bone(Mat4::from_rotation_z(0.4)));
        let mut previous = root;
        for i in 0..5 {
            let mut bone = Node::bone(Mat4::from_translation(Vec3::new(0.0, 1.0 + i as f32, 0.0)));
            bone.pose.rotation = Quat::from_rotation_x(0.1 * i as f32);
            bone.parent = Some(previous);
            let handle = nodes.insert(bone);
            nodes[previous].children.push(handle);
            previous = handle;
        }

        propagate(&mut nodes, root, Mat4::IDENTITY);
        let recursive: Vec<Mat4> = nodes.values().map(|n| n.world_xform).collect();

        for node in nodes.values_mut() {
            node.world_xform = Mat4::ZERO;
        }
        propagate_iterative(&mut nodes, root, Mat4::IDENTITY);
        let iterative: Vec<Mat4> = nodes.values().map(|n| n.world_xform).collect();

        for (a, b) in recursive.iter().zip(&iterative) {
            assert!(a.abs_diff_eq(*b, 1e-6));
        }
    }

    #[test]
    fn zero_scale_bone_stays_finite() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();
        let handle = nodes.insert(Node::bone(Mat4::from_scale(Vec3::ZERO)));

        propagate(&mut nodes, handle, Mat4::IDENTITY);

        assert!(nodes[handle].world_xform.is_finite());
    }

    #[test]
    fn pose_matrix_follows_pose_neutrality() {
        let local = Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0));
        let mut bone = Node::bone(local);

        assert!(bone.pose.is_neutral());
        assert_eq!(pose_matrix(&bone), local);

        bone.pose.scale = Vec3::splat(2.0);
        assert!(!bone.pose.is_neutral());
        assert_eq!(pose_matrix(&bone), Mat4::from_scale(Vec3::splat(2.0)));
        assert_eq!(bone.pose.animated_matrix(), Some(pose_matrix(&bone)));

        bone.pose.reset();
        assert_eq!(pose_matrix(&bone), local);
    }
}
