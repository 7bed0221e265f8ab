//! Scene graph
//!
//! - Node: mesh / bone / empty node with bind pose, pose and world matrix
//! - Pose: animated translation, rotation, scale and morph weights
//! - Scene: node arena and hierarchy queries
//! - TransformSystem: pose → world matrix propagation
//! - Skeleton: joint ordering and skinning matrices

pub mod node;
pub mod pose;
pub mod scene;
pub mod transform_system;
pub mod skeleton;

pub use node::{Node, NodeKind};
pub use pose::{BlendWeights, Pose};
pub use scene::Scene;
pub use skeleton::Skeleton;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
}
