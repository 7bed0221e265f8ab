use crate::animation::binding::TargetPath;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

pub struct Binder;

impl Binder {
    /// Resolves each channel's source-node index to a live node under `root`.
    ///
    /// Morph-weight channels whose node is missing, or carries no blend
    /// weights, fall back to `root`: the viewer keeps the asset's morph
    /// weights on the graph root. Channels that cannot be resolved are reset
    /// to `None` so a reloaded graph never keeps stale handles.
    ///
    /// Returns the number of unresolved channels.
    pub fn bind(scene: &Scene, root: NodeHandle, clip: &mut AnimationClip) -> usize {
        let mut unresolved = 0;

        for channel in &mut clip.channels {
            let found = channel
                .target_node
                .and_then(|index| scene.get_node_with_index(root, index));

            channel.target_graph_node = match channel.mode {
                TargetPath::Weight => found
                    .filter(|&handle| {
                        scene
                            .get_node(handle)
                            .is_some_and(|node| !node.pose.blend_weights.is_empty())
                    })
                    .or(Some(root)),
                _ => found,
            };

            if channel.target_graph_node.is_none() {
                log::debug!(
                    "Animation '{}': no node with index {:?} for {:?} channel",
                    clip.name,
                    channel.target_node,
                    channel.mode
                );
                unresolved += 1;
            }
        }

        unresolved
    }
}
