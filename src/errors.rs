//! Error Types
//!
//! This module defines the error types used by the build and load paths.
//!
//! # Overview
//!
//! [`PoseError`] covers failures that make a clip or a scene graph impossible
//! to construct:
//! - Malformed animation source data (bad sampler index, wrong output length)
//! - Invalid scene graph mutations (unknown handles, self-attachment)
//! - Settings that fail to parse
//!
//! Playback ([`AnimationClip::add_time`](crate::animation::AnimationClip::add_time),
//! [`AnimationClip::apply_pose`](crate::animation::AnimationClip::apply_pose))
//! and propagation never return errors: an unresolved target, a degenerate
//! track or an out-of-range time is recovered locally and only logged.
//!
//! ```rust,ignore
//! use gltf_pose::errors::{PoseError, Result};
//!
//! fn load() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::scene::NodeHandle;

/// The main error type for the animation core.
#[derive(Error, Debug)]
pub enum PoseError {
    // ========================================================================
    // Animation Source Errors
    // ========================================================================
    /// A channel references a sampler that does not exist.
    #[error("Animation '{animation}': channel {channel} references sampler {sampler}, but only {available} exist")]
    SamplerIndexOutOfBounds {
        animation: String,
        channel: usize,
        sampler: usize,
        available: usize,
    },

    /// Sampler input times are not sorted in ascending order.
    #[error("Animation '{animation}': sampler {sampler} has decreasing keyframe times")]
    UnsortedKeyframes { animation: String, sampler: usize },

    /// A keyframe time is NaN or infinite.
    #[error("Animation '{animation}': sampler {sampler} has a non-finite keyframe time")]
    NonFiniteKeyframeTime { animation: String, sampler: usize },

    /// Input and output arrays disagree on the number of keyframes.
    #[error(
        "Animation '{animation}': channel {channel} has {actual} output values, expected {expected}"
    )]
    OutputCountMismatch {
        animation: String,
        channel: usize,
        expected: usize,
        actual: usize,
    },

    // ========================================================================
    // Scene Graph Errors
    // ========================================================================
    /// The handle does not refer to a live node.
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeHandle),

    /// Attempted to make a node its own parent.
    #[error("Cannot attach node {0:?} to itself")]
    SelfAttachment(NodeHandle),

    /// Attaching would place a node below its own descendant.
    #[error("Attaching {child:?} under {parent:?} would create a cycle")]
    CyclicAttachment { child: NodeHandle, parent: NodeHandle },

    /// A source node index is out of range of the supplied node list.
    #[error("Source node index out of bounds: {context} (index: {index})")]
    SourceNodeOutOfBounds {
        /// Description of what was being accessed
        context: String,
        /// The invalid index
        index: usize,
    },

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, PoseError>`.
pub type Result<T> = std::result::Result<T, PoseError>;
