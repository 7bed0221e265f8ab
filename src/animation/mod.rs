//! Keyframe animation evaluation.
//!
//! Data flow for one frame:
//! 1. [`AnimationClip`] advances its clock (or [`Timeline`] seeks every clip).
//! 2. Each [`Channel`] asks its [`KeyframeTrack`] for the bracketing pair.
//! 3. The [`Interpolatable`] implementation blends the stored values.
//! 4. The channel writes the result into the bound node's pose.
//!
//! World matrices are derived afterwards by
//! [`transform_system`](crate::scene::transform_system).

pub mod values;
pub mod tracks;
pub mod channel;
pub mod clip;
pub mod binding;
pub mod binder;
pub mod timeline;

pub use values::Interpolatable;
pub use tracks::{Bracket, InterpolationMode, KeyframeTrack};
pub use channel::{Channel, KeyframeValue};
pub use clip::{AnimationClip, WrapPolicy};
pub use binding::TargetPath;
pub use binder::Binder;
pub use timeline::Timeline;
