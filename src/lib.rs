#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! Skeletal and morph animation core of the glTF viewer.
//!
//! Given a playback time, [`AnimationClip`] evaluates every channel into the
//! poses of a [`Scene`]; the transform system then turns poses into world
//! matrices ready for skinning.
//!
//! ```rust,ignore
//! clip.bind(&scene, root);
//! clip.set_time(1.0);
//! clip.apply_pose(&mut scene);
//! scene.propagate(root, Mat4::IDENTITY);
//! let world = scene.get_node(root).unwrap().world_xform();
//! ```

pub mod animation;
pub mod assets;
pub mod errors;
pub mod scene;
pub mod settings;

pub use animation::{AnimationClip, Binder, Channel, InterpolationMode, KeyframeTrack, TargetPath, Timeline};
pub use assets::{SourceAnimation, SourceNode};
pub use errors::{PoseError, Result};
pub use scene::{Node, NodeHandle, NodeKind, Pose, Scene, Skeleton};
pub use settings::{DebugDrawConfig, PlaybackSettings, ViewerSettings};
