//! Viewer Settings
//!
//! Playback and debug-draw configuration handed to the animation core and to
//! the (external) renderer. Every field has a default, so partial JSON
//! documents are accepted:
//!
//! ```rust,ignore
//! use gltf_pose::settings::ViewerSettings;
//!
//! let settings = ViewerSettings::from_json_str(r#"{ "playback": { "looping": false } }"#)?;
//! assert_eq!(settings.playback.frames_per_second, 60.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::animation::WrapPolicy;
use crate::errors::Result;

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

/// Transport configuration for [`Timeline`](crate::animation::Timeline).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Jump back to the first frame after the last one.
    pub looping: bool,
    /// Resolution of the frame counter shown by scrubbing UIs.
    pub frames_per_second: f32,
    /// Wrap rule used by [`AnimationClip::add_time`](crate::animation::AnimationClip::add_time).
    pub wrap_policy: WrapPolicy,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            looping: true,
            frames_per_second: 60.0,
            wrap_policy: WrapPolicy::SingleWrap,
        }
    }
}

impl PlaybackSettings {
    /// Replaces a frame rate that is not a finite positive number with the
    /// default one.
    #[must_use]
    pub fn sanitized(self) -> Self {
        if self.frames_per_second > 0.0 && self.frames_per_second.is_finite() {
            return self;
        }
        log::warn!(
            "Ignoring invalid frames_per_second ({}), using default",
            self.frames_per_second
        );
        Self {
            frames_per_second: Self::default().frames_per_second,
            ..self
        }
    }
}

// ---------------------------------------------------------------------------
// Debug draw
// ---------------------------------------------------------------------------

/// Skeleton overlay toggles read by the renderer when drawing bones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugDrawConfig {
    pub joint_points: bool,
    pub bone_segments: bool,
    pub bone_axes: bool,
    pub mesh_anchor_points: bool,
    /// Point size in pixels for joints and mesh anchors.
    pub joint_point_size: f32,
    /// Length of the drawn local axes.
    pub bone_axis_scale: f32,
}

impl Default for DebugDrawConfig {
    fn default() -> Self {
        Self {
            joint_points: true,
            bone_segments: true,
            bone_axes: true,
            mesh_anchor_points: true,
            joint_point_size: 10.0,
            bone_axis_scale: 0.125,
        }
    }
}

// ---------------------------------------------------------------------------
// ViewerSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub playback: PlaybackSettings,
    pub debug_draw: DebugDrawConfig,
}

impl ViewerSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(Self {
            playback: settings.playback.sanitized(),
            ..settings
        })
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
