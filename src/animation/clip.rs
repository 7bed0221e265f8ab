use serde::{Deserialize, Serialize};

use crate::animation::binder::Binder;
use crate::animation::channel::Channel;
use crate::animation::tracks::KeyframeTrack;
use crate::scene::{NodeHandle, Scene};

/// How [`AnimationClip::add_time`] folds time that runs past `max_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapPolicy {
    /// `min + (time - max)`, applied once. A delta longer than the clip can
    /// leave the cursor above `max_time` until the next call.
    #[default]
    SingleWrap,
    /// Euclidean remainder over the clip period; always lands in range.
    Modulo,
}

/// A loaded animation: samplers and channels sharing one playback clock.
#[derive(Debug, Clone, Default)]
pub struct AnimationClip {
    pub name: String,
    pub channels: Vec<Channel>,
    pub samplers: Vec<KeyframeTrack>,

    pub wrap_policy: WrapPolicy,

    current_time: f32,
    min_time: f32,
    max_time: f32,
    playing: bool,
}

impl AnimationClip {
    /// Builds a stopped clip and computes its time boundaries.
    #[must_use]
    pub fn new(name: impl Into<String>, samplers: Vec<KeyframeTrack>, channels: Vec<Channel>) -> Self {
        let mut clip = Self {
            name: name.into(),
            channels,
            samplers,
            ..Self::default()
        };
        clip.compute_time_boundaries();
        clip
    }

    #[inline]
    #[must_use]
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    #[inline]
    #[must_use]
    pub fn min_time(&self) -> f32 {
        self.min_time
    }

    #[inline]
    #[must_use]
    pub fn max_time(&self) -> f32 {
        self.max_time
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.max_time - self.min_time
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Switches between playing and stopped. The cursor is left untouched.
    pub fn set_playing_state(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Seeks to `time`, clamped into `[min_time, max_time]`.
    ///
    /// Does not evaluate channels; follow with [`AnimationClip::apply_pose`].
    /// Bounds that cannot be ordered (NaN keyframe times in a hand-built
    /// track) leave the cursor untouched.
    pub fn set_time(&mut self, time: f32) {
        if self.min_time <= self.max_time {
            self.current_time = time.clamp(self.min_time, self.max_time);
        } else {
            log::debug!(
                "Animation '{}' has unordered bounds [{}, {}], ignoring seek",
                self.name,
                self.min_time,
                self.max_time
            );
        }
    }

    /// Advances the cursor by `delta` and wraps past `max_time` according to
    /// [`AnimationClip::wrap_policy`]. Applies the pose when playing.
    pub fn add_time(&mut self, delta: f32, scene: &mut Scene) {
        if self.current_time < self.min_time {
            self.current_time = self.min_time;
        }

        self.current_time += delta;

        if self.current_time > self.max_time {
            self.current_time = match self.wrap_policy {
                WrapPolicy::SingleWrap => self.min_time + (self.current_time - self.max_time),
                WrapPolicy::Modulo => {
                    let period = self.duration();
                    if period > 0.0 {
                        self.min_time + (self.current_time - self.min_time).rem_euclid(period)
                    } else {
                        self.min_time
                    }
                }
            };
        }

        if self.playing {
            self.apply_pose(scene);
        }
    }

    /// Aggregates `[min_time, max_time]` over every sampler with keyframes.
    /// Must run after the samplers are populated and before playback.
    pub fn compute_time_boundaries(&mut self) {
        let bounds = self
            .samplers
            .iter()
            .filter(|s| !s.is_empty())
            .fold(None, |acc: Option<(f32, f32)>, s| match acc {
                Some((lo, hi)) => Some((lo.min(s.min_time()), hi.max(s.max_time()))),
                None => Some((s.min_time(), s.max_time())),
            });

        match bounds {
            Some((min_time, max_time)) => {
                self.min_time = min_time;
                self.max_time = max_time;
            }
            None => {
                log::debug!("Animation '{}' has no keyframes", self.name);
                self.min_time = 0.0;
                self.max_time = 0.0;
            }
        }
    }

    /// Resolves every channel's target against `scene`, searching below `root`.
    /// Returns the number of channels left unresolved.
    pub fn bind(&mut self, scene: &Scene, root: NodeHandle) -> usize {
        Binder::bind(scene, root, self)
    }

    /// Evaluates every channel at the current time, in registration order.
    /// When several channels drive the same property, the last one wins.
    pub fn apply_pose(&self, scene: &mut Scene) {
        for channel in &self.channels {
            let Some(sampler) = self.samplers.get(channel.sampler_index) else {
                log::debug!(
                    "Animation '{}': sampler {} does not exist",
                    self.name,
                    channel.sampler_index
                );
                continue;
            };
            channel.apply(self.current_time, sampler, scene);
        }
    }
}
