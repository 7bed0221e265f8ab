use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};
use crate::settings::PlaybackSettings;

/// Drives all clips of one loaded asset from a single play head.
///
/// The play head is expressed in seconds and mirrored as an integer frame
/// number for scrubbing UIs. Every tick seeks each clip to the play head,
/// so clips stay in lockstep regardless of their own bounds.
#[derive(Debug, Clone)]
pub struct Timeline {
    clips: Vec<AnimationClip>,
    settings: PlaybackSettings,

    play_head: f32,
    playing: bool,
    pose_refresh_pending: bool,

    first_frame: i32,
    last_frame: i32,
}

impl Timeline {
    #[must_use]
    pub fn new(mut clips: Vec<AnimationClip>, settings: PlaybackSettings) -> Self {
        let settings = settings.sanitized();
        for clip in &mut clips {
            clip.wrap_policy = settings.wrap_policy;
        }

        let fps = settings.frames_per_second;
        let last_frame = clips
            .iter()
            .map(|clip| (fps * clip.max_time()) as i32)
            .max()
            .unwrap_or(0);

        Self {
            clips,
            settings,
            play_head: 0.0,
            playing: false,
            pose_refresh_pending: true,
            first_frame: 0,
            last_frame,
        }
    }

    #[must_use]
    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    pub fn clips_mut(&mut self) -> &mut [AnimationClip] {
        &mut self.clips
    }

    /// Binds every clip against `scene` below `root`.
    /// Returns the total number of unresolved channels.
    pub fn bind_all(&mut self, scene: &Scene, root: NodeHandle) -> usize {
        self.clips.iter_mut().map(|clip| clip.bind(scene, root)).sum()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.settings.looping = looping;
    }

    #[must_use]
    pub fn play_head(&self) -> f32 {
        self.play_head
    }

    /// `(first, last)` frame numbers covered by the clips.
    #[must_use]
    pub fn frame_range(&self) -> (i32, i32) {
        (self.first_frame, self.last_frame)
    }

    #[must_use]
    pub fn current_frame(&self) -> i32 {
        (self.settings.frames_per_second * self.play_head) as i32
    }

    /// Moves the play head and schedules a pose refresh on the next tick,
    /// even while stopped.
    pub fn scrub_to(&mut self, seconds: f32) {
        self.play_head = seconds.max(0.0);
        self.pose_refresh_pending = true;
    }

    /// Scrubs to an integer frame number.
    pub fn scrub_to_frame(&mut self, frame: i32) {
        self.scrub_to(frame as f32 / self.settings.frames_per_second);
    }

    /// Advances the play head by `dt` seconds (when playing) and applies the
    /// resulting pose of every clip to `scene`.
    pub fn tick(&mut self, dt: f32, scene: &mut Scene) {
        if self.playing {
            self.play_head += dt;
        }

        if self.settings.looping && self.current_frame() > self.last_frame {
            log::trace!("Timeline looped at frame {}", self.current_frame());
            self.play_head = self.first_frame as f32 / self.settings.frames_per_second;
        }

        let refresh = self.pose_refresh_pending || self.playing;
        for clip in &mut self.clips {
            clip.set_time(self.play_head);
            clip.set_playing_state(self.playing);
            if refresh {
                clip.apply_pose(scene);
            }
        }

        self.pose_refresh_pending = false;
    }
}
