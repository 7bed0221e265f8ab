/// How a sampler blends between two keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Unknown or missing interpolation; channels driven by it never write.
    #[default]
    NotAssigned,
    Step,
    Linear,
    CubicSpline,
}

impl InterpolationMode {
    /// Maps the interchange-format interpolation string.
    /// Unknown strings map to [`InterpolationMode::NotAssigned`].
    #[must_use]
    pub fn from_gltf_str(s: &str) -> Self {
        match s {
            "STEP" => Self::Step,
            "LINEAR" => Self::Linear,
            "CUBICSPLINE" => Self::CubicSpline,
            _ => Self::NotAssigned,
        }
    }

    /// Number of stored output elements per keyframe.
    #[inline]
    #[must_use]
    pub fn elements_per_keyframe(self) -> usize {
        match self {
            Self::CubicSpline => 3,
            _ => 1,
        }
    }
}

/// The two keyframes surrounding a query time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub lower_frame: usize,
    pub upper_frame: usize,
    pub lower_time: f32,
    pub upper_time: f32,
}

impl Bracket {
    /// Bracket duration, used to scale cubic-spline tangents.
    #[inline]
    #[must_use]
    pub fn frame_delta(&self) -> f32 {
        self.upper_time - self.lower_time
    }

    /// Maps `time` from `[lower_time, upper_time]` to `[0, 1]`.
    /// A zero-length bracket (duplicated key time) yields 0.
    #[must_use]
    pub fn interpolation_value(&self, time: f32) -> f32 {
        let dt = self.frame_delta();
        if dt > 0.0 {
            ((time - self.lower_time) / dt).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// A sampler's input: keyframe times with their frame indices.
///
/// Immutable once loaded. Output values live in the channels that
/// reference this track, indexed by the frame index stored here.
#[derive(Debug, Clone, Default)]
pub struct KeyframeTrack {
    /// `(frame_index, time)` pairs, non-decreasing in time.
    pub keyframes: Vec<(usize, f32)>,
    pub mode: InterpolationMode,
    min_v: f32,
    max_v: f32,
}

impl KeyframeTrack {
    #[must_use]
    pub fn new(times: Vec<f32>, mode: InterpolationMode) -> Self {
        let keyframes = times.into_iter().enumerate().collect();
        Self::from_keyframes(keyframes, mode)
    }

    #[must_use]
    pub fn from_keyframes(keyframes: Vec<(usize, f32)>, mode: InterpolationMode) -> Self {
        let (min_v, max_v) = keyframes
            .iter()
            .map(|&(_, t)| t)
            .fold(None, |acc: Option<(f32, f32)>, t| match acc {
                Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
                None => Some((t, t)),
            })
            .unwrap_or((0.0, 0.0));

        Self {
            keyframes,
            mode,
            min_v,
            max_v,
        }
    }

    #[inline]
    #[must_use]
    pub fn min_time(&self) -> f32 {
        self.min_v
    }

    #[inline]
    #[must_use]
    pub fn max_time(&self) -> f32 {
        self.max_v
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Finds the first consecutive pair `(kf[i], kf[i + 1])` whose closed
    /// interval contains `time`.
    ///
    /// Returns `None` for tracks with fewer than two keyframes, for times
    /// outside the track and for NaN. Uses a binary search over the upper
    /// bounds; the result is identical to a front-to-back linear scan.
    #[must_use]
    pub fn locate_bracket(&self, time: f32) -> Option<Bracket> {
        if self.keyframes.len() < 2 {
            return None;
        }

        // First upper keyframe whose time reaches `time`. Every pair before it
        // ends strictly before `time` and cannot contain it.
        let upper = 1 + self.keyframes[1..].partition_point(|&(_, t)| t < time);
        if upper >= self.keyframes.len() {
            return None;
        }

        let (lower_frame, lower_time) = self.keyframes[upper - 1];
        let (upper_frame, upper_time) = self.keyframes[upper];

        if lower_time <= time && time <= upper_time {
            Some(Bracket {
                lower_frame,
                upper_frame,
                lower_time,
                upper_time,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locate_linear(track: &KeyframeTrack, time: f32) -> Option<Bracket> {
        track.keyframes.windows(2).find_map(|pair| {
            let (lower_frame, lower_time) = pair[0];
            let (upper_frame, upper_time) = pair[1];
            (lower_time <= time && upper_time >= time).then_some(Bracket {
                lower_frame,
                upper_frame,
                lower_time,
                upper_time,
            })
        })
    }

    #[test]
    fn binary_search_matches_linear_scan() {
        let track = KeyframeTrack::new(
            vec![0.0, 0.5, 0.5, 1.0, 2.0, 2.0, 2.0, 3.5],
            InterpolationMode::Linear,
        );

        let mut t = -1.0;
        while t <= 4.5 {
            assert_eq!(track.locate_bracket(t), locate_linear(&track, t), "time {t}");
            t += 0.125;
        }
        for t in [0.5, 2.0, 3.5, f32::NAN] {
            assert_eq!(track.locate_bracket(t), locate_linear(&track, t));
        }
    }

    #[test]
    fn single_keyframe_has_no_bracket() {
        let track = KeyframeTrack::new(vec![1.0], InterpolationMode::Linear);
        assert!(track.locate_bracket(1.0).is_none());
        assert_eq!(track.min_time(), 1.0);
        assert_eq!(track.max_time(), 1.0);
    }

    #[test]
    fn duplicated_time_gives_zero_interpolation_value() {
        let track = KeyframeTrack::new(vec![1.0, 1.0], InterpolationMode::Linear);
        let bracket = track.locate_bracket(1.0).unwrap();
        assert_eq!(bracket.interpolation_value(1.0), 0.0);
    }

    #[test]
    fn mode_strings() {
        assert_eq!(InterpolationMode::from_gltf_str("STEP"), InterpolationMode::Step);
        assert_eq!(InterpolationMode::from_gltf_str("LINEAR"), InterpolationMode::Linear);
        assert_eq!(
            InterpolationMode::from_gltf_str("CUBICSPLINE"),
            InterpolationMode::CubicSpline
        );
        assert_eq!(InterpolationMode::from_gltf_str("linear"), InterpolationMode::NotAssigned);
    }
}
