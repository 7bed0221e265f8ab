use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::animation::binding::TargetPath;
use crate::animation::channel::{Channel, KeyframeValue};
use crate::animation::clip::AnimationClip;
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::errors::{PoseError, Result};

/// Decoded sampler: interpolation string plus input times in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSampler {
    pub interpolation: String,
    pub input: Vec<f32>,
}

/// Decoded channel: target, path string and the flattened output accessor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceChannel {
    pub target_node: Option<usize>,
    pub target_path: String,
    pub sampler: usize,
    pub output: Vec<f32>,
}

/// An animation as handed over by the interchange-format loader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceAnimation {
    pub name: String,
    pub samplers: Vec<SourceSampler>,
    pub channels: Vec<SourceChannel>,
}

impl SourceAnimation {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl AnimationClip {
    /// Converts a decoded animation into a clip ready for binding.
    ///
    /// `index` names the clip `animation_<index>` when the source has no name.
    pub fn from_source(index: usize, source: &SourceAnimation) -> Result<Self> {
        let name = if source.name.is_empty() {
            format!("animation_{index}")
        } else {
            source.name.clone()
        };

        let samplers = source
            .samplers
            .iter()
            .enumerate()
            .map(|(i, sampler)| load_sampler(&name, i, sampler))
            .collect::<Result<Vec<_>>>()?;

        let channels = source
            .channels
            .iter()
            .enumerate()
            .map(|(i, channel)| load_channel(&name, i, channel, &samplers))
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "Loaded animation '{name}': {} samplers, {} channels",
            samplers.len(),
            channels.len()
        );

        Ok(Self::new(name, samplers, channels))
    }
}

/// Converts every animation of an asset, in order.
pub fn load_animations(sources: &[SourceAnimation]) -> Result<Vec<AnimationClip>> {
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| AnimationClip::from_source(i, source))
        .collect()
}

fn load_sampler(animation: &str, index: usize, source: &SourceSampler) -> Result<KeyframeTrack> {
    if source.input.iter().any(|t| !t.is_finite()) {
        return Err(PoseError::NonFiniteKeyframeTime {
            animation: animation.to_string(),
            sampler: index,
        });
    }

    if source.input.windows(2).any(|w| w[1] < w[0]) {
        return Err(PoseError::UnsortedKeyframes {
            animation: animation.to_string(),
            sampler: index,
        });
    }

    let mode = InterpolationMode::from_gltf_str(&source.interpolation);
    if mode == InterpolationMode::NotAssigned {
        log::warn!(
            "Animation '{animation}': sampler {index} has unknown interpolation '{}'",
            source.interpolation
        );
    }

    Ok(KeyframeTrack::new(source.input.clone(), mode))
}

fn load_channel(
    animation: &str,
    index: usize,
    source: &SourceChannel,
    samplers: &[KeyframeTrack],
) -> Result<Channel> {
    let sampler = samplers
        .get(source.sampler)
        .ok_or_else(|| PoseError::SamplerIndexOutOfBounds {
            animation: animation.to_string(),
            channel: index,
            sampler: source.sampler,
            available: samplers.len(),
        })?;

    let mode = TargetPath::from_gltf_str(&source.target_path);
    let Some(components) = mode.components() else {
        log::warn!(
            "Animation '{animation}': channel {index} has unknown path '{}'",
            source.target_path
        );
        return Ok(Channel::new(source.target_node, source.sampler, mode, Vec::new()));
    };

    let elements = sampler.len() * sampler.mode.elements_per_keyframe();
    let mismatch = |expected: usize| PoseError::OutputCountMismatch {
        animation: animation.to_string(),
        channel: index,
        expected,
        actual: source.output.len(),
    };

    match mode {
        // Any whole number of morph targets per keyframe.
        TargetPath::Weight => {
            let fits = if elements == 0 {
                source.output.is_empty()
            } else {
                source.output.len() % elements == 0
            };
            if !fits {
                return Err(mismatch(elements));
            }
        }
        _ => {
            if source.output.len() != elements * components {
                return Err(mismatch(elements * components));
            }
        }
    }

    let cubic = sampler.mode == InterpolationMode::CubicSpline;
    let values = source
        .output
        .chunks_exact(components)
        .enumerate()
        .map(|(i, c)| match mode {
            TargetPath::Rotation => {
                let q = Quat::from_xyzw(c[0], c[1], c[2], c[3]);
                // Tangents are not rotations; only keyframe values are normalized.
                let is_value = !cubic || i % 3 == 1;
                KeyframeValue::Rotation(if is_value { q.normalize() } else { q })
            }
            TargetPath::Weight => KeyframeValue::Weight(c[0]),
            _ => KeyframeValue::Vector(Vec3::new(c[0], c[1], c[2])),
        })
        .collect();

    Ok(Channel::new(source.target_node, source.sampler, mode, values))
}
