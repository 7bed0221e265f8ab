use glam::{Quat, Vec3};
use smallvec::SmallVec;

use crate::animation::binding::TargetPath;
use crate::animation::tracks::{Bracket, InterpolationMode, KeyframeTrack};
use crate::animation::values::Interpolatable;
use crate::scene::{NodeHandle, Scene};

/// One stored output element of a channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyframeValue {
    /// Translation or scale.
    Vector(Vec3),
    Rotation(Quat),
    /// A single morph weight.
    Weight(f32),
}

impl KeyframeValue {
    #[inline]
    #[must_use]
    pub fn as_vec3(&self) -> Option<Vec3> {
        match *self {
            Self::Vector(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_quat(&self) -> Option<Quat> {
        match *self {
            Self::Rotation(q) => Some(q),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_weight(&self) -> Option<f32> {
        match *self {
            Self::Weight(w) => Some(w),
            _ => None,
        }
    }
}

/// Position of an element inside a cubic-spline keyframe triplet.
#[derive(Debug, Clone, Copy)]
enum SplineElement {
    InTangent = 0,
    Value = 1,
    OutTangent = 2,
}

/// Binds a sampler's output values to one property of one scene node.
///
/// Output layout:
/// - step / linear: one element per keyframe, `stride` consecutive elements
///   per keyframe for morph weights;
/// - cubic spline: `[in_tangent, value, out_tangent]` per keyframe, each of
///   them `stride` elements wide for morph weights.
#[derive(Debug, Clone, Default)]
pub struct Channel {
    /// Source-node index of the animated node.
    pub target_node: Option<usize>,
    /// Live node, resolved by [`Binder::bind`](crate::animation::Binder::bind).
    pub target_graph_node: Option<NodeHandle>,
    pub sampler_index: usize,
    pub mode: TargetPath,
    /// `(element_index, value)` pairs.
    pub keyframes: Vec<(usize, KeyframeValue)>,
}

impl Channel {
    #[must_use]
    pub fn new(target_node: Option<usize>, sampler_index: usize, mode: TargetPath, values: Vec<KeyframeValue>) -> Self {
        Self {
            target_node,
            target_graph_node: None,
            sampler_index,
            mode,
            keyframes: values.into_iter().enumerate().collect(),
        }
    }

    /// Evaluates the channel at `time` and writes the result into the bound
    /// node's pose. Only the property named by [`Channel::mode`] is touched.
    ///
    /// Silently does nothing when the target is unresolved, the track has no
    /// bracket for `time`, or the interpolation mode is unassigned.
    pub fn apply(&self, time: f32, sampler: &KeyframeTrack, scene: &mut Scene) {
        let Some(handle) = self.target_graph_node else {
            return;
        };
        let Some(bracket) = sampler.locate_bracket(time) else {
            return;
        };
        let Some(node) = scene.get_node_mut(handle) else {
            log::debug!("Channel target {handle:?} no longer exists in the scene");
            return;
        };

        let mode = sampler.mode;
        let pose = &mut node.pose;

        match self.mode {
            TargetPath::Translation => {
                if let Some(v) = self.evaluate(mode, &bracket, time, 1, 0, KeyframeValue::as_vec3) {
                    pose.translation = v;
                }
            }
            TargetPath::Scale => {
                if let Some(v) = self.evaluate(mode, &bracket, time, 1, 0, KeyframeValue::as_vec3) {
                    pose.scale = v;
                }
            }
            TargetPath::Rotation => {
                if let Some(q) = self.evaluate(mode, &bracket, time, 1, 0, KeyframeValue::as_quat) {
                    pose.rotation = q;
                }
            }
            TargetPath::Weight => {
                let stride = self.weight_stride(sampler);
                if stride == 0 {
                    return;
                }
                let count = stride.min(pose.blend_weights.len());
                let weights: SmallVec<[Option<f32>; 8]> = (0..count)
                    .map(|w| self.evaluate(mode, &bracket, time, stride, w, KeyframeValue::as_weight))
                    .collect();
                for (target, weight) in pose.blend_weights.iter_mut().zip(weights) {
                    if let Some(weight) = weight {
                        *target = weight;
                    }
                }
            }
            TargetPath::NotAssigned => {}
        }
    }

    /// Morph targets per keyframe, derived from the output length.
    #[must_use]
    pub fn weight_stride(&self, sampler: &KeyframeTrack) -> usize {
        let elements = sampler.len() * sampler.mode.elements_per_keyframe();
        if elements == 0 {
            0
        } else {
            self.keyframes.len() / elements
        }
    }

    fn element_index(
        mode: InterpolationMode,
        frame: usize,
        element: SplineElement,
        stride: usize,
        component: usize,
    ) -> usize {
        match mode {
            InterpolationMode::CubicSpline => (3 * frame + element as usize) * stride + component,
            _ => frame * stride + component,
        }
    }

    fn fetch<T>(
        &self,
        mode: InterpolationMode,
        frame: usize,
        element: SplineElement,
        stride: usize,
        component: usize,
        read: fn(&KeyframeValue) -> Option<T>,
    ) -> Option<T> {
        let index = Self::element_index(mode, frame, element, stride, component);
        let value = self.keyframes.get(index).and_then(|(_, v)| read(v));
        if value.is_none() {
            log::debug!(
                "Channel {:?} has no usable {:?} element at index {index}",
                self.mode,
                element
            );
        }
        value
    }

    fn evaluate<T: Interpolatable>(
        &self,
        mode: InterpolationMode,
        bracket: &Bracket,
        time: f32,
        stride: usize,
        component: usize,
        read: fn(&KeyframeValue) -> Option<T>,
    ) -> Option<T> {
        let value = |frame| self.fetch(mode, frame, SplineElement::Value, stride, component, read);

        match mode {
            InterpolationMode::Step => {
                // The step to the upper key happens on its own timestamp.
                if time >= bracket.upper_time {
                    value(bracket.upper_frame)
                } else {
                    value(bracket.lower_frame)
                }
            }
            InterpolationMode::Linear => {
                let t = bracket.interpolation_value(time);
                Some(T::interpolate_linear(
                    value(bracket.lower_frame)?,
                    value(bracket.upper_frame)?,
                    t,
                ))
            }
            InterpolationMode::CubicSpline => {
                let t = bracket.interpolation_value(time);
                let out_tangent0 = self.fetch(
                    mode,
                    bracket.lower_frame,
                    SplineElement::OutTangent,
                    stride,
                    component,
                    read,
                )?;
                let in_tangent1 = self.fetch(
                    mode,
                    bracket.upper_frame,
                    SplineElement::InTangent,
                    stride,
                    component,
                    read,
                )?;
                Some(T::interpolate_cubic(
                    value(bracket.lower_frame)?,
                    out_tangent0,
                    in_tangent1,
                    value(bracket.upper_frame)?,
                    t,
                    bracket.frame_delta(),
                ))
            }
            InterpolationMode::NotAssigned => None,
        }
    }
}
