use glam::{Mat4, Quat, Vec3};
use smallvec::SmallVec;

/// Morph weights stored inline for the common case of a handful of targets.
pub type BlendWeights = SmallVec<[f32; 8]>;

/// Animated state of a node, written by channels.
///
/// An untouched pose (zero translation, identity rotation, unit scale)
/// produces an identity matrix, which the transform system reads as
/// "not animated" and replaces with the node's bind pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    pub blend_weights: BlendWeights,
    pub target_names: Vec<String>,
}

impl Pose {
    #[must_use]
    pub fn new() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            blend_weights: BlendWeights::new(),
            target_names: Vec::new(),
        }
    }

    /// `translate(translation) * rotate(rotation) * scale(scale)`
    #[inline]
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Decomposes `mat` into translation, rotation and scale.
    /// Shear and projection terms are lost.
    pub fn set_from_matrix(&mut self, mat: Mat4) {
        let (scale, rotation, translation) = mat.to_scale_rotation_translation();
        self.translation = translation;
        self.rotation = rotation;
        self.scale = scale;
    }

    /// Restores the neutral TRS and zeroes the morph weights.
    /// The number of weights and the target names are kept.
    pub fn reset(&mut self) {
        self.translation = Vec3::ZERO;
        self.rotation = Quat::IDENTITY;
        self.scale = Vec3::ONE;
        self.blend_weights.iter_mut().for_each(|w| *w = 0.0);
    }

    /// The pose matrix, or `None` while it is exactly identity (untouched).
    #[inline]
    #[must_use]
    pub fn animated_matrix(&self) -> Option<Mat4> {
        let matrix = self.to_matrix();
        (matrix != Mat4::IDENTITY).then_some(matrix)
    }

    #[inline]
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.animated_matrix().is_none()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new()
    }
}
