/// The pose property a channel writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetPath {
    /// Unknown path; the channel never writes.
    #[default]
    NotAssigned,
    Translation, // Maps to pose.translation
    Scale,       // Maps to pose.scale
    Rotation,    // Maps to pose.rotation
    Weight,      // Maps to pose.blend_weights
}

impl TargetPath {
    /// Maps the interchange-format `target.path` string.
    #[must_use]
    pub fn from_gltf_str(s: &str) -> Self {
        match s {
            "translation" => Self::Translation,
            "rotation" => Self::Rotation,
            "scale" => Self::Scale,
            "weights" => Self::Weight,
            _ => Self::NotAssigned,
        }
    }

    /// Float components per output element, `None` when unassigned.
    #[must_use]
    pub fn components(self) -> Option<usize> {
        match self {
            Self::Translation | Self::Scale => Some(3),
            Self::Rotation => Some(4),
            Self::Weight => Some(1),
            Self::NotAssigned => None,
        }
    }
}
