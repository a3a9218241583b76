use glam::{Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackTarget {
    /// Index into the armature's joint array.
    Joint(u32),
    /// Index into the scene's node array.
    Node(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackValues {
    Translations(Vec<Vec3>),
    Rotations(Vec<Quat>),
    Scales(Vec<Vec3>),
    MorphWeights {
        /// Flattened `weights_per_key` values per keyframe.
        weights: Vec<f32>,
        weights_per_key: usize,
    },
}

impl TrackValues {
    pub fn key_count(&self) -> usize {
        match self {
            Self::Translations(values) | Self::Scales(values) => values.len(),
            Self::Rotations(values) => values.len(),
            Self::MorphWeights {
                weights,
                weights_per_key,
            } => {
                if *weights_per_key == 0 {
                    0
                } else {
                    weights.len() / weights_per_key
                }
            }
        }
    }
}

/// One animated parameter of one target. `times` are seconds, strictly
/// increasing, with one entry per key in `values`.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeTrack {
    pub target: TrackTarget,
    pub times: Vec<f32>,
    pub values: TrackValues,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NativeAnimationClip {
    pub name: String,
    /// Largest keyframe time across all tracks, in seconds.
    pub duration: f32,
    pub tracks: Vec<NativeTrack>,
}
