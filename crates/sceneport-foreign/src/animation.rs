use glam::{Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorKey {
    pub time: f64,
    pub value: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuatKey {
    pub time: f64,
    pub value: Quat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightKey {
    pub time: f64,
    /// One weight per morph target of the targeted mesh.
    pub weights: Vec<f32>,
}

/// Transform keyframes for one node or bone. Key times are in ticks; the
/// owning animation's `ticks_per_second` converts them to seconds.
#[derive(Debug, Clone, Default)]
pub struct ForeignChannel {
    /// Node or bone name this channel animates.
    pub target: String,
    pub position_keys: Vec<VectorKey>,
    pub rotation_keys: Vec<QuatKey>,
    pub scale_keys: Vec<VectorKey>,
}

#[derive(Debug, Clone, Default)]
pub struct ForeignMorphChannel {
    pub target: String,
    pub keys: Vec<WeightKey>,
}

#[derive(Debug, Clone, Default)]
pub struct ForeignAnimation {
    pub name: String,
    /// `0.0` means the exporter did not specify a rate.
    pub ticks_per_second: f64,
    pub channels: Vec<ForeignChannel>,
    pub morph_channels: Vec<ForeignMorphChannel>,
}
