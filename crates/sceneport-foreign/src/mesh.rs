use bitflags::bitflags;
use glam::{Vec2, Vec3, Vec4};

use crate::BoneRef;

/// Most formats cap UV sets well below this; anything beyond is discarded by
/// the importer before the scene reaches the converter.
pub const MAX_UV_SETS: usize = 4;

bitflags! {
    /// Which per-vertex attribute arrays a mesh carries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct VertexAttributes: u32 {
        const POSITION = 1 << 0;
        const NORMAL = 1 << 1;
        const UV = 1 << 2;
        const COLOR = 1 << 3;
        const SKIN = 1 << 4;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    Points,
    Lines,
    TriangleList,
    Polygon,
}

/// One bone's pull on one vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Influence {
    pub bone: BoneRef,
    pub weight: f32,
}

/// Per-vertex deltas relative to the base mesh. `normal_deltas` is empty when
/// the exporter only wrote position morphs.
#[derive(Debug, Clone)]
pub struct ForeignMorphTarget {
    pub name: String,
    pub position_deltas: Vec<Vec3>,
    pub normal_deltas: Vec<Vec3>,
}

#[derive(Debug, Clone, Default)]
pub struct ForeignMesh {
    pub name: String,
    pub topology: PrimitiveTopology,
    pub positions: Vec<Vec3>,
    /// Empty when the format carried no normals.
    pub normals: Vec<Vec3>,
    pub uv_sets: Vec<Vec<Vec2>>,
    /// Empty when the format carried no vertex colors.
    pub colors: Vec<Vec4>,
    pub indices: Vec<u32>,
    /// Index into the scene's material array.
    pub material: Option<usize>,
    /// Per-vertex influence lists; empty when the mesh is not skinned.
    pub influences: Vec<Vec<Influence>>,
    pub morph_targets: Vec<ForeignMorphTarget>,
}

impl Default for PrimitiveTopology {
    fn default() -> Self {
        Self::TriangleList
    }
}

impl ForeignMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn attributes(&self) -> VertexAttributes {
        let mut attributes = VertexAttributes::empty();
        if !self.positions.is_empty() {
            attributes |= VertexAttributes::POSITION;
        }
        if !self.normals.is_empty() {
            attributes |= VertexAttributes::NORMAL;
        }
        if self.uv_sets.iter().any(|set| !set.is_empty()) {
            attributes |= VertexAttributes::UV;
        }
        if !self.colors.is_empty() {
            attributes |= VertexAttributes::COLOR;
        }
        if !self.influences.is_empty() {
            attributes |= VertexAttributes::SKIN;
        }
        attributes
    }
}
