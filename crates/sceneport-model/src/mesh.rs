use std::sync::Arc;

use glam::{Vec2, Vec3, Vec4};

use crate::armature::NativeArmature;

/// Flattened skinning buffers. Joint and weight arrays hold
/// `influences_per_vertex` entries per vertex; vertices with fewer real
/// influences are zero-padded.
#[derive(Debug, Clone)]
pub struct SkinBuffers {
    pub armature: Arc<NativeArmature>,
    pub influences_per_vertex: usize,
    pub joints: Vec<u16>,
    pub weights: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MorphTarget {
    pub name: String,
    pub position_deltas: Vec<Vec3>,
    /// Empty when the target morphs positions only.
    pub normal_deltas: Vec<Vec3>,
}

#[derive(Debug, Clone)]
pub struct NativeMesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uv_sets: Vec<Vec<Vec2>>,
    pub colors: Vec<Vec4>,
    pub indices: Vec<u32>,
    /// Index into the scene's material array.
    pub material: u32,
    pub skin: Option<SkinBuffers>,
    pub morph_targets: Vec<MorphTarget>,
}

impl NativeMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    /// Generates smooth, area-weighted vertex normals from triangle faces.
    pub fn generate_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.positions.len(), Vec3::ZERO);

        for triangle in self.indices.chunks_exact(3) {
            let p0 = self.positions[triangle[0] as usize];
            let p1 = self.positions[triangle[1] as usize];
            let p2 = self.positions[triangle[2] as usize];
            let n = (p1 - p0).cross(p2 - p0);

            self.normals[triangle[0] as usize] += n;
            self.normals[triangle[1] as usize] += n;
            self.normals[triangle[2] as usize] += n;
        }

        for normal in &mut self.normals {
            *normal = normal.normalize_or_zero();
        }
    }
}
