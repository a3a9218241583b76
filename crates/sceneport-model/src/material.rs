use glam::{Vec3, Vec4};
use sceneport_resource::ResourceKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaMode {
    #[default]
    Opaque,
    Mask,
    Blend,
}

/// A material texture slot: resolved to an external resource, pointing at a
/// decoded embedded texture, or absent. Absence degrades fidelity but never
/// fails a load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TextureSlot {
    #[default]
    Absent,
    Resource(ResourceKey),
    Embedded(u32),
}

impl TextureSlot {
    pub fn is_set(&self) -> bool {
        !matches!(self, Self::Absent)
    }
}

/// The fixed native material parameter set every foreign shading model is
/// mapped onto.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeMaterial {
    pub name: String,

    pub base_color: Vec4,
    pub metallic: f32,
    pub roughness: f32,
    pub specular: Vec3,
    pub glossiness: f32,
    pub emissive: Vec3,
    pub normal_scale: f32,
    pub occlusion_strength: f32,

    pub alpha_mode: AlphaMode,
    pub alpha_cutoff: f32,
    pub two_sided: bool,
    pub unshaded: bool,
    pub flat_shading: bool,

    pub base_color_texture: TextureSlot,
    pub normal_texture: TextureSlot,
    pub emissive_texture: TextureSlot,
    pub occlusion_texture: TextureSlot,
    pub metallic_roughness_texture: TextureSlot,
    pub specular_texture: TextureSlot,
}

impl Default for NativeMaterial {
    fn default() -> Self {
        NativeMaterial {
            name: String::new(),

            base_color: Vec4::ONE,
            metallic: 0.0,
            roughness: 0.5,
            specular: Vec3::ZERO,
            glossiness: 0.0,
            emissive: Vec3::ZERO,
            normal_scale: 1.0,
            occlusion_strength: 1.0,

            alpha_mode: AlphaMode::Opaque,
            alpha_cutoff: 0.5,
            two_sided: false,
            unshaded: false,
            flat_shading: false,

            base_color_texture: TextureSlot::Absent,
            normal_texture: TextureSlot::Absent,
            emissive_texture: TextureSlot::Absent,
            occlusion_texture: TextureSlot::Absent,
            metallic_roughness_texture: TextureSlot::Absent,
            specular_texture: TextureSlot::Absent,
        }
    }
}
