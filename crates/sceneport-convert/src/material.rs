use glam::{Vec3, Vec4};
use sceneport_foreign::{ForeignMaterial, PropertyKey, PropertyValue, ShadingModel, TextureKind};
use sceneport_model::{AlphaMode, NativeMaterial, TextureSlot};
use sceneport_resource::ResourceCache;
use sceneport_texture::{SearchBase, TextureResolver};

use crate::diagnostics::{Component, DiagnosticKind, Diagnostics};

/// Everything the material builder needs to turn texture references into
/// slots: the search chain, where to search, and the embedded-texture remap
/// produced while decoding the scene's blobs.
pub struct MaterialContext<'a> {
    pub resolver: &'a TextureResolver,
    pub base: &'a SearchBase,
    pub cache: &'a ResourceCache,
    /// Foreign embedded-texture index → index into the scene's decoded
    /// textures; `None` for blobs that failed to decode.
    pub embedded: &'a [Option<u32>],
}

/// Maps a foreign material's property bag onto the fixed native parameter
/// set. Never fails: unresolvable textures leave their slot unset and
/// unrecognized keys are logged and ignored. Output is deterministic for a
/// given material and resolver configuration.
pub fn build(
    material: &ForeignMaterial,
    ctx: &MaterialContext<'_>,
    diagnostics: &mut Diagnostics,
) -> NativeMaterial {
    let mut native = template_for(material.shading);
    native.name = material.name.clone();

    for (key, value) in &material.properties {
        apply_property(&mut native, material, key, value, ctx, diagnostics);
    }

    native
}

/// Shading-model-dependent starting points. The property pass only overrides
/// what the foreign material actually specifies.
fn template_for(shading: ShadingModel) -> NativeMaterial {
    let mut template = NativeMaterial::default();
    match shading {
        ShadingModel::Phong => {
            template.specular = Vec3::ONE;
        }
        ShadingModel::PbrMetallicRoughness => {
            template.metallic = 1.0;
            template.roughness = 1.0;
        }
        ShadingModel::PbrSpecularGlossiness => {
            template.specular = Vec3::ONE;
            template.glossiness = 1.0;
        }
        ShadingModel::Unlit => {
            template.unshaded = true;
        }
    }
    template
}

fn apply_property(
    native: &mut NativeMaterial,
    material: &ForeignMaterial,
    key: &PropertyKey,
    value: &PropertyValue,
    ctx: &MaterialContext<'_>,
    diagnostics: &mut Diagnostics,
) {
    match (key, value) {
        (PropertyKey::BaseColor | PropertyKey::DiffuseColor, PropertyValue::Color(color)) => {
            native.base_color = clamp_color(*color);
        }
        (PropertyKey::SpecularColor, PropertyValue::Color(color)) => {
            native.specular = clamp_color(*color).truncate();
        }
        (PropertyKey::EmissiveColor, PropertyValue::Color(color)) => {
            native.emissive = clamp_color(*color).truncate();
        }
        (PropertyKey::Metallic, PropertyValue::Scalar(scalar)) => {
            native.metallic = scalar.clamp(0.0, 1.0);
        }
        (PropertyKey::Roughness, PropertyValue::Scalar(scalar)) => {
            native.roughness = scalar.clamp(0.0, 1.0);
        }
        (PropertyKey::Glossiness, PropertyValue::Scalar(scalar)) => {
            native.glossiness = scalar.clamp(0.0, 1.0);
        }
        (PropertyKey::Shininess, PropertyValue::Scalar(scalar)) => {
            // Phong exponent, conventionally 0..128.
            native.glossiness = (scalar / 128.0).clamp(0.0, 1.0);
            native.roughness = 1.0 - native.glossiness;
        }
        (PropertyKey::Opacity, PropertyValue::Scalar(scalar)) => {
            native.base_color.w = scalar.clamp(0.0, 1.0);
            if native.base_color.w < 1.0 {
                native.alpha_mode = AlphaMode::Blend;
            }
        }
        (PropertyKey::AlphaMode, PropertyValue::Text(text)) => {
            native.alpha_mode = parse_alpha_mode(text, &material.name, diagnostics);
        }
        (PropertyKey::AlphaCutoff, PropertyValue::Scalar(scalar)) => {
            native.alpha_cutoff = scalar.clamp(0.0, 1.0);
        }
        (PropertyKey::TwoSided, PropertyValue::Flag(flag)) => {
            native.two_sided = *flag;
        }
        (PropertyKey::FlatShading, PropertyValue::Flag(flag)) => {
            native.flat_shading = *flag;
        }
        (PropertyKey::NormalScale, PropertyValue::Scalar(scalar)) => {
            native.normal_scale = scalar.max(0.0);
        }
        (PropertyKey::OcclusionStrength, PropertyValue::Scalar(scalar)) => {
            native.occlusion_strength = scalar.clamp(0.0, 1.0);
        }
        (PropertyKey::Texture(kind), PropertyValue::Text(reference)) => {
            let slot = resolve_slot(reference, &material.name, ctx, diagnostics);
            *slot_for(native, *kind) = slot;
        }
        (PropertyKey::Other(raw), _) => {
            diagnostics.record_minor(
                Component::Material,
                &material.name,
                DiagnosticKind::UnrecognizedProperty { key: raw.clone() },
            );
        }
        (key, _) => {
            diagnostics.record(
                Component::Material,
                &material.name,
                DiagnosticKind::PropertyValueMismatch {
                    key: format!("{key:?}"),
                },
            );
        }
    }
}

fn clamp_color(color: Vec4) -> Vec4 {
    color.clamp(Vec4::ZERO, Vec4::ONE)
}

fn parse_alpha_mode(text: &str, material: &str, diagnostics: &mut Diagnostics) -> AlphaMode {
    match text.to_ascii_uppercase().as_str() {
        "OPAQUE" => AlphaMode::Opaque,
        "MASK" => AlphaMode::Mask,
        "BLEND" => AlphaMode::Blend,
        _ => {
            diagnostics.record(
                Component::Material,
                material,
                DiagnosticKind::UnknownAlphaMode {
                    value: text.to_owned(),
                },
            );
            AlphaMode::Opaque
        }
    }
}

fn slot_for(native: &mut NativeMaterial, kind: TextureKind) -> &mut TextureSlot {
    match kind {
        TextureKind::BaseColor | TextureKind::Diffuse => &mut native.base_color_texture,
        TextureKind::Specular => &mut native.specular_texture,
        TextureKind::Normal => &mut native.normal_texture,
        TextureKind::Emissive => &mut native.emissive_texture,
        TextureKind::Occlusion => &mut native.occlusion_texture,
        TextureKind::MetallicRoughness => &mut native.metallic_roughness_texture,
    }
}

fn resolve_slot(
    reference: &str,
    material: &str,
    ctx: &MaterialContext<'_>,
    diagnostics: &mut Diagnostics,
) -> TextureSlot {
    // `*<index>` references select textures embedded in the scene file.
    if let Some(index) = reference.strip_prefix('*') {
        let decoded = index
            .parse::<usize>()
            .ok()
            .and_then(|index| ctx.embedded.get(index).copied().flatten());
        return match decoded {
            Some(index) => TextureSlot::Embedded(index),
            None => {
                diagnostics.record(
                    Component::Texture,
                    material,
                    DiagnosticKind::EmbeddedTextureUnavailable {
                        reference: reference.to_owned(),
                    },
                );
                TextureSlot::Absent
            }
        };
    }

    match ctx.resolver.resolve(reference, ctx.base, ctx.cache) {
        Some(key) => TextureSlot::Resource(key),
        None => {
            diagnostics.record(
                Component::Texture,
                material,
                DiagnosticKind::MissingTexture {
                    reference: reference.to_owned(),
                    base: ctx.base.to_string(),
                },
            );
            TextureSlot::Absent
        }
    }
}
