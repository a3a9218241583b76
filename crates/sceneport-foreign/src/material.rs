use glam::Vec4;

/// Shading model tag attached to a foreign material. Decides which native
/// parameter template the material builder starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadingModel {
    /// Classic Phong/Blinn specular shading (OBJ/MTL, FBX, Collada).
    #[default]
    Phong,
    PbrMetallicRoughness,
    PbrSpecularGlossiness,
    Unlit,
}

/// Texture slots the converter understands. Anything else arrives as an
/// unrecognized raw key and is ignored with a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    BaseColor,
    Diffuse,
    Specular,
    Normal,
    Emissive,
    Occlusion,
    MetallicRoughness,
}

/// Closed enum over the recognized foreign property keys, with an explicit
/// variant for everything else so the mapping table stays exhaustive and
/// unknown keys remain loggable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKey {
    BaseColor,
    DiffuseColor,
    SpecularColor,
    EmissiveColor,
    Metallic,
    Roughness,
    Glossiness,
    Shininess,
    Opacity,
    AlphaMode,
    AlphaCutoff,
    TwoSided,
    FlatShading,
    NormalScale,
    OcclusionStrength,
    Texture(TextureKind),
    Other(String),
}

impl PropertyKey {
    /// Maps the raw key strings used by the foreign importer's property bag.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "$clr.base" => Self::BaseColor,
            "$clr.diffuse" => Self::DiffuseColor,
            "$clr.specular" => Self::SpecularColor,
            "$clr.emissive" => Self::EmissiveColor,
            "$mat.metallicFactor" => Self::Metallic,
            "$mat.roughnessFactor" => Self::Roughness,
            "$mat.glossinessFactor" => Self::Glossiness,
            "$mat.shininess" => Self::Shininess,
            "$mat.opacity" => Self::Opacity,
            "$mat.alphaMode" => Self::AlphaMode,
            "$mat.alphaCutoff" => Self::AlphaCutoff,
            "$mat.twosided" => Self::TwoSided,
            "$mat.shadingFlat" => Self::FlatShading,
            "$mat.bumpScaling" => Self::NormalScale,
            "$mat.occlusionStrength" => Self::OcclusionStrength,
            "$tex.base" => Self::Texture(TextureKind::BaseColor),
            "$tex.diffuse" => Self::Texture(TextureKind::Diffuse),
            "$tex.specular" => Self::Texture(TextureKind::Specular),
            "$tex.normals" => Self::Texture(TextureKind::Normal),
            "$tex.emissive" => Self::Texture(TextureKind::Emissive),
            "$tex.occlusion" => Self::Texture(TextureKind::Occlusion),
            "$tex.metallicRoughness" => Self::Texture(TextureKind::MetallicRoughness),
            other => Self::Other(other.to_owned()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Scalar(f32),
    Color(Vec4),
    Text(String),
    Flag(bool),
}

#[derive(Debug, Clone, Default)]
pub struct ForeignMaterial {
    pub name: String,
    pub shading: ShadingModel,
    pub properties: Vec<(PropertyKey, PropertyValue)>,
}

impl ForeignMaterial {
    pub fn with_property(mut self, key: PropertyKey, value: PropertyValue) -> Self {
        self.properties.push((key, value));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_keys_map_to_variants() {
        assert_eq!(PropertyKey::from_raw("$clr.diffuse"), PropertyKey::DiffuseColor);
        assert_eq!(
            PropertyKey::from_raw("$tex.normals"),
            PropertyKey::Texture(TextureKind::Normal)
        );
    }

    #[test]
    fn unknown_raw_key_is_preserved() {
        match PropertyKey::from_raw("$mat.customVendorThing") {
            PropertyKey::Other(raw) => assert_eq!(raw, "$mat.customVendorThing"),
            other => panic!("expected Other, got {other:?}"),
        }
    }
}
