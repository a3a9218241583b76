//! Read-only data model of a parsed foreign scene, as handed over by an
//! external format-specific importer. The converter consumes this and never
//! mutates it.

use std::path::PathBuf;

use glam::Mat4;

pub mod animation;
pub mod material;
pub mod mesh;

pub use animation::{ForeignAnimation, ForeignChannel, ForeignMorphChannel};
pub use material::{ForeignMaterial, PropertyKey, PropertyValue, ShadingModel, TextureKind};
pub use mesh::{ForeignMesh, ForeignMorphTarget, Influence, PrimitiveTopology, VertexAttributes};

/// Identifies a bone the way the foreign format does: positionally or by
/// name. Both schemes occur in the wild, sometimes within one file family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoneRef {
    Index(usize),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParentRef {
    #[default]
    None,
    Index(usize),
    Name(String),
}

#[derive(Debug, Clone)]
pub struct ForeignBone {
    pub name: String,
    pub parent: ParentRef,
    /// Bind-pose offset matrix, taken verbatim into the native joint.
    pub offset_matrix: Mat4,
}

#[derive(Debug, Clone)]
pub struct ForeignNode {
    pub name: String,
    pub transform: Mat4,
    /// Indices into [`ForeignScene::nodes`].
    pub children: Vec<usize>,
    /// Indices into [`ForeignScene::meshes`].
    pub meshes: Vec<usize>,
}

/// A texture embedded in the scene file itself, referenced from material
/// properties as `*<index>`.
#[derive(Debug, Clone)]
pub struct ForeignTexture {
    pub bytes: Vec<u8>,
    /// Format hint from the exporter ("png", "jpg", ...); informational only,
    /// decoding sniffs the actual bytes.
    pub format_hint: String,
}

#[derive(Debug, Clone, Default)]
pub struct ForeignScene {
    pub name: String,
    /// The container file the importer read; used to derive texture search
    /// bases and synthetic keys for embedded resources.
    pub source: PathBuf,
    pub root: usize,
    pub nodes: Vec<ForeignNode>,
    pub meshes: Vec<ForeignMesh>,
    pub materials: Vec<ForeignMaterial>,
    pub bones: Vec<ForeignBone>,
    pub animations: Vec<ForeignAnimation>,
    pub embedded_textures: Vec<ForeignTexture>,
}

impl Default for ForeignNode {
    fn default() -> Self {
        Self {
            name: String::new(),
            transform: Mat4::IDENTITY,
            children: Vec::new(),
            meshes: Vec::new(),
        }
    }
}
