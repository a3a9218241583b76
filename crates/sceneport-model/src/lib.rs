use std::sync::Arc;

use sceneport_texture::TextureImage;
use sceneport_transform::Transform;
use uuid::Uuid;

pub mod animation;
pub mod armature;
pub mod material;
pub mod mesh;

pub use animation::{NativeAnimationClip, NativeTrack, TrackTarget, TrackValues};
pub use armature::{Joint, NativeArmature};
pub use material::{AlphaMode, NativeMaterial, TextureSlot};
pub use mesh::{MorphTarget, NativeMesh, SkinBuffers};

#[derive(Debug, Clone, PartialEq)]
pub struct NativeNode {
    pub name: String,

    pub transform: Transform,
    /// Indices into [`NativeScene::nodes`].
    pub children: Vec<u32>,

    /// Indices into [`NativeScene::meshes`].
    pub meshes: Vec<u32>,
}

/// The converted scene graph. Owns all of its data; nothing references back
/// into the foreign scene it was built from.
#[derive(Debug)]
pub struct NativeScene {
    pub name: String,
    pub root: u32,
    pub nodes: Vec<NativeNode>,
    pub meshes: Vec<NativeMesh>,
    pub materials: Vec<NativeMaterial>,
    /// At most one skeleton per scene, shared by every skinned mesh.
    pub armature: Option<Arc<NativeArmature>>,
    pub clips: Vec<NativeAnimationClip>,
    /// Textures that were embedded in the scene file, decoded. Material
    /// slots reference them by index.
    pub embedded_textures: Vec<TextureImage>,
    pub uuid: Uuid,
}
