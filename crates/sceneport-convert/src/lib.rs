//! Converts a parsed foreign scene into the native scene graph: node
//! hierarchy, meshes (skinned and morphing), skeleton, materials with
//! resolved textures, and animation clips.

use sceneport_foreign::ForeignScene;
use sceneport_model::NativeScene;
use sceneport_resource::ResourceCache;
use sceneport_texture::{PathEditStrategy, SearchBase, TextureResolver};

pub mod animation;
pub mod armature;
pub mod diagnostics;
pub mod error;
pub mod material;
pub mod mesh;
mod scene;

pub use diagnostics::{Component, Diagnostic, DiagnosticKind, Diagnostics};
pub use error::ConversionError;

#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// Emit a per-resource debug trace while converting.
    pub verbose_logging: bool,
    /// Ordered texture search chain; see [`TextureResolver`].
    pub texture_search_strategies: Vec<PathEditStrategy>,
    /// Where texture candidates are formed. Defaults to the directory
    /// containing the foreign scene's source file.
    pub texture_search_base: Option<SearchBase>,
    pub max_joint_influences_per_vertex: usize,
    /// Generate smooth normals for triangle meshes that carry none.
    pub generate_missing_normals: bool,
    /// Flag vertices whose influence weights sum far from 1.0. Weights are
    /// never renormalized here; that is the renderer's decision.
    pub debug_weight_check: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            verbose_logging: false,
            texture_search_strategies: TextureResolver::default_strategies(),
            texture_search_base: None,
            max_joint_influences_per_vertex: 4,
            generate_missing_normals: true,
            debug_weight_check: false,
        }
    }
}

/// Converts a foreign scene synchronously on the calling thread.
///
/// Fatal input errors ([`ConversionError`]) abort the whole conversion;
/// recoverable conditions (missing textures, dropped animation tracks,
/// duplicate bone names) degrade the result and are logged. Use
/// [`convert_with_diagnostics`] to receive the structured records.
pub fn convert(
    foreign: &ForeignScene,
    options: &ConversionOptions,
    cache: &ResourceCache,
) -> Result<NativeScene, ConversionError> {
    convert_with_diagnostics(foreign, options, cache).map(|(scene, _)| scene)
}

/// Like [`convert`], additionally returning every recoverable diagnostic
/// recorded along the way.
pub fn convert_with_diagnostics(
    foreign: &ForeignScene,
    options: &ConversionOptions,
    cache: &ResourceCache,
) -> Result<(NativeScene, Vec<Diagnostic>), ConversionError> {
    let mut diagnostics = Diagnostics::new(options.verbose_logging);
    let scene = scene::build(foreign, options, cache, &mut diagnostics)?;
    Ok((scene, diagnostics.into_records()))
}
