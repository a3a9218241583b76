use std::collections::HashMap;
use std::path::Path;

use sceneport_foreign::ForeignScene;
use sceneport_model::{NativeMaterial, NativeMesh, NativeNode, NativeScene};
use sceneport_resource::{ResourceCache, ResourceKey};
use sceneport_texture::{SearchBase, TextureImage, TextureResolver};
use sceneport_transform::Transform;
use uuid::Uuid;

use crate::armature::{self, BuiltArmature};
use crate::diagnostics::{Component, DiagnosticKind, Diagnostics};
use crate::error::ConversionError;
use crate::material::{self, MaterialContext};
use crate::{animation, mesh, ConversionOptions};

/// Walks the foreign node hierarchy depth-first and assembles the native
/// scene, dispatching armature, mesh, material and animation conversion for
/// every referenced entity. Meshes and materials convert at most once per
/// foreign index no matter how many nodes share them.
pub(crate) fn build(
    foreign: &ForeignScene,
    options: &ConversionOptions,
    cache: &ResourceCache,
    diagnostics: &mut Diagnostics,
) -> Result<NativeScene, ConversionError> {
    validate_node_graph(foreign)?;

    let built_armature = if foreign.bones.is_empty() {
        None
    } else {
        Some(armature::build(&foreign.bones, diagnostics)?)
    };

    let (embedded_textures, embedded_map) = decode_embedded(foreign, cache, diagnostics);

    let search_base = options.texture_search_base.clone().unwrap_or_else(|| {
        let dir = foreign.source.parent().unwrap_or(Path::new("."));
        SearchBase::Dir(dir.to_path_buf())
    });
    let resolver = TextureResolver::new(options.texture_search_strategies.clone());
    let material_ctx = MaterialContext {
        resolver: &resolver,
        base: &search_base,
        cache,
        embedded: &embedded_map,
    };

    let mut converted = Converted {
        nodes: Vec::with_capacity(foreign.nodes.len()),
        meshes: Vec::new(),
        mesh_memo: vec![None; foreign.meshes.len()],
        material_memo: vec![None; foreign.materials.len().max(1)],
    };

    process_nodes_recursive(
        foreign,
        foreign.root,
        &mut converted,
        built_armature.as_ref(),
        &material_ctx,
        options,
        diagnostics,
    )?;

    // Channel targets resolve against the first node carrying a name, the
    // same rule the armature applies to duplicate bones.
    let mut node_index = HashMap::new();
    for (index, node) in converted.nodes.iter().enumerate() {
        node_index.entry(node.name.clone()).or_insert(index as u32);
    }

    let clips = foreign
        .animations
        .iter()
        .filter_map(|foreign_animation| {
            let clip = animation::build(
                foreign_animation,
                built_armature.as_ref().map(|built| built.armature.as_ref()),
                &node_index,
                diagnostics,
            );
            if let Some(clip) = &clip {
                diagnostics.trace(format_args!(
                    "Converted clip '{}' with {} tracks",
                    clip.name,
                    clip.tracks.len()
                ));
            }
            clip
        })
        .collect();

    let materials = converted
        .material_memo
        .into_iter()
        .enumerate()
        .map(|(index, memo)| {
            memo.unwrap_or_else(|| NativeMaterial {
                name: foreign
                    .materials
                    .get(index)
                    .map(|material| material.name.clone())
                    .unwrap_or_default(),
                ..NativeMaterial::default()
            })
        })
        .collect();

    Ok(NativeScene {
        name: foreign.name.clone(),
        root: 0,
        nodes: converted.nodes,
        meshes: converted.meshes,
        materials,
        armature: built_armature.map(|built| built.armature),
        clips,
        embedded_textures,
        uuid: Uuid::new_v4(),
    })
}

struct Converted {
    nodes: Vec<NativeNode>,
    meshes: Vec<NativeMesh>,
    /// Foreign mesh index → native mesh index, filled on first reference.
    mesh_memo: Vec<Option<u32>>,
    /// Foreign material index → built material, filled on first reference.
    material_memo: Vec<Option<NativeMaterial>>,
}

/// Rejects cyclic or shared-subtree node graphs and out-of-range child
/// indices up front, so the recursive walk below is guaranteed to terminate.
fn validate_node_graph(foreign: &ForeignScene) -> Result<(), ConversionError> {
    let count = foreign.nodes.len();
    if foreign.root >= count {
        return Err(ConversionError::NodeIndexOutOfRange {
            node: "<root>".to_owned(),
            index: foreign.root,
            count,
        });
    }

    let mut visited = vec![false; count];
    let mut stack = vec![foreign.root];
    while let Some(index) = stack.pop() {
        if visited[index] {
            return Err(ConversionError::CyclicNodeGraph {
                node: foreign.nodes[index].name.clone(),
            });
        }
        visited[index] = true;

        for &child in &foreign.nodes[index].children {
            if child >= count {
                return Err(ConversionError::NodeIndexOutOfRange {
                    node: foreign.nodes[index].name.clone(),
                    index: child,
                    count,
                });
            }
            stack.push(child);
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn process_nodes_recursive(
    foreign: &ForeignScene,
    node_index: usize,
    converted: &mut Converted,
    built_armature: Option<&BuiltArmature>,
    material_ctx: &MaterialContext<'_>,
    options: &ConversionOptions,
    diagnostics: &mut Diagnostics,
) -> Result<u32, ConversionError> {
    let node = &foreign.nodes[node_index];
    let native_index = converted.nodes.len() as u32;
    converted.nodes.push(NativeNode {
        name: node.name.clone(),
        transform: Transform::from(node.transform),
        children: Vec::with_capacity(node.children.len()),
        meshes: Vec::with_capacity(node.meshes.len()),
    });

    for &mesh_index in &node.meshes {
        if mesh_index >= foreign.meshes.len() {
            return Err(ConversionError::MeshIndexOutOfRange {
                node: node.name.clone(),
                index: mesh_index,
                count: foreign.meshes.len(),
            });
        }
        let native_mesh = get_or_convert_mesh(
            foreign,
            mesh_index,
            converted,
            built_armature,
            material_ctx,
            options,
            diagnostics,
        )?;
        converted.nodes[native_index as usize].meshes.push(native_mesh);
    }

    for &child in &node.children {
        let native_child = process_nodes_recursive(
            foreign,
            child,
            converted,
            built_armature,
            material_ctx,
            options,
            diagnostics,
        )?;
        converted.nodes[native_index as usize]
            .children
            .push(native_child);
    }

    Ok(native_index)
}

#[allow(clippy::too_many_arguments)]
fn get_or_convert_mesh(
    foreign: &ForeignScene,
    mesh_index: usize,
    converted: &mut Converted,
    built_armature: Option<&BuiltArmature>,
    material_ctx: &MaterialContext<'_>,
    options: &ConversionOptions,
    diagnostics: &mut Diagnostics,
) -> Result<u32, ConversionError> {
    if let Some(existing) = converted.mesh_memo[mesh_index] {
        return Ok(existing);
    }

    let foreign_mesh = &foreign.meshes[mesh_index];
    let material_index = match foreign_mesh.material {
        None => 0,
        Some(index) if index < foreign.materials.len() => index,
        Some(index) => {
            diagnostics.record(
                Component::Mesh,
                &foreign_mesh.name,
                DiagnosticKind::MaterialIndexOutOfRange { index },
            );
            0
        }
    };

    if converted.material_memo[material_index].is_none() {
        let built = match foreign.materials.get(material_index) {
            Some(foreign_material) => material::build(foreign_material, material_ctx, diagnostics),
            None => NativeMaterial::default(),
        };
        diagnostics.trace(format_args!("Converted material '{}'", built.name));
        converted.material_memo[material_index] = Some(built);
    }

    let native = mesh::build(
        foreign_mesh,
        material_index as u32,
        built_armature,
        options,
        diagnostics,
    )?;
    diagnostics.trace(format_args!(
        "Converted mesh '{}' ({} vertices, {} triangles)",
        native.name,
        native.vertex_count(),
        native.triangle_count()
    ));

    let native_index = converted.meshes.len() as u32;
    converted.meshes.push(native);
    converted.mesh_memo[mesh_index] = Some(native_index);
    Ok(native_index)
}

fn decode_embedded(
    foreign: &ForeignScene,
    cache: &ResourceCache,
    diagnostics: &mut Diagnostics,
) -> (Vec<TextureImage>, Vec<Option<u32>>) {
    let mut textures = Vec::new();
    let mut map = Vec::with_capacity(foreign.embedded_textures.len());

    for (index, texture) in foreign.embedded_textures.iter().enumerate() {
        // Embedded blobs stay addressable through the cache under the
        // synthetic key `<source>!*<index>`.
        let key = ResourceKey::archive_entry(&foreign.source, format!("*{index}"));
        cache.insert(&key, texture.bytes.clone());

        match TextureImage::decode(&texture.bytes) {
            Ok(decoded) => {
                diagnostics.trace(format_args!(
                    "Decoded embedded texture {index} ({}x{})",
                    decoded.width(),
                    decoded.height()
                ));
                map.push(Some(textures.len() as u32));
                textures.push(decoded);
            }
            Err(err) => {
                diagnostics.record(
                    Component::Texture,
                    format!("*{index}"),
                    DiagnosticKind::EmbeddedTextureDecodeFailed {
                        index,
                        message: err.to_string(),
                    },
                );
                map.push(None);
            }
        }
    }

    (textures, map)
}
