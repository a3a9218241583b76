use sceneport_foreign::PrimitiveTopology;
use thiserror::Error;

/// Fatal conversion failures. Any of these aborts the whole conversion; no
/// partial native scene is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("node graph is not a tree (cycle through '{node}')")]
    CyclicNodeGraph { node: String },

    #[error("node '{node}' references child index {index}, but the scene has {count} nodes")]
    NodeIndexOutOfRange {
        node: String,
        index: usize,
        count: usize,
    },

    #[error("node '{node}' references mesh index {index}, but the scene has {count} meshes")]
    MeshIndexOutOfRange {
        node: String,
        index: usize,
        count: usize,
    },

    #[error("mesh '{mesh}' has topology {topology:?}; only triangle lists are supported")]
    UnsupportedTopology {
        mesh: String,
        topology: PrimitiveTopology,
    },

    #[error("mesh '{mesh}': {attribute} buffer has {actual} entries for {expected} vertices")]
    BufferLengthMismatch {
        mesh: String,
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("mesh '{mesh}' has {len} indices, which is not a whole number of triangles")]
    NonTriangleIndexCount { mesh: String, len: usize },

    #[error("mesh '{mesh}' index {index} exceeds vertex count {vertices}")]
    IndexOutOfRange {
        mesh: String,
        index: u32,
        vertices: usize,
    },

    #[error("morph target '{target}' of mesh '{mesh}' has {actual} deltas for {expected} vertices")]
    MorphTargetLengthMismatch {
        mesh: String,
        target: String,
        expected: usize,
        actual: usize,
    },

    #[error("bone '{bone}' is part of a parent cycle")]
    CyclicBoneHierarchy { bone: String },

    #[error("bone '{bone}' references parent index {index}, but the scene has {count} bones")]
    BoneParentOutOfRange {
        bone: String,
        index: usize,
        count: usize,
    },
}
