use sceneport_foreign::{BoneRef, ForeignMesh, PrimitiveTopology, VertexAttributes};
use sceneport_model::{MorphTarget, NativeMesh, SkinBuffers};

use crate::armature::BuiltArmature;
use crate::diagnostics::{Component, DiagnosticKind, Diagnostics};
use crate::error::ConversionError;
use crate::ConversionOptions;

/// Converts one foreign mesh into native buffers. Attribute arrays are
/// copied verbatim after length validation; skinning influences are remapped
/// onto dense joint indices and zero-padded to the configured width.
pub fn build(
    mesh: &ForeignMesh,
    material: u32,
    armature: Option<&BuiltArmature>,
    options: &ConversionOptions,
    diagnostics: &mut Diagnostics,
) -> Result<NativeMesh, ConversionError> {
    if mesh.topology != PrimitiveTopology::TriangleList {
        return Err(ConversionError::UnsupportedTopology {
            mesh: mesh.name.clone(),
            topology: mesh.topology,
        });
    }

    let vertices = mesh.vertex_count();
    validate_len(mesh, "normal", mesh.normals.len(), vertices, true)?;
    validate_len(mesh, "color", mesh.colors.len(), vertices, true)?;
    for set in &mesh.uv_sets {
        validate_len(mesh, "uv", set.len(), vertices, true)?;
    }
    if !mesh.influences.is_empty() {
        validate_len(mesh, "influence", mesh.influences.len(), vertices, false)?;
    }

    if mesh.indices.len() % 3 != 0 {
        return Err(ConversionError::NonTriangleIndexCount {
            mesh: mesh.name.clone(),
            len: mesh.indices.len(),
        });
    }
    if let Some(&index) = mesh.indices.iter().find(|&&index| index as usize >= vertices) {
        return Err(ConversionError::IndexOutOfRange {
            mesh: mesh.name.clone(),
            index,
            vertices,
        });
    }

    let attributes = mesh.attributes();
    let morph_targets = convert_morph_targets(mesh)?;
    let skin = if attributes.contains(VertexAttributes::SKIN) {
        convert_skin(mesh, armature, options, diagnostics)
    } else {
        None
    };

    let mut native = NativeMesh {
        name: mesh.name.clone(),
        positions: mesh.positions.clone(),
        normals: mesh.normals.clone(),
        uv_sets: mesh.uv_sets.clone(),
        colors: mesh.colors.clone(),
        indices: mesh.indices.clone(),
        material,
        skin,
        morph_targets,
    };

    if !attributes.contains(VertexAttributes::NORMAL) && options.generate_missing_normals {
        native.generate_normals();
    }

    Ok(native)
}

fn validate_len(
    mesh: &ForeignMesh,
    attribute: &'static str,
    actual: usize,
    expected: usize,
    empty_means_absent: bool,
) -> Result<(), ConversionError> {
    if actual == expected || (empty_means_absent && actual == 0) {
        Ok(())
    } else {
        Err(ConversionError::BufferLengthMismatch {
            mesh: mesh.name.clone(),
            attribute,
            expected,
            actual,
        })
    }
}

fn convert_morph_targets(mesh: &ForeignMesh) -> Result<Vec<MorphTarget>, ConversionError> {
    let vertices = mesh.vertex_count();
    mesh.morph_targets
        .iter()
        .map(|target| {
            if target.position_deltas.len() != vertices
                || (!target.normal_deltas.is_empty() && target.normal_deltas.len() != vertices)
            {
                return Err(ConversionError::MorphTargetLengthMismatch {
                    mesh: mesh.name.clone(),
                    target: target.name.clone(),
                    expected: vertices,
                    actual: target.position_deltas.len(),
                });
            }
            Ok(MorphTarget {
                name: target.name.clone(),
                position_deltas: target.position_deltas.clone(),
                normal_deltas: target.normal_deltas.clone(),
            })
        })
        .collect()
}

fn convert_skin(
    mesh: &ForeignMesh,
    armature: Option<&BuiltArmature>,
    options: &ConversionOptions,
    diagnostics: &mut Diagnostics,
) -> Option<SkinBuffers> {
    if mesh.influences.is_empty() {
        return None;
    }

    let built = match armature {
        Some(built) => built,
        None => {
            diagnostics.record(Component::Mesh, &mesh.name, DiagnosticKind::SkinWithoutArmature);
            return None;
        }
    };

    let max = options.max_joint_influences_per_vertex;
    let mut joints = vec![0u16; mesh.influences.len() * max];
    let mut weights = vec![0.0f32; mesh.influences.len() * max];
    let mut truncated_vertices = 0;

    for (vertex, influences) in mesh.influences.iter().enumerate() {
        let mut resolved: Vec<(u16, f32)> = Vec::with_capacity(influences.len());
        for influence in influences {
            let joint = match &influence.bone {
                BoneRef::Index(index) => built.foreign_to_joint.get(*index).copied(),
                BoneRef::Name(name) => built.armature.find_joint(name),
            };
            match joint {
                Some(joint) => resolved.push((joint as u16, influence.weight)),
                None => diagnostics.record(
                    Component::Mesh,
                    &mesh.name,
                    DiagnosticKind::UnresolvedBoneInfluence {
                        bone: bone_label(&influence.bone),
                    },
                ),
            }
        }

        if resolved.len() > max {
            resolved.sort_by(|a, b| b.1.total_cmp(&a.1));
            resolved.truncate(max);
            truncated_vertices += 1;
        }

        if options.debug_weight_check {
            let sum: f32 = resolved.iter().map(|(_, weight)| weight).sum();
            if !resolved.is_empty() && (sum - 1.0).abs() > 1e-2 {
                diagnostics.record(
                    Component::Mesh,
                    &mesh.name,
                    DiagnosticKind::WeightSumOutOfRange { vertex, sum },
                );
            }
        }

        for (slot, (joint, weight)) in resolved.into_iter().enumerate() {
            joints[vertex * max + slot] = joint;
            weights[vertex * max + slot] = weight;
        }
    }

    if truncated_vertices > 0 {
        diagnostics.record(
            Component::Mesh,
            &mesh.name,
            DiagnosticKind::TruncatedInfluences {
                vertices: truncated_vertices,
                max,
            },
        );
    }

    Some(SkinBuffers {
        armature: built.armature.clone(),
        influences_per_vertex: max,
        joints,
        weights,
    })
}

fn bone_label(bone: &BoneRef) -> String {
    match bone {
        BoneRef::Index(index) => format!("#{index}"),
        BoneRef::Name(name) => name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::armature;
    use glam::{Mat4, Vec3};
    use sceneport_foreign::{ForeignBone, ForeignMorphTarget, Influence, ParentRef};

    fn triangle() -> ForeignMesh {
        ForeignMesh {
            name: "tri".to_owned(),
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            indices: vec![0, 1, 2],
            ..Default::default()
        }
    }

    fn two_bone_armature(diagnostics: &mut Diagnostics) -> BuiltArmature {
        let bones = vec![
            ForeignBone {
                name: "root".to_owned(),
                parent: ParentRef::None,
                offset_matrix: Mat4::IDENTITY,
            },
            ForeignBone {
                name: "tip".to_owned(),
                parent: ParentRef::Index(0),
                offset_matrix: Mat4::IDENTITY,
            },
        ];
        armature::build(&bones, diagnostics).expect("armature")
    }

    #[test]
    fn non_triangle_topology_is_fatal() {
        let mut mesh = triangle();
        mesh.topology = PrimitiveTopology::Lines;
        let mut diagnostics = Diagnostics::new(false);
        let err = build(&mesh, 0, None, &ConversionOptions::default(), &mut diagnostics)
            .unwrap_err();
        assert!(matches!(err, ConversionError::UnsupportedTopology { .. }));
    }

    #[test]
    fn attribute_length_mismatch_is_fatal() {
        let mut mesh = triangle();
        mesh.normals = vec![Vec3::Z; 2];
        let mut diagnostics = Diagnostics::new(false);
        let err = build(&mesh, 0, None, &ConversionOptions::default(), &mut diagnostics)
            .unwrap_err();
        assert!(matches!(
            err,
            ConversionError::BufferLengthMismatch {
                attribute: "normal",
                ..
            }
        ));
    }

    #[test]
    fn missing_normals_are_generated() {
        let mesh = triangle();
        let mut diagnostics = Diagnostics::new(false);
        let native = build(&mesh, 0, None, &ConversionOptions::default(), &mut diagnostics)
            .expect("build");
        assert_eq!(native.normals.len(), 3);
    }

    #[test]
    fn morph_target_count_and_deltas_are_preserved() {
        let mut mesh = triangle();
        mesh.morph_targets = vec![
            ForeignMorphTarget {
                name: "smile".to_owned(),
                position_deltas: vec![Vec3::X; 3],
                normal_deltas: Vec::new(),
            },
            ForeignMorphTarget {
                name: "frown".to_owned(),
                position_deltas: vec![Vec3::Y; 3],
                normal_deltas: vec![Vec3::Z; 3],
            },
        ];
        let mut diagnostics = Diagnostics::new(false);
        let native = build(&mesh, 0, None, &ConversionOptions::default(), &mut diagnostics)
            .expect("build");

        assert_eq!(native.morph_targets.len(), 2);
        for target in &native.morph_targets {
            assert_eq!(target.position_deltas.len(), native.vertex_count());
        }
    }

    #[test]
    fn short_morph_target_is_fatal() {
        let mut mesh = triangle();
        mesh.morph_targets = vec![ForeignMorphTarget {
            name: "bad".to_owned(),
            position_deltas: vec![Vec3::X; 2],
            normal_deltas: Vec::new(),
        }];
        let mut diagnostics = Diagnostics::new(false);
        let err = build(&mesh, 0, None, &ConversionOptions::default(), &mut diagnostics)
            .unwrap_err();
        assert!(matches!(err, ConversionError::MorphTargetLengthMismatch { .. }));
    }

    #[test]
    fn influences_remap_and_zero_pad() {
        let mut diagnostics = Diagnostics::new(false);
        let built = two_bone_armature(&mut diagnostics);

        let mut mesh = triangle();
        mesh.influences = vec![
            vec![Influence {
                bone: BoneRef::Name("tip".to_owned()),
                weight: 1.0,
            }],
            vec![
                Influence {
                    bone: BoneRef::Index(0),
                    weight: 0.75,
                },
                Influence {
                    bone: BoneRef::Index(1),
                    weight: 0.25,
                },
            ],
            vec![],
        ];

        let native = build(
            &mesh,
            0,
            Some(&built),
            &ConversionOptions::default(),
            &mut diagnostics,
        )
        .expect("build");

        let skin = native.skin.expect("skin");
        assert_eq!(skin.influences_per_vertex, 4);
        assert_eq!(skin.joints.len(), 3 * 4);
        assert_eq!(skin.joints[0], 1);
        assert_eq!(skin.weights[0], 1.0);
        // Padding slots stay zeroed.
        assert_eq!(skin.weights[1], 0.0);
        assert_eq!(skin.weights[4], 0.75);
        assert_eq!(skin.weights[8..12], [0.0; 4]);
    }

    #[test]
    fn excess_influences_keep_the_heaviest() {
        let mut diagnostics = Diagnostics::new(false);
        let built = two_bone_armature(&mut diagnostics);

        let mut options = ConversionOptions::default();
        options.max_joint_influences_per_vertex = 1;

        let mut mesh = triangle();
        mesh.influences = vec![
            vec![
                Influence {
                    bone: BoneRef::Index(0),
                    weight: 0.3,
                },
                Influence {
                    bone: BoneRef::Index(1),
                    weight: 0.7,
                },
            ],
            vec![],
            vec![],
        ];

        let native = build(&mesh, 0, Some(&built), &options, &mut diagnostics).expect("build");
        let skin = native.skin.expect("skin");
        assert_eq!(skin.joints[0], 1);
        assert_eq!(skin.weights[0], 0.7);
        assert!(diagnostics
            .records()
            .iter()
            .any(|d| matches!(d.kind, DiagnosticKind::TruncatedInfluences { .. })));
    }

    #[test]
    fn unresolved_influence_is_skipped_with_warning() {
        let mut diagnostics = Diagnostics::new(false);
        let built = two_bone_armature(&mut diagnostics);

        let mut mesh = triangle();
        mesh.influences = vec![
            vec![Influence {
                bone: BoneRef::Name("phantom".to_owned()),
                weight: 1.0,
            }],
            vec![],
            vec![],
        ];

        let native = build(
            &mesh,
            0,
            Some(&built),
            &ConversionOptions::default(),
            &mut diagnostics,
        )
        .expect("build");
        let skin = native.skin.expect("skin");
        assert_eq!(skin.weights[0], 0.0);
        assert!(diagnostics
            .records()
            .iter()
            .any(|d| matches!(d.kind, DiagnosticKind::UnresolvedBoneInfluence { .. })));
    }
}
