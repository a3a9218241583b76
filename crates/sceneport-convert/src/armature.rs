use std::collections::HashMap;
use std::sync::Arc;

use sceneport_foreign::{ForeignBone, ParentRef};
use sceneport_model::{Joint, NativeArmature};

use crate::diagnostics::{Component, DiagnosticKind, Diagnostics};
use crate::error::ConversionError;

/// A built skeleton plus the remap from foreign bone positions to native
/// joint indices. The remap differs from identity whenever duplicate-named
/// bones were discarded.
#[derive(Debug)]
pub struct BuiltArmature {
    pub armature: Arc<NativeArmature>,
    /// Indexed by foreign bone position; points at the joint that position
    /// resolves to.
    pub foreign_to_joint: Vec<u32>,
}

/// Converts the scene's flat bone list into a joint tree with dense indices
/// in first-seen order.
///
/// Duplicate names keep the first occurrence (recoverable); a parent cycle is
/// a fatal input error. Bind-pose matrices are taken verbatim.
pub fn build(
    bones: &[ForeignBone],
    diagnostics: &mut Diagnostics,
) -> Result<BuiltArmature, ConversionError> {
    let mut joints: Vec<Joint> = Vec::with_capacity(bones.len());
    let mut by_name: HashMap<&str, u32> = HashMap::with_capacity(bones.len());
    let mut foreign_to_joint = vec![0u32; bones.len()];
    let mut is_first_occurrence = vec![false; bones.len()];

    for (position, bone) in bones.iter().enumerate() {
        match by_name.get(bone.name.as_str()) {
            Some(&first) => {
                diagnostics.record(
                    Component::Armature,
                    &bone.name,
                    DiagnosticKind::DuplicateBoneName {
                        name: bone.name.clone(),
                    },
                );
                foreign_to_joint[position] = first;
            }
            None => {
                let index = joints.len() as u32;
                by_name.insert(bone.name.as_str(), index);
                foreign_to_joint[position] = index;
                is_first_occurrence[position] = true;
                joints.push(Joint {
                    name: bone.name.clone(),
                    parent: -1,
                    inverse_bind: bone.offset_matrix,
                });
            }
        }
    }

    // Parent indices are resolved against the deduplicated joint list, so a
    // parent reference to a discarded duplicate lands on its first occurrence.
    // Discarded duplicates themselves contribute nothing, not even a parent.
    for (position, bone) in bones.iter().enumerate() {
        if !is_first_occurrence[position] {
            continue;
        }
        let joint = foreign_to_joint[position] as usize;
        let parent = match &bone.parent {
            ParentRef::None => -1,
            ParentRef::Index(index) => {
                if *index >= bones.len() {
                    return Err(ConversionError::BoneParentOutOfRange {
                        bone: bone.name.clone(),
                        index: *index,
                        count: bones.len(),
                    });
                }
                foreign_to_joint[*index] as i32
            }
            ParentRef::Name(name) => match by_name.get(name.as_str()) {
                Some(&index) => index as i32,
                None => {
                    diagnostics.record(
                        Component::Armature,
                        &bone.name,
                        DiagnosticKind::UnresolvedBoneParent {
                            parent: name.clone(),
                        },
                    );
                    -1
                }
            },
        };

        if parent == joint as i32 {
            return Err(ConversionError::CyclicBoneHierarchy {
                bone: bone.name.clone(),
            });
        }
        joints[joint].parent = parent;
    }

    detect_cycles(&joints)?;

    Ok(BuiltArmature {
        armature: Arc::new(NativeArmature::new(joints)),
        foreign_to_joint,
    })
}

fn detect_cycles(joints: &[Joint]) -> Result<(), ConversionError> {
    for (index, joint) in joints.iter().enumerate() {
        let mut current = joint.parent;
        let mut steps = 0;
        while current >= 0 {
            if current as usize == index || steps > joints.len() {
                return Err(ConversionError::CyclicBoneHierarchy {
                    bone: joint.name.clone(),
                });
            }
            current = joints[current as usize].parent;
            steps += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    fn bone(name: &str, parent: ParentRef) -> ForeignBone {
        ForeignBone {
            name: name.to_owned(),
            parent,
            offset_matrix: Mat4::IDENTITY,
        }
    }

    #[test]
    fn joints_are_dense_with_valid_parents() {
        let bones = vec![
            bone("root", ParentRef::None),
            bone("spine", ParentRef::Name("root".to_owned())),
            bone("head", ParentRef::Index(1)),
        ];
        let mut diagnostics = Diagnostics::new(false);
        let built = build(&bones, &mut diagnostics).expect("build armature");

        let joints = built.armature.joints();
        assert_eq!(joints.len(), 3);
        for (index, joint) in joints.iter().enumerate() {
            assert!(joint.parent == -1 || (joint.parent as usize) < joints.len());
            assert_ne!(joint.parent, index as i32);
        }
        assert_eq!(joints[1].parent, 0);
        assert_eq!(joints[2].parent, 1);
        assert!(diagnostics.records().is_empty());
    }

    #[test]
    fn duplicate_bone_keeps_first_and_warns() {
        let bones = vec![
            bone("root", ParentRef::None),
            bone("arm", ParentRef::Index(0)),
            bone("arm", ParentRef::Index(0)),
            bone("hand", ParentRef::Index(2)),
        ];
        let mut diagnostics = Diagnostics::new(false);
        let built = build(&bones, &mut diagnostics).expect("build armature");

        assert_eq!(built.armature.joint_count(), 3);
        // Fourth bone parented to the duplicate resolves to the kept joint.
        assert_eq!(built.foreign_to_joint, vec![0, 1, 1, 2]);
        assert_eq!(built.armature.joints()[2].parent, 1);
        assert!(diagnostics
            .records()
            .iter()
            .any(|d| matches!(d.kind, DiagnosticKind::DuplicateBoneName { .. })));
    }

    #[test]
    fn parent_cycle_is_fatal() {
        let bones = vec![
            bone("a", ParentRef::Name("b".to_owned())),
            bone("b", ParentRef::Name("a".to_owned())),
        ];
        let mut diagnostics = Diagnostics::new(false);
        let err = build(&bones, &mut diagnostics).unwrap_err();
        assert!(matches!(err, ConversionError::CyclicBoneHierarchy { .. }));
    }

    #[test]
    fn self_parent_is_fatal() {
        let bones = vec![bone("a", ParentRef::Index(0))];
        let mut diagnostics = Diagnostics::new(false);
        let err = build(&bones, &mut diagnostics).unwrap_err();
        assert!(matches!(err, ConversionError::CyclicBoneHierarchy { .. }));
    }

    #[test]
    fn unknown_parent_name_degrades_to_root() {
        let bones = vec![bone("a", ParentRef::Name("missing".to_owned()))];
        let mut diagnostics = Diagnostics::new(false);
        let built = build(&bones, &mut diagnostics).expect("build armature");
        assert_eq!(built.armature.joints()[0].parent, -1);
        assert!(diagnostics
            .records()
            .iter()
            .any(|d| matches!(d.kind, DiagnosticKind::UnresolvedBoneParent { .. })));
    }

    #[test]
    fn parent_index_out_of_range_is_fatal() {
        let bones = vec![bone("a", ParentRef::Index(9))];
        let mut diagnostics = Diagnostics::new(false);
        let err = build(&bones, &mut diagnostics).unwrap_err();
        assert!(matches!(err, ConversionError::BoneParentOutOfRange { .. }));
    }
}
