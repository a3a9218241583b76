use std::collections::HashMap;

use glam::Mat4;

#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub name: String,
    /// Index of the parent joint, `-1` for roots.
    pub parent: i32,
    /// Inverse bind-pose matrix, verbatim from the foreign bone.
    pub inverse_bind: Mat4,
}

/// A skeleton with densely indexed joints `0..n`. Joint order is the foreign
/// first-seen order; parents may come after children. No joint is ever its
/// own ancestor.
#[derive(Debug)]
pub struct NativeArmature {
    joints: Vec<Joint>,
    by_name: HashMap<String, u32>,
}

impl NativeArmature {
    pub fn new(joints: Vec<Joint>) -> Self {
        let mut by_name = HashMap::with_capacity(joints.len());
        for (index, joint) in joints.iter().enumerate() {
            // Keep-first: a duplicate name keeps pointing at its first joint.
            by_name
                .entry(joint.name.clone())
                .or_insert(index as u32);
        }
        Self { joints, by_name }
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn find_joint(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }
}

impl PartialEq for NativeArmature {
    fn eq(&self, other: &Self) -> bool {
        self.joints == other.joints
    }
}
