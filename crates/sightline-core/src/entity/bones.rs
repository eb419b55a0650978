//! Named skeleton joints and their slots in the bone buffer.

use serde::{Serialize, Serializer};
use strum::{Display, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, IntoStaticStr,
)]
pub enum Bone {
    #[strum(serialize = "head")]
    Head,
    #[strum(serialize = "neck_0")]
    Neck,
    #[strum(serialize = "spine_1")]
    UpperSpine,
    #[strum(serialize = "spine_2")]
    LowerSpine,
    #[strum(serialize = "pelvis")]
    Pelvis,
    #[strum(serialize = "arm_upper_L")]
    UpperArmLeft,
    #[strum(serialize = "arm_lower_L")]
    LowerArmLeft,
    #[strum(serialize = "hand_L")]
    HandLeft,
    #[strum(serialize = "arm_upper_R")]
    UpperArmRight,
    #[strum(serialize = "arm_lower_R")]
    LowerArmRight,
    #[strum(serialize = "hand_R")]
    HandRight,
    #[strum(serialize = "leg_upper_L")]
    UpperLegLeft,
    #[strum(serialize = "leg_lower_L")]
    LowerLegLeft,
    #[strum(serialize = "ankle_L")]
    AnkleLeft,
    #[strum(serialize = "leg_upper_R")]
    UpperLegRight,
    #[strum(serialize = "leg_lower_R")]
    LowerLegRight,
    #[strum(serialize = "ankle_R")]
    AnkleRight,
}

impl Bone {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Slot of this bone in the per-entity bone buffer.
    pub fn slot(self) -> u64 {
        BONE_INDEX_TABLE
            .iter()
            .find(|(bone, _)| *bone == self)
            .map(|(_, slot)| *slot)
            .unwrap_or_default()
    }
}

impl Serialize for Bone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Bone buffer slot for every tracked bone.
pub const BONE_INDEX_TABLE: [(Bone, u64); 17] = [
    (Bone::Head, 6),
    (Bone::Neck, 5),
    (Bone::UpperSpine, 4),
    (Bone::LowerSpine, 2),
    (Bone::Pelvis, 0),
    (Bone::UpperArmLeft, 8),
    (Bone::LowerArmLeft, 9),
    (Bone::HandLeft, 10),
    (Bone::UpperArmRight, 13),
    (Bone::LowerArmRight, 14),
    (Bone::HandRight, 15),
    (Bone::UpperLegLeft, 22),
    (Bone::LowerLegLeft, 23),
    (Bone::AnkleLeft, 24),
    (Bone::UpperLegRight, 25),
    (Bone::LowerLegRight, 26),
    (Bone::AnkleRight, 27),
];

/// Bone pairs joined by a line when drawing a skeleton.
pub const SKELETON_LINKS: [(Bone, Bone); 16] = [
    (Bone::Head, Bone::Neck),
    (Bone::Neck, Bone::UpperSpine),
    (Bone::UpperSpine, Bone::LowerSpine),
    (Bone::LowerSpine, Bone::Pelvis),
    (Bone::Pelvis, Bone::UpperLegLeft),
    (Bone::UpperLegLeft, Bone::LowerLegLeft),
    (Bone::LowerLegLeft, Bone::AnkleLeft),
    (Bone::Pelvis, Bone::UpperLegRight),
    (Bone::UpperLegRight, Bone::LowerLegRight),
    (Bone::LowerLegRight, Bone::AnkleRight),
    (Bone::UpperSpine, Bone::UpperArmLeft),
    (Bone::UpperArmLeft, Bone::LowerArmLeft),
    (Bone::LowerArmLeft, Bone::HandLeft),
    (Bone::UpperSpine, Bone::UpperArmRight),
    (Bone::UpperArmRight, Bone::LowerArmRight),
    (Bone::LowerArmRight, Bone::HandRight),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_has_unique_bones_and_slots() {
        let bones: HashSet<_> = BONE_INDEX_TABLE.iter().map(|(b, _)| *b).collect();
        let slots: HashSet<_> = BONE_INDEX_TABLE.iter().map(|(_, s)| *s).collect();
        assert_eq!(bones.len(), BONE_INDEX_TABLE.len());
        assert_eq!(slots.len(), BONE_INDEX_TABLE.len());
    }

    #[test]
    fn test_slot_lookup() {
        assert_eq!(Bone::Head.slot(), 6);
        assert_eq!(Bone::Pelvis.slot(), 0);
        assert_eq!(Bone::AnkleRight.slot(), 27);
    }

    #[test]
    fn test_names() {
        assert_eq!(Bone::Neck.as_str(), "neck_0");
        assert_eq!(Bone::HandLeft.to_string(), "hand_L");
        assert_eq!(serde_json::to_string(&Bone::UpperArmRight).unwrap(), "\"arm_upper_R\"");
    }

    #[test]
    fn test_links_reference_tracked_bones() {
        let tracked: HashSet<_> = BONE_INDEX_TABLE.iter().map(|(b, _)| *b).collect();
        for (a, b) in SKELETON_LINKS {
            assert!(tracked.contains(&a) && tracked.contains(&b));
        }
    }
}
