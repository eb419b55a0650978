//! Entity extraction from the target's entity list.

mod bones;
mod extractor;
mod name;
mod scanner;

#[cfg(test)]
pub(crate) mod fixture;

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::geometry::{HeadMarker, Rect};

pub use bones::{BONE_INDEX_TABLE, Bone, SKELETON_LINKS};
pub use extractor::{EntityExtractor, RawEntity, Viewer};
pub use name::{decode_name, sanitize_name};
pub use scanner::{EntityListLayout, EntityScanner};

/// A renderable entity for one cycle. Rebuilt from scratch every cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    /// Always within `1..=100`
    pub health: i32,
    pub team: i32,
    pub name: String,
    /// World-space origin
    pub origin: Vec3,
    /// Distance to the viewer's origin
    pub distance: f32,
    /// Projected origin
    pub position: Vec2,
    /// Projected bones; bones whose read or projection failed are absent
    pub bones: BTreeMap<Bone, Vec2>,
    pub head_top: Vec3,
    pub head_bottom: Vec3,
    pub head: HeadMarker,
    pub bounds: Rect,
}

/// Sum of absolute per-axis differences.
pub fn manhattan_distance(a: Vec3, b: Vec3) -> f32 {
    (a - b).abs().element_sum()
}
