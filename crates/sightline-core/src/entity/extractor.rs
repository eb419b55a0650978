//! Per-entity field reads with validation at every hop.

use std::collections::BTreeMap;

use glam::Vec3;
use tracing::trace;

use super::scanner::EntityListLayout;
use super::{BONE_INDEX_TABLE, Bone, decode_name};
use crate::memory::layout::{bones, entity};
use crate::memory::{ReadMemory, RemoteAddr};
use crate::offset::OffsetTable;

/// The local player the overlay is drawn for.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewer {
    /// Null when the local pawn could not be read
    pub pawn: RemoteAddr,
    /// `None` when unreadable; team filtering then never matches
    pub team: Option<i32>,
    /// Zero when unreadable
    pub origin: Vec3,
}

impl Viewer {
    pub fn resolve<R: ReadMemory + ?Sized>(
        reader: &R,
        offsets: &OffsetTable,
        module_base: RemoteAddr,
    ) -> Self {
        let Ok(pawn) = reader.deref(module_base.offset(offsets.local_player_pawn)) else {
            trace!("viewer pawn unavailable");
            return Self::default();
        };

        let team = reader.read_i32(pawn.offset(offsets.team)).ok();
        let origin = reader
            .deref(pawn.offset(offsets.scene_node))
            .and_then(|scene| reader.read_vec3(scene.offset(offsets.node_to_world)))
            .unwrap_or(Vec3::ZERO);

        Self { pawn, team, origin }
    }
}

/// World-space state of an entity that passed every validity check.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntity {
    pub controller: RemoteAddr,
    pub pawn: RemoteAddr,
    pub health: i32,
    pub team: i32,
    pub name: String,
    pub origin: Vec3,
    /// Bones whose read succeeded
    pub bones: BTreeMap<Bone, Vec3>,
}

impl RawEntity {
    pub fn head(&self) -> Option<Vec3> {
        self.bones.get(&Bone::Head).copied()
    }
}

/// Resolves controllers from the entity list into [`RawEntity`] values.
pub struct EntityExtractor<'a, R: ReadMemory + ?Sized> {
    reader: &'a R,
    offsets: &'a OffsetTable,
    layout: EntityListLayout,
    list: RemoteAddr,
    viewer: Viewer,
    team_filter: bool,
}

impl<'a, R: ReadMemory + ?Sized> EntityExtractor<'a, R> {
    pub fn new(
        reader: &'a R,
        offsets: &'a OffsetTable,
        layout: EntityListLayout,
        list: RemoteAddr,
        viewer: Viewer,
    ) -> Self {
        Self {
            reader,
            offsets,
            layout,
            list,
            viewer,
            team_filter: true,
        }
    }

    /// Drop entities on the viewer's team.
    pub fn team_filter(mut self, enabled: bool) -> Self {
        self.team_filter = enabled;
        self
    }

    /// Run every check for `controller`. `None` drops the entity for this
    /// cycle; nothing is surfaced to the caller.
    pub fn extract(&self, controller: RemoteAddr) -> Option<RawEntity> {
        let off = self.offsets;

        let handle: u32 = self
            .reader
            .read(controller.offset(off.player_pawn_handle))
            .ok()?;
        if handle == 0 {
            return reject(controller, "null pawn handle");
        }
        let pawn = self.layout.resolve_handle(self.reader, self.list, handle)?;
        if pawn == self.viewer.pawn {
            return reject(controller, "viewer pawn");
        }

        let life_state = self.reader.read_i32(pawn.offset(off.life_state)).ok()?;
        if life_state != entity::LIFE_STATE_ALIVE {
            return reject(controller, "not alive");
        }

        let team = self.reader.read_i32(pawn.offset(off.team)).ok()?;
        if team == entity::TEAM_UNASSIGNED {
            return reject(controller, "unassigned team");
        }
        if self.team_filter && self.viewer.team == Some(team) {
            return reject(controller, "same team");
        }

        let health = self.reader.read_i32(pawn.offset(off.health)).ok()?;
        if !(entity::MIN_HEALTH..=entity::MAX_HEALTH).contains(&health) {
            return reject(controller, "health out of range");
        }

        let name = self.read_name(controller)?;
        let origin = self.reader.read_vec3(pawn.offset(off.origin)).ok()?;

        let Ok(scene) = self.reader.deref(pawn.offset(off.scene_node)) else {
            return reject(controller, "no scene node");
        };
        let Ok(bone_array) = self
            .reader
            .deref(scene.offset(off.bone_array_from_scene()))
        else {
            return reject(controller, "no bone array");
        };

        Some(RawEntity {
            controller,
            pawn,
            health,
            team,
            name,
            origin,
            bones: self.read_bones(bone_array),
        })
    }

    /// A null name pointer yields an empty name. Only a name whose first
    /// byte is unreadable drops the entity.
    fn read_name(&self, controller: RemoteAddr) -> Option<String> {
        let ptr = self
            .reader
            .read_ptr(controller.offset(self.offsets.player_name))
            .ok()?;
        if ptr.is_null() {
            return Some(String::new());
        }
        let bytes = self.read_name_bytes(ptr);
        if bytes.is_empty() {
            return None;
        }
        Some(decode_name(&bytes))
    }

    /// Read up to the first NUL in chunks. A chunk crossing the end of a
    /// mapped region is retried byte by byte.
    fn read_name_bytes(&self, ptr: RemoteAddr) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(entity::NAME_MAX_LEN);
        while bytes.len() < entity::NAME_MAX_LEN {
            let at = ptr.offset(bytes.len() as u64);
            let size = entity::NAME_CHUNK_LEN.min(entity::NAME_MAX_LEN - bytes.len());
            let chunk = match self.reader.read_bytes(at, size) {
                Ok(chunk) => chunk,
                Err(_) => match self.reader.read_bytes(at, 1) {
                    Ok(byte) => byte,
                    Err(_) => break,
                },
            };
            let terminated = chunk.contains(&0);
            bytes.extend_from_slice(&chunk);
            if terminated {
                break;
            }
        }
        bytes
    }

    fn read_bones(&self, bone_array: RemoteAddr) -> BTreeMap<Bone, Vec3> {
        BONE_INDEX_TABLE
            .iter()
            .filter_map(|&(bone, slot)| {
                let address = bone_array.offset(slot * bones::BONE_STRIDE);
                self.reader
                    .read_vec3(address)
                    .ok()
                    .map(|position| (bone, position))
            })
            .collect()
    }
}

fn reject<T>(controller: RemoteAddr, reason: &str) -> Option<T> {
    trace!("dropping entity {}: {}", controller, reason);
    None
}
