//! Emulated target memory for entity tests.

use glam::Vec3;

use super::{BONE_INDEX_TABLE, Bone};
use crate::memory::layout::{bones, entity, entity_list};
use crate::memory::{MockMemoryBuilder, MockMemoryReader, RemoteAddr};
use crate::offset::OffsetTable;
use crate::projection::{ViewMatrix, Viewport};

pub const MODULE_BASE: u64 = 0x10_0000;
pub const LIST: u64 = 0x50_0000;
pub const PAGE0: u64 = 0x60_0000;

/// Screen x from world x, screen y from world z, 4 pixels per unit.
pub const SIDE_VIEW: ViewMatrix = ViewMatrix([
    [1.0 / 128.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0 / 128.0, 0.0],
    [0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
]);

pub const VIEWPORT: Viewport = Viewport {
    width: 1024.0,
    height: 1024.0,
};

pub fn offsets() -> OffsetTable {
    OffsetTable {
        view_matrix: 0x1000,
        local_player_pawn: 0x2000,
        entity_list: 0x3000,
        player_pawn_handle: 0x60,
        health: 0x344,
        life_state: 0x348,
        team: 0x3E3,
        origin: 0x1324,
        scene_node: 0x328,
        model_state: 0x170,
        bone_array: 0x80,
        node_to_world: 0x10,
        player_name: 0x660,
    }
}

#[derive(Debug, Clone)]
pub struct PlayerSpec {
    pub team: i32,
    pub health: i32,
    pub life_state: i32,
    pub name: Option<Vec<u8>>,
    pub origin: Vec3,
    pub scene_node: bool,
    pub bones: Vec<Bone>,
}

impl PlayerSpec {
    pub fn new(team: i32, origin: Vec3) -> Self {
        Self {
            team,
            health: 100,
            life_state: entity::LIFE_STATE_ALIVE,
            name: Some(b"player".to_vec()),
            origin,
            scene_node: true,
            bones: BONE_INDEX_TABLE.iter().map(|(b, _)| *b).collect(),
        }
    }

    pub fn health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    pub fn life_state(mut self, life_state: i32) -> Self {
        self.life_state = life_state;
        self
    }

    pub fn name(mut self, name: Option<&[u8]>) -> Self {
        self.name = name.map(<[u8]>::to_vec);
        self
    }

    pub fn without_scene_node(mut self) -> Self {
        self.scene_node = false;
        self
    }

    pub fn with_bones(mut self, bones: &[Bone]) -> Self {
        self.bones = bones.to_vec();
        self
    }

    /// World position written for a bone: stacked above the origin by slot.
    pub fn bone_position(&self, bone: Bone) -> Vec3 {
        match bone {
            Bone::Head => self.origin + Vec3::Z * 64.0,
            other => self.origin + Vec3::new(0.0, 0.0, 2.0 * other.slot() as f32),
        }
    }
}

/// A target with the viewer at controller index 1 and other players from
/// index 2 onwards.
pub struct TargetFixture {
    pub viewer: PlayerSpec,
    pub players: Vec<PlayerSpec>,
    pub matrix: ViewMatrix,
}

impl TargetFixture {
    pub fn new(viewer: PlayerSpec) -> Self {
        Self {
            viewer,
            players: Vec::new(),
            matrix: SIDE_VIEW,
        }
    }

    pub fn with_player(mut self, player: PlayerSpec) -> Self {
        self.players.push(player);
        self
    }

    pub fn controller(index: u64) -> u64 {
        0x100_0000 + index * 0x1_0000
    }

    pub fn pawn(index: u64) -> u64 {
        0x200_0000 + index * 0x1_0000
    }

    pub fn viewer_pawn() -> RemoteAddr {
        RemoteAddr::new(Self::pawn(1))
    }

    fn scene(index: u64) -> u64 {
        0x300_0000 + index * 0x1_0000
    }

    fn bone_array(index: u64) -> u64 {
        0x400_0000 + index * 0x1_0000
    }

    fn name_buffer(index: u64) -> u64 {
        0x500_0000 + index * 0x1000
    }

    pub fn build(&self) -> MockMemoryReader {
        self.build_with(|b| b)
    }

    /// Build, letting the caller patch memory after the fixture is written.
    pub fn build_with(
        &self,
        patch: impl FnOnce(MockMemoryBuilder) -> MockMemoryBuilder,
    ) -> MockMemoryReader {
        let off = offsets();
        let flat: Vec<f32> = self.matrix.0.iter().flatten().copied().collect();
        let mut b = MockMemoryBuilder::new()
            .write_u64(MODULE_BASE + off.entity_list, LIST)
            .write_u64(MODULE_BASE + off.local_player_pawn, Self::pawn(1))
            .write_f32_array(MODULE_BASE + off.view_matrix, &flat)
            .write_u64(LIST + entity_list::PAGE_ARRAY_OFFSET, PAGE0);

        let all = std::iter::once(&self.viewer).chain(self.players.iter());
        for (i, player) in all.enumerate() {
            let index = i as u64 + 1;
            b = Self::write_player(b, &off, index, player);
        }
        b = b.write_vec3(Self::scene(1) + off.node_to_world, self.viewer.origin);
        patch(b).build()
    }

    fn write_player(
        mut b: MockMemoryBuilder,
        off: &OffsetTable,
        index: u64,
        player: &PlayerSpec,
    ) -> MockMemoryBuilder {
        let controller = Self::controller(index);
        let pawn = Self::pawn(index);
        let pawn_index = 0x100 + index;

        b = b
            .write_u64(PAGE0 + index * entity_list::SLOT_STRIDE, controller)
            .write_bytes(
                controller + off.player_pawn_handle,
                &(pawn_index as u32).to_le_bytes(),
            )
            .write_u64(PAGE0 + pawn_index * entity_list::SLOT_STRIDE, pawn)
            .write_i32(pawn + off.life_state, player.life_state)
            .write_i32(pawn + off.team, player.team)
            .write_i32(pawn + off.health, player.health)
            .write_vec3(pawn + off.origin, player.origin);

        match &player.name {
            Some(name) => {
                let mut buf = vec![0u8; entity::NAME_MAX_LEN];
                buf[..name.len()].copy_from_slice(name);
                b = b
                    .write_u64(controller + off.player_name, Self::name_buffer(index))
                    .write_bytes(Self::name_buffer(index), &buf);
            }
            None => b = b.write_u64(controller + off.player_name, 0),
        }

        if !player.scene_node {
            return b.write_u64(pawn + off.scene_node, 0);
        }
        b = b
            .write_u64(pawn + off.scene_node, Self::scene(index))
            .write_u64(
                Self::scene(index) + off.bone_array_from_scene(),
                Self::bone_array(index),
            );
        for bone in &player.bones {
            b = b.write_vec3(
                Self::bone_array(index) + bone.slot() * bones::BONE_STRIDE,
                player.bone_position(*bone),
            );
        }
        b
    }
}
