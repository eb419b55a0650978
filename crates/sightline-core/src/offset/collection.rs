use serde::{Deserialize, Serialize};

/// Byte offsets into the target's memory layout.
///
/// Global entries (`dw_*`) are relative to the module base; field entries
/// (`m_*`) are relative to the structure they belong to. Missing keys load
/// as zero, which makes every dependent read fail validation rather than
/// return plausible garbage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetTable {
    #[serde(rename = "dwViewMatrix")]
    pub view_matrix: u64,
    #[serde(rename = "dwLocalPlayerPawn")]
    pub local_player_pawn: u64,
    #[serde(rename = "dwEntityList")]
    pub entity_list: u64,
    #[serde(rename = "m_hPlayerPawn")]
    pub player_pawn_handle: u64,
    #[serde(rename = "m_iHealth")]
    pub health: u64,
    #[serde(rename = "m_lifeState")]
    pub life_state: u64,
    #[serde(rename = "m_iTeamNum")]
    pub team: u64,
    #[serde(rename = "m_vOldOrigin")]
    pub origin: u64,
    #[serde(rename = "m_pGameSceneNode")]
    pub scene_node: u64,
    #[serde(rename = "m_modelState")]
    pub model_state: u64,
    #[serde(rename = "m_boneArray")]
    pub bone_array: u64,
    #[serde(rename = "m_nodeToWorld")]
    pub node_to_world: u64,
    #[serde(rename = "m_sSanitizedPlayerName")]
    pub player_name: u64,
}

impl OffsetTable {
    /// Key/value pairs in configuration order, using the external key names.
    pub fn entries(&self) -> [(&'static str, u64); 13] {
        [
            ("dwViewMatrix", self.view_matrix),
            ("dwLocalPlayerPawn", self.local_player_pawn),
            ("dwEntityList", self.entity_list),
            ("m_hPlayerPawn", self.player_pawn_handle),
            ("m_iHealth", self.health),
            ("m_lifeState", self.life_state),
            ("m_iTeamNum", self.team),
            ("m_vOldOrigin", self.origin),
            ("m_pGameSceneNode", self.scene_node),
            ("m_modelState", self.model_state),
            ("m_boneArray", self.bone_array),
            ("m_nodeToWorld", self.node_to_world),
            ("m_sSanitizedPlayerName", self.player_name),
        ]
    }

    /// Keys whose offset is zero.
    pub fn zero_fields(&self) -> Vec<&'static str> {
        self.entries()
            .into_iter()
            .filter(|(_, v)| *v == 0)
            .map(|(k, _)| k)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.entries().iter().all(|(_, v)| *v != 0)
    }

    /// Offset of the bone array pointer from the scene node.
    pub fn bone_array_from_scene(&self) -> u64 {
        self.model_state.wrapping_add(self.bone_array)
    }
}
