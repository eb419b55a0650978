//! Memory layout constants for the target's entity structures
//!
//! Field offsets change between target builds and come from the offset
//! table; the constants here describe container shapes that have stayed
//! fixed across builds.

/// Two-level entity list: an array of page pointers, each page holding
/// fixed-stride slots.
pub mod entity_list {
    /// Size of a page pointer
    pub const POINTER_SIZE: u64 = 8;
    /// Byte offset of the page-pointer array from the list base
    pub const PAGE_ARRAY_OFFSET: u64 = 0x10;
    /// `index >> PAGE_SHIFT` selects the page
    pub const PAGE_SHIFT: u32 = 9;
    /// `index & SLOT_MASK` selects the slot within a page (512 slots)
    pub const SLOT_MASK: u64 = 0x1FF;
    /// Size of one slot
    pub const SLOT_STRIDE: u64 = 0x70;
    /// Entity handles carry flags above the index bits
    pub const HANDLE_INDEX_MASK: u64 = 0x7FFF;
    /// Controller candidates scanned per cycle
    pub const MAX_CONTROLLERS: u32 = 64;
}

/// Per-entity field semantics
pub mod entity {
    /// Life-state value of a living entity
    pub const LIFE_STATE_ALIVE: i32 = 256;
    /// Team id of world/unassigned entities
    pub const TEAM_UNASSIGNED: i32 = 0;
    pub const MIN_HEALTH: i32 = 1;
    pub const MAX_HEALTH: i32 = 100;
    /// Bytes read for the display name
    pub const NAME_MAX_LEN: usize = 128;
    pub const NAME_CHUNK_LEN: usize = 32;
}

/// Skeleton buffer
pub mod bones {
    /// Size of one bone transform; position is the first 12 bytes
    pub const BONE_STRIDE: u64 = 32;
}

/// World-space marker heights used for on-screen geometry
pub mod geometry {
    /// Head-top marker above the head bone
    pub const HEAD_TOP_OFFSET: f32 = 7.0;
    /// Head-bottom marker below the head bone
    pub const HEAD_BOTTOM_OFFSET: f32 = 5.0;
    /// Box top above the entity origin
    pub const BOX_HEIGHT: f32 = 70.0;
    /// Entities closer than this to the viewer are not rendered
    pub const MIN_VIEWER_DISTANCE: f32 = 35.0;
}

/// Timing constants for pacing and startup
pub mod timing {
    pub const DEFAULT_TARGET_FPS: u32 = 60;
    pub const MIN_TARGET_FPS: u32 = 30;
    pub const MAX_TARGET_FPS: u32 = 240;

    /// Delay before the single discovery retry (ms)
    pub const DISCOVERY_RETRY_DELAY_MS: u64 = 5000;
}
