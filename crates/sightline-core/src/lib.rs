//! # sightline-core
//!
//! Core library for the Sightline overlay.
//!
//! This crate provides:
//! - Typed reads of another process's memory through opaque remote addresses
//! - Offset tables loaded from external JSON
//! - Entity list scanning and defensive per-entity extraction
//! - World-to-screen projection and box/head/health-bar geometry
//! - Frame pacing and the per-cycle snapshot pipeline
//! - A drawing contract for external render surfaces

pub mod entity;
pub mod error;
pub mod geometry;
pub mod memory;
pub mod offset;
pub mod pipeline;
pub mod projection;
pub mod render;
pub mod retry;
pub mod scheduler;
pub mod settings;

pub use entity::{
    BONE_INDEX_TABLE, Bone, Entity, EntityExtractor, EntityListLayout, EntityScanner, RawEntity,
    SKELETON_LINKS, Viewer, decode_name, sanitize_name,
};
pub use error::{Error, Result};
pub use geometry::{EntityGeometry, HeadMarker, Rect};
pub use memory::{FromRemote, MemoryReader, ProcessHandle, ReadMemory, RemoteAddr};
pub use offset::{OffsetTable, load_offsets, load_offsets_or_default};
pub use pipeline::SnapshotPipeline;
pub use projection::{RemoteViewMatrix, ScreenProjector, ViewMatrix, ViewMatrixSource, Viewport};
pub use render::{CommandList, DrawCommand, DrawSurface, Rgb, TextAlign, draw_entity, draw_frame};
pub use retry::{FixedDelay, RetryStrategy, retry_with};
pub use scheduler::FrameScheduler;
pub use settings::{Feature, OverlaySettings, SettingsSnapshot};
