//! One scan, extract, project and compose cycle.

use glam::Vec3;
use tracing::debug;

use crate::entity::{
    Entity, EntityExtractor, EntityListLayout, EntityScanner, RawEntity, Viewer,
    manhattan_distance,
};
use crate::geometry::compose;
use crate::memory::layout::{entity_list, geometry};
use crate::memory::{ReadMemory, RemoteAddr};
use crate::offset::OffsetTable;
use crate::projection::{RemoteViewMatrix, ScreenProjector, ViewMatrixSource, Viewport};
use crate::settings::SettingsSnapshot;

/// Produces the renderable entities for one cycle.
///
/// Holds no per-entity state between cycles; every call starts from a fresh
/// view matrix and a fresh entity list walk.
pub struct SnapshotPipeline<'a, R: ReadMemory + ?Sized, V: ViewMatrixSource> {
    reader: &'a R,
    view_source: V,
    offsets: &'a OffsetTable,
    module_base: RemoteAddr,
    viewport: Viewport,
    layout: EntityListLayout,
    min_distance: f32,
    max_entities: u32,
}

impl<'a, R: ReadMemory + ?Sized> SnapshotPipeline<'a, R, RemoteViewMatrix<'a, R>> {
    /// Pipeline reading the view matrix from the target itself.
    pub fn for_target(
        reader: &'a R,
        offsets: &'a OffsetTable,
        module_base: RemoteAddr,
        viewport: Viewport,
    ) -> Self {
        let view_source = RemoteViewMatrix::new(reader, module_base.offset(offsets.view_matrix));
        Self::new(reader, view_source, offsets, module_base, viewport)
    }
}

impl<'a, R: ReadMemory + ?Sized, V: ViewMatrixSource> SnapshotPipeline<'a, R, V> {
    pub fn new(
        reader: &'a R,
        view_source: V,
        offsets: &'a OffsetTable,
        module_base: RemoteAddr,
        viewport: Viewport,
    ) -> Self {
        Self {
            reader,
            view_source,
            offsets,
            module_base,
            viewport,
            layout: EntityListLayout::default(),
            min_distance: geometry::MIN_VIEWER_DISTANCE,
            max_entities: entity_list::MAX_CONTROLLERS,
        }
    }

    pub fn with_min_distance(mut self, min_distance: f32) -> Self {
        self.min_distance = min_distance;
        self
    }

    pub fn with_max_entities(mut self, max_entities: u32) -> Self {
        self.max_entities = max_entities;
        self
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Run one cycle. Read failures only ever shrink the result.
    pub fn run_cycle(&self, settings: &SettingsSnapshot) -> Vec<Entity> {
        let matrix = match self.view_source.capture() {
            Ok(m) => m,
            Err(e) => {
                debug!("View matrix unavailable: {}", e);
                return Vec::new();
            }
        };
        let projector = ScreenProjector::new(matrix, self.viewport);

        let list = match self
            .reader
            .deref(self.module_base.offset(self.offsets.entity_list))
        {
            Ok(list) => list,
            Err(e) => {
                debug!("Entity list unavailable: {}", e);
                return Vec::new();
            }
        };

        let viewer = Viewer::resolve(self.reader, self.offsets, self.module_base);
        let controllers = EntityScanner::new(self.reader, self.layout)
            .with_max_entities(self.max_entities)
            .scan(list);
        let extractor = EntityExtractor::new(self.reader, self.offsets, self.layout, list, viewer)
            .team_filter(settings.team_filter);

        let entities: Vec<Entity> = controllers
            .iter()
            .filter_map(|&controller| extractor.extract(controller))
            .filter_map(|raw| self.finish(raw, &projector, viewer.origin))
            .collect();

        debug!(
            "Cycle: {} candidates, {} renderable",
            controllers.len(),
            entities.len()
        );
        entities
    }

    fn finish(
        &self,
        raw: RawEntity,
        projector: &ScreenProjector,
        viewer_origin: Vec3,
    ) -> Option<Entity> {
        let head = raw.head()?;
        let geometry = compose(projector, head, raw.origin)?;

        let distance = manhattan_distance(raw.origin, viewer_origin);
        if distance < self.min_distance {
            return None;
        }

        let bones = raw
            .bones
            .iter()
            .filter_map(|(bone, position)| projector.project(*position).map(|p| (*bone, p)))
            .collect();

        Some(Entity {
            health: raw.health,
            team: raw.team,
            name: raw.name,
            origin: raw.origin,
            distance,
            position: geometry.base,
            bones,
            head_top: head + Vec3::Z * geometry::HEAD_TOP_OFFSET,
            head_bottom: head - Vec3::Z * geometry::HEAD_BOTTOM_OFFSET,
            head: geometry.head,
            bounds: geometry.bounds,
        })
    }
}
