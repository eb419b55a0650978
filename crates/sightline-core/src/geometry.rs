//! On-screen geometry derived from projected entity markers.

use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::memory::layout::geometry::{BOX_HEIGHT, HEAD_BOTTOM_OFFSET, HEAD_TOP_OFFSET};
use crate::projection::ScreenProjector;

/// Axis-aligned screen rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    pub top: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f32 {
        self.left + self.width() / 2.0
    }

    /// Grow by `amount` on every side.
    pub fn inflate(&self, amount: f32) -> Self {
        Self {
            top: self.top - amount,
            left: self.left - amount,
            right: self.right + amount,
            bottom: self.bottom + amount,
        }
    }

    /// Y where a health bar filled to `health` percent ends.
    ///
    /// Interpolates from `bottom + 1` (empty) to `top` (full).
    pub fn health_fill_y(&self, health: i32) -> f32 {
        let base = self.bottom + 1.0;
        base - (base - self.top) * health as f32 / 100.0
    }
}

/// Projected head markers: shared X, and Y of the top and bottom markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HeadMarker {
    pub x: f32,
    pub top: f32,
    pub bottom: f32,
}

impl HeadMarker {
    pub fn radius(&self) -> f32 {
        (self.bottom - self.top) / 2.0
    }

    /// Bounds of the head ellipse.
    pub fn ellipse_bounds(&self) -> Rect {
        let radius = self.radius();
        Rect {
            top: self.top,
            left: self.x - radius,
            right: self.x + radius,
            bottom: self.bottom,
        }
    }
}

/// Everything needed to place an entity on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntityGeometry {
    /// Projected origin (feet)
    pub base: Vec2,
    pub bounds: Rect,
    pub head: HeadMarker,
}

/// Derive box and head geometry for an entity.
///
/// `None` when any marker is behind the camera, or when the head-top or
/// base marker falls outside the viewport.
pub fn compose(projector: &ScreenProjector, head: Vec3, origin: Vec3) -> Option<EntityGeometry> {
    let head_top = projector.project_on_screen(head + Vec3::Z * HEAD_TOP_OFFSET)?;
    let head_bottom = projector.project(head - Vec3::Z * HEAD_BOTTOM_OFFSET)?;
    let base = projector.project_on_screen(origin)?;
    let box_top = projector.project(origin + Vec3::Z * BOX_HEIGHT)?;

    let height = base.y - box_top.y;
    let half_width = height / 4.0;

    Some(EntityGeometry {
        base,
        bounds: Rect {
            top: box_top.y,
            left: base.x - half_width,
            right: base.x + half_width,
            bottom: base.y,
        },
        head: HeadMarker {
            x: head_top.x,
            top: head_top.y,
            bottom: head_bottom.y,
        },
    })
}
