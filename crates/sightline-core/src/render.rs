//! Drawing contract between the pipeline and an external surface.
//!
//! The surface owns the actual primitives; this module decides what to draw
//! for each entity given the current toggles.

use glam::Vec2;
use serde::Serialize;

use crate::entity::{Entity, SKELETON_LINKS};
use crate::geometry::Rect;
use crate::settings::SettingsSnapshot;

/// Team id drawn in [`Rgb::TEAM_A`]; every other team uses [`Rgb::TEAM_B`].
pub const TEAM_A_ID: i32 = 2;

/// Distance of the health bar to the left of the box
const HEALTH_BAR_GAP: f32 = 4.0;
/// Offset of the name baseline above the box
const NAME_GAP: f32 = 14.0;
/// Offset of the health text left of the box
const HEALTH_TEXT_GAP: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const TEAM_A: Self = Self(255, 120, 122);
    pub const TEAM_B: Self = Self(120, 142, 255);
    pub const HEALTH: Self = Self(120, 255, 125);
    pub const HEALTH_TEXT: Self = Self(0, 255, 50);
    pub const BONE: Self = Self(255, 255, 255);
    pub const NAME: Self = Self(255, 255, 255);
    pub const OUTLINE: Self = Self(1, 0, 0);

    pub fn for_team(team: i32) -> Self {
        if team == TEAM_A_ID {
            Self::TEAM_A
        } else {
            Self::TEAM_B
        }
    }
}

/// Horizontal anchor of a text position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextAlign {
    Right,
    Center,
}

pub trait DrawSurface {
    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb);
    fn rect(&mut self, bounds: Rect, color: Rgb);
    fn ellipse(&mut self, bounds: Rect, color: Rgb);
    fn text(&mut self, at: Vec2, text: &str, align: TextAlign, color: Rgb);
}

/// Draw one entity according to the enabled features.
pub fn draw_entity<S: DrawSurface + ?Sized>(
    surface: &mut S,
    entity: &Entity,
    settings: &SettingsSnapshot,
) {
    let r = entity.bounds;

    if settings.skeleton {
        for (a, b) in SKELETON_LINKS {
            if let (Some(from), Some(to)) = (entity.bones.get(&a), entity.bones.get(&b)) {
                surface.line(*from, *to, Rgb::BONE);
            }
        }
    }

    if settings.bounding_box {
        surface.rect(r, Rgb::for_team(entity.team));
        surface.rect(r.inflate(1.0), Rgb::OUTLINE);
    }

    if settings.head_marker {
        let ellipse = entity.head.ellipse_bounds();
        surface.ellipse(ellipse.inflate(1.0), Rgb::OUTLINE);
        surface.ellipse(ellipse, Rgb::BONE);
    }

    let fill_y = r.health_fill_y(entity.health);

    if settings.health_bar {
        let x = r.left - HEALTH_BAR_GAP;
        surface.line(Vec2::new(x, fill_y), Vec2::new(x, r.bottom + 1.0), Rgb::HEALTH);
        surface.rect(
            Rect {
                top: r.top - 1.0,
                left: r.left - HEALTH_BAR_GAP - 1.0,
                right: r.left - HEALTH_BAR_GAP + 1.0,
                bottom: r.bottom + 1.0,
            },
            Rgb::OUTLINE,
        );
    }

    if settings.health_text {
        let y = if settings.health_bar { fill_y } else { r.top };
        surface.text(
            Vec2::new(r.left - HEALTH_TEXT_GAP, y),
            &entity.health.to_string(),
            TextAlign::Right,
            Rgb::HEALTH_TEXT,
        );
    }

    if settings.name {
        surface.text(
            Vec2::new(r.center_x(), r.top - NAME_GAP),
            &entity.name,
            TextAlign::Center,
            Rgb::NAME,
        );
    }
}

/// Draw every entity of a cycle in order.
pub fn draw_frame<S: DrawSurface + ?Sized>(
    surface: &mut S,
    entities: &[Entity],
    settings: &SettingsSnapshot,
) {
    for entity in entities {
        draw_entity(surface, entity, settings);
    }
}

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    Line { from: Vec2, to: Vec2, color: Rgb },
    Rect { bounds: Rect, color: Rgb },
    Ellipse { bounds: Rect, color: Rgb },
    Text { at: Vec2, text: String, align: TextAlign, color: Rgb },
}

/// Surface that records draw calls for a later consumer.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CommandList {
    pub commands: Vec<DrawCommand>,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl DrawSurface for CommandList {
    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn rect(&mut self, bounds: Rect, color: Rgb) {
        self.commands.push(DrawCommand::Rect { bounds, color });
    }

    fn ellipse(&mut self, bounds: Rect, color: Rgb) {
        self.commands.push(DrawCommand::Ellipse { bounds, color });
    }

    fn text(&mut self, at: Vec2, text: &str, align: TextAlign, color: Rgb) {
        self.commands.push(DrawCommand::Text {
            at,
            text: text.to_string(),
            align,
            color,
        });
    }
}
