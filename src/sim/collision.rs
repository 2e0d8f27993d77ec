//! Axis-aligned collision between drops and the catcher
//!
//! Boxes are pure data computed from stored positions and fixed sizes, so
//! the overlap test never reads the rendering surface.

use glam::Vec2;

use super::state::{Catcher, Drop, PlayArea};
use crate::consts::{CATCHER_HEIGHT, DROP_HEIGHT, DROP_WIDTH};

/// An axis-aligned box in play-area coordinates, y growing downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Two boxes overlap unless one lies strictly beyond the other on some
    /// axis; touching edges count as overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y)
    }
}

/// Bounding box of a falling drop
pub fn drop_box(drop: &Drop) -> Aabb {
    Aabb::new(
        Vec2::new(drop.pos.x - DROP_WIDTH / 2.0, drop.pos.y),
        Vec2::new(drop.pos.x + DROP_WIDTH / 2.0, drop.pos.y + DROP_HEIGHT),
    )
}

/// Bounding box of the catcher, sitting on the play-area floor
pub fn catcher_box(catcher: &Catcher, play_area: &PlayArea) -> Aabb {
    Aabb::new(
        Vec2::new(
            catcher.x - catcher.half_width,
            play_area.height - CATCHER_HEIGHT,
        ),
        Vec2::new(catcher.x + catcher.half_width, play_area.height),
    )
}
