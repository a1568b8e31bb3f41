//! Collision detection for boxes on a plane
//!
//! Everything in Flash Quest collides as an axis-aligned box. Entity counts are
//! tiny, so checks run player-vs-everything each tick with no broad phase.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::level::TileMap;

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square box of edge `size` centered on `center`
    pub fn from_center(center: Vec2, size: f32) -> Self {
        Self::new(center.x - size / 2.0, center.y - size / 2.0, size, size)
    }

    /// Strict overlap test: boxes whose edges only touch do not intersect
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x > self.x && p.x < self.x + self.width && p.y > self.y && p.y < self.y + self.height
    }
}

/// Rectangle that keeps entity centers inside the world
#[derive(Debug, Clone, Copy)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl WorldBounds {
    /// Clamp a center so an entity of edge `size` stays fully on screen
    pub fn clamp(&self, pos: Vec2, size: f32) -> Vec2 {
        let half = size / 2.0;
        Vec2::new(
            pos.x.clamp(half, (self.width - half).max(half)),
            pos.y.clamp(half, (self.height - half).max(half)),
        )
    }

    /// Which axes a center has left the playable range on
    pub fn outside(&self, pos: Vec2, size: f32) -> (bool, bool) {
        let half = size / 2.0;
        (
            pos.x < half || pos.x > self.width - half,
            pos.y < half || pos.y > self.height - half,
        )
    }
}

/// Apply `delta` one axis at a time, rejecting any axis whose destination box
/// overlaps a blocking tile, then clamp to the world. Separate axes let an
/// entity slide along a wall instead of sticking on diagonal input.
pub fn resolve_axis_move(
    pos: Vec2,
    delta: Vec2,
    size: f32,
    map: Option<&TileMap>,
    bounds: WorldBounds,
) -> Vec2 {
    let half = size / 2.0;
    let mut next = pos;

    if delta.x != 0.0 {
        let candidate = Vec2::new(next.x + delta.x, next.y);
        if !map.is_some_and(|m| m.box_blocked(candidate, half)) {
            next = candidate;
        }
    }
    if delta.y != 0.0 {
        let candidate = Vec2::new(next.x, next.y + delta.y);
        if !map.is_some_and(|m| m.box_blocked(candidate, half)) {
            next = candidate;
        }
    }

    bounds.clamp(next, size)
}
