//! Flash Quest - rescue a horse named Flash
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, behaviors, session state machine)
//! - `tuning`: Data-driven game balance
//! - `level`: Arena and tile-maze layouts
//! - `best_score`: The one persisted number
//! - `web`: wasm32 binding for a browser host

pub mod best_score;
pub mod level;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use best_score::BestScore;
pub use level::{ArenaLayout, Level, MazeLayout, TileKind, TileMap};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Duration of the 60 Hz reference frame that speeds are expressed in (ms)
    pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;
    /// Default clamp for a single frame step (ms)
    pub const MAX_FRAME_MS: f32 = 50.0;
    /// Upper bound on fixed ticks run for one host frame
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Playfield dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Default sprite size for player, horse and bandits
    pub const EMOJI_SIZE: f32 = 24.0;
    /// Maze tile edge length
    pub const TILE_SIZE: f32 = 40.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Cubic ease-out: fast start, gentle landing. `t` is clamped to [0, 1].
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Unit vector from `from` toward `to`, or `None` when the points coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Option<Vec2> {
    let delta = to - from;
    let len = delta.length();
    if len > f32::EPSILON {
        Some(delta / len)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(-1.5 * PI) - 0.5 * PI).abs() < 1e-5);
        // Odd multiples of π land on the seam; rounding may leave either side
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < 1e-5);
        assert_eq!(normalize_angle(0.25), 0.25);
    }

    #[test]
    fn test_ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(2.0), 1.0);
        // Front-loaded: more than half the distance covered by the midpoint
        assert!(ease_out_cubic(0.5) > 0.5);
    }

    #[test]
    fn test_direction_to_coincident_points() {
        assert!(direction_to(Vec2::new(3.0, 4.0), Vec2::new(3.0, 4.0)).is_none());
        let dir = direction_to(Vec2::ZERO, Vec2::new(3.0, 4.0)).unwrap();
        assert!((dir - Vec2::new(0.6, 0.8)).length() < 1e-5);
    }
}
