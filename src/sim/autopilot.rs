//! Demo autopilot
//!
//! Produces input for an unattended session. In the arena it grabs nearby
//! coins, sidesteps bandits and lassos Flash. In the maze it walks a
//! breadth-first path over the tile grid to each objective in turn and holds
//! interact until the objective completes.

use std::collections::VecDeque;

use glam::Vec2;

use super::entity::{CollectibleKind, CompanionState};
use super::state::{GamePhase, GameState, Objective};
use super::tick::TickInput;
use crate::level::{Level, MazeLayout, TileKind, TileMap};

/// Per-axis dead zone when steering, in pixels
const STEER_DEADZONE: f32 = 1.5;
/// Bandits closer than this get avoided instead of ignored
const DODGE_RADIUS: f32 = 60.0;
/// Coins closer than this are worth a detour
const COIN_DETOUR: f32 = 100.0;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// Start is edge-triggered, so it gets released every other frame
    start_down: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&mut self, state: &GameState) -> TickInput {
        if state.phase != GamePhase::Playing {
            self.start_down = !self.start_down;
            return TickInput {
                start: self.start_down,
                ..Default::default()
            };
        }
        self.start_down = false;

        match &state.level {
            Level::Arena(_) => arena_input(state),
            Level::Maze(maze) => maze_input(state, maze),
        }
    }
}

/// Press the direction keys that move `from` toward `to`
fn steer(from: Vec2, to: Vec2) -> TickInput {
    let delta = to - from;
    TickInput {
        left: delta.x < -STEER_DEADZONE,
        right: delta.x > STEER_DEADZONE,
        up: delta.y < -STEER_DEADZONE,
        down: delta.y > STEER_DEADZONE,
        ..Default::default()
    }
}

fn arena_input(state: &GameState) -> TickInput {
    let player = state.player.pos;
    let flash = state.companion.pos;

    let threat = state
        .hostiles
        .iter()
        .map(|h| h.pos)
        .filter(|pos| pos.distance(player) < DODGE_RADIUS)
        .min_by(|a, b| {
            a.distance(player)
                .partial_cmp(&b.distance(player))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let coin = state
        .collectibles
        .iter()
        .filter(|c| !c.collected && c.pos.distance(player) < COIN_DETOUR)
        .map(|c| c.pos)
        .min_by(|a, b| {
            a.distance(player)
                .partial_cmp(&b.distance(player))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let mut input = match (threat, coin) {
        (Some(bandit), _) if !state.player.invincibility.is_active() => {
            // Run directly away from the bandit
            steer(player, player + (player - bandit))
        }
        (_, Some(coin)) => steer(player, coin),
        _ => steer(player, flash),
    };
    input.interact = player.distance(flash) < state.tuning.companion.lasso_range;
    input
}

/// First cell to step into on a shortest 4-way path from `from` to `to`.
///
/// Returns `None` when already there or when no path exists.
pub fn next_step(map: &TileMap, from: (i32, i32), to: (i32, i32)) -> Option<(i32, i32)> {
    if from == to || map.tile(to.0, to.1).is_blocking() {
        return None;
    }
    let index = |(c, r): (i32, i32)| r as usize * map.cols + c as usize;
    let mut came_from: Vec<Option<(i32, i32)>> = vec![None; map.cols * map.rows];
    let mut queue = VecDeque::from([to]);
    came_from[index(to)] = Some(to);

    // Search backwards from the goal so the parent of `from` is the next step
    while let Some(cell) = queue.pop_front() {
        for (dc, dr) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let next = (cell.0 + dc, cell.1 + dr);
            if map.tile(next.0, next.1).is_blocking() || came_from[index(next)].is_some() {
                continue;
            }
            came_from[index(next)] = Some(cell);
            if next == from {
                return Some(cell);
            }
            queue.push_back(next);
        }
    }
    None
}

fn nearest(points: impl Iterator<Item = Vec2>, to: Vec2) -> Option<Vec2> {
    points.min_by(|a, b| {
        a.distance(to)
            .partial_cmp(&b.distance(to))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

fn maze_input(state: &GameState, maze: &MazeLayout) -> TickInput {
    let player = state.player.pos;
    let tuning = &state.tuning;

    // Stand still and keep holding until the current interaction completes
    if state.player.interaction.is_some() {
        return TickInput {
            interact: true,
            ..Default::default()
        };
    }

    let key = state
        .collectibles
        .iter()
        .find(|c| c.kind == CollectibleKind::Key && !c.collected)
        .map(|c| c.pos);

    let (goal, reach) = match (state.objective(Objective::KeyFound), state.companion.state) {
        (false, _) => match key {
            Some(pos) => (pos, tuning.player.pickup_radius),
            None => return TickInput::default(),
        },
        (true, CompanionState::Penned) => {
            match nearest(maze.map.centers_of(TileKind::Pen).into_iter(), player) {
                Some(pos) => (pos, tuning.player.pickup_radius),
                None => return TickInput::default(),
            }
        }
        (true, CompanionState::Freed) => (state.companion.pos, tuning.companion.calm_radius),
        (true, CompanionState::Following) => {
            match nearest(maze.map.centers_of(TileKind::Exit).into_iter(), player) {
                Some(pos) => (pos, 0.0),
                None => return TickInput::default(),
            }
        }
    };

    let here = maze.map.cell_of(player);
    let waypoint = match next_step(&maze.map, here, maze.map.cell_of(goal)) {
        Some((col, row)) if col >= 0 && row >= 0 => maze.map.tile_center(col as u32, row as u32),
        _ => goal,
    };

    let mut input = if reach > 0.0 && player.distance(goal) <= reach - 2.0 {
        TickInput::default()
    } else {
        steer(player, waypoint)
    };
    input.interact = reach > 0.0 && player.distance(goal) <= reach - 2.0;
    input.whistle = state.companion.is_following()
        && state.companion.pos.distance(player) > tuning.companion.catchup_far;
    input
}
