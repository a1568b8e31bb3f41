//! Session state and core simulation types
//!
//! One `GameState` owns every entity and meter. Only `tick::advance` mutates
//! it during play; `reset` rebuilds it from the level for a fresh run.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::WorldBounds;
use super::entity::{Collectible, Companion, Hostile, Player};
use super::timer::Countdown;
use crate::level::{ArenaLayout, Level, LevelError, MazeLayout};
use crate::tuning::Tuning;

/// Session phase. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a start press
    Title,
    Playing,
    Victory,
    GameOver,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Victory | GamePhase::GameOver)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Open field: lasso Flash out of the mud while dodging bandits
    Arena,
    /// Tile maze: key, pen, calm Flash, sneak her to the exit
    Maze,
}

/// Why a run was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    Hearts,
    Mud,
    Time,
    Caught,
}

impl GameOverReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverReason::Hearts => "hearts",
            GameOverReason::Mud => "mud",
            GameOverReason::Time => "time",
            GameOverReason::Caught => "caught",
        }
    }

    /// Player-facing explanation
    pub fn message(&self) -> &'static str {
        match self {
            GameOverReason::Hearts => "You ran out of hearts!",
            GameOverReason::Mud => "Flash got stuck in the mud!",
            GameOverReason::Time => "Time ran out!",
            GameOverReason::Caught => "Security caught you one too many times!",
        }
    }
}

/// Named goals; all must be true for victory
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    FlashSaved,
    KeyFound,
    PenUnlocked,
    FlashCalmed,
}

/// The bounded meter that ends a run when it fills
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FailureMeter {
    /// Percentage 0..=100, rising while Flash is stuck
    Mud(f32),
    Strikes { count: u8, max: u8 },
}

impl FailureMeter {
    pub const MUD_MAX: f32 = 100.0;

    pub fn is_maxed(&self) -> bool {
        match *self {
            FailureMeter::Mud(mud) => mud >= Self::MUD_MAX,
            FailureMeter::Strikes { .. } => false,
        }
    }

    pub fn strikes_exhausted(&self) -> bool {
        match *self {
            FailureMeter::Strikes { count, max } => count >= max,
            FailureMeter::Mud(_) => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meters {
    pub score: u64,
    /// Seconds remaining, never negative
    time_left: f32,
    /// `None` in modes without hearts
    pub hearts: Option<u8>,
    pub failure: FailureMeter,
}

impl Meters {
    pub fn time_left(&self) -> f32 {
        self.time_left.max(0.0)
    }

    pub fn set_time_left(&mut self, secs: f32) {
        self.time_left = secs.max(0.0);
    }

    pub(crate) fn drain_time(&mut self, secs: f32) {
        self.time_left = (self.time_left - secs).max(0.0);
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub level: Level,
    pub phase: GamePhase,
    /// Simulation tick counter for the current run
    pub time_ticks: u64,
    pub meters: Meters,
    /// Highest score seen, including earlier sessions. Never decreases.
    pub best_score: u64,
    pub objectives: BTreeMap<Objective, bool>,
    pub player: Player,
    pub companion: Companion,
    /// Stable indices: entities are never removed during a run
    pub hostiles: Vec<Hostile>,
    pub collectibles: Vec<Collectible>,
    pub lasso_cooldown: Countdown,
    pub game_over_reason: Option<GameOverReason>,
    /// Level of `start` on the previous tick, for edge detection
    pub(crate) start_held: bool,
    /// Host time not yet consumed by a fixed tick (ms)
    pub(crate) frame_accumulator_ms: f32,
}

impl GameState {
    /// Create a session on the title screen
    pub fn new(level: Level, tuning: Tuning, seed: u64, best_score: u64) -> Self {
        let player_spawn = match &level {
            Level::Arena(arena) => arena.player_spawn,
            Level::Maze(maze) => maze.player_spawn,
        };
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(player_spawn, &tuning),
            companion: Companion::new(player_spawn, &tuning),
            meters: Meters {
                score: 0,
                time_left: 0.0,
                hearts: None,
                failure: FailureMeter::Mud(0.0),
            },
            tuning,
            level,
            phase: GamePhase::Title,
            time_ticks: 0,
            best_score,
            objectives: BTreeMap::new(),
            hostiles: Vec::new(),
            collectibles: Vec::new(),
            lasso_cooldown: Countdown::default(),
            game_over_reason: None,
            start_held: false,
            frame_accumulator_ms: 0.0,
        };
        state.spawn_run();
        state
    }

    /// Open-field session with the default spawn layout
    pub fn arena(seed: u64) -> Self {
        Self::new(Level::Arena(ArenaLayout::default()), Tuning::arena(), seed, 0)
    }

    /// Retail-maze session on the built-in map
    pub fn maze(seed: u64) -> Result<Self, LevelError> {
        Ok(Self::new(
            Level::Maze(MazeLayout::shipped()?),
            Tuning::maze(),
            seed,
            0,
        ))
    }

    pub fn mode(&self) -> GameMode {
        match self.level {
            Level::Arena(_) => GameMode::Arena,
            Level::Maze(_) => GameMode::Maze,
        }
    }

    pub fn bounds(&self) -> WorldBounds {
        match &self.level {
            Level::Arena(_) => WorldBounds {
                width: self.tuning.world.width,
                height: self.tuning.world.height,
            },
            Level::Maze(maze) => WorldBounds {
                width: maze.map.width(),
                height: maze.map.height(),
            },
        }
    }

    /// Discard the current run and return to the title screen
    pub fn reset(&mut self) {
        self.spawn_run();
        self.phase = GamePhase::Title;
        log::info!("Session reset to title");
    }

    /// Fresh entities and meters from the level. Keeps best score and RNG stream.
    pub(crate) fn spawn_run(&mut self) {
        let tuning = &self.tuning;
        self.time_ticks = 0;
        self.frame_accumulator_ms = 0.0;
        self.game_over_reason = None;
        self.lasso_cooldown.clear();
        self.objectives.clear();
        self.meters.score = 0;
        self.meters.set_time_left(tuning.meters.time_limit_secs);

        match &self.level {
            Level::Arena(arena) => {
                self.player = Player::new(arena.player_spawn, tuning);
                self.companion = Companion::new(arena.horse_spawn, tuning);
                self.hostiles = arena
                    .bandit_spawns
                    .iter()
                    .map(|&spawn| {
                        let dir = Vec2::new(
                            self.rng.random_range(-0.5..0.5),
                            self.rng.random_range(-0.5..0.5),
                        );
                        Hostile::bandit(spawn, dir, tuning)
                    })
                    .collect();
                self.collectibles = arena
                    .coin_spawns
                    .iter()
                    .map(|&pos| Collectible::coin(pos, tuning))
                    .collect();
                self.meters.hearts = Some(tuning.player.hearts);
                self.meters.failure = FailureMeter::Mud(0.0);
                self.objectives.insert(Objective::FlashSaved, false);
            }
            Level::Maze(maze) => {
                self.player = Player::new(maze.player_spawn, tuning);
                self.companion = Companion::new(maze.companion_spawn, tuning);
                self.hostiles = maze
                    .guard_routes
                    .iter()
                    .map(|route| Hostile::guard(route.clone(), tuning))
                    .collect();
                self.collectibles = std::iter::once(Collectible::key(maze.key_spawn, tuning))
                    .chain(maze.coin_spawns.iter().map(|&pos| Collectible::coin(pos, tuning)))
                    .collect();
                self.meters.hearts = None;
                self.meters.failure = FailureMeter::Strikes {
                    count: 0,
                    max: tuning.meters.max_strikes,
                };
                for objective in [
                    Objective::KeyFound,
                    Objective::PenUnlocked,
                    Objective::FlashCalmed,
                ] {
                    self.objectives.insert(objective, false);
                }
            }
        }
    }

    /// Mark an objective met. Objectives never revert within a run.
    pub fn complete_objective(&mut self, objective: Objective) {
        self.objectives.insert(objective, true);
    }

    pub fn objective(&self, objective: Objective) -> bool {
        self.objectives.get(&objective).copied().unwrap_or(false)
    }

    pub fn objectives_complete(&self) -> bool {
        self.objectives.values().all(|done| *done)
    }

    pub fn add_score(&mut self, points: u64) {
        self.meters.score = self.meters.score.saturating_add(points);
    }

    /// Raise the best score to the current score if beaten. Returns the new record.
    pub(crate) fn record_best(&mut self) -> Option<u64> {
        if self.meters.score > self.best_score {
            self.best_score = self.meters.score;
            Some(self.best_score)
        } else {
            None
        }
    }
}
