//! Read-only view of a session for renderers and UI
//!
//! Everything a host needs to draw a frame, in plain serializable data.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{CompanionState, EntityKind, Facing};
use super::state::{FailureMeter, GameMode, GameOverReason, GamePhase, GameState, Objective};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub size: f32,
    /// Blinks while invincible
    pub opacity: f32,
    pub hidden: bool,
    pub sprinting: bool,
    pub stamina: Option<f32>,
    /// 0..1 while holding an interaction
    pub interaction_progress: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanionView {
    pub pos: Vec2,
    pub size: f32,
    pub state: CompanionState,
    pub saved: bool,
    pub following: bool,
    pub lasso_hits: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostileView {
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: f32,
    pub alert: f32,
    pub facing: Option<Facing>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectibleView {
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: f32,
    pub collected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterView {
    pub score: u64,
    pub best_score: u64,
    pub time_left: f32,
    pub hearts: Option<u8>,
    pub mud: Option<f32>,
    pub strikes: Option<u8>,
    pub max_strikes: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub mode: GameMode,
    pub time_ticks: u64,
    pub player: PlayerView,
    pub companion: CompanionView,
    pub hostiles: Vec<HostileView>,
    pub collectibles: Vec<CollectibleView>,
    pub meters: MeterView,
    pub objectives: BTreeMap<Objective, bool>,
    pub game_over_reason: Option<GameOverReason>,
    /// Player-facing text for the game-over screen
    pub game_over_message: Option<String>,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        let player = &self.player;
        let companion = &self.companion;
        let (mud, strikes, max_strikes) = match self.meters.failure {
            FailureMeter::Mud(mud) => (Some(mud), None, None),
            FailureMeter::Strikes { count, max } => (None, Some(count), Some(max)),
        };

        Snapshot {
            phase: self.phase,
            mode: self.mode(),
            time_ticks: self.time_ticks,
            player: PlayerView {
                pos: player.pos,
                size: player.size,
                opacity: player.blink_opacity(),
                hidden: player.hidden,
                sprinting: player.sprinting,
                stamina: player.stamina,
                interaction_progress: player.interaction.map(|active| active.progress()),
            },
            companion: CompanionView {
                pos: companion.pos,
                size: companion.size,
                state: companion.state,
                saved: companion.is_freed(),
                following: companion.is_following(),
                lasso_hits: companion.lasso_hits,
            },
            hostiles: self
                .hostiles
                .iter()
                .map(|h| HostileView {
                    kind: h.kind(),
                    pos: h.pos,
                    size: h.size,
                    alert: h.alert,
                    facing: h.facing(),
                })
                .collect(),
            collectibles: self
                .collectibles
                .iter()
                .map(|c| CollectibleView {
                    kind: c.entity_kind(),
                    pos: c.pos,
                    size: c.size,
                    collected: c.collected,
                })
                .collect(),
            meters: MeterView {
                score: self.meters.score,
                best_score: self.best_score,
                time_left: self.meters.time_left(),
                hearts: self.meters.hearts,
                mud,
                strikes,
                max_strikes,
            },
            objectives: self.objectives.clone(),
            game_over_reason: self.game_over_reason,
            game_over_message: self.game_over_reason.map(|r| r.message().to_string()),
        }
    }
}
