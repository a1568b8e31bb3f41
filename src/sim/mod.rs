//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-driven `advance` with clamped frame length
//! - Seeded RNG only
//! - Stable iteration order (entities are never removed mid-run)
//! - No rendering, audio or storage; side effects leave as events

pub mod autopilot;
pub mod collision;
pub mod companion;
pub mod entity;
pub mod events;
pub mod hostile;
mod interaction;
pub mod player;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod timer;

pub use autopilot::Autopilot;
pub use collision::{BoundingBox, WorldBounds, resolve_axis_move};
pub use entity::{
    ActiveInteraction, Collectible, CollectibleKind, Collidable, Companion, CompanionState,
    EntityKind, Facing, Hostile, HostileBehavior, Interactable, InteractionTarget, Movable, Player,
    StepContext,
};
pub use events::{GameEvent, SoundCue};
pub use snapshot::Snapshot;
pub use state::{
    FailureMeter, GameMode, GameOverReason, GamePhase, GameState, Meters, Objective,
};
pub use tick::{TickInput, advance};
pub use timer::Countdown;

impl GameState {
    /// Advance one frame and return the view to draw along with its events
    pub fn step(&mut self, input: &TickInput, dt_ms: f32) -> (Snapshot, Vec<GameEvent>) {
        let events = advance(self, input, dt_ms);
        (self.snapshot(), events)
    }
}
