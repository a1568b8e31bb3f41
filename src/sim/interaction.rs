//! Lasso throws and timed interactions
//!
//! Arena: holding interact near Flash throws the lasso (one hit per cooldown).
//! Maze: holding interact near something interactable starts a hold timer
//! that completes exactly once unless the player lets go or walks off.

use super::entity::{
    ActiveInteraction, CollectibleKind, CompanionState, Interactable, InteractionTarget,
};
use super::events::GameEvent;
use super::state::{FailureMeter, GameState, Objective};
use super::tick::TickInput;
use super::timer::Countdown;
use crate::level::{Level, TileKind};

/// Arena: lasso Flash out of the mud
pub(crate) fn throw_lasso(state: &mut GameState, input: &TickInput, events: &mut Vec<GameEvent>) {
    let cfg = &state.tuning.companion;
    if !input.interact || state.lasso_cooldown.is_active() || state.companion.is_freed() {
        return;
    }
    if state.player.pos.distance(state.companion.pos) >= cfg.lasso_range {
        return;
    }

    let (cooldown, needed, bonus) = (
        cfg.lasso_cooldown_ticks,
        cfg.lasso_hits_needed,
        cfg.save_bonus,
    );
    let relief = state.tuning.meters.mud_relief_per_lasso;

    state.companion.lasso_hits += 1;
    state.lasso_cooldown.start(cooldown);
    if let FailureMeter::Mud(mud) = &mut state.meters.failure {
        *mud = (*mud - relief).max(0.0);
    }
    let hits = state.companion.lasso_hits;
    log::debug!("Lasso hit {}/{}", hits, needed);
    events.push(GameEvent::LassoFired { hits });

    if hits >= needed {
        state.companion.state = CompanionState::Freed;
        state.complete_objective(Objective::FlashSaved);
        state.add_score(bonus);
        log::info!("Flash saved from the mud");
        events.push(GameEvent::CompanionFreed);
    }
}

/// Hold duration for `target` if the player could interact with it right now
fn offer(state: &GameState, target: InteractionTarget) -> Option<u32> {
    let tuning = &state.tuning;
    let player = state.player.pos;
    match target {
        InteractionTarget::Collectible(index) => {
            let item = state.collectibles.get(index)?;
            let ticks = item.interaction_ticks(tuning)?;
            (player.distance(item.interaction_point()) <= tuning.player.pickup_radius)
                .then_some(ticks)
        }
        InteractionTarget::Pen => {
            let Level::Maze(maze) = &state.level else {
                return None;
            };
            if state.companion.state != CompanionState::Penned
                || !state.objective(Objective::KeyFound)
            {
                return None;
            }
            maze.map
                .centers_of(TileKind::Pen)
                .iter()
                .any(|c| player.distance(*c) <= tuning.player.pickup_radius)
                .then_some(tuning.companion.unlock_ticks)
        }
        InteractionTarget::Companion => {
            let ticks = state.companion.interaction_ticks(tuning)?;
            (player.distance(state.companion.interaction_point()) <= tuning.companion.calm_radius)
                .then_some(ticks)
        }
    }
}

/// Maze: start or cancel a hold interaction
pub(crate) fn update_interaction(
    state: &mut GameState,
    input: &TickInput,
    events: &mut Vec<GameEvent>,
) {
    if let Some(active) = state.player.interaction {
        if !input.interact || offer(state, active.target).is_none() {
            state.player.interaction = None;
            log::debug!("Interaction with {:?} cancelled", active.target);
            events.push(GameEvent::InteractionCancelled {
                target: active.target,
            });
        }
        return;
    }
    if !input.interact {
        return;
    }

    let mut candidates = (0..state.collectibles.len())
        .map(InteractionTarget::Collectible)
        .chain([InteractionTarget::Pen, InteractionTarget::Companion]);
    let found = candidates.find_map(|target| offer(state, target).map(|ticks| (target, ticks)));

    if let Some((target, ticks)) = found {
        let ticks = ticks.max(1);
        state.player.interaction = Some(ActiveInteraction {
            target,
            timer: Countdown::running(ticks),
            total_ticks: ticks,
        });
        events.push(GameEvent::InteractionStarted { target });
    }
}

/// Count down the active hold and apply its effect on the tick it finishes
pub(crate) fn tick_interaction(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let Some(active) = state.player.interaction.as_mut() else {
        return;
    };
    if !active.timer.tick() {
        return;
    }
    let target = active.target;
    state.player.interaction = None;
    complete(state, target, events);
}

fn complete(state: &mut GameState, target: InteractionTarget, events: &mut Vec<GameEvent>) {
    match target {
        InteractionTarget::Collectible(index) => {
            let Some(item) = state.collectibles.get_mut(index) else {
                return;
            };
            if item.collected {
                return;
            }
            item.collected = true;
            let (kind, value) = (item.kind, item.value);
            if kind == CollectibleKind::Key {
                state.complete_objective(Objective::KeyFound);
                log::info!("Key found");
            }
            state.add_score(value);
            events.push(GameEvent::ItemCollected { index, kind });
        }
        InteractionTarget::Pen => {
            if state.companion.state != CompanionState::Penned {
                return;
            }
            state.companion.state = CompanionState::Freed;
            state.complete_objective(Objective::PenUnlocked);
            state.add_score(state.tuning.companion.unlock_bonus);
            log::info!("Pen unlocked");
            events.push(GameEvent::CompanionFreed);
        }
        InteractionTarget::Companion => {
            if state.companion.state != CompanionState::Freed {
                return;
            }
            state.companion.state = CompanionState::Following;
            state.complete_objective(Objective::FlashCalmed);
            state.add_score(state.tuning.companion.calm_bonus);
            log::info!("Flash calmed and following");
            events.push(GameEvent::CompanionFollowing);
        }
    }
}
