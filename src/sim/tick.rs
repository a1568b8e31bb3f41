//! Frame step
//!
//! Advances a session by one host frame, spent as fixed 60 Hz ticks. The
//! order inside a playing tick is fixed: player, companion, hostiles,
//! collectibles, interactions, collisions and detection, the failure
//! accumulator, timers, then terminal evaluation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Collidable, CollectibleKind, StepContext};
use super::events::GameEvent;
use super::interaction::{throw_lasso, tick_interaction, update_interaction};
use super::state::{FailureMeter, GameMode, GameOverReason, GamePhase, GameState};
use crate::consts::{MAX_SUBSTEPS, REFERENCE_FRAME_MS};
use crate::level::{Level, TileKind};

/// Input levels for a single frame (held, not edge-triggered)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Lasso in the arena, hold-to-interact in the maze
    pub interact: bool,
    pub sprint: bool,
    pub whistle: bool,
    /// Start from the title screen, restart after a finished run
    pub start: bool,
}

impl TickInput {
    pub const LEFT: u32 = 1 << 0;
    pub const RIGHT: u32 = 1 << 1;
    pub const UP: u32 = 1 << 2;
    pub const DOWN: u32 = 1 << 3;
    pub const INTERACT: u32 = 1 << 4;
    pub const SPRINT: u32 = 1 << 5;
    pub const WHISTLE: u32 = 1 << 6;
    pub const START: u32 = 1 << 7;

    /// Decode the packed form used by the browser host
    pub fn from_bits(bits: u32) -> Self {
        Self {
            left: bits & Self::LEFT != 0,
            right: bits & Self::RIGHT != 0,
            up: bits & Self::UP != 0,
            down: bits & Self::DOWN != 0,
            interact: bits & Self::INTERACT != 0,
            sprint: bits & Self::SPRINT != 0,
            whistle: bits & Self::WHISTLE != 0,
            start: bits & Self::START != 0,
        }
    }

    pub fn bits(&self) -> u32 {
        [
            (self.left, Self::LEFT),
            (self.right, Self::RIGHT),
            (self.up, Self::UP),
            (self.down, Self::DOWN),
            (self.interact, Self::INTERACT),
            (self.sprint, Self::SPRINT),
            (self.whistle, Self::WHISTLE),
            (self.start, Self::START),
        ]
        .iter()
        .filter(|(held, _)| *held)
        .fold(0, |acc, (_, bit)| acc | bit)
    }

    /// Per-axis direction, not normalized. Opposing keys cancel.
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Advance the session by one host frame of `dt_ms` milliseconds.
///
/// `dt_ms` is clamped to `world.max_frame_ms`; non-finite or negative frames
/// count as zero-length. The frame is banked and spent in whole 60 Hz ticks
/// (at most `MAX_SUBSTEPS`), so a tick means the same span of play at any
/// host frame rate. Returns everything that happened this frame.
pub fn advance(state: &mut GameState, input: &TickInput, dt_ms: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    let start_pressed = input.start && !state.start_held;
    state.start_held = input.start;

    match state.phase {
        GamePhase::Title => {
            if start_pressed {
                state.phase = GamePhase::Playing;
                state.frame_accumulator_ms = 0.0;
                log::info!("Run started ({:?}, seed {})", state.mode(), state.seed);
                events.push(GameEvent::GameStarted { mode: state.mode() });
            }
            return events;
        }
        GamePhase::Victory | GamePhase::GameOver => {
            if start_pressed {
                state.reset();
            }
            return events;
        }
        GamePhase::Playing => {}
    }

    let dt = if dt_ms.is_finite() {
        dt_ms.clamp(0.0, state.tuning.world.max_frame_ms)
    } else {
        0.0
    };
    state.frame_accumulator_ms += dt;

    let mut substeps = 0;
    while state.frame_accumulator_ms >= REFERENCE_FRAME_MS && substeps < MAX_SUBSTEPS {
        state.frame_accumulator_ms -= REFERENCE_FRAME_MS;
        substeps += 1;
        events.extend(tick(state, input));
        if state.phase.is_terminal() {
            state.frame_accumulator_ms = 0.0;
            break;
        }
    }
    events
}

/// Run one fixed 60 Hz tick of a playing session
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Playing {
        return events;
    }
    let mode = state.mode();

    // Movement
    {
        let ctx = StepContext {
            tuning: &state.tuning,
            map: state.level.map(),
            bounds: state.bounds(),
        };
        state.player.update(input, &ctx);

        let player_pos = state.player.pos;
        if input.whistle && state.companion.whistle(player_pos, &ctx) {
            log::debug!("Whistle");
            events.push(GameEvent::WhistleBlown);
        }
        state.companion.update(player_pos, &ctx);

        for hostile in &mut state.hostiles {
            hostile.update(player_pos, &ctx, &mut state.rng);
        }
    }

    collect_touched(state, &mut events);

    match mode {
        GameMode::Arena => throw_lasso(state, input, &mut events),
        GameMode::Maze => update_interaction(state, input, &mut events),
    }

    match mode {
        GameMode::Arena => bandit_hits(state, &mut events),
        GameMode::Maze => guard_detection(state, &mut events),
    }

    // Mud rises while Flash is stuck
    if !state.companion.is_freed() {
        let rate = state.tuning.meters.mud_rate_per_ms;
        if let FailureMeter::Mud(mud) = &mut state.meters.failure {
            *mud = (*mud + rate * REFERENCE_FRAME_MS).min(FailureMeter::MUD_MAX);
        }
    }

    // Timers
    state.player.invincibility.tick();
    state.lasso_cooldown.tick();
    state.companion.retarget.tick();
    state.companion.whistle_cooldown.tick();
    for hostile in &mut state.hostiles {
        hostile.tick_timers();
    }
    tick_interaction(state, &mut events);
    state.meters.drain_time(REFERENCE_FRAME_MS / 1000.0);
    state.time_ticks += 1;

    evaluate_terminal(state, &mut events);
    events
}

/// Touch-collected items (coins)
fn collect_touched(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let mut gained = 0;
    for (index, item) in state.collectibles.iter_mut().enumerate() {
        if item.collected || item.interaction_ticks.is_some() || !state.player.touches(&*item) {
            continue;
        }
        item.collected = true;
        gained += item.value;
        events.push(GameEvent::ItemCollected {
            index,
            kind: CollectibleKind::Coin,
        });
    }
    state.add_score(gained);
}

fn bandit_hits(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let invincibility = state.tuning.player.invincibility_ticks;
    for hostile in &state.hostiles {
        if !state.player.touches(hostile) || !state.player.take_damage(invincibility) {
            continue;
        }
        let hearts = state.meters.hearts.get_or_insert(0);
        *hearts = hearts.saturating_sub(1);
        log::debug!("Player hit, {} hearts left", hearts);
        events.push(GameEvent::PlayerHit {
            hearts_left: *hearts,
        });
    }
}

fn guard_detection(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let ctx = StepContext {
        tuning: &state.tuning,
        map: state.level.map(),
        bounds: state.bounds(),
    };
    let player_pos = state.player.pos;
    let hidden = state.player.hidden;

    let mut detected = false;
    for hostile in &mut state.hostiles {
        let sees = hostile.can_see(player_pos, hidden, &ctx);
        if hostile.update_alert(sees, &ctx) {
            detected = true;
        }
        if state.player.touches(&*hostile) {
            detected = true;
        }
    }
    if detected {
        detect(state, events);
    }
}

/// A guard caught the player: strike, back to spawn, everyone calms down
fn detect(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let mut strikes = 0;
    if let FailureMeter::Strikes { count, max } = &mut state.meters.failure {
        *count = count.saturating_add(1).min(*max);
        strikes = *count;
    }
    if let Some(active) = state.player.interaction.take() {
        events.push(GameEvent::InteractionCancelled {
            target: active.target,
        });
    }
    state.player.respawn();
    for hostile in &mut state.hostiles {
        hostile.calm_down();
    }
    log::info!("Player detected, strike {}", strikes);
    events.push(GameEvent::PlayerDetected { strikes });
}

/// Both the player and Flash made it to the exit
fn escaped(state: &GameState) -> bool {
    let Level::Maze(maze) = &state.level else {
        return true;
    };
    state.companion.is_following()
        && maze.map.kind_at(state.player.pos) == TileKind::Exit
        && state.companion.pos.distance(maze.exit_center) <= state.tuning.companion.exit_radius
}

fn evaluate_terminal(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let lost = if state.meters.hearts == Some(0) {
        Some(GameOverReason::Hearts)
    } else if state.meters.failure.strikes_exhausted() {
        Some(GameOverReason::Caught)
    } else if state.meters.failure.is_maxed() {
        Some(GameOverReason::Mud)
    } else if state.meters.time_left() <= 0.0 {
        Some(GameOverReason::Time)
    } else {
        None
    };

    if let Some(reason) = lost {
        state.phase = GamePhase::GameOver;
        state.game_over_reason = Some(reason);
        log::info!("Game over: {} (score {})", reason.message(), state.meters.score);
        events.push(GameEvent::GameOver { reason });
    } else if state.objectives_complete() && escaped(state) {
        state.phase = GamePhase::Victory;
        log::info!("Victory with score {}", state.meters.score);
        events.push(GameEvent::Victory {
            score: state.meters.score,
        });
    } else {
        return;
    }

    if let Some(score) = state.record_best() {
        log::info!("New best score {}", score);
        events.push(GameEvent::NewBestScore { score });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{CompanionState, InteractionTarget};
    use crate::sim::state::Objective;
    use proptest::prelude::*;

    const FRAME: f32 = REFERENCE_FRAME_MS;

    fn press_start(state: &mut GameState) {
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        let events = advance(state, &start, FRAME);
        assert!(matches!(events.as_slice(), [GameEvent::GameStarted { .. }]));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    fn playing_arena(seed: u64) -> GameState {
        let mut state = GameState::arena(seed);
        press_start(&mut state);
        state
    }

    fn playing_maze(seed: u64) -> GameState {
        let mut state = GameState::maze(seed).unwrap();
        press_start(&mut state);
        state
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_input_bits_roundtrip() {
        let input = TickInput {
            left: true,
            interact: true,
            start: true,
            ..Default::default()
        };
        assert_eq!(input.bits(), TickInput::LEFT | TickInput::INTERACT | TickInput::START);
        assert_eq!(TickInput::from_bits(input.bits()), input);
        assert_eq!(TickInput::from_bits(0), TickInput::default());
    }

    #[test]
    fn test_direction_is_per_axis() {
        let input = TickInput {
            left: true,
            up: true,
            ..Default::default()
        };
        assert_eq!(input.direction(), Vec2::new(-1.0, -1.0));
        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(both.direction(), Vec2::ZERO);
    }

    #[test]
    fn test_title_waits_for_start_edge() {
        let mut state = GameState::arena(1);
        assert!(advance(&mut state, &idle(), FRAME).is_empty());
        assert_eq!(state.phase, GamePhase::Title);
        press_start(&mut state);

        // Holding start through play does nothing further
        let held = TickInput {
            start: true,
            ..Default::default()
        };
        let events = advance(&mut state, &held, FRAME);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::GameStarted { .. })));
    }

    #[test]
    fn test_three_bandit_hits_end_the_run() {
        let mut state = playing_arena(5);
        let invincibility = state.tuning.player.invincibility_ticks;
        let mut hits = 0;
        let mut last = Vec::new();
        while state.phase == GamePhase::Playing {
            // Park a bandit on the player and drain invincibility between hits
            state.hostiles[0].pos = state.player.pos;
            last = advance(&mut state, &idle(), FRAME);
            if last.iter().any(|e| matches!(e, GameEvent::PlayerHit { .. })) {
                hits += 1;
                for _ in 0..invincibility {
                    state.player.invincibility.tick();
                }
            }
            assert!(hits <= 3);
        }
        assert_eq!(hits, 3);
        assert_eq!(state.meters.hearts, Some(0));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.game_over_reason, Some(GameOverReason::Hearts));
        assert!(last.contains(&GameEvent::GameOver {
            reason: GameOverReason::Hearts
        }));
    }

    #[test]
    fn test_invincibility_blocks_repeat_hits() {
        let mut state = playing_arena(5);
        for _ in 0..10 {
            state.hostiles[0].pos = state.player.pos;
            advance(&mut state, &idle(), FRAME);
        }
        assert_eq!(state.meters.hearts, Some(2));
    }

    #[test]
    fn test_mud_overflow_loses() {
        let mut state = playing_arena(2);
        state.tuning.meters.mud_rate_per_ms = 0.02;
        state.meters.failure = FailureMeter::Mud(90.0);
        // 600 ms of play arrives as 50 ms frames
        let mut events = Vec::new();
        for _ in 0..12 {
            events = advance(&mut state, &idle(), 50.0);
            if state.phase != GamePhase::Playing {
                break;
            }
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.game_over_reason.map(|r| r.as_str()), Some("mud"));
        assert_eq!(state.meters.failure, FailureMeter::Mud(100.0));
        assert!(events.contains(&GameEvent::GameOver {
            reason: GameOverReason::Mud
        }));
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut state = playing_arena(2);
        let before = state.meters.time_left();
        advance(&mut state, &idle(), 10_000.0);
        let spent = before - state.meters.time_left();
        assert!((spent - 0.05).abs() < 1e-4);
        advance(&mut state, &idle(), f32::NAN);
        advance(&mut state, &idle(), -20.0);
        assert!((before - state.meters.time_left() - 0.05).abs() < 1e-4);
    }

    #[test]
    fn test_short_frames_bank_until_a_tick_is_due() {
        let mut state = playing_arena(2);
        advance(&mut state, &idle(), 10.0);
        assert_eq!(state.time_ticks, 0);
        advance(&mut state, &idle(), 10.0);
        assert_eq!(state.time_ticks, 1);
        advance(&mut state, &idle(), 40.0);
        assert_eq!(state.time_ticks, 3);
    }

    /// Wall time, in ms, until invincibility from a fresh hit wears off
    fn invincible_ms(hz: f32) -> f32 {
        let mut state = playing_arena(5);
        state.hostiles.clear();
        let ticks = state.tuning.player.invincibility_ticks;
        assert!(state.player.take_damage(ticks));
        let frame = 1000.0 / hz;
        let mut elapsed = 0.0;
        while state.player.invincibility.is_active() {
            advance(&mut state, &idle(), frame);
            elapsed += frame;
            assert!(elapsed < 10_000.0);
        }
        elapsed
    }

    #[test]
    fn test_invincibility_lasts_same_wall_time_at_any_rate() {
        let expected = GameState::arena(5).tuning.player.invincibility_ticks as f32 * FRAME;
        for hz in [30.0, 60.0, 144.0] {
            let elapsed = invincible_ms(hz);
            assert!(
                (elapsed - expected).abs() <= 1000.0 / hz + 0.5,
                "{hz} Hz: {elapsed} ms, expected {expected} ms"
            );
        }
    }

    /// Wall time, in ms, to pick up the maze key by holding interact
    fn key_hold_ms(hz: f32) -> f32 {
        let mut state = playing_maze(4);
        state.hostiles.clear();
        state.player.pos = state.collectibles[0].pos;
        let hold = TickInput {
            interact: true,
            ..Default::default()
        };
        let frame = 1000.0 / hz;
        let mut elapsed = 0.0;
        while !state.objective(Objective::KeyFound) {
            advance(&mut state, &hold, frame);
            elapsed += frame;
            assert!(elapsed < 10_000.0);
        }
        elapsed
    }

    #[test]
    fn test_key_hold_lasts_same_wall_time_at_any_rate() {
        let expected = GameState::maze(4).unwrap().tuning.meters.key_pickup_ticks as f32 * FRAME;
        for hz in [20.0, 60.0, 144.0] {
            let elapsed = key_hold_ms(hz);
            assert!(
                (elapsed - expected).abs() <= 1000.0 / hz + 0.5,
                "{hz} Hz: {elapsed} ms, expected {expected} ms"
            );
        }
    }

    #[test]
    fn test_lasso_rescue_wins_arena() {
        let mut state = playing_arena(8);
        state.hostiles.clear();
        let lasso = TickInput {
            interact: true,
            ..Default::default()
        };
        let mut events = Vec::new();
        while state.phase == GamePhase::Playing {
            state.player.pos = state.companion.pos;
            events.extend(advance(&mut state, &lasso, FRAME));
            assert!(state.time_ticks < 1000);
        }
        assert_eq!(state.phase, GamePhase::Victory);
        let throws = events
            .iter()
            .filter(|e| matches!(e, GameEvent::LassoFired { .. }))
            .count();
        assert_eq!(throws, 3);
        assert!(events.contains(&GameEvent::Victory { score: 1000 }));
        assert!(events.contains(&GameEvent::NewBestScore { score: 1000 }));
        assert_eq!(state.best_score, 1000);
    }

    #[test]
    fn test_time_expiry_beats_objectives() {
        let mut state = playing_arena(8);
        state.companion.state = CompanionState::Freed;
        state.complete_objective(Objective::FlashSaved);
        state.meters.set_time_left(0.01);
        let events = advance(&mut state, &idle(), FRAME);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.game_over_reason, Some(GameOverReason::Time));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Victory { .. })));
    }

    #[test]
    fn test_terminal_state_is_frozen() {
        let mut state = playing_arena(8);
        state.meters.set_time_left(0.0);
        advance(&mut state, &idle(), FRAME);
        assert_eq!(state.phase, GamePhase::GameOver);

        let ticks = state.time_ticks;
        let score = state.meters.score;
        let player = state.player.pos;
        let moving = TickInput {
            right: true,
            interact: true,
            ..Default::default()
        };
        for _ in 0..30 {
            assert!(advance(&mut state, &moving, FRAME).is_empty());
        }
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.meters.score, score);
        assert_eq!(state.player.pos, player);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_start_after_game_over_returns_to_title() {
        let mut state = playing_arena(8);
        state.meters.set_time_left(0.0);
        advance(&mut state, &idle(), FRAME);
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        advance(&mut state, &start, FRAME);
        assert_eq!(state.phase, GamePhase::Title);
        assert_eq!(state.meters.time_left(), state.tuning.meters.time_limit_secs);
        assert_eq!(state.game_over_reason, None);
    }

    #[test]
    fn test_best_score_survives_worse_runs() {
        let mut state = playing_arena(8);
        state.best_score = 5000;
        state.meters.score = 1200;
        state.meters.set_time_left(0.0);
        let events = advance(&mut state, &idle(), FRAME);
        assert_eq!(state.best_score, 5000);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::NewBestScore { .. })));
    }

    #[test]
    fn test_coin_touch_scores_once() {
        let mut state = playing_arena(8);
        state.hostiles.clear();
        state.player.pos = state.collectibles[1].pos;
        let first = advance(&mut state, &idle(), FRAME);
        assert!(first.contains(&GameEvent::ItemCollected {
            index: 1,
            kind: CollectibleKind::Coin
        }));
        advance(&mut state, &idle(), FRAME);
        assert_eq!(state.meters.score, 100);
        assert!(state.collectibles[1].collected);
    }

    #[test]
    fn test_interaction_completes_on_tick_n() {
        let mut state = playing_maze(4);
        state.hostiles.clear();
        state.player.pos = state.collectibles[0].pos;
        let hold = TickInput {
            interact: true,
            ..Default::default()
        };
        let n = state.tuning.meters.key_pickup_ticks;
        for tick in 1..=n {
            let events = advance(&mut state, &hold, FRAME);
            let done = events.contains(&GameEvent::ItemCollected {
                index: 0,
                kind: CollectibleKind::Key,
            });
            assert_eq!(done, tick == n, "tick {tick}");
        }
        assert!(state.objective(Objective::KeyFound));
        assert_eq!(state.meters.score, state.tuning.meters.key_value);
    }

    #[test]
    fn test_calm_bonus_is_paid_once() {
        let mut state = playing_maze(4);
        state.hostiles.clear();
        state.complete_objective(Objective::KeyFound);
        state.complete_objective(Objective::PenUnlocked);
        state.companion.state = CompanionState::Freed;
        let hold = TickInput {
            interact: true,
            ..Default::default()
        };
        let calm = state.tuning.companion.calm_ticks;
        let bonus = state.tuning.companion.calm_bonus;
        let mut events = Vec::new();
        for _ in 0..calm * 2 {
            state.player.pos = state.companion.pos + Vec2::new(30.0, 0.0);
            events.extend(advance(&mut state, &hold, FRAME));
        }
        assert_eq!(state.companion.state, CompanionState::Following);
        assert!(state.objective(Objective::FlashCalmed));
        assert_eq!(state.meters.score, bonus);
        let calmed = events
            .iter()
            .filter(|e| **e == GameEvent::CompanionFollowing)
            .count();
        assert_eq!(calmed, 1);
    }

    #[test]
    fn test_maze_victory_at_exit() {
        let mut state = playing_maze(4);
        state.hostiles.clear();
        for objective in [Objective::KeyFound, Objective::PenUnlocked, Objective::FlashCalmed] {
            state.complete_objective(objective);
        }
        state.companion.state = CompanionState::Following;
        let exit = match &state.level {
            Level::Maze(maze) => maze.exit_center,
            Level::Arena(_) => unreachable!(),
        };

        // Player at the exit without Flash: not yet
        state.player.pos = exit + Vec2::new(20.0, 0.0);
        state.companion.pos = exit - Vec2::new(200.0, 0.0);
        advance(&mut state, &idle(), FRAME);
        assert_eq!(state.phase, GamePhase::Playing);

        state.companion.pos = exit - Vec2::new(10.0, 0.0);
        let events = advance(&mut state, &idle(), FRAME);
        assert_eq!(state.phase, GamePhase::Victory);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Victory { .. })));
    }

    #[test]
    fn test_seen_player_gets_a_strike() {
        let mut state = playing_maze(4);
        state.hostiles.truncate(1);
        // Guard 0 patrols row 7 from (8,7); put the player right in front of it
        let guard = state.hostiles[0].pos;
        let mut events = Vec::new();
        let mut ticks = 0;
        while !events.iter().any(|e| matches!(e, GameEvent::PlayerDetected { .. })) {
            state.player.pos = state.hostiles[0].pos + Vec2::new(60.0, 0.0);
            events = advance(&mut state, &idle(), FRAME);
            ticks += 1;
            assert!(ticks < 200, "guard at {guard} never noticed");
        }
        assert_eq!(state.meters.failure, FailureMeter::Strikes { count: 1, max: 3 });
        assert_eq!(state.player.pos, state.player.spawn);
        assert_eq!(state.hostiles[0].alert, 0.0);
    }

    #[test]
    fn test_third_strike_is_caught() {
        let mut state = playing_maze(4);
        state.meters.failure = FailureMeter::Strikes { count: 2, max: 3 };
        state.player.pos = state.hostiles[0].pos;
        let events = advance(&mut state, &idle(), FRAME);
        assert!(events.contains(&GameEvent::PlayerDetected { strikes: 3 }));
        assert_eq!(state.game_over_reason, Some(GameOverReason::Caught));
    }

    #[test]
    fn test_detection_cancels_interaction() {
        let mut state = playing_maze(4);
        state.hostiles.truncate(1);
        state.player.pos = state.collectibles[0].pos;
        let hold = TickInput {
            interact: true,
            ..Default::default()
        };
        advance(&mut state, &hold, FRAME);
        assert!(state.player.interaction.is_some());
        state.hostiles[0].pos = state.player.pos;
        let events = advance(&mut state, &hold, FRAME);
        assert!(events.contains(&GameEvent::InteractionCancelled {
            target: InteractionTarget::Collectible(0)
        }));
        assert!(state.player.interaction.is_none());
    }

    #[test]
    fn test_determinism() {
        let script: Vec<TickInput> = (0..400u32)
            .map(|i| TickInput::from_bits((i.wrapping_mul(2_654_435_761) >> 27) & 0x7f))
            .collect();
        let run = |seed| {
            let mut state = playing_arena(seed);
            for input in &script {
                advance(&mut state, input, FRAME);
            }
            (
                state.player.pos,
                state.hostiles.iter().map(|h| h.pos).collect::<Vec<_>>(),
                state.meters.score,
                state.time_ticks,
            )
        };
        assert_eq!(run(77), run(77));
    }

    proptest! {
        #[test]
        fn prop_meters_stay_in_bounds(
            seed in 0u64..1000,
            maze in any::<bool>(),
            frames in prop::collection::vec((0u32..256, 0.0f32..80.0), 1..300),
        ) {
            let mut state = if maze {
                GameState::maze(seed).unwrap()
            } else {
                GameState::arena(seed)
            };
            press_start(&mut state);
            let hearts = state.tuning.player.hearts;
            let mut best = state.best_score;
            for (bits, dt) in frames {
                advance(&mut state, &TickInput::from_bits(bits & !TickInput::START), dt);
                prop_assert!(state.meters.time_left() >= 0.0);
                match state.meters.failure {
                    FailureMeter::Mud(mud) => prop_assert!((0.0..=100.0).contains(&mud)),
                    FailureMeter::Strikes { count, max } => prop_assert!(count <= max),
                }
                if let Some(h) = state.meters.hearts {
                    prop_assert!(h <= hearts);
                }
                for h in &state.hostiles {
                    prop_assert!((0.0..=state.tuning.hostile.max_alert).contains(&h.alert));
                }
                if let Some(stamina) = state.player.stamina {
                    prop_assert!(stamina >= 0.0);
                }
                prop_assert!(state.best_score >= best);
                best = state.best_score;
            }
        }
    }
}
