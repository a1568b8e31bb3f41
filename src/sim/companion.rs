//! Companion follow and whistle policy
//!
//! Penned → Freed → Following. While following, Flash re-targets a point
//! behind the player every `follow_delay_ticks` ticks (deliberately laggy),
//! and a catch-up latch with two thresholds keeps the speed boost from
//! flickering at one boundary. A whistle swaps following for a short eased
//! dash toward the follow point.

use glam::Vec2;

use super::collision::resolve_axis_move;
use super::entity::{Companion, CompanionState, StepContext, WhistleDash};
use crate::{direction_to, ease_out_cubic};

impl Companion {
    /// Point `follow_distance` behind the player, on the player→companion line.
    /// `None` while the two stand on the same spot.
    pub fn behind_player(&self, player_pos: Vec2, follow_distance: f32) -> Option<Vec2> {
        direction_to(player_pos, self.pos).map(|dir| player_pos + dir * follow_distance)
    }

    /// Update the catch-up latch from the current separation
    pub fn update_catchup(&mut self, separation: f32, far: f32, close: f32) {
        if separation > far {
            self.catching_up = true;
        } else if separation < close {
            self.catching_up = false;
        }
    }

    /// Try to start a whistle dash. Returns whether it fired.
    pub fn whistle(&mut self, player_pos: Vec2, ctx: &StepContext) -> bool {
        if !self.is_following() || self.whistle_cooldown.is_active() {
            return false;
        }
        let cfg = &ctx.tuning.companion;
        let half = self.size / 2.0;
        let to = self
            .behind_player(player_pos, cfg.follow_distance)
            .filter(|target| !ctx.map.is_some_and(|m| m.box_blocked(*target, half)))
            .unwrap_or(player_pos);

        self.dash = Some(WhistleDash {
            from: self.pos,
            to,
            elapsed: 0,
            duration: cfg.whistle_ticks.max(1),
        });
        self.whistle_cooldown.start(cfg.whistle_cooldown_ticks);
        true
    }

    /// One tick of companion motion
    pub fn update(&mut self, player_pos: Vec2, ctx: &StepContext) {
        if self.state != CompanionState::Following {
            return;
        }

        if let Some(mut dash) = self.dash.take() {
            dash.elapsed += 1;
            let t = dash.elapsed as f32 / dash.duration as f32;
            self.pos = dash.from.lerp(dash.to, ease_out_cubic(t));
            if dash.elapsed < dash.duration {
                self.dash = Some(dash);
            } else {
                // Re-target from where the dash landed
                self.follow_target = None;
            }
            return;
        }

        let cfg = &ctx.tuning.companion;
        if !self.retarget.is_active() || self.follow_target.is_none() {
            if let Some(target) = self.behind_player(player_pos, cfg.follow_distance) {
                self.follow_target = Some(target);
            }
            self.retarget.start(cfg.follow_delay_ticks);
        }

        let separation = self.pos.distance(player_pos);
        self.update_catchup(separation, cfg.catchup_far, cfg.catchup_close);

        let Some(target) = self.follow_target else {
            return;
        };
        let Some(dir) = direction_to(self.pos, target) else {
            return;
        };
        let mut speed = cfg.speed;
        if self.catching_up {
            speed *= cfg.catchup_multiplier;
        }
        let delta = dir * speed.min(self.pos.distance(target));
        self.pos = resolve_axis_move(self.pos, delta, self.size, ctx.map, ctx.bounds);
    }
}
