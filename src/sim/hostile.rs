//! Hostile behavior policies
//!
//! Bandits chase when the player comes close and otherwise wander. Guards
//! walk a waypoint loop and watch a vision cone; what they see feeds an alert
//! level that the session turns into a detection once it fills.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{Facing, Hostile, HostileBehavior, Movable, StepContext};
use crate::normalize_angle;

impl Hostile {
    /// One tick of movement
    pub fn update(&mut self, player_pos: Vec2, ctx: &StepContext, rng: &mut Pcg32) {
        match self.behavior {
            HostileBehavior::Chase { .. } => self.chase_or_wander(player_pos, ctx, rng),
            HostileBehavior::Patrol { .. } => self.patrol(ctx),
        }
    }

    fn chase_or_wander(&mut self, player_pos: Vec2, ctx: &StepContext, rng: &mut Pcg32) {
        let cfg = &ctx.tuning.hostile;
        let step = self.speed;

        if self.pos.distance(player_pos) < cfg.chase_radius {
            self.step_toward(player_pos, step);
        } else if let HostileBehavior::Chase {
            wander_dir,
            wander_ticks,
        } = &mut self.behavior
        {
            *wander_ticks += 1;
            if *wander_ticks > cfg.wander_interval_ticks {
                *wander_dir = Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
                *wander_ticks = 0;
            }
            self.pos += *wander_dir * step * cfg.wander_speed_factor;
        }

        let (off_x, off_y) = ctx.bounds.outside(self.pos, self.size);
        if let HostileBehavior::Chase { wander_dir, .. } = &mut self.behavior {
            if off_x {
                wander_dir.x = -wander_dir.x;
            }
            if off_y {
                wander_dir.y = -wander_dir.y;
            }
        }
        self.pos = ctx.bounds.clamp(self.pos, self.size);
    }

    fn patrol(&mut self, ctx: &StepContext) {
        let target = match &self.behavior {
            HostileBehavior::Patrol {
                waypoints,
                next,
                wait,
                ..
            } if !wait.is_active() && !waypoints.is_empty() => waypoints[*next % waypoints.len()],
            _ => return,
        };
        let step = self.speed;
        let moved = self.step_toward(target, step);
        let arrived = self.pos.distance(target) < 1e-3;
        if arrived {
            self.pos = target;
        }

        if let HostileBehavior::Patrol {
            waypoints,
            next,
            wait,
            facing,
        } = &mut self.behavior
        {
            if let Some(f) = moved.and_then(Facing::from_delta) {
                *facing = f;
            }
            if arrived {
                wait.start(ctx.tuning.hostile.waypoint_wait_ticks);
                *next = (*next + 1) % waypoints.len();
            }
        }
    }

    /// Whether this guard sees the player this tick. Bandits have no vision cone.
    pub fn can_see(&self, player_pos: Vec2, player_hidden: bool, ctx: &StepContext) -> bool {
        let Some(facing) = self.facing() else {
            return false;
        };
        let cfg = &ctx.tuning.hostile;
        if player_hidden {
            return false;
        }
        let to_player = player_pos - self.pos;
        let dist = to_player.length();
        if dist > cfg.sight_range {
            return false;
        }
        if dist > f32::EPSILON {
            let bearing = to_player.y.atan2(to_player.x);
            if normalize_angle(bearing - facing.angle()).abs() > cfg.sight_half_angle {
                return false;
            }
        }
        ctx.map
            .is_none_or(|map| map.line_clear(self.pos, player_pos, cfg.ray_step))
    }

    /// Raise or decay alert. Returns `true` once the level reaches `max_alert`.
    pub fn update_alert(&mut self, sees_player: bool, ctx: &StepContext) -> bool {
        let cfg = &ctx.tuning.hostile;
        self.alert = if sees_player {
            (self.alert + cfg.alert_gain).min(cfg.max_alert)
        } else {
            (self.alert - cfg.alert_decay).max(0.0)
        };
        self.alert >= cfg.max_alert
    }

    /// Patrol waits are frame counters like every other timer
    pub(crate) fn tick_timers(&mut self) {
        if let HostileBehavior::Patrol { wait, .. } = &mut self.behavior {
            wait.tick();
        }
    }

    pub(crate) fn calm_down(&mut self) {
        self.alert = 0.0;
    }
}
