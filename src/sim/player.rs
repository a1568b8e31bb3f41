//! Player movement policy

use glam::Vec2;

use super::collision::resolve_axis_move;
use super::entity::{Player, StepContext};
use super::tick::TickInput;
use crate::level::TileKind;

impl Player {
    /// Integrate one tick of movement intent.
    ///
    /// Axis inputs are not normalized, so diagonals run √2 faster. Sprinting
    /// burns stamina when the mode has it and refills otherwise.
    pub fn update(&mut self, input: &TickInput, ctx: &StepContext) {
        let dir = input.direction();

        let wants_sprint = input.sprint && dir != Vec2::ZERO;
        let mut multiplier = 1.0;
        self.sprinting = false;
        if let (Some(cfg), Some(stamina)) =
            (ctx.tuning.player.stamina.as_ref(), self.stamina.as_mut())
        {
            if wants_sprint && *stamina > 0.0 {
                *stamina = (*stamina - cfg.drain).max(0.0);
                self.sprinting = true;
                multiplier = cfg.sprint_multiplier;
            } else {
                *stamina = (*stamina + cfg.regen).min(cfg.max);
            }
        }

        let delta = dir * self.speed * multiplier;
        self.pos = resolve_axis_move(self.pos, delta, self.size, ctx.map, ctx.bounds);

        self.hidden = !self.sprinting
            && ctx.map.is_some_and(|map| map.kind_at(self.pos) == TileKind::Cover);
    }

    /// Back to the spawn point with nothing in hand
    pub fn respawn(&mut self) {
        self.pos = self.spawn;
        self.interaction = None;
        self.sprinting = false;
        self.hidden = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::MazeLayout;
    use crate::sim::collision::WorldBounds;
    use crate::tuning::Tuning;

    fn arena_ctx(tuning: &Tuning) -> StepContext<'_> {
        StepContext {
            tuning,
            map: None,
            bounds: WorldBounds {
                width: 800.0,
                height: 600.0,
            },
        }
    }

    #[test]
    fn test_diagonal_is_unnormalized() {
        let tuning = Tuning::arena();
        let ctx = arena_ctx(&tuning);
        let mut player = Player::new(Vec2::new(400.0, 300.0), &tuning);
        let input = TickInput {
            right: true,
            down: true,
            ..Default::default()
        };
        player.update(&input, &ctx);
        assert_eq!(player.pos, Vec2::new(404.0, 304.0));
    }

    #[test]
    fn test_clamped_to_world() {
        let tuning = Tuning::arena();
        let ctx = arena_ctx(&tuning);
        let mut player = Player::new(Vec2::new(13.0, 300.0), &tuning);
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        player.update(&input, &ctx);
        assert_eq!(player.pos.x, 12.0);
    }

    #[test]
    fn test_sprint_drains_and_regenerates_stamina() {
        let tuning = Tuning::maze();
        let maze = MazeLayout::shipped().unwrap();
        let ctx = StepContext {
            tuning: &tuning,
            map: Some(&maze.map),
            bounds: WorldBounds {
                width: maze.map.width(),
                height: maze.map.height(),
            },
        };
        let mut player = Player::new(maze.player_spawn, &tuning);
        let sprint = TickInput {
            right: true,
            sprint: true,
            ..Default::default()
        };
        let start_x = player.pos.x;
        player.update(&sprint, &ctx);
        assert!(player.sprinting);
        assert!(player.pos.x - start_x > tuning.player.speed);
        let drained = player.stamina.unwrap();
        assert!(drained < 100.0);

        player.update(&TickInput::default(), &ctx);
        assert!(!player.sprinting);
        assert!(player.stamina.unwrap() > drained);
    }

    #[test]
    fn test_cover_hides_only_when_not_sprinting() {
        let tuning = Tuning::maze();
        let maze = MazeLayout::shipped().unwrap();
        let ctx = StepContext {
            tuning: &tuning,
            map: Some(&maze.map),
            bounds: WorldBounds {
                width: maze.map.width(),
                height: maze.map.height(),
            },
        };
        // (4,5) is a rack
        let mut player = Player::new(maze.map.tile_center(4, 5), &tuning);
        player.update(&TickInput::default(), &ctx);
        assert!(player.hidden);

        let sprint_in_place = TickInput {
            left: true,
            right: true,
            sprint: true,
            ..Default::default()
        };
        // Opposing keys cancel: no movement, so no sprint either
        player.update(&sprint_in_place, &ctx);
        assert!(player.hidden);
    }
}
