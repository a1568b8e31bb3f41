//! Entity records and capability traits
//!
//! Each entity is a plain struct carrying only what its behavior needs. Shared
//! capabilities (moving, colliding, being interacted with) are traits rather
//! than a base type, and behaviors live next to the entity they drive
//! (`player`, `companion`, `hostile`).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{BoundingBox, WorldBounds};
use super::timer::Countdown;
use crate::direction_to;
use crate::level::TileMap;
use crate::tuning::{StaminaTuning, Tuning};

/// Render-facing discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Companion,
    Bandit,
    Guard,
    Coin,
    Key,
}

/// Everything a behavior may read during one tick
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub tuning: &'a Tuning,
    pub map: Option<&'a TileMap>,
    pub bounds: WorldBounds,
}

pub trait Collidable {
    fn bounds(&self) -> BoundingBox;

    fn touches(&self, other: &impl Collidable) -> bool {
        self.bounds().intersects(&other.bounds())
    }
}

pub trait Movable {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, pos: Vec2);

    /// Move up to `step` pixels straight at `target` without overshooting.
    /// Returns the displacement, or `None` when already on the target.
    fn step_toward(&mut self, target: Vec2, step: f32) -> Option<Vec2> {
        let pos = self.position();
        let dir = direction_to(pos, target)?;
        let delta = dir * step.min(pos.distance(target));
        self.set_position(pos + delta);
        Some(delta)
    }
}

pub trait Interactable {
    /// Where the player has to stand near
    fn interaction_point(&self) -> Vec2;
    /// Hold duration, or `None` when no interaction is currently possible
    fn interaction_ticks(&self, tuning: &Tuning) -> Option<u32>;
}

macro_rules! impl_body {
    ($ty:ty) => {
        impl Movable for $ty {
            fn position(&self) -> Vec2 {
                self.pos
            }
            fn set_position(&mut self, pos: Vec2) {
                self.pos = pos;
            }
        }

        impl Collidable for $ty {
            fn bounds(&self) -> BoundingBox {
                BoundingBox::from_center(self.pos, self.size)
            }
        }
    };
}

/// What an in-progress interaction will complete on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionTarget {
    Collectible(usize),
    /// Unlock the pen gate (needs the key)
    Pen,
    /// Calm Flash so she follows
    Companion,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveInteraction {
    pub target: InteractionTarget,
    pub timer: Countdown,
    pub total_ticks: u32,
}

impl ActiveInteraction {
    pub fn progress(&self) -> f32 {
        1.0 - self.timer.fraction_remaining(self.total_ticks)
    }
}

/// The rescuer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub spawn: Vec2,
    pub size: f32,
    pub speed: f32,
    /// `None` when the mode has no sprinting
    pub stamina: Option<f32>,
    pub sprinting: bool,
    pub invincibility: Countdown,
    /// Standing in cover and not sprinting
    pub hidden: bool,
    pub interaction: Option<ActiveInteraction>,
}

impl Player {
    pub fn new(spawn: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos: spawn,
            spawn,
            size: tuning.player.size,
            speed: tuning.player.speed,
            stamina: tuning.player.stamina.as_ref().map(|s: &StaminaTuning| s.max),
            sprinting: false,
            invincibility: Countdown::default(),
            hidden: false,
            interaction: None,
        }
    }

    /// Start invincibility if not already invincible. Returns whether the hit landed.
    pub fn take_damage(&mut self, invincibility_ticks: u32) -> bool {
        if self.invincibility.is_active() {
            return false;
        }
        self.invincibility.start(invincibility_ticks);
        true
    }

    /// Sprite opacity: oscillates while invincible
    pub fn blink_opacity(&self) -> f32 {
        if self.invincibility.is_active() {
            (self.invincibility.remaining() as f32 * 0.3).sin() * 0.5 + 0.5
        } else {
            1.0
        }
    }
}

impl_body!(Player);

/// Flash's rescue progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanionState {
    /// Stuck: in the mud (arena) or locked in the pen (maze)
    Penned,
    Freed,
    Following,
}

/// Eased whistle reposition in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WhistleDash {
    pub from: Vec2,
    pub to: Vec2,
    pub elapsed: u32,
    pub duration: u32,
}

/// Flash the horse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Companion {
    pub pos: Vec2,
    pub size: f32,
    pub state: CompanionState,
    /// Arena: successful lasso throws so far
    pub lasso_hits: u32,
    /// Boosted speed engaged (hysteresis latch)
    pub catching_up: bool,
    pub follow_target: Option<Vec2>,
    pub retarget: Countdown,
    pub whistle_cooldown: Countdown,
    pub dash: Option<WhistleDash>,
}

impl Companion {
    pub fn new(spawn: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos: spawn,
            size: tuning.companion.size,
            state: CompanionState::Penned,
            lasso_hits: 0,
            catching_up: false,
            follow_target: None,
            retarget: Countdown::default(),
            whistle_cooldown: Countdown::default(),
            dash: None,
        }
    }

    pub fn is_freed(&self) -> bool {
        self.state != CompanionState::Penned
    }

    pub fn is_following(&self) -> bool {
        self.state == CompanionState::Following
    }
}

impl_body!(Companion);

impl Interactable for Companion {
    fn interaction_point(&self) -> Vec2 {
        self.pos
    }

    fn interaction_ticks(&self, tuning: &Tuning) -> Option<u32> {
        (self.state == CompanionState::Freed).then_some(tuning.companion.calm_ticks)
    }
}

/// 4-way facing, screen coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Right,
    Down,
    Left,
    Up,
}

impl Facing {
    /// Dominant axis of a nonzero displacement
    pub fn from_delta(delta: Vec2) -> Option<Self> {
        if delta == Vec2::ZERO {
            return None;
        }
        Some(if delta.x.abs() >= delta.y.abs() {
            if delta.x > 0.0 { Facing::Right } else { Facing::Left }
        } else if delta.y > 0.0 {
            Facing::Down
        } else {
            Facing::Up
        })
    }

    pub fn angle(self) -> f32 {
        use std::f32::consts::{FRAC_PI_2, PI};
        match self {
            Facing::Right => 0.0,
            Facing::Down => FRAC_PI_2,
            Facing::Left => PI,
            Facing::Up => -FRAC_PI_2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HostileBehavior {
    /// Arena bandit: charge when close, otherwise wander
    Chase {
        wander_dir: Vec2,
        wander_ticks: u32,
    },
    /// Maze guard: walk a waypoint loop and watch a vision cone
    Patrol {
        waypoints: Vec<Vec2>,
        next: usize,
        wait: Countdown,
        facing: Facing,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hostile {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    /// 0..max_alert; only patrols raise it
    pub alert: f32,
    pub behavior: HostileBehavior,
}

impl Hostile {
    pub fn bandit(spawn: Vec2, wander_dir: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos: spawn,
            size: tuning.hostile.size,
            speed: tuning.hostile.speed,
            alert: 0.0,
            behavior: HostileBehavior::Chase {
                wander_dir,
                wander_ticks: 0,
            },
        }
    }

    /// Guard standing on the first waypoint of its route
    pub fn guard(route: Vec<Vec2>, tuning: &Tuning) -> Self {
        let spawn = route.first().copied().unwrap_or(Vec2::ZERO);
        let next = if route.len() > 1 { 1 } else { 0 };
        Self {
            pos: spawn,
            size: tuning.hostile.size,
            speed: tuning.hostile.speed,
            alert: 0.0,
            behavior: HostileBehavior::Patrol {
                waypoints: route,
                next,
                wait: Countdown::default(),
                facing: Facing::default(),
            },
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self.behavior {
            HostileBehavior::Chase { .. } => EntityKind::Bandit,
            HostileBehavior::Patrol { .. } => EntityKind::Guard,
        }
    }

    pub fn facing(&self) -> Option<Facing> {
        match self.behavior {
            HostileBehavior::Patrol { facing, .. } => Some(facing),
            HostileBehavior::Chase { .. } => None,
        }
    }
}

impl_body!(Hostile);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Coin,
    Key,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub kind: CollectibleKind,
    pub pos: Vec2,
    pub size: f32,
    pub collected: bool,
    /// `None`: picked up on touch. `Some(n)`: hold interact for n ticks.
    pub interaction_ticks: Option<u32>,
    pub value: u64,
}

impl Collectible {
    pub fn coin(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            kind: CollectibleKind::Coin,
            pos,
            size: 20.0,
            collected: false,
            interaction_ticks: None,
            value: tuning.meters.coin_value,
        }
    }

    pub fn key(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            kind: CollectibleKind::Key,
            pos,
            size: 20.0,
            collected: false,
            interaction_ticks: Some(tuning.meters.key_pickup_ticks),
            value: tuning.meters.key_value,
        }
    }

    pub fn entity_kind(&self) -> EntityKind {
        match self.kind {
            CollectibleKind::Coin => EntityKind::Coin,
            CollectibleKind::Key => EntityKind::Key,
        }
    }
}

impl Collidable for Collectible {
    fn bounds(&self) -> BoundingBox {
        BoundingBox::from_center(self.pos, self.size)
    }
}

impl Interactable for Collectible {
    fn interaction_point(&self) -> Vec2 {
        self.pos
    }

    fn interaction_ticks(&self, _tuning: &Tuning) -> Option<u32> {
        if self.collected {
            None
        } else {
            self.interaction_ticks
        }
    }
}
