//! Data-driven game balance
//!
//! Every threshold the simulation uses lives here, so nothing is hard-coded
//! in the behaviors. Presets cover the two shipped modes and a JSON document
//! can override any field.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors from loading a tuning file
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid tuning json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tuning: {0}")]
    Invalid(&'static str),
}

/// Playfield bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub width: f32,
    pub height: f32,
    /// Clamp applied to every frame step (ms)
    pub max_frame_ms: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            max_frame_ms: MAX_FRAME_MS,
        }
    }
}

/// Sprint stamina (maze only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StaminaTuning {
    pub max: f32,
    /// Drain per reference frame while sprinting
    pub drain: f32,
    /// Regeneration per reference frame otherwise
    pub regen: f32,
    pub sprint_multiplier: f32,
}

impl Default for StaminaTuning {
    fn default() -> Self {
        Self {
            max: 100.0,
            drain: 1.0,
            regen: 0.5,
            sprint_multiplier: 1.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Pixels per reference frame
    pub speed: f32,
    pub size: f32,
    pub hearts: u8,
    pub invincibility_ticks: u32,
    /// Reach for timed item pickups and the pen gate
    pub pickup_radius: f32,
    pub stamina: Option<StaminaTuning>,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 4.0,
            size: EMOJI_SIZE,
            hearts: 3,
            invincibility_ticks: 120,
            pickup_radius: 48.0,
            stamina: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionTuning {
    pub size: f32,
    /// Base follow speed (pixels per reference frame)
    pub speed: f32,
    pub catchup_multiplier: f32,
    /// Separation above which catch-up engages
    pub catchup_far: f32,
    /// Separation below which catch-up releases (must be < `catchup_far`)
    pub catchup_close: f32,
    pub follow_distance: f32,
    /// Re-target cadence while following
    pub follow_delay_ticks: u32,
    pub whistle_cooldown_ticks: u32,
    pub whistle_ticks: u32,
    pub calm_radius: f32,
    pub calm_ticks: u32,
    pub calm_bonus: u64,
    pub unlock_ticks: u32,
    pub unlock_bonus: u64,
    /// Companion must be this close to the exit centroid for victory
    pub exit_radius: f32,
    pub lasso_range: f32,
    pub lasso_cooldown_ticks: u32,
    pub lasso_hits_needed: u32,
    pub save_bonus: u64,
}

impl Default for CompanionTuning {
    fn default() -> Self {
        Self {
            size: EMOJI_SIZE,
            speed: 3.0,
            catchup_multiplier: 1.8,
            catchup_far: 120.0,
            catchup_close: 70.0,
            follow_distance: 40.0,
            follow_delay_ticks: 6,
            whistle_cooldown_ticks: 180,
            whistle_ticks: 20,
            calm_radius: 56.0,
            calm_ticks: 90,
            calm_bonus: 1000,
            unlock_ticks: 60,
            unlock_bonus: 500,
            exit_radius: 60.0,
            lasso_range: 80.0,
            lasso_cooldown_ticks: 60,
            lasso_hits_needed: 3,
            save_bonus: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostileTuning {
    pub size: f32,
    /// Pixels per reference frame
    pub speed: f32,
    pub chase_radius: f32,
    pub wander_interval_ticks: u32,
    pub wander_speed_factor: f32,
    pub sight_range: f32,
    /// Half-width of the vision cone (radians)
    pub sight_half_angle: f32,
    /// Sampling step of the line-of-sight ray (pixels)
    pub ray_step: f32,
    pub alert_gain: f32,
    pub alert_decay: f32,
    pub max_alert: f32,
    pub waypoint_wait_ticks: u32,
}

impl Default for HostileTuning {
    fn default() -> Self {
        Self {
            size: EMOJI_SIZE,
            speed: 1.5,
            chase_radius: 150.0,
            wander_interval_ticks: 120,
            wander_speed_factor: 0.5,
            sight_range: 160.0,
            sight_half_angle: 0.6,
            ray_step: TILE_SIZE / 4.0,
            alert_gain: 2.0,
            alert_decay: 0.5,
            max_alert: 100.0,
            waypoint_wait_ticks: 45,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterTuning {
    pub time_limit_secs: f32,
    /// Mud rise per millisecond while Flash is still stuck
    pub mud_rate_per_ms: f32,
    pub mud_relief_per_lasso: f32,
    pub max_strikes: u8,
    pub coin_value: u64,
    pub key_value: u64,
    pub key_pickup_ticks: u32,
}

impl Default for MeterTuning {
    fn default() -> Self {
        Self {
            time_limit_secs: 120.0,
            // 0.02 per reference frame
            mud_rate_per_ms: 0.02 / REFERENCE_FRAME_MS,
            mud_relief_per_lasso: 15.0,
            max_strikes: 3,
            coin_value: 100,
            key_value: 250,
            key_pickup_ticks: 45,
        }
    }
}

/// Complete balance sheet for one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldTuning,
    pub player: PlayerTuning,
    pub companion: CompanionTuning,
    pub hostile: HostileTuning,
    pub meters: MeterTuning,
}

impl Tuning {
    /// Open-field bandit chase (hearts + mud)
    pub fn arena() -> Self {
        Self::default()
    }

    /// Retail-maze stealth escort (strikes + stamina)
    pub fn maze() -> Self {
        let mut tuning = Self::default();
        tuning.player.speed = 3.0;
        tuning.player.stamina = Some(StaminaTuning::default());
        tuning.hostile.speed = 1.2;
        tuning.meters.time_limit_secs = 180.0;
        tuning
    }

    /// Parse a tuning document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Reject settings that would break the simulation's invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.world.width <= 0.0 || self.world.height <= 0.0 {
            return Err(TuningError::Invalid("world size must be positive"));
        }
        if self.world.max_frame_ms <= 0.0 {
            return Err(TuningError::Invalid("max_frame_ms must be positive"));
        }
        if self.companion.catchup_close >= self.companion.catchup_far {
            return Err(TuningError::Invalid("catchup_close must be below catchup_far"));
        }
        if self.hostile.ray_step <= 0.0 {
            return Err(TuningError::Invalid("ray_step must be positive"));
        }
        if self.hostile.max_alert <= 0.0 {
            return Err(TuningError::Invalid("max_alert must be positive"));
        }
        Ok(())
    }
}
