//! Discrete things that happened during a tick
//!
//! The simulation never touches audio, DOM or storage. Hosts drain these
//! events after each `advance` and react (play a cue, persist the best score).

use serde::{Deserialize, Serialize};

use super::entity::{CollectibleKind, InteractionTarget};
use super::state::{GameMode, GameOverReason};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GameStarted { mode: GameMode },
    /// Arena lasso landed on Flash
    LassoFired { hits: u32 },
    ItemCollected { index: usize, kind: CollectibleKind },
    InteractionStarted { target: InteractionTarget },
    InteractionCancelled { target: InteractionTarget },
    CompanionFreed,
    CompanionFollowing,
    WhistleBlown,
    PlayerHit { hearts_left: u8 },
    PlayerDetected { strikes: u8 },
    Victory { score: u64 },
    GameOver { reason: GameOverReason },
    NewBestScore { score: u64 },
}

/// Named audio cues an external sound collaborator can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    LassoFired,
    ItemCollected,
    PlayerHit,
    Victory,
    GameOver,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::LassoFired => "lasso-fired",
            SoundCue::ItemCollected => "item-collected",
            SoundCue::PlayerHit => "player-hit",
            SoundCue::Victory => "victory",
            SoundCue::GameOver => "game-over",
        }
    }
}

impl GameEvent {
    pub fn sound_cue(&self) -> Option<SoundCue> {
        match self {
            GameEvent::LassoFired { .. } => Some(SoundCue::LassoFired),
            GameEvent::ItemCollected { .. } => Some(SoundCue::ItemCollected),
            GameEvent::PlayerHit { .. } | GameEvent::PlayerDetected { .. } => {
                Some(SoundCue::PlayerHit)
            }
            GameEvent::Victory { .. } => Some(SoundCue::Victory),
            GameEvent::GameOver { .. } => Some(SoundCue::GameOver),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_names() {
        let hit = GameEvent::PlayerHit { hearts_left: 2 };
        assert_eq!(hit.sound_cue().map(|c| c.as_str()), Some("player-hit"));
        assert_eq!(GameEvent::WhistleBlown.sound_cue(), None);
        let over = GameEvent::GameOver {
            reason: GameOverReason::Mud,
        };
        assert_eq!(over.sound_cue(), Some(SoundCue::GameOver));
    }

    #[test]
    fn test_events_serialize_tagged() {
        let json = serde_json::to_string(&GameEvent::LassoFired { hits: 2 }).unwrap();
        assert_eq!(json, r#"{"type":"lasso_fired","hits":2}"#);
    }
}
