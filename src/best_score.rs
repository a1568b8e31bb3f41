//! Best score persistence
//!
//! The only thing Flash Quest remembers between sessions. LocalStorage on the
//! web, a small JSON file for the native driver. Storage problems are logged
//! and never fatal: a missing or unreadable record just means zero.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScore {
    pub score: u64,
}

impl BestScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "flash_quest_best_score";

    pub fn new(score: u64) -> Self {
        Self { score }
    }

    /// Keep the higher of the stored and the offered score. Returns whether it improved.
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.score {
            self.score = score;
            true
        } else {
            false
        }
    }

    /// Load the best score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<BestScore>(&json) {
                    Ok(best) => {
                        log::info!("Loaded best score {}", best.score);
                        return best;
                    }
                    Err(e) => log::warn!("Ignoring unreadable best score: {}", e),
                }
            }
        }

        log::info!("No best score found, starting fresh");
        Self::default()
    }

    /// Save the best score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::warn!("LocalStorage unavailable, best score not saved");
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("LocalStorage rejected the best score");
                } else {
                    log::info!("Best score saved ({})", self.score);
                }
            }
            Err(e) => log::warn!("Could not encode best score: {}", e),
        }
    }

    /// Read a record written by [`BestScore::save_to`]
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                return Self::default();
            }
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable best score in {}: {}", path.display(), e);
            Self::default()
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: impl AsRef<std::path::Path>) {
        let path = path.as_ref();
        let result = serde_json::to_string_pretty(self)
            .map_err(std::io::Error::other)
            .and_then(|json| std::fs::write(path, json));
        match result {
            Ok(()) => log::info!("Best score saved to {} ({})", path.display(), self.score),
            Err(e) => log::warn!("Could not save best score to {}: {}", path.display(), e),
        }
    }
}
