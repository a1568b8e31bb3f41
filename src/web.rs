//! Browser binding
//!
//! A page owns one `WebSession`, calls `advance` from its animation frame
//! with the elapsed milliseconds and a packed input mask, and draws the JSON
//! it gets back. Sound cues come back as names for the page to play.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::best_score::BestScore;
use crate::level::{ArenaLayout, Level, MazeLayout};
use crate::sim::{GameEvent, GameState, Snapshot, TickInput, advance};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Flash Quest core loaded");
}

/// What the page receives after each frame
#[derive(Serialize)]
struct Frame<'a> {
    snapshot: Snapshot,
    events: &'a [GameEvent],
    cues: Vec<&'static str>,
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct WebSession {
    state: GameState,
    best: BestScore,
}

#[wasm_bindgen]
impl WebSession {
    /// `mode` is `"arena"` or `"maze"`
    #[wasm_bindgen(constructor)]
    pub fn new(mode: &str) -> Result<WebSession, JsValue> {
        Self::with_seed(mode, (js_sys::Date::now() as u64) as u32)
    }

    pub fn with_seed(mode: &str, seed: u32) -> Result<WebSession, JsValue> {
        let (level, tuning) = match mode {
            "arena" => (Level::Arena(ArenaLayout::default()), Tuning::arena()),
            "maze" => (Level::Maze(MazeLayout::shipped().map_err(to_js)?), Tuning::maze()),
            other => return Err(JsValue::from_str(&format!("unknown mode {other:?}"))),
        };
        let best = BestScore::load();
        log::info!("Session ({}) initialized with seed: {}", mode, seed);
        Ok(Self {
            state: GameState::new(level, tuning, seed as u64, best.score),
            best,
        })
    }

    /// Replace balance values with a JSON `Tuning`; applies from the next run
    pub fn set_tuning(&mut self, json: &str) -> Result<(), JsValue> {
        let tuning = Tuning::from_json(json).map_err(to_js)?;
        self.state.tuning = tuning;
        self.state.reset();
        Ok(())
    }

    /// Step one frame. `input_bits` uses the `TickInput` bit layout.
    pub fn advance(&mut self, dt_ms: f32, input_bits: u32) -> Result<String, JsValue> {
        let input = TickInput::from_bits(input_bits);
        let events = advance(&mut self.state, &input, dt_ms);

        for event in &events {
            if let GameEvent::NewBestScore { score } = event {
                if self.best.record(*score) {
                    self.best.save();
                }
            }
        }

        let frame = Frame {
            snapshot: self.state.snapshot(),
            events: &events,
            cues: events
                .iter()
                .filter_map(|e| e.sound_cue())
                .map(|cue| cue.as_str())
                .collect(),
        };
        serde_json::to_string(&frame).map_err(to_js)
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.snapshot()).map_err(to_js)
    }

    /// Abandon the current run and go back to the title screen
    pub fn restart(&mut self) {
        self.state.reset();
    }

    pub fn best_score(&self) -> f64 {
        self.best.score as f64
    }
}
