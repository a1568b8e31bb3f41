//! Flash Quest headless driver
//!
//! Runs one session under the autopilot at a fixed frame rate, logs what
//! happens, and keeps the best score in a JSON file between runs.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
use clap::{Parser, ValueEnum};

#[cfg(not(target_arch = "wasm32"))]
use flash_quest::{
    ArenaLayout, BestScore, Level, MazeLayout, Tuning,
    sim::{GameEvent, GamePhase, GameState, advance, autopilot::Autopilot},
};

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Arena,
    Maze,
}

/// Headless Flash Quest run driven by the autopilot
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Which world to play
    #[arg(value_enum, default_value_t = Mode::Arena)]
    mode: Mode,

    /// Balance overrides as a JSON tuning file
    tuning: Option<PathBuf>,

    /// RNG seed (defaults to the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Where the best score is kept
    #[arg(long, default_value = "flash-quest-best.json")]
    best_file: PathBuf,

    /// Simulated frames per second
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let (level, default_tuning) = match args.mode {
        Mode::Arena => (Level::Arena(ArenaLayout::default()), Tuning::arena()),
        Mode::Maze => (Level::Maze(MazeLayout::shipped()?), Tuning::maze()),
    };
    let tuning = match &args.tuning {
        Some(path) => {
            log::info!("Loading tuning from {}", path.display());
            Tuning::load(path)?
        }
        None => default_tuning,
    };

    let seed = args.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    let mut best = BestScore::load_from(&args.best_file);
    log::info!("Flash Quest (native) starting, seed {}, best {}", seed, best.score);

    let frame_ms = 1000.0 / args.fps.max(1.0);
    // A run cannot outlast its clock; the margin covers the title screen
    let max_frames = (tuning.meters.time_limit_secs * 1000.0 / frame_ms) as u64 + 120;

    let mut state = GameState::new(level, tuning, seed, best.score);
    let mut pilot = Autopilot::new();

    for _ in 0..max_frames {
        let input = pilot.input(&state);
        for event in advance(&mut state, &input, frame_ms) {
            report(&event);
            if let GameEvent::NewBestScore { score } = event {
                if best.record(score) {
                    best.save_to(&args.best_file);
                }
            }
        }
        if state.phase.is_terminal() {
            break;
        }
    }

    let snapshot = state.snapshot();
    match state.phase {
        GamePhase::Victory => println!("Victory! Final score: {}", snapshot.meters.score),
        GamePhase::GameOver => println!(
            "Game over: {} Final score: {}",
            snapshot.game_over_message.as_deref().unwrap_or(""),
            snapshot.meters.score
        ),
        GamePhase::Title | GamePhase::Playing => {
            println!("Stopped after {} ticks", snapshot.time_ticks)
        }
    }
    println!("Best score: {}", best.score);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn report(event: &GameEvent) {
    match event.sound_cue() {
        Some(cue) => log::info!("{:?} [{}]", event, cue.as_str()),
        None => log::debug!("{:?}", event),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser entry point is `web::init`
}
