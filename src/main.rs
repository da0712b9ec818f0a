//! Slingshot headless runner
//!
//! Plays a scripted session against the simulation core and logs what
//! happens. Usage: `slingshot [tuning.json] [seed]`
//!
//! Set `RUST_LOG=debug` to see every launch and hit.

use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec2;

use slingshot::Tuning;
use slingshot::consts::FRAME_MS;
use slingshot::sim::{GameLoop, GamePhase, InputEvent, LevelState, Termination};

/// Give up after this many simulated frames (about five minutes)
const MAX_FRAMES: u32 = 60 * 60 * 5;
/// Levels to clear before stopping
const LEVEL_GOAL: u32 = 3;

/// Pull directions tried in turn, relative to the drag anchor
const AIM_PULLS: [Vec2; 6] = [
    Vec2::new(-160.0, 60.0),
    Vec2::new(-170.0, 40.0),
    Vec2::new(-150.0, 90.0),
    Vec2::new(-180.0, 20.0),
    Vec2::new(-140.0, 110.0),
    Vec2::new(-190.0, 50.0),
];

/// Read `[tuning.json] [seed]` from the command line
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(Tuning, u64)> {
    let tuning = match args.next() {
        Some(path) => Tuning::load(Path::new(&path))
            .with_context(|| format!("failed to load tuning file {path}"))?,
        None => Tuning::default(),
    };
    let seed = match args.next() {
        Some(seed) => seed
            .parse::<u64>()
            .with_context(|| format!("invalid seed value: {seed}"))?,
        None => 0x5EED,
    };
    Ok((tuning, seed))
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Slingshot (headless) starting...");

    let (tuning, seed) = parse_args(std::env::args().skip(1))?;
    log::info!("Session seed: {}", seed);

    let state = LevelState::new(tuning, seed).context("failed to build the first level")?;
    let mut game = GameLoop::new(state);
    let mut shot = 0usize;

    for _ in 0..MAX_FRAMES {
        if game.state().phase() == GamePhase::Idle {
            let anchor = Vec2::ZERO;
            game.input(InputEvent::DragStart(anchor));
            game.input(InputEvent::DragMove(anchor + AIM_PULLS[shot % AIM_PULLS.len()]));
            game.input(InputEvent::DragEnd);
            shot += 1;
        }

        let terminations = game
            .update(FRAME_MS)
            .with_context(|| format!("simulation stopped on level {}", game.state().level()))?;
        for termination in terminations {
            if termination == Termination::RoundFailed {
                log::warn!("Round failed on level {}", game.state().level());
            }
        }
        for event in game.drain_events() {
            log::debug!("{:?}", event);
        }

        if game.state().level() >= LEVEL_GOAL {
            break;
        }
    }

    game.stop();
    let state = game.into_state();
    log::info!(
        "Finished at level {} with score {} after {} shots ({} frames)",
        state.level(),
        state.score(),
        shot,
        state.frame()
    );
    let json = serde_json::to_string_pretty(&state.snapshot()).context("failed to serialize snapshot")?;
    println!("{json}");
    Ok(())
}
