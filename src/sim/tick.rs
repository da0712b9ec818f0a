//! Fixed timestep simulation tick
//!
//! `tick` is the one step function that advances a level by a frame.
//! `GameLoop` wraps it with a fixed-rate accumulator and the input boundary.

use glam::Vec2;

use super::collision;
use super::physics;
use super::state::{GameEvent, LevelState, ObstacleState};
use crate::consts::*;
use crate::error::LevelError;

/// How a frame ended the current shot, if it did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Missed, shots remain; back to idle with the layout untouched
    AttemptFailed,
    /// Missed the last shot; penalty applied and the level reset
    RoundFailed,
    /// Every target destroyed; advance scheduled
    LevelComplete,
}

/// Pointer events from the presentation layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    DragStart(Vec2),
    DragMove(Vec2),
    DragEnd,
}

/// Advance the level by one frame of `dt_ms` milliseconds
///
/// Within a frame: pending advance, integration, collisions, then
/// victory/bounds evaluation. Victory is judged on this frame's collisions.
pub fn tick(state: &mut LevelState, dt_ms: f32) -> Result<Option<Termination>, LevelError> {
    state.frame += 1;

    // Deferred level advance
    if let Some(advance) = state.pending_advance.as_mut() {
        advance.remaining_ms -= dt_ms;
        if advance.remaining_ms <= 0.0 {
            let advance = *advance;
            state.apply_advance(advance)?;
            return Ok(None);
        }
    }

    if !state.projectile.is_in_flight() {
        return Ok(None);
    }

    // Integrate
    physics::integrate_projectile(&mut state.projectile, &state.tuning);
    let bounds = state.tuning.bounds;
    for obstacle in &mut state.obstacles {
        physics::integrate_obstacle(obstacle, &state.tuning);
        if obstacle.is_moving() && !bounds.contains(obstacle.pos) {
            obstacle.state = ObstacleState::AtRest;
            obstacle.vel = Vec2::ZERO;
        }
    }
    let out_of_bounds = !bounds.contains(state.projectile.pos);

    // Level already won: let the shot fly out, nothing scores
    if state.pending_advance.is_some() {
        if out_of_bounds {
            state.reset_projectile();
        }
        return Ok(None);
    }

    let report = collision::resolve(state);
    if report.targets_destroyed() > 0 {
        log::debug!(
            "Frame {}: {} targets down, {} left",
            state.frame,
            report.targets_destroyed(),
            state.remaining_targets()
        );
    }

    if state.all_targets_destroyed() {
        state.schedule_advance()?;
        if out_of_bounds {
            state.reset_projectile();
        }
        return Ok(Some(Termination::LevelComplete));
    }

    if !out_of_bounds {
        return Ok(None);
    }

    if state.shots_remaining > 0 {
        log::debug!("Shot missed, {} left", state.shots_remaining);
        state.miss_shot();
        Ok(Some(Termination::AttemptFailed))
    } else {
        state.fail_round()?;
        Ok(Some(Termination::RoundFailed))
    }
}

/// Frame-driven runner around a `LevelState`
///
/// The host calls [`GameLoop::update`] from its refresh callback with the
/// wall time since the previous call.
#[derive(Debug)]
pub struct GameLoop {
    state: LevelState,
    accumulator: f32,
    running: bool,
}

impl GameLoop {
    pub fn new(state: LevelState) -> Self {
        Self {
            state,
            accumulator: 0.0,
            running: true,
        }
    }

    pub fn state(&self) -> &LevelState {
        &self.state
    }

    /// Drain queued events for sound/effects
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Apply one pointer event. Returns false if it was ignored.
    pub fn input(&mut self, event: InputEvent) -> bool {
        if !self.running {
            return false;
        }
        match event {
            InputEvent::DragStart(pointer) => self.state.begin_drag(pointer),
            InputEvent::DragMove(pointer) => self.state.drag_to(pointer),
            InputEvent::DragEnd => self.state.release(),
        }
    }

    /// Run as many fixed frames as `elapsed_ms` covers
    ///
    /// Returns every termination that happened, in order. A generation error
    /// stops the loop. Non-finite `elapsed_ms` is ignored.
    pub fn update(&mut self, elapsed_ms: f32) -> Result<Vec<Termination>, LevelError> {
        let mut terminations = Vec::new();
        if !self.running || !elapsed_ms.is_finite() {
            return Ok(terminations);
        }

        self.accumulator += elapsed_ms.clamp(0.0, MAX_ELAPSED_MS);
        let mut substeps = 0;
        while self.accumulator >= FRAME_MS && substeps < MAX_SUBSTEPS {
            match tick(&mut self.state, FRAME_MS) {
                Ok(Some(termination)) => terminations.push(termination),
                Ok(None) => {}
                Err(e) => {
                    self.stop();
                    return Err(e);
                }
            }
            self.accumulator -= FRAME_MS;
            substeps += 1;
        }
        Ok(terminations)
    }

    /// Stop the loop and cancel anything still scheduled
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.accumulator = 0.0;
        self.state.cancel_pending_advance();
        log::info!("Game loop stopped at frame {}", self.state.frame());
    }

    /// Hand back the state (e.g. after teardown)
    pub fn into_state(self) -> LevelState {
        self.state
    }
}
