//! Data-driven game balance
//!
//! Every physics, scoring and layout constant in one serializable struct.
//! Defaults mirror [`crate::consts`]; a JSON file may override any subset.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Axis-aligned spawn rectangle (`min` inclusive, `max` exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub min: Vec2,
    pub max: Vec2,
}

impl Region {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// True when the region has positive, finite area on both axes
    pub fn is_valid(&self) -> bool {
        let span = self.max - self.min;
        self.min.is_finite()
            && self.max.is_finite()
            && span.is_finite()
            && span.x > 0.0
            && span.y > 0.0
    }
}

/// Play area limits. There is no ceiling: shots may arc above the screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Default for PlayBounds {
    fn default() -> Self {
        Self {
            min_x: PLAY_MIN_X,
            max_x: PLAY_MAX_X,
            max_y: PLAY_MAX_Y,
        }
    }
}

impl PlayBounds {
    /// Check whether a position is still inside the play area
    #[inline]
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.y <= self.max_y && pos.x <= self.max_x && pos.x >= self.min_x
    }
}

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics ===
    pub gravity: f32,
    pub damping: f32,
    pub hit_radius: f32,
    pub impulse_speed: f32,
    pub impulse_lift: f32,

    // === Slingshot ===
    pub launch_origin: Vec2,
    pub max_drag: f32,
    pub launch_power: f32,
    pub trajectory_steps: usize,

    // === Rules ===
    pub shots_per_attempt: u8,
    pub target_bonus: u64,
    pub miss_penalty: u64,
    pub advance_delay_ms: f32,
    pub bounds: PlayBounds,

    // === Procedural layouts ===
    pub target_region: Region,
    pub obstacle_region: Region,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            damping: DAMPING,
            hit_radius: HIT_RADIUS,
            impulse_speed: IMPULSE_SPEED,
            impulse_lift: IMPULSE_LIFT,

            launch_origin: LAUNCH_ORIGIN,
            max_drag: MAX_DRAG,
            launch_power: LAUNCH_POWER,
            trajectory_steps: TRAJECTORY_STEPS,

            shots_per_attempt: SHOTS_PER_ATTEMPT,
            target_bonus: TARGET_BONUS,
            miss_penalty: MISS_PENALTY,
            advance_delay_ms: LEVEL_ADVANCE_DELAY_MS,
            bounds: PlayBounds::default(),

            target_region: Region::new(Vec2::new(600.0, 200.0), Vec2::new(900.0, 450.0)),
            obstacle_region: Region::new(Vec2::new(550.0, 200.0), Vec2::new(900.0, 450.0)),
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read and validate a tuning file
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if !self.gravity.is_finite() {
            return invalid("gravity", "must be finite");
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return invalid("damping", "must be in (0, 1]");
        }
        if !(self.hit_radius.is_finite() && self.hit_radius > 0.0) {
            return invalid("hit_radius", "must be positive");
        }
        if !(self.impulse_speed.is_finite() && self.impulse_lift.is_finite()) {
            return invalid("impulse_speed", "impulse must be finite");
        }
        if !self.launch_origin.is_finite() {
            return invalid("launch_origin", "must be finite");
        }
        if !(self.max_drag.is_finite() && self.max_drag > 0.0) {
            return invalid("max_drag", "must be positive");
        }
        if !(self.launch_power.is_finite() && self.launch_power > 0.0) {
            return invalid("launch_power", "must be positive");
        }
        if self.trajectory_steps == 0 {
            return invalid("trajectory_steps", "must be at least 1");
        }
        if self.shots_per_attempt == 0 {
            return invalid("shots_per_attempt", "must be at least 1");
        }
        if !(self.advance_delay_ms.is_finite() && self.advance_delay_ms >= 0.0) {
            return invalid("advance_delay_ms", "must be non-negative");
        }
        if !(self.bounds.min_x < self.bounds.max_x && self.bounds.max_y.is_finite()) {
            return invalid("bounds", "min_x must be below max_x");
        }
        if !self.bounds.contains(self.launch_origin) {
            return invalid("launch_origin", "must lie inside the play bounds");
        }
        if !self.target_region.is_valid() {
            return invalid("target_region", "must have positive area");
        }
        if !self.obstacle_region.is_valid() {
            return invalid("obstacle_region", "must have positive area");
        }
        Ok(())
    }
}
