//! Slingshot - a projectile puzzle simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (trajectory, physics, collisions, level state)
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration and level generation failures
//!
//! Rendering, audio and pointer capture live outside this crate. Hosts feed
//! drag events in through [`sim::GameLoop::input`] and read
//! [`sim::LevelState`] snapshots back out.

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{LevelError, TuningError};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
///
/// All motion is expressed per frame, so velocities are in units/frame and
/// gravity in units/frame².
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation frame (60 Hz display refresh)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Maximum frames per update to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest wall-clock gap a single update will account for
    pub const MAX_ELAPSED_MS: f32 = 100.0;

    /// Slingshot rest position
    pub const LAUNCH_ORIGIN: Vec2 = Vec2::new(200.0, 400.0);
    /// Maximum pull distance from the drag anchor
    pub const MAX_DRAG: f32 = 200.0;
    /// Launch velocity per unit of pull
    pub const LAUNCH_POWER: f32 = 0.2;

    /// Downward acceleration
    pub const GRAVITY: f32 = 0.5;
    /// Per-frame velocity retention
    pub const DAMPING: f32 = 0.99;
    /// Centre distance below which two bodies touch
    pub const HIT_RADIUS: f32 = 40.0;
    /// Outward speed given to a struck obstacle (before material factor)
    pub const IMPULSE_SPEED: f32 = 10.0;
    /// Upward kick added to a struck obstacle
    pub const IMPULSE_LIFT: f32 = 5.0;

    /// Play area: anything left of this is out
    pub const PLAY_MIN_X: f32 = 0.0;
    /// Play area: anything right of this is out
    pub const PLAY_MAX_X: f32 = 1000.0;
    /// Play area: anything below this is out (screen y grows downward)
    pub const PLAY_MAX_Y: f32 = 600.0;

    /// Shots granted per attempt
    pub const SHOTS_PER_ATTEMPT: u8 = 3;
    /// Points per destroyed target
    pub const TARGET_BONUS: u64 = 100;
    /// Points lost per surviving target when a round fails
    pub const MISS_PENALTY: u64 = 50;
    /// Delay between clearing a level and loading the next one
    pub const LEVEL_ADVANCE_DELAY_MS: f32 = 2000.0;

    /// Samples in the aiming preview
    pub const TRAJECTORY_STEPS: usize = 30;
}

/// Scale `delta` down so its length does not exceed `max_len`.
///
/// Direction is preserved; vectors already within the limit are returned as-is.
#[inline]
pub fn clamp_length(delta: Vec2, max_len: f32) -> Vec2 {
    let len = delta.length();
    if len > max_len {
        delta * (max_len / len)
    } else {
        delta
    }
}
