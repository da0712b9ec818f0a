//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (targets and obstacles keep their layout order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod physics;
pub mod state;
pub mod tick;
pub mod trajectory;

pub use collision::{CollisionReport, collides, strike_impulse};
pub use level::{FIXED_LEVELS, Layout, generate as generate_level};
pub use physics::{integrate_obstacle, integrate_projectile};
pub use state::{
    GameEvent, GamePhase, HitCause, LevelState, Material, Obstacle, ObstacleState, Projectile,
    ProjectileState, ScheduledAdvance, Snapshot, Target, apply_penalty,
};
pub use tick::{GameLoop, InputEvent, Termination, tick};
pub use trajectory::{Trajectory, predict as predict_trajectory};
