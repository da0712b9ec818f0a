//! Level state and core simulation types
//!
//! `LevelState` is the single owner of everything that changes during play.
//! Hosts read it through getters and [`LevelState::snapshot`]; only the input
//! methods here and [`super::tick`] mutate it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level;
use super::trajectory;
use crate::clamp_length;
use crate::error::LevelError;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Projectile resting in the slingshot, waiting for a drag
    Idle,
    /// Drag in progress
    Aiming,
    /// Projectile launched and inside the play area
    InFlight,
    /// All targets down, next level is scheduled
    LevelComplete,
}

/// Projectile state - resting, being pulled back, or flying
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProjectileState {
    Idle,
    /// Pointer position where the drag began
    Aiming { anchor: Vec2 },
    InFlight,
}

/// The player's projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Zero unless in flight
    pub vel: Vec2,
    pub state: ProjectileState,
}

impl Projectile {
    pub fn new(origin: Vec2) -> Self {
        Self {
            pos: origin,
            vel: Vec2::ZERO,
            state: ProjectileState::Idle,
        }
    }

    /// Put the projectile back in the slingshot
    pub fn reset(&mut self, origin: Vec2) {
        self.pos = origin;
        self.vel = Vec2::ZERO;
        self.state = ProjectileState::Idle;
    }

    #[inline]
    pub fn is_in_flight(&self) -> bool {
        self.state == ProjectileState::InFlight
    }
}

/// Obstacle materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Material {
    Wood,
    Glass,
}

impl Material {
    /// Impulse multiplier when struck (glass flies further)
    pub fn force_factor(self) -> f32 {
        match self {
            Material::Wood => 1.0,
            Material::Glass => 2.0,
        }
    }
}

/// Obstacle hit state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleState {
    Unstruck,
    /// Knocked loose and still moving
    Struck,
    /// Knocked out of the play area; no longer simulated
    AtRest,
}

/// A block the projectile can knock into targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub material: Material,
    pub state: ObstacleState,
    /// Only meaningful while `Struck`
    pub vel: Vec2,
}

impl Obstacle {
    pub fn new(id: u32, pos: Vec2, material: Material) -> Self {
        Self {
            id,
            pos,
            material,
            state: ObstacleState::Unstruck,
            vel: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.state == ObstacleState::Struck
    }
}

/// A destructible target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub pos: Vec2,
    pub destroyed: bool,
}

impl Target {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            destroyed: false,
        }
    }
}

/// What knocked a target over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitCause {
    Projectile,
    Obstacle { id: u32 },
}

/// Things the presentation layer may want to react to (sound, effects, HUD)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Launched { velocity: Vec2, shots_remaining: u8 },
    ObstacleStruck { id: u32, material: Material },
    TargetDestroyed { id: u32, cause: HitCause },
    /// Projectile left the play area with shots to spare
    ShotMissed { shots_remaining: u8 },
    /// Last shot left the play area with targets standing
    RoundFailed { level: u32, penalty: u64 },
    LevelComplete { level: u32, next_level: u32 },
    LevelStarted { level: u32 },
}

/// Deferred one-shot level change
///
/// The destination is captured when the level is cleared, so the advance lands
/// on exactly that level no matter what happens during the delay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledAdvance {
    pub next_level: u32,
    pub remaining_ms: f32,
}

/// Read-only copy of everything a renderer draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub level: u32,
    pub score: u64,
    pub shots_remaining: u8,
    pub phase: GamePhase,
    pub projectile: Projectile,
    pub targets: Vec<Target>,
    pub obstacles: Vec<Obstacle>,
    pub trajectory: Vec<Vec2>,
}

/// Complete level session state
#[derive(Debug, Clone)]
pub struct LevelState {
    pub(crate) tuning: Tuning,
    /// Session seed for reproducible procedural levels
    pub(crate) seed: u64,
    pub(crate) rng: Pcg32,
    /// Current level index (0-based)
    pub(crate) level: u32,
    pub(crate) score: u64,
    pub(crate) shots_remaining: u8,
    /// Simulation frame counter
    pub(crate) frame: u64,
    pub(crate) projectile: Projectile,
    pub(crate) targets: Vec<Target>,
    pub(crate) obstacles: Vec<Obstacle>,
    /// Aiming preview, empty unless aiming
    pub(crate) preview: Vec<Vec2>,
    pub(crate) pending_advance: Option<ScheduledAdvance>,
    pub(crate) events: Vec<GameEvent>,
}

impl LevelState {
    /// Start a session at level 0
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, LevelError> {
        Self::at_level(tuning, seed, 0)
    }

    /// Start a session at an arbitrary level
    pub fn at_level(tuning: Tuning, seed: u64, level: u32) -> Result<Self, LevelError> {
        let mut state = Self {
            projectile: Projectile::new(tuning.launch_origin),
            shots_remaining: tuning.shots_per_attempt,
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level,
            score: 0,
            frame: 0,
            targets: Vec::new(),
            obstacles: Vec::new(),
            preview: Vec::new(),
            pending_advance: None,
            events: Vec::new(),
        };
        state.load_layout(level)?;
        state.events.push(GameEvent::LevelStarted { level });
        Ok(state)
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn shots_remaining(&self) -> u8 {
        self.shots_remaining
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn projectile(&self) -> &Projectile {
        &self.projectile
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn trajectory_preview(&self) -> &[Vec2] {
        &self.preview
    }

    pub fn pending_advance(&self) -> Option<&ScheduledAdvance> {
        self.pending_advance.as_ref()
    }

    pub fn phase(&self) -> GamePhase {
        if self.pending_advance.is_some() {
            return GamePhase::LevelComplete;
        }
        match self.projectile.state {
            ProjectileState::Idle => GamePhase::Idle,
            ProjectileState::Aiming { .. } => GamePhase::Aiming,
            ProjectileState::InFlight => GamePhase::InFlight,
        }
    }

    pub fn remaining_targets(&self) -> usize {
        self.targets.iter().filter(|t| !t.destroyed).count()
    }

    pub fn all_targets_destroyed(&self) -> bool {
        self.targets.iter().all(|t| t.destroyed)
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            level: self.level,
            score: self.score,
            shots_remaining: self.shots_remaining,
            phase: self.phase(),
            projectile: self.projectile.clone(),
            targets: self.targets.clone(),
            obstacles: self.obstacles.clone(),
            trajectory: self.preview.clone(),
        }
    }

    // --- Input boundary ---

    /// Start pulling the slingshot. Ignored unless idle with shots left.
    pub fn begin_drag(&mut self, pointer: Vec2) -> bool {
        if self.phase() != GamePhase::Idle || self.shots_remaining == 0 {
            log::debug!("Ignoring drag start in {:?} ({} shots)", self.phase(), self.shots_remaining);
            return false;
        }
        self.projectile.state = ProjectileState::Aiming { anchor: pointer };
        true
    }

    /// Move the pull point and refresh the preview. Ignored unless aiming.
    pub fn drag_to(&mut self, pointer: Vec2) -> bool {
        let ProjectileState::Aiming { anchor } = self.projectile.state else {
            log::debug!("Ignoring drag move without an active drag");
            return false;
        };

        let origin = self.tuning.launch_origin;
        self.projectile.pos = origin + clamp_length(pointer - anchor, self.tuning.max_drag);

        let velocity = self.launch_velocity();
        self.preview.clear();
        self.preview.extend(trajectory::predict(
            self.projectile.pos,
            velocity,
            self.tuning.gravity,
            self.tuning.trajectory_steps,
        ));
        true
    }

    /// Let go: launch opposite to the pull. Ignored unless aiming.
    pub fn release(&mut self) -> bool {
        if !matches!(self.projectile.state, ProjectileState::Aiming { .. }) {
            log::debug!("Ignoring release without an active drag");
            return false;
        }

        let velocity = self.launch_velocity();
        self.projectile.vel = velocity;
        self.projectile.state = ProjectileState::InFlight;
        self.shots_remaining = self.shots_remaining.saturating_sub(1);
        self.preview.clear();

        log::debug!("Launched at {:?}, {} shots left", velocity, self.shots_remaining);
        self.events.push(GameEvent::Launched {
            velocity,
            shots_remaining: self.shots_remaining,
        });
        true
    }

    /// Velocity the projectile would leave with from its current position
    fn launch_velocity(&self) -> Vec2 {
        -(self.projectile.pos - self.tuning.launch_origin) * self.tuning.launch_power
    }

    // --- Mutations driven by the tick ---

    pub(crate) fn reset_projectile(&mut self) {
        self.projectile.reset(self.tuning.launch_origin);
        self.preview.clear();
    }

    /// Mark target `index` destroyed and score it, once
    pub(crate) fn destroy_target(&mut self, index: usize, cause: HitCause) -> bool {
        let Some(target) = self.targets.get_mut(index) else {
            return false;
        };
        if target.destroyed {
            return false;
        }
        target.destroyed = true;
        self.score += self.tuning.target_bonus;

        log::debug!("Target {} destroyed by {:?}", target.id, cause);
        self.events.push(GameEvent::TargetDestroyed { id: target.id, cause });
        true
    }

    /// Shot missed with shots to spare: back to the slingshot, layout untouched
    pub(crate) fn miss_shot(&mut self) {
        self.reset_projectile();
        self.events.push(GameEvent::ShotMissed {
            shots_remaining: self.shots_remaining,
        });
    }

    /// Out of shots with targets standing: penalise and replay the same level
    pub(crate) fn fail_round(&mut self) -> Result<u64, LevelError> {
        let remaining = self.remaining_targets() as u64;
        let penalty = self.tuning.miss_penalty * remaining;
        self.score = apply_penalty(self.score, penalty);

        log::info!(
            "Level {} failed with {} targets left: -{} (score {})",
            self.level,
            remaining,
            penalty,
            self.score
        );
        self.events.push(GameEvent::RoundFailed {
            level: self.level,
            penalty,
        });

        self.load_layout(self.level)?;
        self.shots_remaining = self.tuning.shots_per_attempt;
        self.reset_projectile();
        Ok(penalty)
    }

    /// Queue the move to the next level. Only the first call per clear counts.
    pub(crate) fn schedule_advance(&mut self) -> Result<(), LevelError> {
        if self.pending_advance.is_some() {
            return Ok(());
        }
        let next_level = self.level.checked_add(1).ok_or(LevelError::LevelLimit { level: self.level })?;
        self.pending_advance = Some(ScheduledAdvance {
            next_level,
            remaining_ms: self.tuning.advance_delay_ms,
        });
        self.preview.clear();

        log::info!("Level {} complete (score {}), next: {}", self.level, self.score, next_level);
        self.events.push(GameEvent::LevelComplete {
            level: self.level,
            next_level,
        });
        Ok(())
    }

    /// Load the captured level from a fired advance
    pub(crate) fn apply_advance(&mut self, advance: ScheduledAdvance) -> Result<(), LevelError> {
        self.pending_advance = None;
        self.load_layout(advance.next_level)?;
        self.level = advance.next_level;
        self.shots_remaining = self.tuning.shots_per_attempt;
        self.reset_projectile();

        log::info!("Level {} started", self.level);
        self.events.push(GameEvent::LevelStarted { level: self.level });
        Ok(())
    }

    /// Drop a scheduled advance (teardown)
    pub fn cancel_pending_advance(&mut self) -> Option<ScheduledAdvance> {
        let cancelled = self.pending_advance.take();
        if let Some(advance) = &cancelled {
            log::debug!("Cancelled advance to level {}", advance.next_level);
        }
        cancelled
    }

    fn load_layout(&mut self, index: u32) -> Result<(), LevelError> {
        let layout = level::generate(index, &self.tuning, &mut self.rng).inspect_err(|e| {
            log::error!("Cannot generate level {}: {}", index, e);
        })?;
        log::info!(
            "Level {}: {} targets, {} obstacles",
            index,
            layout.targets.len(),
            layout.obstacles.len()
        );
        self.targets = layout.targets;
        self.obstacles = layout.obstacles;
        Ok(())
    }
}

/// Subtract a penalty, never going below zero
#[inline]
pub fn apply_penalty(score: u64, penalty: u64) -> u64 {
    score.saturating_sub(penalty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn state() -> LevelState {
        LevelState::new(Tuning::default(), 7).unwrap()
    }

    #[test]
    fn test_new_session() {
        let state = state();
        assert_eq!(state.level(), 0);
        assert_eq!(state.score(), 0);
        assert_eq!(state.shots_remaining(), 3);
        assert_eq!(state.phase(), GamePhase::Idle);
        assert_eq!(state.targets().len(), 3);
        assert_eq!(state.projectile().pos, Vec2::new(200.0, 400.0));
        assert_eq!(state.projectile().vel, Vec2::ZERO);
    }

    #[test]
    fn test_drag_clamps_and_previews() {
        let mut state = state();
        assert!(state.begin_drag(Vec2::new(500.0, 500.0)));
        assert_eq!(state.phase(), GamePhase::Aiming);

        // 300-400-500 triangle, clamped to 200
        assert!(state.drag_to(Vec2::new(200.0, 100.0)));
        let pos = state.projectile().pos;
        assert!((pos.x - 80.0).abs() < 1e-3);
        assert!((pos.y - 240.0).abs() < 1e-3);
        assert_eq!(state.projectile().vel, Vec2::ZERO);
        assert_eq!(state.trajectory_preview().len(), 30);
        assert_eq!(state.trajectory_preview()[0], pos);
    }

    #[test]
    fn test_release_launches_opposite_to_pull() {
        let mut state = state();
        state.begin_drag(Vec2::new(0.0, 0.0));
        state.drag_to(Vec2::new(-100.0, 100.0));
        assert!(state.release());

        assert_eq!(state.phase(), GamePhase::InFlight);
        assert_eq!(state.shots_remaining(), 2);
        assert!(state.trajectory_preview().is_empty());
        let vel = state.projectile().vel;
        assert!((vel.x - 20.0).abs() < 1e-4);
        assert!((vel.y + 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_input_is_ignored() {
        let mut state = state();
        assert!(!state.drag_to(Vec2::new(10.0, 10.0)));
        assert!(!state.release());
        assert_eq!(state.shots_remaining(), 3);

        state.begin_drag(Vec2::ZERO);
        assert!(!state.begin_drag(Vec2::ZERO));
        state.release();

        // Mid-flight: no second launch
        assert!(!state.begin_drag(Vec2::ZERO));
        assert!(!state.release());
        assert_eq!(state.shots_remaining(), 2);
    }

    #[test]
    fn test_no_drag_without_shots() {
        let mut state = state();
        state.shots_remaining = 0;
        assert!(!state.begin_drag(Vec2::ZERO));
        assert_eq!(state.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_target_scores_once() {
        let mut state = state();
        assert!(state.destroy_target(0, HitCause::Projectile));
        assert!(!state.destroy_target(0, HitCause::Obstacle { id: 1 }));
        assert!(!state.destroy_target(99, HitCause::Projectile));
        assert_eq!(state.score(), 100);
        assert_eq!(state.remaining_targets(), 2);
    }

    #[test]
    fn test_fail_round_penalises_remaining_targets() {
        let mut state = state();
        state.score = 300;
        state.shots_remaining = 0;
        state.targets[0].destroyed = true;

        let penalty = state.fail_round().unwrap();
        assert_eq!(penalty, 100);
        assert_eq!(state.score(), 200);
        assert_eq!(state.level(), 0);
        assert_eq!(state.shots_remaining(), 3);
        assert_eq!(state.remaining_targets(), 3);
    }

    #[test]
    fn test_schedule_advance_captures_next_level_once() {
        let mut state = state();
        state.schedule_advance().unwrap();
        state.level = 5;
        state.schedule_advance().unwrap();

        let advance = *state.pending_advance().unwrap();
        assert_eq!(advance.next_level, 1);
        assert_eq!(state.phase(), GamePhase::LevelComplete);

        state.apply_advance(advance).unwrap();
        assert_eq!(state.level(), 1);
        assert_eq!(state.targets().len(), 4);
        assert_eq!(state.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_schedule_advance_past_last_level_fails() {
        let mut state = state();
        state.level = u32::MAX;
        assert_eq!(state.schedule_advance(), Err(LevelError::LevelLimit { level: u32::MAX }));
        assert!(state.pending_advance().is_none());
        assert_eq!(state.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_cancel_pending_advance() {
        let mut state = state();
        state.schedule_advance().unwrap();
        assert!(state.cancel_pending_advance().is_some());
        assert!(state.pending_advance().is_none());
        assert!(state.cancel_pending_advance().is_none());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut state = state();
        state.begin_drag(Vec2::ZERO);
        state.drag_to(Vec2::new(-50.0, 20.0));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.phase, GamePhase::Aiming);
        assert_eq!(snapshot.trajectory.len(), 30);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, GamePhase::Aiming);
        assert_eq!(back.targets.len(), 3);
        assert_eq!(back.obstacles.len(), 2);
    }

    #[test]
    fn test_drain_events() {
        let mut state = state();
        assert_eq!(state.drain_events(), vec![GameEvent::LevelStarted { level: 0 }]);
        assert!(state.drain_events().is_empty());
    }

    proptest! {
        #[test]
        fn prop_penalty_never_negative(score in 0u64..1_000_000, penalty in 0u64..1_000_000) {
            let result = apply_penalty(score, penalty);
            prop_assert_eq!(result, score.saturating_sub(penalty));
            prop_assert!(result <= score);
        }
    }
}
