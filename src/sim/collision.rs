//! Collision detection and response
//!
//! Everything is a circle of the same radius, so a hit is just a distance
//! check. Passes run in a fixed order each frame: knock obstacles loose, let
//! loose obstacles hit targets, then let the projectile hit targets.

use glam::Vec2;

use super::state::{GameEvent, HitCause, LevelState, Material, ObstacleState};
use crate::tuning::Tuning;

/// Hits resolved in one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub obstacles_struck: usize,
    pub targets_by_obstacle: usize,
    pub targets_by_projectile: usize,
}

impl CollisionReport {
    pub fn targets_destroyed(&self) -> usize {
        self.targets_by_obstacle + self.targets_by_projectile
    }
}

/// True when the centres are strictly closer than `radius`
#[inline]
pub fn collides(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance(b) < radius
}

/// Velocity given to an obstacle struck by the projectile
///
/// Points away from the projectile, scaled by material, with an upward kick.
/// Coincident centres have no direction and get only the kick.
pub fn strike_impulse(obstacle_pos: Vec2, projectile_pos: Vec2, material: Material, tuning: &Tuning) -> Vec2 {
    let outward = (obstacle_pos - projectile_pos).normalize_or_zero();
    let mut vel = outward * tuning.impulse_speed * material.force_factor();
    vel.y -= tuning.impulse_lift;
    vel
}

/// Run all three passes in order
pub fn resolve(state: &mut LevelState) -> CollisionReport {
    CollisionReport {
        obstacles_struck: activate_obstacles(state),
        targets_by_obstacle: obstacle_target_hits(state),
        targets_by_projectile: projectile_target_hits(state),
    }
}

/// Pass 1: unstruck obstacles touched by the projectile start moving
pub fn activate_obstacles(state: &mut LevelState) -> usize {
    let projectile_pos = state.projectile.pos;
    let radius = state.tuning.hit_radius;
    let mut struck = 0;

    for obstacle in &mut state.obstacles {
        if obstacle.state != ObstacleState::Unstruck || !collides(obstacle.pos, projectile_pos, radius) {
            continue;
        }
        obstacle.state = ObstacleState::Struck;
        obstacle.vel = strike_impulse(obstacle.pos, projectile_pos, obstacle.material, &state.tuning);
        struck += 1;

        log::debug!("Obstacle {} ({:?}) struck, vel {:?}", obstacle.id, obstacle.material, obstacle.vel);
        state.events.push(GameEvent::ObstacleStruck {
            id: obstacle.id,
            material: obstacle.material,
        });
    }
    struck
}

/// Pass 2: moving obstacles knock over targets
pub fn obstacle_target_hits(state: &mut LevelState) -> usize {
    let radius = state.tuning.hit_radius;
    let targets = &state.targets;
    let hits: Vec<(usize, u32)> = state
        .obstacles
        .iter()
        .filter(|o| o.is_moving())
        .flat_map(|o| {
            targets
                .iter()
                .enumerate()
                .filter(move |(_, t)| !t.destroyed && collides(o.pos, t.pos, radius))
                .map(move |(i, _)| (i, o.id))
        })
        .collect();

    hits.into_iter()
        .filter(|&(index, id)| state.destroy_target(index, HitCause::Obstacle { id }))
        .count()
}

/// Pass 3: the projectile knocks over targets directly
pub fn projectile_target_hits(state: &mut LevelState) -> usize {
    let projectile_pos = state.projectile.pos;
    let radius = state.tuning.hit_radius;
    let hits: Vec<usize> = state
        .targets
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.destroyed && collides(projectile_pos, t.pos, radius))
        .map(|(i, _)| i)
        .collect();

    hits.into_iter()
        .filter(|&index| state.destroy_target(index, HitCause::Projectile))
        .count()
}
