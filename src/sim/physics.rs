//! Per-frame integration
//!
//! Order is damp, then gravity, then move. Reordering changes the numbers.

use super::state::{Obstacle, Projectile};
use crate::tuning::Tuning;

/// Advance a flying projectile by one frame
pub fn integrate_projectile(projectile: &mut Projectile, tuning: &Tuning) {
    projectile.vel *= tuning.damping;
    projectile.vel.y += tuning.gravity;
    projectile.pos += projectile.vel;
}

/// Advance a struck obstacle by one frame. Only horizontal speed decays.
///
/// Unstruck and resting obstacles are left alone.
pub fn integrate_obstacle(obstacle: &mut Obstacle, tuning: &Tuning) {
    if !obstacle.is_moving() {
        return;
    }
    obstacle.vel.x *= tuning.damping;
    obstacle.vel.y += tuning.gravity;
    obstacle.pos += obstacle.vel;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Material, ObstacleState, ProjectileState};
    use glam::Vec2;

    #[test]
    fn test_projectile_step_from_slingshot() {
        let tuning = Tuning::default();
        let mut projectile = Projectile {
            pos: Vec2::new(200.0, 400.0),
            vel: Vec2::new(-20.0, -20.0),
            state: ProjectileState::InFlight,
        };

        integrate_projectile(&mut projectile, &tuning);

        // -20 * 0.99 = -19.8, then -19.8 + 0.5 on y
        assert!((projectile.vel.x + 19.8).abs() < 1e-4);
        assert!((projectile.vel.y + 19.3).abs() < 1e-4);
        assert!((projectile.pos.x - 180.2).abs() < 1e-3);
        assert!((projectile.pos.y - 380.7).abs() < 1e-3);
    }

    #[test]
    fn test_struck_obstacle_keeps_vertical_speed() {
        let tuning = Tuning::default();
        let mut obstacle = Obstacle::new(1, Vec2::new(200.0, 400.0), Material::Wood);
        obstacle.state = ObstacleState::Struck;
        obstacle.vel = Vec2::new(-20.0, -20.0);

        integrate_obstacle(&mut obstacle, &tuning);

        assert!((obstacle.vel.x + 19.8).abs() < 1e-4);
        assert!((obstacle.vel.y + 19.5).abs() < 1e-4);
        assert!((obstacle.pos.x - 180.2).abs() < 1e-3);
        assert!((obstacle.pos.y - 380.5).abs() < 1e-3);
    }

    #[test]
    fn test_still_obstacles_do_not_move() {
        let tuning = Tuning::default();
        for state in [ObstacleState::Unstruck, ObstacleState::AtRest] {
            let mut obstacle = Obstacle::new(1, Vec2::new(650.0, 400.0), Material::Glass);
            obstacle.state = state;
            obstacle.vel = Vec2::new(3.0, 3.0);
            integrate_obstacle(&mut obstacle, &tuning);
            assert_eq!(obstacle.pos, Vec2::new(650.0, 400.0));
        }
    }
}
