//! Aiming preview
//!
//! A pure forward integration of the launch arc. It ignores damping and never
//! looks at level state, so it is safe to call on every drag event.

use glam::Vec2;

/// Lazy, finite sequence of predicted projectile positions
///
/// Cloning an unstarted trajectory gives an independent copy that replays the
/// same samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pos: Vec2,
    vel: Vec2,
    gravity: f32,
    remaining: usize,
}

/// Predict `steps` positions starting at `origin` (the first sample).
///
/// Each step is explicit Euler: `pos += vel; vel.y += gravity`.
pub fn predict(origin: Vec2, velocity: Vec2, gravity: f32, steps: usize) -> Trajectory {
    Trajectory {
        pos: origin,
        vel: velocity,
        gravity,
        remaining: steps,
    }
}

impl Iterator for Trajectory {
    type Item = Vec2;

    fn next(&mut self) -> Option<Vec2> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let sample = self.pos;
        self.pos += self.vel;
        self.vel.y += self.gravity;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Trajectory {}

impl std::iter::FusedIterator for Trajectory {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_samples() {
        let points: Vec<Vec2> = predict(Vec2::new(200.0, 400.0), Vec2::new(10.0, -10.0), 0.5, 30).collect();
        assert_eq!(points.len(), 30);
        assert_eq!(points[0], Vec2::new(200.0, 400.0));
        assert_eq!(points[1], Vec2::new(210.0, 390.0));
        // vy became -9.5 after the first step
        assert_eq!(points[2], Vec2::new(220.0, 380.5));
    }

    #[test]
    fn test_zero_steps_is_empty() {
        let mut t = predict(Vec2::ZERO, Vec2::ONE, 0.5, 0);
        assert_eq!(t.len(), 0);
        assert_eq!(t.next(), None);
    }

    #[test]
    fn test_clone_restarts() {
        let original = predict(Vec2::new(1.0, 2.0), Vec2::new(3.0, -4.0), 0.5, 12);
        let first: Vec<Vec2> = original.clone().collect();
        let second: Vec<Vec2> = original.collect();
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_prediction_is_deterministic(
            ox in -1000.0f32..1000.0, oy in -1000.0f32..1000.0,
            vx in -50.0f32..50.0, vy in -50.0f32..50.0,
            steps in 0usize..64,
        ) {
            let origin = Vec2::new(ox, oy);
            let velocity = Vec2::new(vx, vy);
            let a: Vec<Vec2> = predict(origin, velocity, 0.5, steps).collect();
            let b: Vec<Vec2> = predict(origin, velocity, 0.5, steps).collect();
            prop_assert_eq!(a.len(), steps);
            prop_assert_eq!(a, b);
        }
    }
}
