//! Level layouts
//!
//! Levels 0-2 are hand-built tutorials. Later levels scatter targets and
//! obstacles randomly; the RNG is passed in so a seed fixes the layout.

use glam::Vec2;
use rand::Rng;

use super::state::{Material, Obstacle, Target};
use crate::error::LevelError;
use crate::tuning::{Region, Tuning};

/// Number of hand-built levels
pub const FIXED_LEVELS: u32 = 3;

/// Fresh entities for one level
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub targets: Vec<Target>,
    pub obstacles: Vec<Obstacle>,
}

/// Targets on a procedural level
pub fn target_count(level: u32) -> usize {
    3 + (level / 2) as usize
}

/// Build the layout for `level`
pub fn generate(level: u32, tuning: &Tuning, rng: &mut impl Rng) -> Result<Layout, LevelError> {
    let layout = if level < FIXED_LEVELS {
        fixed_layout(level)
    } else {
        random_layout(level, &tuning.target_region, &tuning.obstacle_region, rng)?
    };

    if layout.targets.is_empty() {
        return Err(LevelError::EmptyLayout { level });
    }
    Ok(layout)
}

fn fixed_layout(level: u32) -> Layout {
    use Material::*;

    match level {
        // Tutorial: a small cluster behind two blocks
        0 => build_layout(
            &[(700.0, 400.0), (800.0, 400.0), (750.0, 300.0)],
            &[(650.0, 400.0, Wood), (650.0, 350.0, Glass)],
        ),
        // Pyramid
        1 => build_layout(
            &[(750.0, 400.0), (700.0, 350.0), (800.0, 350.0), (750.0, 300.0)],
            &[(650.0, 400.0, Wood), (850.0, 400.0, Wood), (750.0, 250.0, Glass)],
        ),
        // Two towers
        _ => build_layout(
            &[(600.0, 400.0), (600.0, 300.0), (800.0, 400.0), (800.0, 300.0)],
            &[(600.0, 350.0, Glass), (800.0, 350.0, Wood), (700.0, 400.0, Wood)],
        ),
    }
}

/// Number entities from 1 in listing order
fn build_layout(targets: &[(f32, f32)], obstacles: &[(f32, f32, Material)]) -> Layout {
    Layout {
        targets: targets
            .iter()
            .zip(1..)
            .map(|(&(x, y), id)| Target::new(id, Vec2::new(x, y)))
            .collect(),
        obstacles: obstacles
            .iter()
            .zip(1..)
            .map(|(&(x, y, material), id)| Obstacle::new(id, Vec2::new(x, y), material))
            .collect(),
    }
}

fn random_layout(
    level: u32,
    target_region: &Region,
    obstacle_region: &Region,
    rng: &mut impl Rng,
) -> Result<Layout, LevelError> {
    if !target_region.is_valid() {
        return Err(LevelError::InvalidRegion { name: "target_region" });
    }
    if !obstacle_region.is_valid() {
        return Err(LevelError::InvalidRegion { name: "obstacle_region" });
    }

    let count = target_count(level);
    let targets = (1..=count as u32)
        .map(|id| Target::new(id, sample(target_region, rng)))
        .collect();
    let obstacles = (1..count as u32)
        .map(|id| {
            let pos = sample(obstacle_region, rng);
            let material = if rng.random_bool(0.5) {
                Material::Wood
            } else {
                Material::Glass
            };
            Obstacle::new(id, pos, material)
        })
        .collect();

    Ok(Layout { targets, obstacles })
}

fn sample(region: &Region, rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        rng.random_range(region.min.x..region.max.x),
        rng.random_range(region.min.y..region.max.y),
    )
}
