//! Random destination picking for the wander, flee and escape goals

use std::f32::consts::PI;

use critter_core::math::direction_from_yaw;
use critter_core::BlockPos;
use critter_world::BlockAccess;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::ProbeConfig;
use crate::probes::is_valid_destination;

/// A picked point and whether it passed validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub point: Vec3,
    pub validated: bool,
}

/// Samples an angle and a distance, then searches the column there for a
/// standable cell. Bounded by `attempts`; never fails to return a point.
#[derive(Debug, Clone)]
pub struct DestinationSampler {
    pub min_distance: f32,
    pub max_distance: f32,
    /// Cells searched above and below the origin height
    pub vertical_range: i32,
    pub attempts: u32,
}

impl DestinationSampler {
    pub fn new(min_distance: f32, max_distance: f32) -> Self {
        Self {
            min_distance,
            max_distance: max_distance.max(min_distance),
            vertical_range: 3,
            attempts: 10,
        }
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Pick a destination around `origin`.
    ///
    /// `heading` constrains the angle to `center ± spread`. When every
    /// attempt fails validation the last sampled direction is used at
    /// `min_distance`, unchecked.
    pub fn pick<W: BlockAccess + ?Sized>(
        &self,
        world: &W,
        origin: Vec3,
        heading: Option<(f32, f32)>,
        max_fall: u32,
        probes: &ProbeConfig,
        rng: &mut StdRng,
    ) -> Sample {
        let mut yaw = 0.0;
        for _ in 0..self.attempts {
            yaw = match heading {
                Some((center, spread)) => center + rng.gen_range(-spread..=spread),
                None => rng.gen_range(-PI..PI),
            };
            let distance = rng.gen_range(self.min_distance..=self.max_distance);
            let column = origin + direction_from_yaw(yaw) * distance;
            if let Some(cell) = self.standable_in_column(world, origin, column, max_fall, probes) {
                return Sample {
                    point: cell.bottom_center(),
                    validated: true,
                };
            }
        }

        let fallback = origin + direction_from_yaw(yaw) * self.min_distance;
        Sample {
            point: Vec3::new(fallback.x, origin.y, fallback.z),
            validated: false,
        }
    }

    /// Nearest valid cell to the origin height in the column at `column`,
    /// trying level first, then alternately up and down
    fn standable_in_column<W: BlockAccess + ?Sized>(
        &self,
        world: &W,
        origin: Vec3,
        column: Vec3,
        max_fall: u32,
        probes: &ProbeConfig,
    ) -> Option<BlockPos> {
        let base = BlockPos::from_vec3(Vec3::new(column.x, origin.y, column.z));
        (0..=self.vertical_range)
            .flat_map(|d| if d == 0 { vec![0] } else { vec![d, -d] })
            .map(|dy| base.offset(0, dy, 0))
            .find(|cell| is_valid_destination(world, origin, *cell, max_fall, probes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use critter_world::{Block, VoxelWorld};
    use rand::SeedableRng;

    #[test]
    fn test_picks_valid_point_on_open_floor() {
        let mut world = VoxelWorld::new();
        world.fill(BlockPos::new(-20, 63, -20), BlockPos::new(20, 63, 20), Block::Stone);
        let sampler = DestinationSampler::new(3.0, 8.0);
        let mut rng = StdRng::seed_from_u64(1);
        let origin = Vec3::new(0.5, 64.0, 0.5);

        for _ in 0..20 {
            let sample = sampler.pick(&world, origin, None, 3, &ProbeConfig::default(), &mut rng);
            assert!(sample.validated);
            assert_eq!(sample.point.y, 64.0);
            let d = (sample.point - origin).length();
            assert!(d <= 8.0 + 1.0, "distance {d}");
        }
    }

    #[test]
    fn test_exhaustion_falls_back_to_nearby_point() {
        // Nothing to stand on anywhere
        let world = VoxelWorld::new();
        let sampler = DestinationSampler::new(2.0, 6.0).with_attempts(5);
        let mut rng = StdRng::seed_from_u64(9);
        let origin = Vec3::new(0.5, 64.0, 0.5);

        let sample = sampler.pick(&world, origin, None, 3, &ProbeConfig::default(), &mut rng);
        assert!(!sample.validated);
        assert!(sample.point.is_finite());
        let d = (sample.point - origin).length();
        assert!((d - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_heading_constrains_direction() {
        let mut world = VoxelWorld::new();
        world.fill(BlockPos::new(-20, 63, -20), BlockPos::new(20, 63, 20), Block::Stone);
        let sampler = DestinationSampler::new(4.0, 6.0);
        let mut rng = StdRng::seed_from_u64(3);
        let origin = Vec3::new(0.5, 64.0, 0.5);

        for _ in 0..10 {
            let sample = sampler.pick(&world, origin, Some((0.0, 0.3)), 3, &ProbeConfig::default(), &mut rng);
            assert!(sample.point.x > origin.x + 2.0);
        }
    }

    #[test]
    fn test_finds_raised_ground() {
        let mut world = VoxelWorld::new();
        world.fill(BlockPos::new(-20, 63, -20), BlockPos::new(20, 64, 20), Block::Stone);
        let sampler = DestinationSampler::new(3.0, 5.0);
        let mut rng = StdRng::seed_from_u64(5);
        let sample = sampler.pick(&world, Vec3::new(0.5, 64.0, 0.5), None, 3, &ProbeConfig::default(), &mut rng);
        assert!(sample.validated);
        assert_eq!(sample.point.y, 65.0);
    }
}
