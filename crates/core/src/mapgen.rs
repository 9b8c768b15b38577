//! Dungeon generation split into placement and growth phases.

pub mod model;

mod entrances;
mod generator;
mod growth;
mod staircases;

pub use generator::MapGenerator;
pub use model::{FloorPlan, GeneratedDungeon};

use crate::config::GridSize;
use crate::error::GenerationError;
use crate::random::RandomSource;

/// Sub-stream feeding entrance and staircase placement.
pub const LAYOUT_STREAM: u64 = 0x4C41_594F_5554;
const GROWTH_STREAM: u64 = 0x4752_4F57_5448;

/// Sub-stream feeding growth on floor `number`.
pub fn growth_stream(number: i32) -> u64 {
    GROWTH_STREAM.wrapping_add(i64::from(number) as u64)
}

pub fn generate_dungeon(
    seed: u64,
    grid: GridSize,
    top_floor: i32,
    bottom_floor: i32,
    target: usize,
) -> Result<GeneratedDungeon, GenerationError> {
    MapGenerator::new(seed, grid, top_floor, bottom_floor, target).generate()
}

/// `|round(normal(0, 1))| + 1` entrances or staircases.
fn feature_count(rng: &mut RandomSource) -> usize {
    rng.half_normal(1.0) as usize + 1
}

fn placement_attempts(grid: GridSize) -> usize {
    grid.area().saturating_mul(8).max(64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_dungeon_matches_map_generator_output() {
        let grid = GridSize { columns: 14, rows: 9 };
        let from_helper = generate_dungeon(123, grid, 1, -1, 40).unwrap();
        let from_generator = MapGenerator::new(123, grid, 1, -1, 40).generate().unwrap();

        let left: Vec<u64> = from_helper.floors().map(|floor| floor.fingerprint()).collect();
        let right: Vec<u64> = from_generator.floors().map(|floor| floor.fingerprint()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn growth_streams_differ_per_floor() {
        assert_ne!(growth_stream(-1), growth_stream(0));
        assert_ne!(growth_stream(0), growth_stream(1));
        assert_ne!(growth_stream(0), LAYOUT_STREAM);
    }

    #[test]
    fn feature_counts_are_at_least_one() {
        let mut rng = RandomSource::new(12);
        assert!((0..200).all(|_| feature_count(&mut rng) >= 1));
    }
}
