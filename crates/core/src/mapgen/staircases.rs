//! Staircase pairs joining each floor to the one above it.

use log::debug;

use crate::config::GridSize;
use crate::error::GenerationError;
use crate::random::RandomSource;
use crate::tile::Tile;
use crate::types::Pos;

use super::feature_count;
use super::model::FloorPlan;

/// Places staircase pairs for every adjacent pair of floors, bottom first.
///
/// `plans` must be ordered from the bottom floor upwards.
pub(super) fn place_staircases(
    plans: &mut [FloorPlan],
    rng: &mut RandomSource,
    attempts: usize,
) -> Result<usize, GenerationError> {
    let mut placed = 0;

    for lower_index in 0..plans.len().saturating_sub(1) {
        let (below, above) = plans.split_at_mut(lower_index + 1);
        let lower = &mut below[lower_index];
        let upper = &mut above[0];
        let grid = lower.floor.grid_size();
        let count = feature_count(rng);

        for _ in 0..count {
            let pos = (0..attempts)
                .map(|_| staircase_candidate(grid, rng))
                .find(|&pos| lower.floor.is_wall(pos) && upper.floor.is_wall(pos))
                .ok_or(GenerationError::PlacementExhausted {
                    feature: "staircase",
                    floor: lower.floor.number(),
                    attempts,
                })?;

            lower.floor.carve(pos, Tile::StaircaseUp)?;
            lower.chains.seed_chain(pos, rng.direction());
            upper.floor.carve(pos, Tile::StaircaseDown)?;
            upper.chains.seed_chain(pos, rng.direction());
        }

        debug!(
            "{count} staircase(s) between floors {} and {}",
            lower.floor.number(),
            upper.floor.number()
        );
        placed += count;
    }

    Ok(placed)
}

fn staircase_candidate(grid: GridSize, rng: &mut RandomSource) -> Pos {
    let column = interior(grid.columns, rng);
    let row = interior(grid.rows, rng);
    Pos::new(row, column)
}

/// Normal draw around the middle of the axis, truncated and kept off the outer wall.
fn interior(extent: usize, rng: &mut RandomSource) -> i32 {
    let total = (extent - 1) as f64;
    let mean = total / 2.0;
    let value = rng.normal(mean, mean / 3.0) as i64;
    value.clamp(1, extent as i64 - 2) as i32
}
