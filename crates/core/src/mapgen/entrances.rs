//! Surface entrances on the boundary of the ground floor.

use log::debug;

use crate::config::GridSize;
use crate::error::GenerationError;
use crate::random::RandomSource;
use crate::tile::Tile;
use crate::types::{Direction, Pos};

use super::feature_count;
use super::model::FloorPlan;

/// Carves a handful of entrances into the outer wall and seeds one chain per entrance.
pub(super) fn place_entrances(
    plan: &mut FloorPlan,
    rng: &mut RandomSource,
    attempts: usize,
) -> Result<usize, GenerationError> {
    let count = feature_count(rng);
    let grid = plan.floor.grid_size();

    for _ in 0..count {
        let (pos, facing) = (0..attempts)
            .map(|_| entrance_candidate(grid, rng))
            .find(|(pos, _)| plan.floor.is_wall(*pos))
            .ok_or(GenerationError::PlacementExhausted {
                feature: "entrance",
                floor: plan.floor.number(),
                attempts,
            })?;

        plan.floor.carve(pos, Tile::Entry { facing })?;
        plan.chains.seed_chain(pos, facing);
        debug!("entrance at row {} column {} facing {facing:?}", pos.y, pos.x);
    }

    Ok(count)
}

/// Picks a wall, then a spot along it biased towards the middle and kept off the corners.
fn entrance_candidate(grid: GridSize, rng: &mut RandomSource) -> (Pos, Direction) {
    let wall = rng.direction();
    let pos = if wall.is_vertical() {
        let column = along_wall(grid.columns, rng);
        let row = if wall == Direction::Up { 0 } else { grid.rows as i32 - 1 };
        Pos::new(row, column)
    } else {
        let row = along_wall(grid.rows, rng);
        let column = if wall == Direction::Left { 0 } else { grid.columns as i32 - 1 };
        Pos::new(row, column)
    };
    (pos, wall.opposite())
}

fn along_wall(extent: usize, rng: &mut RandomSource) -> i32 {
    let size = (extent - 1) as f64;
    let mean = size / 2.0;
    let value = rng.normal(mean, mean / 3.0).round() as i64;
    value.clamp(2, extent as i64 - 3) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_sit_on_the_boundary_away_from_corners() {
        let grid = GridSize { columns: 12, rows: 7 };
        let mut rng = RandomSource::new(17);
        for _ in 0..500 {
            let (pos, facing) = entrance_candidate(grid, &mut rng);
            let on_horizontal_edge = pos.y == 0 || pos.y == 6;
            let on_vertical_edge = pos.x == 0 || pos.x == 11;
            assert!(on_horizontal_edge != on_vertical_edge, "{pos:?} must be on exactly one edge");
            if on_horizontal_edge {
                assert!((2..=9).contains(&pos.x));
            } else {
                assert!((2..=4).contains(&pos.y));
            }
            let inward = pos.step(facing);
            assert!(inward.x >= 0 && inward.x < 12 && inward.y >= 0 && inward.y < 7);
        }
    }

    #[test]
    fn entrances_seed_one_chain_each() {
        let mut plan = FloorPlan::new(0, GridSize { columns: 10, rows: 10 });
        let mut rng = RandomSource::new(5);
        let count = place_entrances(&mut plan, &mut rng, 64).expect("entrances should fit");

        assert!(count >= 1);
        assert_eq!(plan.chains.chain_count(), count);
        assert_eq!(plan.floor.carved_count(), count);
        for (pos, tile) in plan.floor.cells().filter(|(_, tile)| !tile.is_wall()) {
            let facing = tile.facing().expect("only entries are carved");
            assert!(plan.floor.is_on_boundary(pos));
            assert_eq!(plan.chains.link_at(pos).map(|link| link.direction), Some(facing));
        }
    }
}
