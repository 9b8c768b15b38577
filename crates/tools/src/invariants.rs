//! Structural checks every built dungeon must pass.

use std::collections::{BTreeSet, VecDeque};

use anyhow::{Result, bail, ensure};
use map_core::{Direction, Dungeon, Floor, Pos, TileKind};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub floors: usize,
    pub carved: usize,
    pub entrances: usize,
    pub staircase_pairs: usize,
}

/// Builds `dungeon` if needed and verifies every floor.
pub fn check(dungeon: &mut Dungeon) -> Result<Summary> {
    let target = dungeon.tile_target();
    let grid = dungeon.layout().grid;
    let numbers: Vec<i32> = dungeon.floor_numbers().collect();
    let mut summary = Summary::default();
    let mut previous_ups: Option<(i32, BTreeSet<Pos>)> = None;

    for number in numbers {
        let Some(floor) = dungeon.floor(number)? else {
            bail!("floor {number} missing from build");
        };

        ensure!(
            floor.grid_size() == grid,
            "floor {number} is {:?}, expected {grid:?}",
            floor.grid_size()
        );
        ensure!(
            floor.carved_count() >= target,
            "floor {number} carved {} of {target} tiles",
            floor.carved_count()
        );
        ensure!(connected(floor), "floor {number} is not one connected region");
        check_entrances(floor)?;

        let ups = cells_of(floor, TileKind::StaircaseUp);
        let downs = cells_of(floor, TileKind::StaircaseDown);
        if let Some((below, below_ups)) = previous_ups.take() {
            ensure!(
                !downs.is_empty() && below_ups == downs,
                "staircases between floors {below} and {number} do not pair"
            );
        } else {
            ensure!(downs.is_empty(), "bottom floor {number} has staircases down");
        }

        summary.floors += 1;
        summary.carved += floor.carved_count();
        summary.entrances += floor.count_kind(TileKind::Entry);
        summary.staircase_pairs += ups.len();

        ensure!(
            dungeon.chain_count(number) == Some(1),
            "floor {number} left {:?} chains",
            dungeon.chain_count(number)
        );
        previous_ups = Some((number, ups));
    }

    if let Some((top, ups)) = previous_ups {
        ensure!(ups.is_empty(), "top floor {top} has staircases up");
    }
    Ok(summary)
}

fn check_entrances(floor: &Floor) -> Result<()> {
    let number = floor.number();
    let entries: Vec<(Pos, Option<Direction>)> = floor
        .cells()
        .filter(|(_, tile)| tile.kind() == TileKind::Entry)
        .map(|(pos, tile)| (pos, tile.facing()))
        .collect();

    ensure!(
        (number == 0) == !entries.is_empty(),
        "floor {number} has {} entrances",
        entries.len()
    );
    for (pos, facing) in entries {
        ensure!(floor.is_on_boundary(pos), "entrance {pos:?} is not on the boundary");
        let inward = facing.map(|direction| pos.step(direction));
        ensure!(
            inward.is_some_and(|cell| floor.in_bounds(cell) && !floor.is_on_boundary(cell)),
            "entrance {pos:?} faces {facing:?}, away from the floor"
        );
    }
    Ok(())
}

fn cells_of(floor: &Floor, kind: TileKind) -> BTreeSet<Pos> {
    floor.cells().filter(|(_, tile)| tile.kind() == kind).map(|(pos, _)| pos).collect()
}

/// Flood fill over carved cells.
pub fn connected(floor: &Floor) -> bool {
    let carved: Vec<Pos> =
        floor.cells().filter(|(_, tile)| !tile.is_wall()).map(|(pos, _)| pos).collect();
    let Some(start) = carved.first().copied() else {
        return true;
    };

    let mut open = VecDeque::from([start]);
    let mut seen = BTreeSet::from([start]);
    while let Some(pos) = open.pop_front() {
        for next in pos.neighbors() {
            if seen.contains(&next) || floor.tile_at(next).is_none_or(|tile| tile.is_wall()) {
                continue;
            }
            seen.insert(next);
            open.push_back(next);
        }
    }
    seen.len() == carved.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use map_core::{Config, GridSize, Request, Tile};

    #[test]
    fn built_dungeons_pass() {
        let mut dungeon = Dungeon::new(Config {
            grid_columns: 18,
            grid_rows: 12,
            top_floor: Request::Value(1),
            bottom_floor: Request::Value(2),
            seed: Request::Value(90_210),
            ..Config::default()
        });
        let summary = check(&mut dungeon).expect("invariants hold");
        assert_eq!(summary.floors, 4);
        assert!(summary.entrances >= 1);
        assert!(summary.staircase_pairs >= 3);
    }

    #[test]
    fn split_regions_are_detected() {
        let mut floor = Floor::new(0, GridSize { columns: 6, rows: 6 });
        floor.carve(Pos::new(1, 1), Tile::Floor).unwrap();
        floor.carve(Pos::new(1, 2), Tile::Floor).unwrap();
        assert!(connected(&floor));
        floor.carve(Pos::new(4, 4), Tile::Floor).unwrap();
        assert!(!connected(&floor));
    }

    #[test]
    fn outward_entrances_are_rejected() {
        let mut floor = Floor::new(0, GridSize { columns: 6, rows: 6 });
        floor.carve(Pos::new(0, 2), Tile::Entry { facing: Direction::Down }).unwrap();
        assert!(check_entrances(&floor).is_ok());

        let mut wrong = Floor::new(0, GridSize { columns: 6, rows: 6 });
        wrong.carve(Pos::new(0, 2), Tile::Entry { facing: Direction::Up }).unwrap();
        assert!(check_entrances(&wrong).is_err());

        let upstairs = Floor::new(1, GridSize { columns: 6, rows: 6 });
        assert!(check_entrances(&upstairs).is_ok());
    }
}
