//! One dungeon level: a row-major grid of tiles with a wall background.

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

use crate::config::GridSize;
use crate::error::GenerationError;
use crate::tile::{Tile, TileState};
use crate::types::{Direction, Pos, TileKind};

/// A non-wall cell as seen by presentation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TileView {
    pub floor: i32,
    pub row: usize,
    pub column: usize,
    pub kind: TileKind,
    pub state: Option<TileState>,
    pub facing: Option<Direction>,
    pub color: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Floor {
    number: i32,
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Floor {
    pub fn new(number: i32, grid: GridSize) -> Self {
        Self {
            number,
            width: grid.columns,
            height: grid.rows,
            tiles: vec![Tile::Wall; grid.area()],
        }
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn grid_size(&self) -> GridSize {
        GridSize { columns: self.width, rows: self.height }
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn tile_at(&self, pos: Pos) -> Option<&Tile> {
        self.index(pos).map(|index| &self.tiles[index])
    }

    pub fn tile_at_mut(&mut self, pos: Pos) -> Option<&mut Tile> {
        self.index(pos).map(|index| &mut self.tiles[index])
    }

    /// True only for in-bounds wall cells.
    pub fn is_wall(&self, pos: Pos) -> bool {
        self.tile_at(pos).is_some_and(|tile| tile.is_wall())
    }

    pub fn is_on_boundary(&self, pos: Pos) -> bool {
        self.in_bounds(pos)
            && (pos.y == 0
                || pos.x == 0
                || pos.y as usize == self.height - 1
                || pos.x as usize == self.width - 1)
    }

    /// Replaces a wall with `tile`. A cell leaves the wall state at most once.
    pub fn carve(&mut self, pos: Pos, tile: Tile) -> Result<(), GenerationError> {
        let number = self.number;
        match self.tile_at_mut(pos) {
            Some(slot) if slot.is_wall() => {
                *slot = tile;
                Ok(())
            }
            _ => Err(GenerationError::AlreadyCarved { floor: number, row: pos.y, column: pos.x }),
        }
    }

    /// Whether any in-bounds 4-neighbour of `pos` is still a wall.
    pub fn has_wall_neighbor(&self, pos: Pos) -> bool {
        pos.neighbors().into_iter().any(|neighbor| self.is_wall(neighbor))
    }

    pub fn carved_count(&self) -> usize {
        self.tiles.iter().filter(|tile| !tile.is_wall()).count()
    }

    pub fn count_kind(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|tile| tile.kind() == kind).count()
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Pos, &Tile)> + '_ {
        self.tiles.iter().enumerate().map(|(index, tile)| {
            (Pos { y: (index / self.width) as i32, x: (index % self.width) as i32 }, tile)
        })
    }

    /// Every non-wall cell in row-major order.
    pub fn views(&self) -> Vec<TileView> {
        self.cells()
            .filter(|(_, tile)| !tile.is_wall())
            .map(|(pos, tile)| TileView {
                floor: self.number,
                row: pos.y as usize,
                column: pos.x as usize,
                kind: tile.kind(),
                state: tile.state(),
                facing: tile.facing(),
                color: tile.color(),
            })
            .collect()
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(12 + self.tiles.len() * 2);
        bytes.extend(self.number.to_le_bytes());
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        for tile in &self.tiles {
            let (code, payload) = match tile {
                Tile::Wall => (0, 0),
                Tile::Floor => (1, 0),
                Tile::CrackedWall(state) => (2, *state as u8),
                Tile::CrackedFloor(state) => (3, *state as u8),
                Tile::Pit => (4, 0),
                Tile::Entry { facing } => (5, *facing as u8),
                Tile::StaircaseUp => (6, 0),
                Tile::StaircaseDown => (7, 0),
                Tile::Treasure(state) => (8, *state as u8),
            };
            bytes.push(code);
            bytes.push(payload);
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        self.in_bounds(pos).then(|| (pos.y as usize) * self.width + (pos.x as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::ChestState;

    fn grid(columns: usize, rows: usize) -> GridSize {
        GridSize { columns, rows }
    }

    #[test]
    fn new_floor_is_all_wall_with_grid_dimensions() {
        let floor = Floor::new(-1, grid(7, 6));
        assert_eq!(floor.cells().count(), 42);
        assert_eq!(floor.carved_count(), 0);
        assert!(floor.views().is_empty());
        assert_eq!(floor.grid_size(), grid(7, 6));
    }

    #[test]
    fn carving_only_replaces_walls() {
        let mut floor = Floor::new(0, grid(6, 6));
        let pos = Pos::new(2, 3);
        floor.carve(pos, Tile::Floor).expect("wall cell should carve");
        assert_eq!(floor.tile_at(pos), Some(&Tile::Floor));

        let again = floor.carve(pos, Tile::Pit);
        assert_eq!(again, Err(GenerationError::AlreadyCarved { floor: 0, row: 2, column: 3 }));
        assert_eq!(floor.tile_at(pos), Some(&Tile::Floor));

        assert!(floor.carve(Pos::new(-1, 0), Tile::Floor).is_err());
    }

    #[test]
    fn out_of_bounds_cells_are_not_walls() {
        let floor = Floor::new(0, grid(6, 6));
        assert!(floor.is_wall(Pos::new(0, 0)));
        assert!(!floor.is_wall(Pos::new(6, 0)));
        assert!(!floor.is_wall(Pos::new(0, -1)));
        assert!(floor.tile_at(Pos::new(5, 6)).is_none());
    }

    #[test]
    fn boundary_detection_covers_all_edges() {
        let floor = Floor::new(0, grid(8, 6));
        assert!(floor.is_on_boundary(Pos::new(0, 4)));
        assert!(floor.is_on_boundary(Pos::new(5, 4)));
        assert!(floor.is_on_boundary(Pos::new(3, 0)));
        assert!(floor.is_on_boundary(Pos::new(3, 7)));
        assert!(!floor.is_on_boundary(Pos::new(3, 3)));
        assert!(!floor.is_on_boundary(Pos::new(6, 3)));
    }

    #[test]
    fn views_list_carved_cells_in_row_major_order() {
        let mut floor = Floor::new(2, grid(6, 6));
        floor.carve(Pos::new(4, 1), Tile::Treasure(ChestState::Closed)).unwrap();
        floor.carve(Pos::new(0, 3), Tile::Entry { facing: Direction::Down }).unwrap();

        let views = floor.views();
        assert_eq!(views.len(), 2);
        assert_eq!((views[0].row, views[0].column), (0, 3));
        assert_eq!(views[0].facing, Some(Direction::Down));
        assert_eq!(views[1].kind, TileKind::Treasure);
        assert_eq!(views[1].state, Some(TileState::Closed));
        assert_eq!(views[1].floor, 2);
    }

    #[test]
    fn fingerprint_tracks_tile_state() {
        let mut floor = Floor::new(0, grid(6, 6));
        let pos = Pos::new(1, 1);
        floor.carve(pos, Tile::Treasure(ChestState::Closed)).unwrap();
        let closed = floor.fingerprint();
        assert_eq!(closed, floor.clone().fingerprint());

        floor.tile_at_mut(pos).unwrap().interact();
        assert_ne!(closed, floor.fingerprint());
    }

    #[test]
    fn wall_neighbors_ignore_the_outside() {
        let mut floor = Floor::new(0, grid(6, 6));
        let corner = Pos::new(0, 0);
        floor.carve(corner, Tile::Floor).unwrap();
        assert!(floor.has_wall_neighbor(corner));
        floor.carve(Pos::new(0, 1), Tile::Floor).unwrap();
        floor.carve(Pos::new(1, 0), Tile::Floor).unwrap();
        assert!(!floor.has_wall_neighbor(corner));
    }
}
