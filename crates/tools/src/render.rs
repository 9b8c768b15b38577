//! Text renderings of built floors.

use std::collections::BTreeMap;

use serde::Serialize;

use map_core::{Direction, Dungeon, Floor, GenerationError, Layout, Tile, TileKind, TileView};

use crate::{format_fingerprint, format_seed};

pub fn glyph(tile: Tile) -> char {
    match tile.effective_kind() {
        TileKind::Wall => '#',
        TileKind::Floor => '.',
        TileKind::CrackedWall => '%',
        TileKind::CrackedFloor => ',',
        TileKind::Pit => 'O',
        TileKind::Entry => match tile.facing() {
            Some(Direction::Up) => '^',
            Some(Direction::Left) => '<',
            Some(Direction::Right) => '>',
            Some(Direction::Down) | None => 'v',
        },
        TileKind::StaircaseUp => 'U',
        TileKind::StaircaseDown => 'D',
        TileKind::Treasure => '$',
    }
}

/// One line per grid row, top row first.
pub fn ascii(floor: &Floor) -> String {
    let mut out = String::with_capacity((floor.width() + 1) * floor.height());
    for (pos, tile) in floor.cells() {
        out.push(glyph(*tile));
        if pos.x as usize == floor.width() - 1 {
            out.push('\n');
        }
    }
    out
}

/// Glyphs present on `floor` with their tile names, ordered by glyph.
pub fn legend(floor: &Floor) -> Vec<(char, String)> {
    let mut entries = BTreeMap::new();
    for (_, tile) in floor.cells() {
        entries.entry(glyph(*tile)).or_insert_with(|| {
            if tile.kind() == tile.effective_kind() {
                tile.label().to_owned()
            } else {
                format!("broken {}", tile.label())
            }
        });
    }
    entries.into_iter().collect()
}

#[derive(Debug, Serialize)]
pub struct FloorReport {
    pub floor: i32,
    pub width: usize,
    pub height: usize,
    pub fingerprint: String,
    pub chains: Option<usize>,
    pub tiles: Vec<TileView>,
}

#[derive(Debug, Serialize)]
pub struct DungeonReport {
    pub seed: String,
    pub top_floor: i32,
    pub bottom_floor: i32,
    pub tile_target: usize,
    pub layout: Layout,
    pub floors: Vec<FloorReport>,
}

/// Builds if needed and collects the requested floors; unknown numbers are skipped.
pub fn report(dungeon: &mut Dungeon, numbers: &[i32]) -> Result<DungeonReport, GenerationError> {
    let mut floors = Vec::with_capacity(numbers.len());
    for &number in numbers {
        let Some(floor) = dungeon.floor(number)? else {
            continue;
        };
        let (width, height, fingerprint) =
            (floor.width(), floor.height(), format_fingerprint(floor.fingerprint()));
        floors.push(FloorReport {
            floor: number,
            width,
            height,
            fingerprint,
            chains: dungeon.chain_count(number),
            tiles: dungeon.draw(number)?,
        });
    }

    Ok(DungeonReport {
        seed: format_seed(dungeon.active_seed()),
        top_floor: dungeon.top_floor(),
        bottom_floor: dungeon.bottom_floor(),
        tile_target: dungeon.tile_target(),
        layout: dungeon.layout(),
        floors,
    })
}
