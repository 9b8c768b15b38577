//! Cell contents. Each variant carries only the payload it needs; everything
//! positional lives on the owning [`crate::Floor`].

use serde::{Deserialize, Serialize};

use crate::types::{Direction, TileKind};

pub const WALL_COLOR: &str = "#656565";
pub const FLOOR_COLOR: &str = "#FFFFFF";
pub const CRACKED_WALL_COLOR: &str = "#757575";
pub const CRACKED_FLOOR_COLOR: &str = "#EEEEEE";
pub const PIT_COLOR: &str = "#000000";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakState {
    #[default]
    Unbroken,
    Broken,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChestState {
    #[default]
    Closed,
    Opened,
}

/// Interaction state as reported to presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileState {
    Unbroken,
    Broken,
    Closed,
    Opened,
}

impl From<BreakState> for TileState {
    fn from(state: BreakState) -> Self {
        match state {
            BreakState::Unbroken => Self::Unbroken,
            BreakState::Broken => Self::Broken,
        }
    }
}

impl From<ChestState> for TileState {
    fn from(state: ChestState) -> Self {
        match state {
            ChestState::Closed => Self::Closed,
            ChestState::Opened => Self::Opened,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tile {
    #[default]
    Wall,
    Floor,
    CrackedWall(BreakState),
    CrackedFloor(BreakState),
    Pit,
    Entry {
        facing: Direction,
    },
    StaircaseUp,
    StaircaseDown,
    Treasure(ChestState),
}

/// What happened when a tile was interacted with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Interaction {
    None,
    WallBroken,
    FloorCollapsed,
    ChestOpened,
    /// A one-shot tile was interacted with again.
    AlreadyUsed,
    FellIn,
    Entered,
    Ascend,
    Descend,
}

impl Tile {
    pub fn kind(self) -> TileKind {
        match self {
            Self::Wall => TileKind::Wall,
            Self::Floor => TileKind::Floor,
            Self::CrackedWall(_) => TileKind::CrackedWall,
            Self::CrackedFloor(_) => TileKind::CrackedFloor,
            Self::Pit => TileKind::Pit,
            Self::Entry { .. } => TileKind::Entry,
            Self::StaircaseUp => TileKind::StaircaseUp,
            Self::StaircaseDown => TileKind::StaircaseDown,
            Self::Treasure(_) => TileKind::Treasure,
        }
    }

    /// Kind after interactions: a broken cracked wall is floor, a broken cracked floor a pit.
    pub fn effective_kind(self) -> TileKind {
        match self {
            Self::CrackedWall(BreakState::Broken) => TileKind::Floor,
            Self::CrackedFloor(BreakState::Broken) => TileKind::Pit,
            other => other.kind(),
        }
    }

    pub fn state(self) -> Option<TileState> {
        match self {
            Self::CrackedWall(state) | Self::CrackedFloor(state) => Some(state.into()),
            Self::Treasure(state) => Some(state.into()),
            _ => None,
        }
    }

    pub fn facing(self) -> Option<Direction> {
        match self {
            Self::Entry { facing } => Some(facing),
            _ => None,
        }
    }

    pub fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }

    pub fn label(self) -> &'static str {
        match self.kind() {
            TileKind::Wall => "wall",
            TileKind::Floor => "floor",
            TileKind::CrackedWall => "cracked wall",
            TileKind::CrackedFloor => "cracked floor",
            TileKind::Pit => "pit",
            TileKind::Entry => "entry",
            TileKind::StaircaseUp => "staircase up",
            TileKind::StaircaseDown => "staircase down",
            TileKind::Treasure => "treasure",
        }
    }

    /// Base fill colour; markers sit on the floor colour.
    pub fn color(self) -> &'static str {
        match self.effective_kind() {
            TileKind::Wall => WALL_COLOR,
            TileKind::CrackedWall => CRACKED_WALL_COLOR,
            TileKind::CrackedFloor => CRACKED_FLOOR_COLOR,
            TileKind::Pit => PIT_COLOR,
            TileKind::Floor
            | TileKind::Entry
            | TileKind::StaircaseUp
            | TileKind::StaircaseDown
            | TileKind::Treasure => FLOOR_COLOR,
        }
    }

    /// Runs the tile's interaction hook. State changes happen at most once.
    pub fn interact(&mut self) -> Interaction {
        match self {
            Self::CrackedWall(state) => break_once(state, Interaction::WallBroken),
            Self::CrackedFloor(state) => break_once(state, Interaction::FloorCollapsed),
            Self::Treasure(state @ ChestState::Closed) => {
                *state = ChestState::Opened;
                Interaction::ChestOpened
            }
            Self::Treasure(ChestState::Opened) => Interaction::AlreadyUsed,
            Self::Pit => Interaction::FellIn,
            Self::Entry { .. } => Interaction::Entered,
            Self::StaircaseUp => Interaction::Ascend,
            Self::StaircaseDown => Interaction::Descend,
            Self::Wall | Self::Floor => Interaction::None,
        }
    }
}

fn break_once(state: &mut BreakState, outcome: Interaction) -> Interaction {
    match state {
        BreakState::Unbroken => {
            *state = BreakState::Broken;
            outcome
        }
        BreakState::Broken => Interaction::AlreadyUsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cracked_wall_breaks_into_floor_exactly_once() {
        let mut tile = Tile::CrackedWall(BreakState::Unbroken);
        assert_eq!(tile.effective_kind(), TileKind::CrackedWall);
        assert_eq!(tile.color(), CRACKED_WALL_COLOR);

        assert_eq!(tile.interact(), Interaction::WallBroken);
        assert_eq!(tile.state(), Some(TileState::Broken));
        assert_eq!(tile.effective_kind(), TileKind::Floor);
        assert_eq!(tile.color(), FLOOR_COLOR);

        assert_eq!(tile.interact(), Interaction::AlreadyUsed);
        assert_eq!(tile, Tile::CrackedWall(BreakState::Broken));
    }

    #[test]
    fn cracked_floor_collapses_into_a_pit() {
        let mut tile = Tile::CrackedFloor(BreakState::default());
        assert_eq!(tile.interact(), Interaction::FloorCollapsed);
        assert_eq!(tile.kind(), TileKind::CrackedFloor);
        assert_eq!(tile.effective_kind(), TileKind::Pit);
        assert_eq!(tile.color(), PIT_COLOR);
        assert_eq!(tile.interact(), Interaction::AlreadyUsed);
    }

    #[test]
    fn treasure_opens_once() {
        let mut tile = Tile::Treasure(ChestState::default());
        assert_eq!(tile.state(), Some(TileState::Closed));
        assert_eq!(tile.interact(), Interaction::ChestOpened);
        assert_eq!(tile.state(), Some(TileState::Opened));
        assert_eq!(tile.interact(), Interaction::AlreadyUsed);
        assert_eq!(tile.kind(), TileKind::Treasure);
    }

    #[test]
    fn inert_tiles_keep_their_shape() {
        let mut entry = Tile::Entry { facing: Direction::Down };
        assert_eq!(entry.interact(), Interaction::Entered);
        assert_eq!(entry.facing(), Some(Direction::Down));
        assert_eq!(entry.state(), None);

        let mut wall = Tile::Wall;
        assert_eq!(wall.interact(), Interaction::None);
        assert!(wall.is_wall());
        let mut up = Tile::StaircaseUp;
        assert_eq!(up.interact(), Interaction::Ascend);
        assert_eq!(Tile::StaircaseDown.label(), "staircase down");
    }
}
