pub mod chain;
pub mod config;
pub mod dungeon;
pub mod error;
pub mod floor;
pub mod mapgen;
pub mod random;
pub mod tile;
pub mod types;

pub use chain::{ChainId, ChainRegistry, Link, LinkId};
pub use config::{Config, GridSize, Layout, Request, SizeRequest};
pub use dungeon::Dungeon;
pub use error::GenerationError;
pub use floor::{Floor, TileView};
pub use mapgen::{GeneratedDungeon, MapGenerator, generate_dungeon};
pub use random::RandomSource;
pub use tile::{BreakState, ChestState, Interaction, Tile, TileState};
pub use types::*;
