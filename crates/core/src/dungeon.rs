//! The `Dungeon` handle: configuration, the active seed, and the floors of
//! the most recent build.
//!
//! Every setter invalidates the current build. Reads rebuild on demand, so a
//! caller can tweak settings and call [`Dungeon::draw`] without an explicit
//! [`Dungeon::build`].

use std::ops::RangeInclusive;

use log::debug;

use crate::config::{Config, Layout, Request, SizeRequest, fixed_floor};
use crate::error::GenerationError;
use crate::floor::{Floor, TileView};
use crate::mapgen::{GeneratedDungeon, MapGenerator};
use crate::random::RandomSource;
use crate::tile::Interaction;
use crate::types::Pos;

#[derive(Debug)]
pub struct Dungeon {
    config: Config,
    layout: Layout,
    rng: RandomSource,
    top_floor: i32,
    bottom_floor: i32,
    generated: Option<GeneratedDungeon>,
}

impl Dungeon {
    /// Resolves the seed first; random floor counts are drawn from that seed.
    pub fn new(config: Config) -> Self {
        let rng = RandomSource::from_request(config.seed);
        let layout = config.layout();
        let mut dungeon =
            Self { config, layout, rng, top_floor: 0, bottom_floor: 0, generated: None };
        let (top, bottom) = (dungeon.config.top_floor, dungeon.config.bottom_floor);
        dungeon.set_floors(Some(top), Some(bottom));
        dungeon
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn active_seed(&self) -> u64 {
        self.rng.active_seed()
    }

    pub fn top_floor(&self) -> i32 {
        self.top_floor
    }

    pub fn bottom_floor(&self) -> i32 {
        self.bottom_floor
    }

    pub fn floor_numbers(&self) -> RangeInclusive<i32> {
        self.bottom_floor..=self.top_floor
    }

    pub fn is_built(&self) -> bool {
        self.generated.is_some()
    }

    /// Reseeds the configuration stream. Returns the active seed.
    pub fn set_seed(&mut self, seed: Request) -> u64 {
        self.config.seed = seed;
        self.generated = None;
        self.rng.reseed(seed)
    }

    pub fn set_size(&mut self, request: SizeRequest) -> Layout {
        self.layout = self.config.apply_size(request);
        self.generated = None;
        self.layout
    }

    /// `None` keeps a side as it is; `Random` draws a fresh half-normal depth.
    pub fn set_floors(&mut self, top: Option<Request>, bottom: Option<Request>) -> (i32, i32) {
        if let Some(request) = top {
            self.config.top_floor = request;
            self.top_floor = match request {
                Request::Value(value) => fixed_floor(value, true),
                Request::Random => {
                    fixed_floor(self.rng.half_normal(self.config.top_floor_spread) as i64, true)
                }
            };
        }
        if let Some(request) = bottom {
            self.config.bottom_floor = request;
            self.bottom_floor = match request {
                Request::Value(value) => fixed_floor(value, false),
                Request::Random => {
                    fixed_floor(self.rng.half_normal(self.config.bottom_floor_spread) as i64, false)
                }
            };
        }
        self.generated = None;
        (self.top_floor, self.bottom_floor)
    }

    pub fn set_tile_count(&mut self, count: Option<i64>, percent: Option<f64>) -> (i64, f64) {
        self.generated = None;
        self.config.apply_tile_count(count, percent)
    }

    /// Tile target for the current grid.
    pub fn tile_target(&self) -> usize {
        self.config.tile_target(self.layout.grid.area())
    }

    /// Regenerates every floor from the active seed.
    pub fn build(&mut self) -> Result<(), GenerationError> {
        self.generated = Some(self.generate()?);
        Ok(())
    }

    /// Every non-wall tile of `number` in row-major order; empty for unknown floors.
    pub fn draw(&mut self, number: i32) -> Result<Vec<TileView>, GenerationError> {
        Ok(self.floor(number)?.map(Floor::views).unwrap_or_default())
    }

    pub fn floor(&mut self, number: i32) -> Result<Option<&Floor>, GenerationError> {
        Ok(self.generated()?.floor(number))
    }

    /// Active chains left on `number` after the last build, if any.
    pub fn chain_count(&self, number: i32) -> Option<usize> {
        self.generated.as_ref()?.chain_count(number)
    }

    pub fn interact(&mut self, number: i32, pos: Pos) -> Result<Interaction, GenerationError> {
        let tile = self.generated_mut()?.floor_mut(number).and_then(|floor| floor.tile_at_mut(pos));
        Ok(tile.map_or(Interaction::None, |tile| tile.interact()))
    }

    fn generated(&mut self) -> Result<&GeneratedDungeon, GenerationError> {
        self.generated_mut().map(|generated| &*generated)
    }

    fn generated_mut(&mut self) -> Result<&mut GeneratedDungeon, GenerationError> {
        let generated = match self.generated.take() {
            Some(generated) => generated,
            None => self.generate()?,
        };
        Ok(self.generated.insert(generated))
    }

    fn generate(&self) -> Result<GeneratedDungeon, GenerationError> {
        debug!("building floors {:?} from seed {}", self.floor_numbers(), self.active_seed());
        MapGenerator::new(
            self.active_seed(),
            self.layout.grid,
            self.top_floor,
            self.bottom_floor,
            self.tile_target(),
        )
        .generate()
    }
}

impl Default for Dungeon {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
