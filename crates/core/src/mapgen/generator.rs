//! Build orchestration: reset, entrances, staircases, then per-floor growth.

use log::{debug, info};
use rayon::prelude::*;

use crate::config::{GridSize, MAX_FLOORS_PER_SIDE, MIN_GRID_CELLS};
use crate::error::GenerationError;
use crate::random::RandomSource;

use super::entrances::place_entrances;
use super::growth::{GrowthLimits, GrowthReport, grow_floor};
use super::model::{FloorPlan, GeneratedDungeon};
use super::staircases::place_staircases;
use super::{LAYOUT_STREAM, growth_stream, placement_attempts};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapGenerator {
    seed: u64,
    grid: GridSize,
    top_floor: i32,
    bottom_floor: i32,
    target: usize,
}

impl MapGenerator {
    /// Floors are forced to straddle ground (`bottom <= 0 <= top`) and the grid
    /// to at least the minimum size; the target is capped at the grid area.
    pub fn new(seed: u64, grid: GridSize, top_floor: i32, bottom_floor: i32, target: usize) -> Self {
        let grid = GridSize {
            columns: grid.columns.max(MIN_GRID_CELLS),
            rows: grid.rows.max(MIN_GRID_CELLS),
        };
        Self {
            seed,
            grid,
            top_floor: top_floor.clamp(0, MAX_FLOORS_PER_SIDE),
            bottom_floor: bottom_floor.clamp(-MAX_FLOORS_PER_SIDE, 0),
            target: target.min(grid.area()),
        }
    }

    pub fn generate(&self) -> Result<GeneratedDungeon, GenerationError> {
        let root = RandomSource::new(self.seed);
        let mut layout_rng = root.fork(LAYOUT_STREAM);
        let attempts = placement_attempts(self.grid);

        let mut plans: Vec<FloorPlan> = (self.bottom_floor..=self.top_floor)
            .map(|number| FloorPlan::new(number, self.grid))
            .collect();

        let ground = self.bottom_floor.unsigned_abs() as usize;
        let entrances = place_entrances(&mut plans[ground], &mut layout_rng, attempts)?;
        let staircases = place_staircases(&mut plans, &mut layout_rng, attempts)?;
        debug!("placed {entrances} entrance(s) and {staircases} staircase pair(s)");

        let limits = GrowthLimits::for_area(self.grid.area());
        let reports = grow_floors(&mut plans, &root, self.target, limits)?;

        for report in &reports {
            debug!(
                "floor {}: {} tiles after {} passes, {} merges, {} backtracks",
                report.floor, report.carved, report.passes, report.merges, report.backtracks
            );
        }
        info!(
            "built {} floor(s) [{}..={}] from seed {} with target {}",
            plans.len(),
            self.bottom_floor,
            self.top_floor,
            root.active_seed(),
            self.target
        );

        Ok(GeneratedDungeon { seed: root.active_seed(), bottom_floor: self.bottom_floor, plans })
    }
}

/// Grows every floor in parallel. On failure the lowest failing floor is
/// reported, whatever order the threads finished in.
fn grow_floors(
    plans: &mut [FloorPlan],
    root: &RandomSource,
    target: usize,
    limits: GrowthLimits,
) -> Result<Vec<GrowthReport>, GenerationError> {
    let outcomes: Vec<Result<GrowthReport, GenerationError>> = plans
        .par_iter_mut()
        .map(|plan| {
            let mut rng = root.fork(growth_stream(plan.number()));
            grow_floor(plan, &mut rng, target, limits)
        })
        .collect();
    outcomes.into_iter().collect()
}
