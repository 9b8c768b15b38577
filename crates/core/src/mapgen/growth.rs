//! Random-walk growth that carves each floor until it reaches its tile target
//! and every chain has merged into one.

use log::warn;

use crate::chain::{ChainId, Link};
use crate::error::GenerationError;
use crate::random::RandomSource;
use crate::tile::Tile;
use crate::types::Pos;

use super::model::FloorPlan;

/// One step in `TURN_CHANCE` picks a fresh direction instead of going straight.
pub(super) const TURN_CHANCE: u64 = 5;
pub(super) const STEP_ATTEMPTS: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct GrowthLimits {
    pub(super) step_attempts: usize,
    pub(super) max_passes: usize,
}

impl GrowthLimits {
    pub(super) fn for_area(area: usize) -> Self {
        Self {
            step_attempts: STEP_ATTEMPTS,
            max_passes: area.saturating_mul(64).saturating_add(256),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct GrowthReport {
    pub(super) floor: i32,
    pub(super) carved: usize,
    pub(super) merges: usize,
    pub(super) passes: usize,
    pub(super) backtracks: usize,
}

enum Step {
    Carved,
    Missed,
    Sealed,
}

pub(super) fn grow_floor(
    plan: &mut FloorPlan,
    rng: &mut RandomSource,
    target: usize,
    limits: GrowthLimits,
) -> Result<GrowthReport, GenerationError> {
    let mut report = GrowthReport { floor: plan.number(), ..GrowthReport::default() };

    while plan.chains.carved_count() < target || plan.chains.chain_count() > 1 {
        if report.passes >= limits.max_passes {
            return Err(stalled(plan, target));
        }
        report.passes += 1;

        let active = plan.chains.active_chains();
        let mut carved = false;
        let mut sealed = 0;
        for &chain in &active {
            if !plan.chains.contains_chain(chain) {
                continue;
            }
            match step_chain(plan, chain, rng, limits.step_attempts, &mut report)? {
                Step::Carved => carved = true,
                Step::Missed => {}
                Step::Sealed => sealed += 1,
            }
        }

        if !carved && sealed == active.len() {
            let merged = reconcile_adjacent_chains(plan);
            if merged == 0 {
                return Err(stalled(plan, target));
            }
            warn!("floor {}: reconciled {merged} sealed chain(s)", plan.number());
            report.merges += merged;
        }
    }

    report.carved = plan.chains.carved_count();
    Ok(report)
}

fn step_chain(
    plan: &mut FloorPlan,
    chain: ChainId,
    rng: &mut RandomSource,
    attempts: usize,
    report: &mut GrowthReport,
) -> Result<Step, GenerationError> {
    let Some(origin) = growth_origin(plan, chain, report) else {
        return Ok(Step::Sealed);
    };

    let mut direction = if rng.one_in(TURN_CHANCE) { rng.direction() } else { origin.direction };
    for _ in 0..attempts {
        let next = origin.pos.step(direction);
        if plan.floor.is_wall(next) {
            plan.floor.carve(next, Tile::Floor)?;
            plan.chains.extend(chain, next, direction);
            report.merges += merge_neighbors(plan, chain, next);
            return Ok(Step::Carved);
        }
        direction = rng.direction();
    }
    Ok(Step::Missed)
}

/// The chain tail, or the most recent link that still borders a wall.
fn growth_origin(plan: &FloorPlan, chain: ChainId, report: &mut GrowthReport) -> Option<Link> {
    let tail = *plan.chains.last_link(chain)?;
    if plan.floor.has_wall_neighbor(tail.pos) {
        return Some(tail);
    }
    let origin =
        plan.chains.latest_link_where(chain, |link| plan.floor.has_wall_neighbor(link.pos))?;
    report.backtracks += 1;
    Some(*origin)
}

/// Absorbs every other chain touching `pos` into `chain`.
fn merge_neighbors(plan: &mut FloorPlan, chain: ChainId, pos: Pos) -> usize {
    let mut merges = 0;
    for neighbor in pos.neighbors() {
        match plan.chains.chain_at(neighbor) {
            Some(other) if other != chain => {
                if plan.chains.absorb(chain, other) {
                    merges += 1;
                }
            }
            _ => {}
        }
    }
    merges
}

fn reconcile_adjacent_chains(plan: &mut FloorPlan) -> usize {
    let mut merges = 0;
    for chain in plan.chains.active_chains() {
        if !plan.chains.contains_chain(chain) {
            continue;
        }
        let cells: Vec<Pos> = plan.chains.chain_links(chain).map(|link| link.pos).collect();
        for pos in cells {
            merges += merge_neighbors(plan, chain, pos);
        }
    }
    merges
}

fn stalled(plan: &FloorPlan, target: usize) -> GenerationError {
    GenerationError::GrowthStalled {
        floor: plan.number(),
        carved: plan.chains.carved_count(),
        target,
        chains: plan.chains.chain_count(),
    }
}
