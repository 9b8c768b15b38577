//! Generated floors together with the chain registries that grew them.

use crate::chain::ChainRegistry;
use crate::config::GridSize;
use crate::floor::Floor;

#[derive(Clone, Debug)]
pub struct FloorPlan {
    pub(crate) floor: Floor,
    pub(crate) chains: ChainRegistry,
}

impl FloorPlan {
    pub fn new(number: i32, grid: GridSize) -> Self {
        Self { floor: Floor::new(number, grid), chains: ChainRegistry::new() }
    }

    pub fn number(&self) -> i32 {
        self.floor.number()
    }

    pub fn floor(&self) -> &Floor {
        &self.floor
    }
}

/// Every floor of one build, ordered from the bottom floor upwards.
#[derive(Clone, Debug)]
pub struct GeneratedDungeon {
    pub(crate) seed: u64,
    pub(crate) bottom_floor: i32,
    pub(crate) plans: Vec<FloorPlan>,
}

impl GeneratedDungeon {
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn bottom_floor(&self) -> i32 {
        self.bottom_floor
    }

    pub fn top_floor(&self) -> i32 {
        self.bottom_floor + self.plans.len() as i32 - 1
    }

    pub fn plan(&self, number: i32) -> Option<&FloorPlan> {
        self.slot(number).map(|index| &self.plans[index])
    }

    pub fn floor(&self, number: i32) -> Option<&Floor> {
        self.plan(number).map(FloorPlan::floor)
    }

    pub fn floor_mut(&mut self, number: i32) -> Option<&mut Floor> {
        self.slot(number).map(|index| &mut self.plans[index].floor)
    }

    pub fn floors(&self) -> impl Iterator<Item = &Floor> + '_ {
        self.plans.iter().map(FloorPlan::floor)
    }

    pub fn chain_count(&self, number: i32) -> Option<usize> {
        self.plan(number).map(|plan| plan.chains.chain_count())
    }

    fn slot(&self, number: i32) -> Option<usize> {
        let offset = i64::from(number) - i64::from(self.bottom_floor);
        usize::try_from(offset).ok().filter(|&index| index < self.plans.len())
    }
}
