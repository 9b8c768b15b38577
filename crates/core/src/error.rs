//! Failure conditions surfaced by dungeon generation.
//!
//! Bad parameters are clamped elsewhere; only conditions the generator cannot
//! recover from end up here.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("unable to place {feature} on floor {floor} after {attempts} attempts")]
    PlacementExhausted { feature: &'static str, floor: i32, attempts: usize },

    #[error(
        "growth stalled on floor {floor}: {carved} of {target} tiles carved with {chains} unmerged chains"
    )]
    GrowthStalled { floor: i32, carved: usize, target: usize, chains: usize },

    #[error("cell (row {row}, column {column}) on floor {floor} is already carved")]
    AlreadyCarved { floor: i32, row: i32, column: i32 },
}
