//! Seeded random stream shared by every generation step.
//!
//! A `RandomSource` is a single ChaCha8 stream plus the seed it was built
//! from. Independent sub-streams are derived with [`RandomSource::fork`] so
//! work that runs in parallel never shares a mutable generator.

use std::f64::consts::TAU;
use std::fmt;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

use crate::config::Request;
use crate::types::Direction;

/// Largest seed a caller can request; larger values are clamped.
pub const MAX_SEED: u64 = 2_147_483_647;

#[derive(Clone)]
pub struct RandomSource {
    active_seed: u64,
    rng: ChaCha8Rng,
}

impl fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomSource").field("active_seed", &self.active_seed).finish()
    }
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        let active_seed = seed.min(MAX_SEED);
        Self { active_seed, rng: ChaCha8Rng::seed_from_u64(active_seed) }
    }

    pub fn from_request(request: Request) -> Self {
        Self::new(resolve_seed(request))
    }

    /// Restarts the stream and returns the seed now in use.
    pub fn reseed(&mut self, request: Request) -> u64 {
        *self = Self::from_request(request);
        self.active_seed
    }

    pub fn active_seed(&self) -> u64 {
        self.active_seed
    }

    /// Independent stream derived from the active seed and `stream`.
    pub fn fork(&self, stream: u64) -> Self {
        Self {
            active_seed: self.active_seed,
            rng: ChaCha8Rng::seed_from_u64(mix_seed_stream(self.active_seed, stream)),
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Uniform integer in `[0, bound)`.
    pub fn uniform(&mut self, bound: u64) -> u64 {
        debug_assert!(bound > 0);
        self.next_u64() % bound
    }

    /// Uniform integer in `[low, high]`.
    pub fn range_inclusive(&mut self, low: i64, high: i64) -> i64 {
        debug_assert!(low <= high);
        let span = high.abs_diff(low) + 1;
        low + self.uniform(span) as i64
    }

    pub fn one_in(&mut self, chance: u64) -> bool {
        self.uniform(chance) == 0
    }

    /// Uniform float in `[0, 1)` with 53 bits of precision.
    pub fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1_u64 << 53) as f64)
    }

    /// Normal deviate via the Box-Muller transform.
    pub fn normal(&mut self, mean: f64, sd: f64) -> f64 {
        let u1 = 1.0 - self.unit();
        let u2 = self.unit();
        let radius = (-2.0 * u1.ln()).sqrt();
        mean + sd * radius * (TAU * u2).cos()
    }

    /// `|round(normal(0, sd))|`, the magnitude used for counts and floor spans.
    pub fn half_normal(&mut self, sd: f64) -> u64 {
        self.normal(0.0, sd).round().abs() as u64
    }

    pub fn direction(&mut self) -> Direction {
        Direction::ALL[self.uniform(Direction::ALL.len() as u64) as usize]
    }
}

/// Sentinel value that asks for a fresh runtime seed, same as `Random`.
pub const RANDOM_SEED_SENTINEL: i64 = -1;

/// Turns a seed request into a concrete seed in `[0, MAX_SEED]`.
///
/// Only `Random` and `-1` draw a runtime seed; other values are clamped.
pub fn resolve_seed(request: Request) -> u64 {
    match request {
        Request::Random | Request::Value(RANDOM_SEED_SENTINEL) => {
            generate_runtime_seed() % (MAX_SEED + 1)
        }
        Request::Value(value) => value.clamp(0, MAX_SEED as i64) as u64,
    }
}

static GENERATED_SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn generate_runtime_seed() -> u64 {
    let now_nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0_u128, |duration| duration.as_nanos());
    let pid = u64::from(process::id());
    let counter = GENERATED_SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    let entropy = (now_nanos as u64)
        ^ ((now_nanos >> 64) as u64)
        ^ pid.rotate_left(17)
        ^ counter.rotate_left(7);

    mix_seed(entropy)
}

pub(crate) fn mix_seed_stream(seed: u64, stream: u64) -> u64 {
    mix_seed(seed ^ stream.wrapping_mul(0xD6E8_FD9A_5B89_7A4D))
}

fn mix_seed(mut value: u64) -> u64 {
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_replays_the_same_draws() {
        let mut left = RandomSource::new(42);
        let mut right = RandomSource::new(42);
        for _ in 0..64 {
            assert_eq!(left.next_u64(), right.next_u64());
        }
    }

    #[test]
    fn uniform_and_ranges_stay_inside_bounds() {
        let mut source = RandomSource::new(7);
        for _ in 0..500 {
            assert!(source.uniform(5) < 5);
            assert!((-3..=4).contains(&source.range_inclusive(-3, 4)));
            let unit = source.unit();
            assert!((0.0..1.0).contains(&unit));
        }
    }

    #[test]
    fn normal_deviates_center_on_the_mean() {
        let mut source = RandomSource::new(2024);
        let samples = 20_000;
        let total: f64 = (0..samples).map(|_| source.normal(10.0, 2.0)).sum();
        let mean = total / samples as f64;
        assert!((mean - 10.0).abs() < 0.1, "sample mean drifted to {mean}");
    }

    #[test]
    fn every_direction_is_reachable() {
        let mut source = RandomSource::new(3);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let direction = source.direction();
            let index = Direction::ALL.iter().position(|&d| d == direction).unwrap();
            seen[index] = true;
        }
        assert!(seen.iter().all(|&hit| hit));
    }

    #[test]
    fn forks_are_independent_and_reproducible() {
        let root = RandomSource::new(99);
        let mut a = root.fork(1);
        let mut a_again = root.fork(1);
        let mut b = root.fork(2);
        let first = a.next_u64();
        assert_eq!(first, a_again.next_u64());
        assert_ne!(first, b.next_u64());
        assert_eq!(a.active_seed(), 99);
    }

    #[test]
    fn explicit_seeds_are_clamped_and_minus_one_is_random() {
        assert_eq!(resolve_seed(Request::Value(12)), 12);
        assert_eq!(resolve_seed(Request::Value(i64::MAX)), MAX_SEED);
        assert_eq!(resolve_seed(Request::Value(-5)), 0);
        assert_eq!(resolve_seed(Request::Value(i64::MIN)), 0);
        for _ in 0..32 {
            assert!(resolve_seed(Request::Value(-1)) <= MAX_SEED);
            assert!(resolve_seed(Request::Random) <= MAX_SEED);
        }
    }

    #[test]
    fn reseeding_reports_the_active_seed() {
        let mut source = RandomSource::new(1);
        assert_eq!(source.reseed(Request::Value(555)), 555);
        assert_eq!(source.active_seed(), 555);
        let mut fresh = RandomSource::new(555);
        assert_eq!(source.next_u64(), fresh.next_u64());
    }

    #[test]
    fn runtime_seeds_vary_between_calls() {
        assert_ne!(generate_runtime_seed(), generate_runtime_seed());
    }
}
