use anyhow::{Context, Result};
use clap::Parser;
use map_core::{Config, Dungeon, Request};
use map_tools::invariants;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    runs: u32,
}

fn pick(rng: &mut ChaCha8Rng, low: i64, high: i64) -> i64 {
    low + (rng.next_u64() % (high - low + 1) as u64) as i64
}

fn random_config(rng: &mut ChaCha8Rng) -> Config {
    let tile_count = match pick(rng, 0, 3) {
        0 => -pick(rng, 1, 30),
        1 => pick(rng, 1, 60),
        _ => 0,
    };
    Config {
        grid_columns: pick(rng, 6, 40) as usize,
        grid_rows: pick(rng, 6, 30) as usize,
        top_floor: Request::Value(pick(rng, 0, 4)),
        bottom_floor: Request::Value(pick(rng, 0, 4)),
        tile_count,
        tile_percent: pick(rng, 0, 80) as f64 / 100.0,
        seed: Request::Value(pick(rng, 0, 2_147_483_647)),
        ..Config::default()
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} builds...", args.seed, args.runs);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut carved = 0;

    for run in 0..args.runs {
        let config = random_config(&mut rng);
        let description = format!("{config:?}");
        let mut dungeon = Dungeon::new(config);
        let summary = invariants::check(&mut dungeon)
            .with_context(|| format!("Invariant failed on run {run}: {description}"))?;
        carved += summary.carved;
    }

    println!("Fuzzing completed successfully: {} builds, {carved} tiles carved.", args.runs);
    Ok(())
}
