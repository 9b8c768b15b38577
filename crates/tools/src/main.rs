use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use map_core::{Config, Dungeon, Request, SizeRequest};
use map_tools::{config_file, format_fingerprint, format_seed, render};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Ascii,
    Json,
}

/// Generate a seeded multi-floor dungeon and print its floors.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with generation settings; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed; "random" or -1 picks a fresh one, other values are clamped
    #[arg(short, long)]
    seed: Option<Request>,
    #[arg(long)]
    columns: Option<i64>,
    #[arg(long)]
    rows: Option<i64>,
    /// Canvas width in pixels; -1 derives it from the grid
    #[arg(long, allow_negative_numbers = true)]
    canvas_width: Option<i64>,
    /// Canvas height in pixels; -1 derives it from the grid
    #[arg(long, allow_negative_numbers = true)]
    canvas_height: Option<i64>,
    #[arg(long)]
    cell_size: Option<i64>,
    #[arg(long)]
    padding: Option<i64>,
    /// Highest floor, or "random"
    #[arg(long, allow_negative_numbers = true)]
    top: Option<Request>,
    /// Lowest floor (its magnitude is used), or "random"
    #[arg(long, allow_negative_numbers = true)]
    bottom: Option<Request>,
    /// Carved tiles per floor; 0 uses the percentage, negative counts back from the area
    #[arg(long, allow_negative_numbers = true)]
    tile_count: Option<i64>,
    #[arg(long)]
    tile_percent: Option<f64>,
    /// Floors to print; repeat for several. Defaults to every floor
    #[arg(short, long = "floor", allow_negative_numbers = true)]
    floors: Vec<i32>,
    #[arg(long, value_enum, default_value_t = Format::Ascii)]
    format: Format,
}

impl Args {
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => config_file::load(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?,
            None => Config::default(),
        };

        config.apply_size(SizeRequest {
            grid_columns: self.columns,
            grid_rows: self.rows,
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            cell_size: self.cell_size,
            padding: self.padding,
        });
        config.apply_tile_count(self.tile_count, self.tile_percent);
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(top) = self.top {
            config.top_floor = top;
        }
        if let Some(bottom) = self.bottom {
            config.bottom_floor = bottom;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut dungeon = Dungeon::new(args.config()?);
    info!("active seed {}", dungeon.active_seed());

    let floors: Vec<i32> =
        if args.floors.is_empty() { dungeon.floor_numbers().rev().collect() } else { args.floors };
    let report = render::report(&mut dungeon, &floors).context("Dungeon generation failed")?;

    match args.format {
        Format::Json => {
            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize dungeon report")?;
            println!("{json}");
        }
        Format::Ascii => {
            println!(
                "Seed: {} | Floors: {}..={} | Target: {} tiles",
                format_seed(dungeon.active_seed()),
                report.bottom_floor,
                report.top_floor,
                report.tile_target
            );
            for number in floors {
                let Some(floor) = dungeon.floor(number)? else {
                    println!("\nFloor {number}: not part of this dungeon");
                    continue;
                };
                println!(
                    "\nFloor {number} ({}x{}) {}",
                    floor.width(),
                    floor.height(),
                    format_fingerprint(floor.fingerprint())
                );
                print!("{}", render::ascii(floor));
                let legend: Vec<String> = render::legend(floor)
                    .into_iter()
                    .map(|(glyph, label)| format!("{glyph} {label}"))
                    .collect();
                println!("{}", legend.join("  "));
            }
        }
    }

    Ok(())
}
