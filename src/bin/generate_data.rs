//! Synthetic wind turbine blade dataset generator.
//!
//! Usage:
//!   cargo run --bin generate-data -- --n 150 --seed 42 --out data/wind_turbine_blade_data.csv

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use blade_predictor::training::synthetic::{self, DEFAULT_SAMPLES, DEFAULT_SEED};

#[derive(Parser, Debug)]
#[command(name = "generate-data", about = "Generate a synthetic wind turbine blade dataset")]
struct Args {
    /// Number of samples to generate
    #[arg(long, default_value_t = DEFAULT_SAMPLES)]
    n: usize,

    /// Random seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Output CSV path
    #[arg(long, default_value = "data/wind_turbine_blade_data.csv")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    blade_predictor::init_tracing("info", false);

    let dataset = synthetic::generate(args.n, args.seed);
    dataset
        .write_csv(&args.out)
        .with_context(|| format!("Failed to write {}", args.out.display()))?;

    info!(path = %args.out.display(), n = args.n, seed = args.seed, "Synthetic dataset written");
    Ok(())
}
