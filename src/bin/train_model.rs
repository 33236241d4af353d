//! Offline trainer: CSV dataset in, random-forest model artifact out.
//!
//! Usage:
//!   cargo run --release --bin train-model -- --data data/wind_turbine_blade_data.csv --out models/rf_blade_model.json

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use blade_predictor::config::defaults::DEFAULT_MODEL_PATH;
use blade_predictor::training::{train_from_csv, TrainParams};

#[derive(Parser, Debug)]
#[command(name = "train-model", about = "Train the blade random-forest model and save the artifact")]
struct Args {
    /// Path to the CSV dataset
    #[arg(long, default_value = "data/wind_turbine_blade_data.csv")]
    data: PathBuf,

    /// Output model artifact path
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    out: PathBuf,

    #[arg(long, default_value_t = 100)]
    n_estimators: usize,

    /// Fraction of rows held out for scoring
    #[arg(long, default_value_t = 0.2)]
    test_size: f64,

    #[arg(long, default_value_t = 42)]
    random_state: u64,

    /// Maximum tree depth (unbounded when omitted)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    blade_predictor::init_tracing(if args.verbose { "debug" } else { "info" }, false);

    let params = TrainParams {
        n_estimators: args.n_estimators,
        test_size: args.test_size,
        random_state: args.random_state,
        max_depth: args.max_depth,
    };

    let report = train_from_csv(&args.data, &args.out, &params)
        .with_context(|| format!("Training on {} failed", args.data.display()))?;

    info!(
        model = %report.model_path.display(),
        train_r2 = %format!("{:.4}", report.metrics.train_r2),
        test_r2 = %format!("{:.4}", report.metrics.test_r2),
        "Model saved"
    );
    Ok(())
}
