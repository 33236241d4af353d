//! Blade Predictor - wind turbine blade property prediction service
//!
//! Serves a pre-trained regression model behind a validated HTTP endpoint.
//!
//! # Usage
//!
//! ```bash
//! # Generate data and train a model first
//! cargo run --bin generate-data
//! cargo run --release --bin train-model
//!
//! # Serve on 0.0.0.0:5002
//! cargo run --release
//! ```
//!
//! # Environment Variables
//!
//! - `MODEL_PATH`: model artifact (default: models/rf_blade_model.json)
//! - `PORT`: listen port (default: 5002)
//! - `BLADE_DEBUG`: verbose logging when set to 1/true/yes/on
//! - `BLADE_CONFIG`: TOML config file (default: ./blade_predictor.toml if present)
//! - `BLADE_CORS_ORIGINS`: comma-separated allowed origins
//! - `RUST_LOG`: logging filter (overrides the debug default)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use blade_predictor::api::{create_app, AppState};
use blade_predictor::config::{ConfigOverrides, ConfigSource, ServerConfig};
use blade_predictor::model::ModelAdapter;
use blade_predictor::pipeline::PredictionService;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "blade-predictor")]
#[command(about = "Wind turbine blade property prediction service")]
#[command(version)]
struct CliArgs {
    /// TOML config file (overrides BLADE_CONFIG)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Bind host (default: 0.0.0.0)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (default: 5002)
    #[arg(short, long)]
    port: Option<u16>,

    /// Model artifact path
    #[arg(long, value_name = "PATH")]
    model_path: Option<PathBuf>,

    /// Verbose logging
    #[arg(long)]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl From<CliArgs> for ConfigOverrides {
    fn from(args: CliArgs) -> Self {
        Self {
            config_file: args.config,
            host: args.host,
            port: args.port,
            model_path: args.model_path,
            debug: args.debug,
            log_json: args.log_json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let overrides = ConfigOverrides::from(CliArgs::parse());
    let loaded = ServerConfig::load(&overrides).context("Failed to load configuration")?;
    let config = loaded.config;

    blade_predictor::init_tracing(if config.debug { "debug" } else { "info" }, config.log_json);

    match &loaded.source {
        ConfigSource::File(path) => info!(path = %path.display(), "Loaded config file"),
        ConfigSource::Defaults => info!("No config file found, using defaults and environment"),
    }
    for warning in &loaded.warnings {
        warn!("{warning}");
    }

    // ── Model ─────────────────────────────────────────────────────────────────
    let service = Arc::new(PredictionService::new(
        Arc::new(ModelAdapter::new()),
        config.model_path.clone(),
    ));

    let warm = Arc::clone(&service);
    match tokio::task::spawn_blocking(move || warm.warm_up()).await {
        Ok(Ok(handle)) => info!(
            path = %handle.path().display(),
            kind = handle.kind(),
            "Model loaded"
        ),
        Ok(Err(e)) => warn!(
            error = %e,
            "Model not loaded at startup; predictions will fail until the artifact is available"
        ),
        Err(e) => warn!(error = %e, "Model warm-up task aborted"),
    }

    // ── HTTP Server ───────────────────────────────────────────────────────────
    let state = AppState::new(service).with_predict_timeout(config.predict_timeout());
    let app = create_app(state, &config);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(address = %address, model_path = %config.model_path.display(), "Blade Predictor listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Blade Predictor shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
