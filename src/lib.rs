//! Blade Predictor: wind turbine blade structural and fatigue property predictor
//!
//! ## Architecture
//!
//! - **Feature Schema** (`types`): canonical feature and target ordering
//! - **Validation** (`validation`): raw payload → checked `FeatureVector`
//! - **Model** (`model`): opaque predictors, artifact format, load-once cache
//! - **Pipeline** (`pipeline`): normalize → predict → name the outputs
//! - **API** (`api`): axum routes for the form, JSON clients and health
//! - **Training** (`training`): synthetic data and random-forest fitting

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod training;
pub mod types;
pub mod validation;

pub use config::ServerConfig;
pub use error::{ConfigurationError, PredictError};
pub use model::{ModelAdapter, Predictor};
pub use pipeline::{HealthReport, PredictionService};
pub use types::{FeatureVector, PredictionVector, ResultRecord, FEATURE_NAMES, TARGET_NAMES};
pub use validation::{normalize, RawInput, RawValue};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set. Safe to call more than
/// once; later calls are no-ops.
pub fn init_tracing(default_filter: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
