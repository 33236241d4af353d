//! Prediction Pipeline Module
//!
//! ```text
//! RawInput ─▶ normalize() ─▶ FeatureVector ─▶ ModelAdapter::predict()
//!          ─▶ PredictionVector ─▶ map_result() ─▶ ResultRecord
//! ```
//!
//! Every stage is synchronous and side-effect free apart from the one-time
//! model load.

mod mapper;
mod service;

pub use mapper::map_result;
pub use service::{HealthReport, PredictionService};
