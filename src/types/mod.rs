//! Shared data structures for the blade prediction pipeline
//!
//! - `schema`: canonical feature/target ordering (single source of truth)
//! - `vectors`: FeatureVector, PredictionVector, ResultRecord

pub mod schema;
mod vectors;

pub use schema::{FEATURE_NAMES, NUM_FEATURES, NUM_TARGETS, TARGET_NAMES};
pub use vectors::*;
