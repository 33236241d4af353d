//! API route handlers
//!
//! - `index`: static input form
//! - `predict`: form/JSON prediction
//! - `health`: liveness + model state, model reload

mod health;
mod index;
mod predict;

pub use health::*;
pub use index::*;
pub use predict::*;

use std::sync::Arc;
use std::time::Duration;

use crate::config::defaults::DEFAULT_PREDICT_TIMEOUT_MS;
use crate::pipeline::PredictionService;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Prediction pipeline (owns the model cache)
    pub service: Arc<PredictionService>,
    /// Upper bound on one prediction, including a lazy model load
    pub predict_timeout: Duration,
}

impl AppState {
    pub fn new(service: Arc<PredictionService>) -> Self {
        Self {
            service,
            predict_timeout: Duration::from_millis(DEFAULT_PREDICT_TIMEOUT_MS),
        }
    }

    #[must_use]
    pub fn with_predict_timeout(mut self, timeout: Duration) -> Self {
        self.predict_timeout = timeout;
        self
    }
}
