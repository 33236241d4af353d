//! API route definitions
//!
//! - `GET /` - input form
//! - `POST /predict` - form or JSON prediction
//! - `GET /health` - liveness and model state
//! - `POST /model/reload` - drop the cached model and load it again

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, AppState};

/// Create all prediction service routes
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health))
        .route("/model/reload", post(handlers::reload_model))
        .with_state(state)
}
