//! `GET /health` and `POST /model/reload`

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{info, warn};

use super::AppState;
use crate::api::envelope::ErrorResponse;
use crate::pipeline::HealthReport;

/// GET /health - Liveness plus model state.
///
/// Always 200. A probe that cannot complete reports the model as absent.
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let service = Arc::clone(&state.service);
    let report = tokio::task::spawn_blocking(move || service.health())
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "Health probe aborted");
            HealthReport {
                status: "ok",
                model_present: false,
                model_loaded: false,
            }
        });
    Json(report)
}

/// POST /model/reload - Drop the cached model and load the artifact again.
pub async fn reload_model(State(state): State<AppState>) -> Response {
    let service = Arc::clone(&state.service);
    let outcome = tokio::task::spawn_blocking(move || {
        let loaded = service.reload();
        (loaded, service.health())
    })
    .await;

    match outcome {
        Ok((Ok(handle), report)) => {
            info!(path = %handle.path().display(), kind = handle.kind(), "Model reloaded");
            Json(report).into_response()
        }
        Ok((Err(e), _)) => {
            warn!(kind = e.kind(), error = %e, "Model reload failed");
            ErrorResponse::build(e.status_code(), e.kind(), e.to_string())
        }
        Err(e) => ErrorResponse::internal(format!("Reload task aborted: {e}")),
    }
}
