//! `POST /predict`

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, info, warn};

use super::AppState;
use crate::api::envelope::{ErrorResponse, PredictionResponse};
use crate::api::extract::{PredictRequest, ResponseFormat};
use crate::api::render;
use crate::error::PredictError;
use crate::types::ResultRecord;

/// Why a request produced no prediction.
#[derive(Debug)]
enum Failure {
    Pipeline(PredictError),
    Timeout,
    Aborted(String),
}

impl Failure {
    fn status(&self) -> StatusCode {
        match self {
            Self::Pipeline(e) => e.status_code(),
            Self::Timeout => StatusCode::SERVICE_UNAVAILABLE,
            Self::Aborted(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Pipeline(e) => e.kind(),
            Self::Timeout => "timeout",
            Self::Aborted(_) => "internal",
        }
    }

    /// Message shown to the caller. Server paths stay in the logs.
    fn message(&self) -> String {
        match self {
            Self::Pipeline(e) if e.is_model_unavailable() => {
                "Model is not available on server. Contact admin.".to_string()
            }
            Self::Pipeline(e) => e.to_string(),
            Self::Timeout => "Prediction timed out".to_string(),
            Self::Aborted(_) => "Internal error while running the model".to_string(),
        }
    }

    /// Shape violations are logged by the model adapter with the artifact
    /// path and kind.
    const fn logged_upstream(&self) -> bool {
        matches!(self, Self::Pipeline(PredictError::ModelOutputShape { .. }))
    }

    fn log(&self) {
        if self.logged_upstream() {
            return;
        }
        match self {
            Self::Pipeline(e) if e.is_user_error() => info!(kind = e.kind(), error = %e, "Rejected prediction input"),
            Self::Pipeline(e) if e.is_model_unavailable() => warn!(kind = e.kind(), error = %e, "Model unavailable"),
            Self::Pipeline(e) => error!(kind = e.kind(), error = %e, "Prediction failed"),
            Self::Timeout => warn!("Prediction timed out"),
            Self::Aborted(detail) => error!(detail = %detail, "Prediction task aborted"),
        }
    }
}

/// POST /predict - Validate the payload, run the model, name the outputs.
///
/// JSON requests get JSON envelopes; form posts get HTML pages.
pub async fn predict(State(state): State<AppState>, request: PredictRequest) -> Response {
    let PredictRequest { input, format } = request;
    let service = Arc::clone(&state.service);

    let task = tokio::task::spawn_blocking(move || service.predict(&input));
    let outcome = match tokio::time::timeout(state.predict_timeout, task).await {
        Ok(Ok(result)) => result.map_err(Failure::Pipeline),
        Ok(Err(join_error)) => Err(Failure::Aborted(join_error.to_string())),
        Err(_elapsed) => Err(Failure::Timeout),
    };

    respond(outcome, format)
}

fn respond(outcome: Result<ResultRecord, Failure>, format: ResponseFormat) -> Response {
    match outcome {
        Ok(record) => match format {
            ResponseFormat::Json => PredictionResponse::ok(record),
            ResponseFormat::Html => render::result_page(&record).into_response(),
        },
        Err(failure) => {
            failure.log();
            let status = failure.status();
            match format {
                ResponseFormat::Json => ErrorResponse::build(status, failure.kind(), failure.message()),
                ResponseFormat::Html => (status, render::error_page(&failure.message())).into_response(),
            }
        }
    }
}
