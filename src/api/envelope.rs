//! JSON response bodies for API callers.
//!
//! Success: `{ "success": true, "predictions": { ... } }`
//! Error:   `{ "success": false, "error": "...", "kind": "..." }`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::types::ResultRecord;

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub success: bool,
    pub predictions: ResultRecord,
}

impl PredictionResponse {
    pub fn ok(predictions: ResultRecord) -> Response {
        let body = Self {
            success: true,
            predictions,
        };
        (StatusCode::OK, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub kind: String,
}

impl ErrorResponse {
    pub fn build(status: StatusCode, kind: &str, msg: impl Into<String>) -> Response {
        let body = Self {
            success: false,
            error: msg.into(),
            kind: kind.to_string(),
        };
        (status, Json(body)).into_response()
    }

    pub fn bad_request(kind: &str, msg: impl Into<String>) -> Response {
        Self::build(StatusCode::BAD_REQUEST, kind, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Response {
        Self::build(StatusCode::INTERNAL_SERVER_ERROR, "internal", msg)
    }
}
