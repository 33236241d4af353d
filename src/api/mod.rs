//! REST API module using Axum
//!
//! Serves the blade predictor to browsers (HTML form) and to programmatic
//! clients (JSON envelope) from the same routes.

pub mod envelope;
pub mod extract;
pub mod handlers;
pub mod render;
mod routes;

pub use handlers::AppState;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// `origins` comes from `cors_origins` / `BLADE_CORS_ORIGINS`. Entries that
/// do not parse as header values are skipped.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() {
        return base;
    }

    let allowed: Vec<_> = origins
        .iter()
        .filter_map(|o| o.trim().parse().ok())
        .collect();
    tracing::info!(origins = ?origins, "CORS: allowing configured origins");
    base.allow_origin(allowed)
}

/// Create the complete application router.
pub fn create_app(state: AppState, config: &ServerConfig) -> Router {
    routes::api_routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(build_cors_layer(&config.cors_origins))
}
