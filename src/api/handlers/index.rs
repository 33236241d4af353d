//! `GET /`

use axum::response::Html;

use crate::api::render;

/// GET / - Input form for the seven blade features.
pub async fn index() -> Html<String> {
    render::index_page()
}
