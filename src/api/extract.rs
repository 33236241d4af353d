//! Request extractor adapting form and JSON bodies into a [`RawInput`].

use async_trait::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderMap};
use axum::body::Bytes;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde_json::Value;

use super::envelope::ErrorResponse;
use super::render;
use crate::validation::RawInput;

/// How the caller wants the outcome rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Html,
}

/// A `POST /predict` body in transport-neutral form.
#[derive(Debug, Clone)]
pub struct PredictRequest {
    pub input: RawInput,
    pub format: ResponseFormat,
}

/// Lowercased media type of the request, parameters stripped.
fn media_type(headers: &HeaderMap) -> Option<String> {
    let content_type = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    let mime = content_type.split(';').next().unwrap_or_default().trim();
    Some(mime.to_ascii_lowercase())
}

/// `application/json` or any `application/*+json` content type.
pub fn is_json(headers: &HeaderMap) -> bool {
    media_type(headers).is_some_and(|mime| {
        mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
    })
}

/// `application/x-www-form-urlencoded`.
pub fn is_form(headers: &HeaderMap) -> bool {
    media_type(headers).is_some_and(|mime| mime == "application/x-www-form-urlencoded")
}

#[async_trait]
impl<S> FromRequest<S> for PredictRequest
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(req.headers()) {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|rejection| {
                    ErrorResponse::build(rejection.status(), "malformed_payload", rejection.body_text())
                })?;

            let Value::Object(object) = value else {
                return Err(ErrorResponse::bad_request(
                    "malformed_payload",
                    "Request body must be a JSON object",
                ));
            };

            Ok(Self {
                input: RawInput::from_json_object(object),
                format: ResponseFormat::Json,
            })
        } else if is_form(req.headers()) {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|rejection| {
                    (rejection.status(), render::error_page(&rejection.body_text())).into_response()
                })?;

            Ok(Self {
                input: RawInput::from_form_pairs(pairs),
                format: ResponseFormat::Html,
            })
        } else {
            // Any other body carries no fields; the body is still read so
            // the size limit applies.
            Bytes::from_request(req, state).await.map_err(|rejection| {
                (rejection.status(), render::error_page(&rejection.body_text())).into_response()
            })?;

            Ok(Self {
                input: RawInput::new(),
                format: ResponseFormat::Html,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        h
    }

    #[test]
    fn test_is_json() {
        assert!(is_json(&headers("application/json")));
        assert!(is_json(&headers("Application/JSON; charset=utf-8")));
        assert!(is_json(&headers("application/vnd.blade+json")));
        assert!(!is_json(&headers("application/x-www-form-urlencoded")));
        assert!(!is_json(&headers("text/json-ish")));
        assert!(!is_json(&HeaderMap::new()));
    }

    #[test]
    fn test_is_form() {
        assert!(is_form(&headers("application/x-www-form-urlencoded")));
        assert!(is_form(&headers("Application/X-WWW-Form-Urlencoded; charset=utf-8")));
        assert!(!is_form(&headers("text/plain")));
        assert!(!is_form(&headers("multipart/form-data; boundary=x")));
        assert!(!is_form(&HeaderMap::new()));
    }
}
