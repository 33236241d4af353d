//! Error taxonomy for the prediction pipeline.
//!
//! User-correctable input errors map to 400, operator-correctable model
//! errors to 503. Every variant is converted to a structured response at the
//! API boundary; none is allowed to take the server down.

use std::path::PathBuf;

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    /// A canonical feature key is absent from the payload.
    #[error("Missing input: {0}")]
    MissingField(String),

    /// Present but not a finite number.
    #[error("Invalid numeric value for {name}: {raw}")]
    InvalidNumber { name: String, raw: String },

    /// Parsed but outside the physical plausibility range (inclusive).
    #[error("Value for {name} out of range [{low}, {high}]: {value}")]
    OutOfRange {
        name: String,
        value: f64,
        low: f64,
        high: f64,
    },

    #[error("Model not found at: {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error("Model at {} could not be loaded: {cause}", .path.display())]
    ModelCorrupt { path: PathBuf, cause: String },

    /// The model produced fewer values than there are targets.
    #[error("Model returned unexpected output shape: expected at least {expected} values, got {actual}")]
    ModelOutputShape { expected: usize, actual: usize },

    /// Internal wiring fault (unknown feature name in the range table).
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Lookup of a name that is not part of the canonical schema.
#[derive(Debug, Error)]
#[error("Unknown feature '{0}' has no validation range")]
pub struct ConfigurationError(pub String);

impl PredictError {
    /// HTTP status for this error at the serving boundary.
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingField(_)
            | Self::InvalidNumber { .. }
            | Self::OutOfRange { .. }
            | Self::ModelOutputShape { .. } => StatusCode::BAD_REQUEST,
            Self::ModelNotFound(_) | Self::ModelCorrupt { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error code.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "missing_field",
            Self::InvalidNumber { .. } => "invalid_number",
            Self::OutOfRange { .. } => "out_of_range",
            Self::ModelNotFound(_) => "model_not_found",
            Self::ModelCorrupt { .. } => "model_corrupt",
            Self::ModelOutputShape { .. } => "model_output_shape",
            Self::Configuration(_) => "configuration",
        }
    }

    /// True for errors the caller can fix by changing the request.
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_) | Self::InvalidNumber { .. } | Self::OutOfRange { .. }
        )
    }

    /// True when the model artifact is absent or unreadable.
    pub const fn is_model_unavailable(&self) -> bool {
        matches!(self, Self::ModelNotFound(_) | Self::ModelCorrupt { .. })
    }
}
