//! Server-wide default constants.

// ============================================================================
// Network
// ============================================================================

/// Bind host when neither config nor CLI sets one.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// HTTP port (matches the historic deployment).
pub const DEFAULT_PORT: u16 = 5002;

/// Maximum accepted request body (bytes). Seven numbers never need more.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

// ============================================================================
// Model
// ============================================================================

/// Artifact path used when `MODEL_PATH` is unset.
pub const DEFAULT_MODEL_PATH: &str = "models/rf_blade_model.json";

/// Upper bound on a single prediction, including a lazy model load (ms).
pub const DEFAULT_PREDICT_TIMEOUT_MS: u64 = 10_000;

// ============================================================================
// Config file
// ============================================================================

/// Config file picked up from the working directory if present.
pub const LOCAL_CONFIG_FILE: &str = "blade_predictor.toml";
