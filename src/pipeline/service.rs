//! Prediction service: Normalizer → Model Adapter → Result Mapper.
//!
//! Transport-agnostic. The HTTP layer, CLIs and tests all drive the
//! pipeline through this type.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::mapper::map_result;
use crate::error::PredictError;
use crate::model::{ModelAdapter, ModelHandle};
use crate::types::ResultRecord;
use crate::validation::{normalize, RawInput};

/// Body of `GET /health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub model_present: bool,
    pub model_loaded: bool,
}

pub struct PredictionService {
    adapter: Arc<ModelAdapter>,
    model_path: PathBuf,
}

impl PredictionService {
    pub fn new(adapter: Arc<ModelAdapter>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            adapter,
            model_path: model_path.into(),
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn adapter(&self) -> &Arc<ModelAdapter> {
        &self.adapter
    }

    /// Validate `raw`, run the model and name the outputs.
    ///
    /// Input is validated before the model is touched, so a malformed
    /// request never triggers a disk read.
    pub fn predict(&self, raw: &RawInput) -> Result<ResultRecord, PredictError> {
        let features = normalize(raw)?;
        let handle = self.adapter.load(&self.model_path)?;
        let prediction = self.adapter.predict(&handle, &features)?;
        let record = map_result(&prediction);
        debug!(?features, ?record, "Prediction complete");
        Ok(record)
    }

    /// Load the model now instead of on the first request.
    pub fn warm_up(&self) -> Result<ModelHandle, PredictError> {
        self.adapter.load(&self.model_path)
    }

    /// Drop the cached model and load it again from the configured path.
    pub fn reload(&self) -> Result<ModelHandle, PredictError> {
        self.adapter.invalidate();
        self.adapter.load(&self.model_path)
    }

    /// Probe artifact presence and load state. Never fails.
    ///
    /// If the artifact exists but is not cached yet, one load is attempted
    /// so `model_loaded` reflects whether it is actually usable.
    pub fn health(&self) -> HealthReport {
        let model_present = self.model_path.exists();
        let model_loaded = self.adapter.is_loaded()
            || (model_present && self.adapter.load(&self.model_path).is_ok());

        HealthReport {
            status: "ok",
            model_present,
            model_loaded,
        }
    }
}

impl std::fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionService")
            .field("model_path", &self.model_path)
            .field("adapter", &self.adapter)
            .finish()
    }
}
