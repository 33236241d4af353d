//! On-disk model artifact.
//!
//! A single JSON document written by the trainer and read once by the
//! serving adapter:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "feature_names": ["youngs_modulus", "...", "frequency"],
//!   "target_names": ["deformation", "...", "damage"],
//!   "trained_at": "2026-01-01T00:00:00Z",
//!   "model": { "kind": "random_forest", "n_outputs": 6, "trees": [ ... ] }
//! }
//! ```
//!
//! `feature_names` must equal the canonical feature order exactly; an
//! artifact trained on a different column order is rejected at load time.

use std::io;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{LinearModel, Predictor, RandomForest};
use crate::error::PredictError;
use crate::types::{FEATURE_NAMES, TARGET_NAMES};

/// Current artifact schema version.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelKind {
    Linear(LinearModel),
    RandomForest(RandomForest),
}

impl ModelKind {
    pub fn n_outputs(&self) -> usize {
        match self {
            Self::Linear(m) => m.n_outputs(),
            Self::RandomForest(m) => m.n_outputs,
        }
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            Self::Linear(m) => m.validate(),
            Self::RandomForest(m) => m.validate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub feature_names: Vec<String>,
    pub target_names: Vec<String>,
    #[serde(default)]
    pub trained_at: Option<DateTime<Utc>>,
    pub model: ModelKind,
}

impl ModelArtifact {
    /// Wrap a model with the canonical schema, stamped now.
    pub fn new(model: ModelKind) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            feature_names: FEATURE_NAMES.iter().map(ToString::to_string).collect(),
            target_names: TARGET_NAMES.iter().map(ToString::to_string).collect(),
            trained_at: Some(Utc::now()),
            model,
        }
    }

    /// Check version, feature order and internal shapes.
    pub fn validate(&self) -> Result<(), String> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(format!(
                "unsupported format_version {} (expected {ARTIFACT_FORMAT_VERSION})",
                self.format_version
            ));
        }
        if self.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES) {
            return Err(format!(
                "feature order mismatch: artifact has {:?}, server expects {:?}",
                self.feature_names, FEATURE_NAMES
            ));
        }
        self.model.validate()
    }

    /// Parse and validate an artifact from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, String> {
        let artifact: Self = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Read an artifact from disk.
    ///
    /// A missing file is `ModelNotFound`; anything unreadable or invalid is
    /// `ModelCorrupt`.
    pub fn load(path: &Path) -> Result<Self, PredictError> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PredictError::ModelNotFound(path.to_path_buf()),
            _ => PredictError::ModelCorrupt {
                path: path.to_path_buf(),
                cause: e.to_string(),
            },
        })?;

        let artifact = Self::from_slice(&bytes).map_err(|cause| PredictError::ModelCorrupt {
            path: path.to_path_buf(),
            cause,
        })?;

        if artifact.target_names.iter().map(String::as_str).ne(TARGET_NAMES) {
            warn!(
                path = %path.display(),
                targets = ?artifact.target_names,
                "Artifact target names differ from the canonical targets; outputs are mapped by position"
            );
        }

        Ok(artifact)
    }

    /// Write the artifact atomically (temp file, then rename).
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_vec(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let tmp_path = path.with_extension("json.tmp");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&tmp_path, &json)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }

    pub fn into_predictor(self) -> Arc<dyn Predictor> {
        match self.model {
            ModelKind::Linear(m) => Arc::new(m),
            ModelKind::RandomForest(m) => Arc::new(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NUM_FEATURES;
    use tempfile::TempDir;

    fn linear_artifact(outputs: usize) -> ModelArtifact {
        ModelArtifact::new(ModelKind::Linear(LinearModel::new(
            vec![vec![0.001; NUM_FEATURES]; outputs],
            vec![0.1; outputs],
        )))
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("models/model.json");
        let artifact = linear_artifact(6);
        artifact.save(&path).unwrap();

        let loaded = ModelArtifact::load(&path).unwrap();
        assert_eq!(loaded, artifact);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = ModelArtifact::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, PredictError::ModelNotFound(_)));
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, b"\x80\x04pickle-ish bytes").unwrap();
        let err = ModelArtifact::load(&path).unwrap_err();
        assert!(matches!(err, PredictError::ModelCorrupt { .. }));
    }

    #[test]
    fn test_feature_order_mismatch_rejected() {
        let mut artifact = linear_artifact(6);
        artifact.feature_names.swap(0, 1);
        let err = artifact.validate().unwrap_err();
        assert!(err.contains("feature order mismatch"));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut artifact = linear_artifact(6);
        artifact.format_version = 99;
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(linear_artifact(2)).unwrap();
        assert_eq!(json["model"]["kind"], "linear");
        assert_eq!(json["feature_names"][6], "frequency");
        assert_eq!(json["model"]["intercepts"].as_array().unwrap().len(), 2);
    }
}
