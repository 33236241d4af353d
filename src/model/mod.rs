//! Model layer: opaque predictors and the caching adapter around them
//!
//! - `Predictor`: narrow trait every inference backend implements
//! - `adapter`: load-once cache, output shape normalization
//! - `artifact`: on-disk JSON format written by the trainer
//! - `linear`, `forest`: concrete predictors an artifact can hold

pub mod adapter;
pub mod artifact;
pub mod forest;
pub mod linear;

pub use adapter::{ArtifactLoader, LoadedModel, ModelAdapter, ModelHandle, ModelLoader};
pub use artifact::{ModelArtifact, ModelKind, ARTIFACT_FORMAT_VERSION};
pub use forest::{RandomForest, RegressionTree, TreeNode};
pub use linear::LinearModel;

use crate::types::FeatureVector;

/// Raw output of an opaque model for a single input row.
///
/// Backends differ in whether they return a flat vector or a one-row
/// matrix; the adapter accepts both.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    Flat(Vec<f64>),
    Rows(Vec<Vec<f64>>),
}

impl ModelOutput {
    /// Flatten to the first row. An empty matrix yields an empty vector.
    pub fn into_flat(self) -> Vec<f64> {
        match self {
            Self::Flat(values) => values,
            Self::Rows(rows) => rows.into_iter().next().unwrap_or_default(),
        }
    }
}

/// A read-only, pre-trained numeric function of the canonical feature vector.
///
/// Implementations must be safe to call concurrently from many requests;
/// the adapter adds no synchronization around `predict`.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> ModelOutput;

    /// Short backend name for logs and health output.
    fn kind(&self) -> &'static str;
}
