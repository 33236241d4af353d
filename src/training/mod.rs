//! Offline training: dataset I/O, synthetic data, forest fitting
//!
//! - `dataset`: header-addressed CSV of features and targets
//! - `synthetic`: baseline-scaled synthetic blade data
//! - `cart`: exact-greedy multi-output regression trees and bagging
//! - `trainer`: split, fit, score and write the serving artifact

pub mod cart;
pub mod dataset;
pub mod synthetic;
pub mod trainer;

pub use cart::{fit_forest, fit_tree, ForestParams, TreeParams};
pub use dataset::Dataset;
pub use synthetic::generate;
pub use trainer::{
    metrics_path_for, r2_score, train, train_from_csv, TrainParams, TrainReport, TrainedModel,
    TrainingMetrics,
};

use std::path::PathBuf;

use thiserror::Error;

/// Errors from dataset handling and model fitting.
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dataset line {line}, column '{column}': {message}")]
    Parse {
        line: usize,
        column: String,
        message: String,
    },

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Dataset line {line}: expected {expected} columns, found {found}")]
    RowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Dataset is empty")]
    EmptyDataset,

    #[error("Invalid training parameter: {0}")]
    InvalidParams(String),

    #[error("Failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl TrainingError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
