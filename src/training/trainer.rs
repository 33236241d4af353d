//! Train-test split, forest fitting, scoring and artifact output.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::cart::{fit_forest, ForestParams, TreeParams};
use super::{Dataset, TrainingError};
use crate::model::{ModelArtifact, ModelKind, RandomForest};
use crate::types::NUM_TARGETS;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainParams {
    pub n_estimators: usize,
    pub test_size: f64,
    pub random_state: u64,
    pub max_depth: Option<usize>,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            test_size: 0.2,
            random_state: 42,
            max_depth: None,
        }
    }
}

impl TrainParams {
    const fn forest(&self) -> ForestParams {
        ForestParams {
            n_estimators: self.n_estimators,
            tree: TreeParams {
                max_depth: self.max_depth,
                min_samples_split: 2,
                min_samples_leaf: 1,
            },
            seed: self.random_state,
        }
    }
}

/// Contents of `<model stem>.metrics.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub train_r2: f64,
    pub test_r2: f64,
    pub n_train: usize,
    pub n_test: usize,
    pub n_estimators: usize,
    pub trained_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub forest: RandomForest,
    pub metrics: TrainingMetrics,
}

#[derive(Debug, Clone)]
pub struct TrainReport {
    pub model_path: PathBuf,
    pub metrics_path: PathBuf,
    pub metrics: TrainingMetrics,
}

/// Coefficient of determination averaged uniformly over targets.
///
/// A target with zero variance scores 1.0 when predicted exactly and 0.0
/// otherwise.
#[allow(clippy::cast_precision_loss)]
pub fn r2_score(y_true: &[[f64; NUM_TARGETS]], y_pred: &[Vec<f64>]) -> f64 {
    let n = y_true.len().min(y_pred.len());
    if n == 0 {
        return 0.0;
    }

    let mut total = 0.0;
    for k in 0..NUM_TARGETS {
        let mean = y_true[..n].iter().map(|row| row[k]).sum::<f64>() / n as f64;
        let mut ss_res = 0.0;
        let mut ss_tot = 0.0;
        for (truth, pred) in y_true.iter().zip(y_pred) {
            let p = pred.get(k).copied().unwrap_or(0.0);
            ss_res += (truth[k] - p).powi(2);
            ss_tot += (truth[k] - mean).powi(2);
        }
        total += if ss_tot > 0.0 {
            1.0 - ss_res / ss_tot
        } else if ss_res == 0.0 {
            1.0
        } else {
            0.0
        };
    }
    total / NUM_TARGETS as f64
}

fn score(forest: &RandomForest, data: &Dataset) -> f64 {
    let predictions: Vec<Vec<f64>> = data.features.iter().map(|x| forest.predict_row(x)).collect();
    r2_score(&data.targets, &predictions)
}

/// Split `dataset`, fit on the training half and score both halves.
pub fn train(dataset: &Dataset, params: &TrainParams) -> Result<TrainedModel, TrainingError> {
    let (train_set, test_set) = dataset.split(params.test_size, params.random_state)?;
    info!(
        n_train = train_set.len(),
        n_test = test_set.len(),
        n_estimators = params.n_estimators,
        max_depth = ?params.max_depth,
        "Fitting random forest"
    );

    let forest = fit_forest(&train_set, &params.forest())?;
    let metrics = TrainingMetrics {
        train_r2: score(&forest, &train_set),
        test_r2: score(&forest, &test_set),
        n_train: train_set.len(),
        n_test: test_set.len(),
        n_estimators: params.n_estimators,
        trained_at: Utc::now(),
    };
    info!(
        train_r2 = metrics.train_r2,
        test_r2 = metrics.test_r2,
        "Training complete"
    );

    Ok(TrainedModel { forest, metrics })
}

/// `models/rf.json` → `models/rf.metrics.json`
pub fn metrics_path_for(model_path: &Path) -> PathBuf {
    model_path.with_extension("metrics.json")
}

/// Read `data`, train, and write the artifact to `out` plus its metrics file.
pub fn train_from_csv(
    data: &Path,
    out: &Path,
    params: &TrainParams,
) -> Result<TrainReport, TrainingError> {
    let dataset = Dataset::from_csv(data)?;
    info!(path = %data.display(), rows = dataset.len(), "Loaded dataset");

    let TrainedModel { forest, metrics } = train(&dataset, params)?;

    let mut artifact = ModelArtifact::new(ModelKind::RandomForest(forest));
    artifact.trained_at = Some(metrics.trained_at);
    artifact.save(out).map_err(|e| TrainingError::io(out, e))?;

    let metrics_path = metrics_path_for(out);
    let json = serde_json::to_string_pretty(&metrics).map_err(|source| TrainingError::Serialize {
        what: "training metrics",
        source,
    })?;
    std::fs::write(&metrics_path, json).map_err(|e| TrainingError::io(&metrics_path, e))?;

    info!(
        model = %out.display(),
        metrics = %metrics_path.display(),
        "Model artifact written"
    );

    Ok(TrainReport {
        model_path: out.to_path_buf(),
        metrics_path,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::synthetic;
    use tempfile::TempDir;

    #[test]
    fn test_r2_perfect_and_mean_predictions() {
        let truth = [[1.0; NUM_TARGETS], [3.0; NUM_TARGETS]];
        let perfect = vec![vec![1.0; NUM_TARGETS], vec![3.0; NUM_TARGETS]];
        assert!((r2_score(&truth, &perfect) - 1.0).abs() < 1e-12);

        let mean = vec![vec![2.0; NUM_TARGETS], vec![2.0; NUM_TARGETS]];
        assert!(r2_score(&truth, &mean).abs() < 1e-12);
    }

    #[test]
    fn test_r2_constant_target() {
        let truth = [[4.0; NUM_TARGETS], [4.0; NUM_TARGETS]];
        assert!((r2_score(&truth, &[vec![4.0; NUM_TARGETS], vec![4.0; NUM_TARGETS]]) - 1.0).abs() < 1e-12);
        assert!(r2_score(&truth, &[vec![5.0; NUM_TARGETS], vec![4.0; NUM_TARGETS]]).abs() < 1e-12);
    }

    #[test]
    fn test_metrics_path() {
        assert_eq!(
            metrics_path_for(Path::new("models/rf_blade_model.json")),
            PathBuf::from("models/rf_blade_model.metrics.json")
        );
    }

    #[test]
    fn test_train_on_synthetic_data() {
        let dataset = synthetic::generate(80, 3);
        let params = TrainParams {
            n_estimators: 15,
            ..TrainParams::default()
        };
        let trained = train(&dataset, &params).unwrap();
        assert_eq!(trained.metrics.n_test, 16);
        assert_eq!(trained.metrics.n_train, 64);
        assert_eq!(trained.forest.trees.len(), 15);
        assert!(trained.metrics.train_r2 > 0.8);
        assert!(trained.metrics.train_r2 >= trained.metrics.test_r2);
    }

    #[test]
    fn test_train_from_csv_writes_loadable_artifact() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data.csv");
        let out = dir.path().join("models").join("rf.json");
        synthetic::generate(40, 1).write_csv(&data).unwrap();

        let params = TrainParams {
            n_estimators: 5,
            max_depth: Some(4),
            ..TrainParams::default()
        };
        let report = train_from_csv(&data, &out, &params).unwrap();

        let artifact = ModelArtifact::load(&report.model_path).unwrap();
        assert!(matches!(artifact.model, ModelKind::RandomForest(ref f) if f.trees.len() == 5));

        let metrics: TrainingMetrics =
            serde_json::from_str(&std::fs::read_to_string(&report.metrics_path).unwrap()).unwrap();
        assert_eq!(metrics.n_estimators, 5);
        assert_eq!(metrics.n_train + metrics.n_test, 40);
        assert!((metrics.test_r2 - report.metrics.test_r2).abs() < 1e-9);
    }

    #[test]
    fn test_train_from_missing_csv() {
        let dir = TempDir::new().unwrap();
        let err = train_from_csv(
            &dir.path().join("absent.csv"),
            &dir.path().join("out.json"),
            &TrainParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TrainingError::Io { .. }));
    }
}
