//! Pipeline Regression Tests
//!
//! Service-level contracts of normalize → predict → map, without HTTP.

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use blade_predictor::error::PredictError;
use blade_predictor::model::{
    LinearModel, ModelAdapter, ModelArtifact, ModelKind, ModelOutput, Predictor,
};
use blade_predictor::pipeline::PredictionService;
use blade_predictor::types::{FeatureVector, FEATURE_NAMES, NUM_FEATURES};
use blade_predictor::validation::{normalize, RawInput, RawValue};

fn all_ones() -> RawInput {
    FEATURE_NAMES.iter().map(|&n| (n, 1.0)).collect()
}

fn write_linear(path: &Path, outputs: usize) {
    let weights = (1..=outputs)
        .map(|k| vec![k as f64 * 0.001; NUM_FEATURES])
        .collect();
    let intercepts = (1..=outputs).map(|k| k as f64 * 0.1).collect();
    ModelArtifact::new(ModelKind::Linear(LinearModel::new(weights, intercepts)))
        .save(path)
        .unwrap();
}

/// Returns the feature vector verbatim as a one-row matrix, padded.
struct EchoModel;

impl Predictor for EchoModel {
    fn predict(&self, features: &FeatureVector) -> ModelOutput {
        ModelOutput::Rows(vec![features.as_slice().to_vec()])
    }

    fn kind(&self) -> &'static str {
        "echo"
    }
}

#[test]
fn test_all_ones_maps_targets_in_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.json");
    write_linear(&path, 6);
    let service = PredictionService::new(Arc::new(ModelAdapter::new()), &path);

    let record = service.predict(&all_ones()).unwrap();
    let expected = [0.107, 0.214, 0.321, 0.428, 0.535, 0.642];
    for ((name, got), want) in record.iter().zip(expected) {
        assert!((got - want).abs() < 1e-12, "{name}: got {got}, want {want}");
    }
}

#[test]
fn test_feature_order_reaches_model_unchanged() {
    let adapter = Arc::new(ModelAdapter::new());
    let path = Path::new("/virtual/echo.json");
    adapter.install(path, Arc::new(EchoModel));
    let service = PredictionService::new(Arc::clone(&adapter), path);

    // Keys supplied in reverse order; each value is distinct.
    let tagged = [11.0, 22.0, 0.33, 44.0, 55.0, 66.0, 77.0];
    let input: RawInput = FEATURE_NAMES
        .iter()
        .zip(tagged)
        .rev()
        .map(|(&n, v)| (n, v))
        .collect();

    let record = service.predict(&input).unwrap();
    assert_eq!(record.values().as_slice(), &tagged[..6]);
}

#[test]
fn test_missing_artifact_then_fixed_without_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.json");
    let service = PredictionService::new(Arc::new(ModelAdapter::new()), &path);

    assert!(matches!(
        service.predict(&all_ones()),
        Err(PredictError::ModelNotFound(_))
    ));
    assert!(!service.health().model_loaded);

    // Failed loads are not cached.
    write_linear(&path, 6);
    assert!(service.predict(&all_ones()).is_ok());
    assert!(service.health().model_loaded);
}

#[test]
fn test_corrupt_artifacts_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.json");
    let service = PredictionService::new(Arc::new(ModelAdapter::new()), &path);

    std::fs::write(&path, b"\x00\x01 not json").unwrap();
    assert!(matches!(
        service.predict(&all_ones()),
        Err(PredictError::ModelCorrupt { .. })
    ));

    // Valid JSON trained on a different column order.
    let mut artifact = ModelArtifact::new(ModelKind::Linear(LinearModel::new(
        vec![vec![0.0; NUM_FEATURES]; 6],
        vec![0.0; 6],
    )));
    artifact.feature_names.swap(0, 1);
    std::fs::write(&path, serde_json::to_vec(&artifact).unwrap()).unwrap();
    assert!(matches!(
        service.predict(&all_ones()),
        Err(PredictError::ModelCorrupt { .. })
    ));
}

#[test]
fn test_normalizer_boundaries() {
    let mut input = all_ones();
    input.insert("poissons_ratio", 0.0);
    input.insert("pressure", 1e7);
    assert!(normalize(&input).is_ok());

    input.insert("pressure", 1e7 + 1.0);
    match normalize(&input) {
        Err(PredictError::OutOfRange { name, high, .. }) => {
            assert_eq!(name, "pressure");
            assert!((high - 1e7).abs() < f64::EPSILON);
        }
        other => panic!("expected out of range, got {other:?}"),
    }

    input.insert("pressure", RawValue::from("1e5"));
    assert!(normalize(&input).is_ok());
}

#[test]
fn test_concurrent_predictions_share_one_model() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.json");
    write_linear(&path, 6);
    let service = Arc::new(PredictionService::new(Arc::new(ModelAdapter::new()), &path));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || service.predict(&all_ones()).unwrap())
        })
        .collect();

    let records: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(records.windows(2).all(|w| w[0] == w[1]));
    assert!(service.adapter().is_loaded());
}
