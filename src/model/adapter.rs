//! Load-once model cache and the single `predict` entry point.
//!
//! The cached handle is shared, read-only process state. It is populated
//! lazily (or eagerly at startup) and kept until [`ModelAdapter::invalidate`]
//! is called. Once a model is cached, `load` returns it for any path; the
//! cache is keyed on nothing. Failed loads are never cached, so dropping a
//! valid artifact in place is picked up by the next request.
//!
//! Population is idempotent: two racing first loads may both read the
//! artifact, and the last store wins. Both handles are equivalent because
//! the artifact is immutable on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use super::{ModelArtifact, Predictor};
use crate::error::PredictError;
use crate::types::{FeatureVector, PredictionVector};

/// Deserializes an artifact at a path into a predictor.
pub trait ModelLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Arc<dyn Predictor>, PredictError>;
}

/// Default loader for the JSON artifact format.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArtifactLoader;

impl ModelLoader for ArtifactLoader {
    fn load(&self, path: &Path) -> Result<Arc<dyn Predictor>, PredictError> {
        ModelArtifact::load(path).map(ModelArtifact::into_predictor)
    }
}

/// A successfully loaded model and where it came from.
pub struct LoadedModel {
    path: PathBuf,
    predictor: Arc<dyn Predictor>,
    loaded_at: DateTime<Utc>,
}

impl LoadedModel {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn kind(&self) -> &'static str {
        self.predictor.kind()
    }
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("path", &self.path)
            .field("kind", &self.predictor.kind())
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

/// Shared reference to the cached model.
pub type ModelHandle = Arc<LoadedModel>;

pub struct ModelAdapter {
    loader: Box<dyn ModelLoader>,
    cache: ArcSwapOption<LoadedModel>,
}

impl Default for ModelAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelAdapter {
    /// Adapter reading JSON artifacts.
    pub fn new() -> Self {
        Self::with_loader(ArtifactLoader)
    }

    pub fn with_loader(loader: impl ModelLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            cache: ArcSwapOption::empty(),
        }
    }

    /// Return the cached model, loading it from `path` on first use.
    ///
    /// While a model is cached this never touches the filesystem, even if
    /// `path` differs from the one the cached model was loaded from.
    pub fn load(&self, path: &Path) -> Result<ModelHandle, PredictError> {
        if let Some(handle) = self.cache.load_full() {
            if handle.path != path {
                debug!(
                    cached = %handle.path.display(),
                    requested = %path.display(),
                    "Serving cached model loaded from a different path"
                );
            }
            return Ok(handle);
        }

        if !path.exists() {
            return Err(PredictError::ModelNotFound(path.to_path_buf()));
        }

        let predictor = self.loader.load(path)?;
        let handle = self.install(path, predictor);
        info!(path = %path.display(), kind = handle.kind(), "Loaded model");
        Ok(handle)
    }

    /// Cache an already constructed predictor as if it had been loaded from
    /// `path`. Replaces any cached model.
    pub fn install(&self, path: &Path, predictor: Arc<dyn Predictor>) -> ModelHandle {
        let handle = Arc::new(LoadedModel {
            path: path.to_path_buf(),
            predictor,
            loaded_at: Utc::now(),
        });
        self.cache.store(Some(Arc::clone(&handle)));
        handle
    }

    /// Cached model, if any, without attempting a load.
    pub fn cached(&self) -> Option<ModelHandle> {
        self.cache.load_full()
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.load().is_some()
    }

    /// Drop the cached model; the next `load` reads from disk again.
    pub fn invalidate(&self) -> Option<ModelHandle> {
        let previous = self.cache.swap(None);
        if let Some(ref handle) = previous {
            info!(path = %handle.path.display(), "Model cache invalidated");
        }
        previous
    }

    /// Run the model on one feature vector and normalize its output.
    ///
    /// Flat and single-row outputs are both accepted; fewer than six values
    /// is a `ModelOutputShape` error.
    pub fn predict(
        &self,
        handle: &ModelHandle,
        features: &FeatureVector,
    ) -> Result<PredictionVector, PredictError> {
        let output = handle.predictor.predict(features).into_flat();
        PredictionVector::new(output).inspect_err(|e| {
            error!(
                path = %handle.path.display(),
                kind = handle.kind(),
                error = %e,
                "Model output violates the target schema"
            );
        })
    }
}

impl std::fmt::Debug for ModelAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelAdapter")
            .field("cached", &self.cache.load_full())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LinearModel, ModelKind, ModelOutput};
    use crate::types::NUM_FEATURES;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// `out[i] = sum(x) * (i+1) * 0.001 + (i+1) * 0.1`, as a 2-D output.
    struct SumModel {
        outputs: usize,
    }

    impl Predictor for SumModel {
        fn predict(&self, features: &FeatureVector) -> ModelOutput {
            let s = features.sum();
            let row = (1..=self.outputs)
                .map(|k| s * k as f64 * 0.001 + k as f64 * 0.1)
                .collect();
            ModelOutput::Rows(vec![row])
        }

        fn kind(&self) -> &'static str {
            "sum"
        }
    }

    /// Loader that counts calls and always hands out a `SumModel`.
    struct CountingLoader(Arc<AtomicUsize>);

    impl ModelLoader for CountingLoader {
        fn load(&self, _path: &Path) -> Result<Arc<dyn Predictor>, PredictError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(SumModel { outputs: 6 }))
        }
    }

    fn ones() -> FeatureVector {
        FeatureVector::try_from_values([1.0; NUM_FEATURES]).unwrap()
    }

    fn write_linear(path: &Path, outputs: usize) {
        ModelArtifact::new(ModelKind::Linear(LinearModel::new(
            vec![vec![0.001; NUM_FEATURES]; outputs],
            vec![0.1; outputs],
        )))
        .save(path)
        .unwrap();
    }

    #[test]
    fn test_missing_artifact_is_not_found_and_not_cached() {
        let dir = TempDir::new().unwrap();
        let adapter = ModelAdapter::new();
        let path = dir.path().join("model.json");

        assert!(matches!(adapter.load(&path), Err(PredictError::ModelNotFound(_))));
        assert!(!adapter.is_loaded());

        write_linear(&path, 6);
        assert!(adapter.load(&path).is_ok());
        assert!(adapter.is_loaded());
    }

    #[test]
    fn test_corrupt_artifact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{ not json").unwrap();
        let adapter = ModelAdapter::new();
        assert!(matches!(adapter.load(&path), Err(PredictError::ModelCorrupt { .. })));
        assert!(!adapter.is_loaded());
    }

    #[test]
    fn test_cached_handle_survives_path_change() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first.json");
        write_linear(&first, 6);
        let calls = Arc::new(AtomicUsize::new(0));
        let adapter = ModelAdapter::with_loader(CountingLoader(Arc::clone(&calls)));

        let a = adapter.load(&first).unwrap();
        let b = adapter.load(&dir.path().join("does-not-exist.json")).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b.path(), first.as_path());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        write_linear(&path, 6);
        let calls = Arc::new(AtomicUsize::new(0));
        let adapter = ModelAdapter::with_loader(CountingLoader(Arc::clone(&calls)));

        let a = adapter.load(&path).unwrap();
        assert!(adapter.invalidate().is_some());
        assert!(!adapter.is_loaded());
        let b = adapter.load(&path).unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_predict_flattens_rows() {
        let adapter = ModelAdapter::new();
        let handle = adapter.install(Path::new("stub"), Arc::new(SumModel { outputs: 6 }));
        let out = adapter.predict(&handle, &ones()).unwrap();
        assert_eq!(out.len(), 6);
        assert!((out.as_slice()[0] - 0.107).abs() < 1e-12);
        assert!((out.as_slice()[5] - 0.642).abs() < 1e-12);
    }

    #[test]
    fn test_predict_flat_output_from_artifact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        write_linear(&path, 6);
        let adapter = ModelAdapter::new();
        let handle = adapter.load(&path).unwrap();
        assert_eq!(handle.kind(), "linear");
        let out = adapter.predict(&handle, &ones()).unwrap();
        assert!((out.as_slice()[0] - 0.107).abs() < 1e-12);
    }

    #[test]
    fn test_short_output_is_shape_error() {
        let adapter = ModelAdapter::new();
        let handle = adapter.install(Path::new("stub"), Arc::new(SumModel { outputs: 3 }));
        assert!(matches!(
            adapter.predict(&handle, &ones()),
            Err(PredictError::ModelOutputShape { expected: 6, actual: 3 })
        ));
    }

    #[test]
    fn test_concurrent_predict_on_shared_handle() {
        let adapter = Arc::new(ModelAdapter::new());
        let handle = adapter.install(Path::new("stub"), Arc::new(SumModel { outputs: 6 }));

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let adapter = Arc::clone(&adapter);
                let handle = Arc::clone(&handle);
                std::thread::spawn(move || {
                    (0..100)
                        .map(|_| adapter.predict(&handle, &ones()).unwrap().as_slice()[1])
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for worker in workers {
            for v in worker.join().unwrap() {
                assert!((v - 0.214).abs() < 1e-12);
            }
        }
    }
}
