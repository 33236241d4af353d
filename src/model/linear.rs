//! Multi-output affine model: `out[i] = intercepts[i] + Σ_j weights[i][j] · x[j]`.

use serde::{Deserialize, Serialize};

use super::{ModelOutput, Predictor};
use crate::types::{FeatureVector, NUM_FEATURES};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// One row of `NUM_FEATURES` coefficients per output.
    pub weights: Vec<Vec<f64>>,
    /// One bias per output.
    pub intercepts: Vec<f64>,
}

impl LinearModel {
    pub const fn new(weights: Vec<Vec<f64>>, intercepts: Vec<f64>) -> Self {
        Self { weights, intercepts }
    }

    pub fn n_outputs(&self) -> usize {
        self.intercepts.len()
    }

    /// Structural consistency check run at load time.
    pub fn validate(&self) -> Result<(), String> {
        if self.weights.len() != self.intercepts.len() {
            return Err(format!(
                "linear model has {} weight rows but {} intercepts",
                self.weights.len(),
                self.intercepts.len()
            ));
        }
        for (i, row) in self.weights.iter().enumerate() {
            if row.len() != NUM_FEATURES {
                return Err(format!(
                    "linear model weight row {i} has {} coefficients, expected {NUM_FEATURES}",
                    row.len()
                ));
            }
        }
        let all_finite = self
            .weights
            .iter()
            .flatten()
            .chain(self.intercepts.iter())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err("linear model contains non-finite coefficients".to_string());
        }
        Ok(())
    }
}

impl Predictor for LinearModel {
    fn predict(&self, features: &FeatureVector) -> ModelOutput {
        let x = features.values();
        let out = self
            .weights
            .iter()
            .zip(&self.intercepts)
            .map(|(row, bias)| bias + row.iter().zip(x).map(|(w, v)| w * v).sum::<f64>())
            .collect();
        ModelOutput::Flat(out)
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}
