//! Request-scoped vectors flowing through the prediction pipeline.

use serde::{Deserialize, Serialize};

use super::schema::{FEATURE_NAMES, NUM_FEATURES, NUM_TARGETS, TARGET_NAMES};
use crate::error::PredictError;
use crate::validation::ranges;

// ============================================================================
// FeatureVector
// ============================================================================

/// Seven validated feature values in canonical order.
///
/// Only constructed through validation, so every value is finite and inside
/// its physical range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; NUM_FEATURES]);

impl FeatureVector {
    /// Wrap values that have already passed range validation.
    pub(crate) const fn from_validated(values: [f64; NUM_FEATURES]) -> Self {
        Self(values)
    }

    /// Build from raw numbers in canonical order, enforcing the same checks
    /// as the input normalizer (finite, in range, first violation wins).
    pub fn try_from_values(values: [f64; NUM_FEATURES]) -> Result<Self, PredictError> {
        for (name, &value) in FEATURE_NAMES.iter().zip(values.iter()) {
            ranges::check(name, value)?;
        }
        Ok(Self(values))
    }

    pub const fn values(&self) -> &[f64; NUM_FEATURES] {
        &self.0
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Value of a feature by name.
    pub fn get(&self, name: &str) -> Option<f64> {
        super::schema::feature_index(name).map(|i| self.0[i])
    }

    /// `(name, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }
}

// ============================================================================
// PredictionVector
// ============================================================================

/// Flat model output with at least [`NUM_TARGETS`] values.
///
/// Extra trailing values are kept but never mapped.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionVector(Vec<f64>);

impl PredictionVector {
    /// Accept a flat output vector, rejecting anything shorter than the
    /// canonical target count.
    pub fn new(values: Vec<f64>) -> Result<Self, PredictError> {
        if values.len() < NUM_TARGETS {
            return Err(PredictError::ModelOutputShape {
                expected: NUM_TARGETS,
                actual: values.len(),
            });
        }
        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// ResultRecord
// ============================================================================

/// Named prediction returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Tip deformation (mm)
    pub deformation: f64,
    /// Peak stress (MPa)
    pub stress: f64,
    /// Strain (dimensionless)
    pub strain: f64,
    /// Factor of safety against yield
    pub factor_of_safety: f64,
    /// Fatigue life (cycles)
    pub fatigue_life: f64,
    /// Accumulated damage index
    pub damage: f64,
}

impl ResultRecord {
    /// Values in canonical target order.
    pub const fn values(&self) -> [f64; NUM_TARGETS] {
        [
            self.deformation,
            self.stress,
            self.strain,
            self.factor_of_safety,
            self.fatigue_life,
            self.damage,
        ]
    }

    /// `(name, value)` pairs in canonical target order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        TARGET_NAMES.into_iter().zip(self.values())
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        super::schema::target_index(name).map(|i| self.values()[i])
    }
}
