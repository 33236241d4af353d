//! Physical plausibility ranges for every input feature.
//!
//! Bounds are inclusive. The table is indexed in canonical feature order and
//! never mutated.

use serde::Serialize;

use crate::error::{ConfigurationError, PredictError};
use crate::types::schema::{feature_index, NUM_FEATURES};

/// Inclusive `[low, high]` bound for one feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValidationRange {
    pub low: f64,
    pub high: f64,
}

impl ValidationRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// Range table in canonical feature order.
pub const RANGES: [ValidationRange; NUM_FEATURES] = [
    // youngs_modulus (GPa)
    ValidationRange::new(1.0, 1e4),
    // density (kg/m^3)
    ValidationRange::new(1.0, 1e5),
    // poissons_ratio
    ValidationRange::new(0.0, 1.0),
    // thickness (mm)
    ValidationRange::new(1e-3, 1e3),
    // length (m)
    ValidationRange::new(1e-3, 1e4),
    // pressure (Pa)
    ValidationRange::new(0.0, 1e7),
    // frequency (Hz)
    ValidationRange::new(0.0, 1e6),
];

/// Range for a canonical feature name.
pub fn range_of(name: &str) -> Result<ValidationRange, ConfigurationError> {
    feature_index(name)
        .map(|i| RANGES[i])
        .ok_or_else(|| ConfigurationError(name.to_string()))
}

/// Check a parsed value: must be finite and inside the feature's range.
pub(crate) fn check(name: &str, value: f64) -> Result<(), PredictError> {
    let range = range_of(name)?;
    if !value.is_finite() {
        return Err(PredictError::InvalidNumber {
            name: name.to_string(),
            raw: value.to_string(),
        });
    }
    if !range.contains(value) {
        return Err(PredictError::OutOfRange {
            name: name.to_string(),
            value,
            low: range.low,
            high: range.high,
        });
    }
    Ok(())
}
