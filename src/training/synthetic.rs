//! Synthetic blade dataset.
//!
//! Features are drawn uniformly from plausible design ranges; targets are
//! scaled from a reference blade with simple beam-style relations.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Dataset;
use crate::types::{NUM_FEATURES, NUM_TARGETS};

pub const DEFAULT_SAMPLES: usize = 150;
pub const DEFAULT_SEED: u64 = 42;

/// Reference blade the targets are scaled from.
mod baseline {
    pub const YOUNGS_MODULUS: f64 = 70.0; // GPa
    pub const THICKNESS: f64 = 5.0; // mm
    pub const LENGTH: f64 = 1.0; // m
    pub const PRESSURE: f64 = 101_325.0; // Pa

    pub const DEFORMATION: f64 = 0.046_712; // mm
    pub const STRESS: f64 = 1.385; // MPa
    pub const STRAIN: f64 = 7.737_32e-6;
    pub const FACTOR_OF_SAFETY: f64 = 15.0;
    pub const FATIGUE_LIFE: f64 = 1e6; // cycles
    pub const DAMAGE: f64 = 1000.0;
}

/// Half-open sampling interval per feature, canonical order.
pub const SAMPLING_RANGES: [(f64, f64); NUM_FEATURES] = [
    (50.0, 90.0),
    (2500.0, 3000.0),
    (0.3, 0.35),
    (3.0, 7.0),
    (0.8, 1.2),
    (80_000.0, 120_000.0),
    (200.0, 400.0),
];

/// Targets for one feature row, canonical order.
pub fn derive_targets(features: &[f64; NUM_FEATURES]) -> [f64; NUM_TARGETS] {
    let [youngs_modulus, _density, _poissons_ratio, thickness, length, pressure, _frequency] =
        *features;

    let deformation = baseline::DEFORMATION
        * (baseline::YOUNGS_MODULUS / youngs_modulus)
        * (length / baseline::LENGTH).powi(2)
        * (pressure / baseline::PRESSURE);
    let stress =
        baseline::STRESS * (pressure / baseline::PRESSURE) * (baseline::THICKNESS / thickness);
    let strain = baseline::STRAIN
        * (stress / baseline::STRESS)
        * (baseline::YOUNGS_MODULUS / youngs_modulus);
    let factor_of_safety = baseline::FACTOR_OF_SAFETY * (baseline::STRESS / stress);
    let fatigue_life = baseline::FATIGUE_LIFE * (baseline::STRESS / stress).powi(2);
    let damage = baseline::DAMAGE * (baseline::FATIGUE_LIFE / fatigue_life);

    [
        deformation,
        stress,
        strain,
        factor_of_safety,
        fatigue_life,
        damage,
    ]
}

/// Draw `n_samples` rows. The same seed always yields the same dataset.
pub fn generate(n_samples: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut dataset = Dataset::new();
    for _ in 0..n_samples {
        let mut features = [0.0; NUM_FEATURES];
        for (slot, (low, high)) in features.iter_mut().zip(SAMPLING_RANGES) {
            *slot = rng.gen_range(low..high);
        }
        dataset.push(features, derive_targets(&features));
    }
    dataset
}
