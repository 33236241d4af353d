//! Canonical feature and target ordering.
//!
//! The serving order of the feature vector must match the column order the
//! model was trained on. Every component (range table, normalizer, model
//! artifacts, result mapper, dataset I/O) indexes through these constants.

/// Number of model input features.
pub const NUM_FEATURES: usize = 7;

/// Number of model output targets.
pub const NUM_TARGETS: usize = 6;

/// Input feature names in training column order.
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "youngs_modulus",
    "density",
    "poissons_ratio",
    "thickness",
    "length",
    "pressure",
    "frequency",
];

/// Output target names in model output order.
pub const TARGET_NAMES: [&str; NUM_TARGETS] = [
    "deformation",
    "stress",
    "strain",
    "factor_of_safety",
    "fatigue_life",
    "damage",
];

/// Position of a feature in the canonical order.
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_NAMES.iter().position(|f| *f == name)
}

/// Position of a target in the canonical order.
pub fn target_index(name: &str) -> Option<usize> {
    TARGET_NAMES.iter().position(|t| *t == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_feature_order_is_fixed() {
        assert_eq!(FEATURE_NAMES[0], "youngs_modulus");
        assert_eq!(FEATURE_NAMES[2], "poissons_ratio");
        assert_eq!(FEATURE_NAMES[6], "frequency");
        assert_eq!(feature_index("pressure"), Some(5));
        assert_eq!(feature_index("deformation"), None);
    }

    #[test]
    fn test_target_order_is_fixed() {
        assert_eq!(TARGET_NAMES[0], "deformation");
        assert_eq!(TARGET_NAMES[3], "factor_of_safety");
        assert_eq!(TARGET_NAMES[5], "damage");
        assert_eq!(target_index("fatigue_life"), Some(4));
    }

    #[test]
    fn test_names_are_unique_and_disjoint() {
        let features: HashSet<_> = FEATURE_NAMES.iter().collect();
        let targets: HashSet<_> = TARGET_NAMES.iter().collect();
        assert_eq!(features.len(), NUM_FEATURES);
        assert_eq!(targets.len(), NUM_TARGETS);
        assert!(features.is_disjoint(&targets));
    }
}
