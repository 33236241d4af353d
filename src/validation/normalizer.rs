//! Raw payload → ordered, validated feature vector.

use crate::error::PredictError;
use crate::types::{FeatureVector, FEATURE_NAMES, NUM_FEATURES};

use super::ranges;
use super::raw_input::RawInput;

/// Validate `raw` and assemble the model's feature vector.
///
/// Fields are visited in canonical order and the first violation is
/// returned: missing key, then unparseable value, then out-of-range value.
/// Keys outside the schema are ignored.
pub fn normalize(raw: &RawInput) -> Result<FeatureVector, PredictError> {
    let mut values = [0.0_f64; NUM_FEATURES];

    for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
        let raw_value = raw
            .get(name)
            .ok_or_else(|| PredictError::MissingField(name.to_string()))?;

        let value = raw_value
            .as_finite()
            .ok_or_else(|| PredictError::InvalidNumber {
                name: name.to_string(),
                raw: raw_value.to_string(),
            })?;

        ranges::check(name, value)?;
        *slot = value;
    }

    Ok(FeatureVector::from_validated(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ranges::range_of;
    use crate::validation::RawValue;

    const BASELINE: [(&str, f64); NUM_FEATURES] = [
        ("youngs_modulus", 70.0),
        ("density", 2700.0),
        ("poissons_ratio", 0.33),
        ("thickness", 5.0),
        ("length", 1.0),
        ("pressure", 101_325.0),
        ("frequency", 300.0),
    ];

    fn baseline_input() -> RawInput {
        BASELINE.iter().map(|&(k, v)| (k, v)).collect()
    }

    /// Nudge that is large enough to survive float rounding at every bound.
    fn epsilon(bound: f64) -> f64 {
        (bound.abs() * 1e-6).max(1e-6)
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let fv = normalize(&baseline_input()).unwrap();
        let expected: Vec<f64> = BASELINE.iter().map(|&(_, v)| v).collect();
        assert_eq!(fv.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_string_values_accepted() {
        let input: RawInput = BASELINE
            .iter()
            .map(|&(k, v)| (k, RawValue::Text(format!(" {v} "))))
            .collect();
        let fv = normalize(&input).unwrap();
        assert_eq!(fv.get("pressure"), Some(101_325.0));
    }

    #[test]
    fn test_missing_each_field() {
        for name in FEATURE_NAMES {
            let mut input = baseline_input();
            input.remove(name);
            match normalize(&input) {
                Err(PredictError::MissingField(field)) => assert_eq!(field, name),
                other => panic!("expected MissingField({name}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_invalid_number_each_field() {
        for name in FEATURE_NAMES {
            let mut input = baseline_input();
            input.insert(name, "abc");
            match normalize(&input) {
                Err(PredictError::InvalidNumber { name: field, raw }) => {
                    assert_eq!(field, name);
                    assert_eq!(raw, "abc");
                }
                other => panic!("expected InvalidNumber({name}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_inclusive_bounds_for_every_feature() {
        for name in FEATURE_NAMES {
            let range = range_of(name).unwrap();
            for edge in [range.low, range.high] {
                let mut input = baseline_input();
                input.insert(name, edge);
                assert!(normalize(&input).is_ok(), "{name}={edge} should be accepted");
            }

            for outside in [range.low - epsilon(range.low), range.high + epsilon(range.high)] {
                let mut input = baseline_input();
                input.insert(name, outside);
                match normalize(&input) {
                    Err(PredictError::OutOfRange { name: field, low, high, .. }) => {
                        assert_eq!(field, name);
                        assert_eq!((low, high), (range.low, range.high));
                    }
                    other => panic!("expected OutOfRange for {name}={outside}, got {other:?}"),
                }
            }
        }
    }

    #[test]
    fn test_fails_fast_in_canonical_order() {
        let mut input = baseline_input();
        input.remove("frequency");
        input.insert("density", "abc");
        input.insert("youngs_modulus", 0.0);
        // youngs_modulus is first in canonical order, so its range error wins.
        assert!(matches!(
            normalize(&input),
            Err(PredictError::OutOfRange { ref name, .. }) if name == "youngs_modulus"
        ));
    }

    #[test]
    fn test_extra_keys_ignored() {
        let mut input = baseline_input();
        input.insert("notes", "blade A");
        assert!(normalize(&input).is_ok());
    }

    #[test]
    fn test_empty_payload_reports_first_feature() {
        assert!(matches!(
            normalize(&RawInput::new()),
            Err(PredictError::MissingField(ref name)) if name == "youngs_modulus"
        ));
    }
}
