//! Model output vector → named result record.

use crate::types::{PredictionVector, ResultRecord};

/// Assign output indices 0..=5 to the canonical targets in order.
///
/// Total for any `PredictionVector` (length is checked on construction);
/// values past index 5 are ignored.
pub fn map_result(prediction: &PredictionVector) -> ResultRecord {
    let v = prediction.as_slice();
    ResultRecord {
        deformation: v[0],
        stress: v[1],
        strain: v[2],
        factor_of_safety: v[3],
        fatigue_life: v[4],
        damage: v[5],
    }
}
