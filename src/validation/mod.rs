//! Request-time input validation
//!
//! - `raw_input`: transport-neutral payload (`RawInput`)
//! - `ranges`: inclusive physical plausibility bounds per feature
//! - `normalizer`: presence, parse and range checks producing a `FeatureVector`

mod normalizer;
pub mod ranges;
mod raw_input;

pub use normalizer::normalize;
pub use ranges::{range_of, ValidationRange, RANGES};
pub use raw_input::{RawInput, RawValue};
