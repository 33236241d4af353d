//! Transport-neutral request payload.
//!
//! Form bodies and JSON objects are both adapted into a [`RawInput`] before
//! the normalizer sees them, so validation never depends on the encoding.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single untrusted scalar value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Parse as a finite float. Text is trimmed first.
    pub fn as_finite(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Mapping from field name to raw value; unknown keys are carried and ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInput(HashMap<String, RawValue>);

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<RawValue> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adapt a decoded JSON object.
    ///
    /// Non-numeric values (`null`, booleans, arrays, objects) are kept as
    /// text so they fail later as invalid numbers rather than disappearing.
    pub fn from_json_object(object: serde_json::Map<String, Value>) -> Self {
        let mut input = Self::new();
        for (key, value) in object {
            match value {
                Value::Number(n) => match n.as_f64() {
                    Some(f) => input.insert(key, f),
                    None => input.insert(key, n.to_string()),
                },
                Value::String(s) => input.insert(key, s),
                other => input.insert(key, other.to_string()),
            }
        }
        input
    }

    /// Adapt decoded form pairs.
    ///
    /// Blank fields count as absent; for repeated keys the first one wins.
    pub fn from_form_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map = HashMap::new();
        for (key, value) in pairs {
            if value.trim().is_empty() {
                continue;
            }
            map.entry(key).or_insert(RawValue::Text(value));
        }
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for RawInput
where
    K: Into<String>,
    V: Into<RawValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut input = Self::new();
        for (k, v) in iter {
            input.insert(k, v);
        }
        input
    }
}
