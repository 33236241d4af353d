//! CSV dataset of blade samples.
//!
//! The first non-comment line is a header. Columns are located by name,
//! so extra columns and any column order are accepted; every canonical
//! feature and target must be present. Writing always emits features then
//! targets in canonical order.

use std::fmt::Write as _;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::TrainingError;
use crate::types::{FEATURE_NAMES, NUM_FEATURES, NUM_TARGETS, TARGET_NAMES};

/// One row per sample, columns in canonical order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub features: Vec<[f64; NUM_FEATURES]>,
    pub targets: Vec<[f64; NUM_TARGETS]>,
}

impl Dataset {
    pub const fn new() -> Self {
        Self {
            features: Vec::new(),
            targets: Vec::new(),
        }
    }

    pub fn push(&mut self, features: [f64; NUM_FEATURES], targets: [f64; NUM_TARGETS]) {
        self.features.push(features);
        self.targets.push(targets);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Load a dataset from a CSV file.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, TrainingError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| TrainingError::io(path, e))?;
        Self::parse(&content)
    }

    /// Parse CSV text. Blank lines and lines starting with `#` are skipped.
    pub fn parse(content: &str) -> Result<Self, TrainingError> {
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        let (_, header) = lines.next().ok_or(TrainingError::EmptyDataset)?;
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();

        let locate = |name: &str| {
            columns
                .iter()
                .position(|c| *c == name)
                .ok_or_else(|| TrainingError::MissingColumn(name.to_string()))
        };
        let mut feature_cols = [0usize; NUM_FEATURES];
        for (slot, name) in feature_cols.iter_mut().zip(FEATURE_NAMES) {
            *slot = locate(name)?;
        }
        let mut target_cols = [0usize; NUM_TARGETS];
        for (slot, name) in target_cols.iter_mut().zip(TARGET_NAMES) {
            *slot = locate(name)?;
        }

        let mut dataset = Self::new();
        for (line_no, line) in lines {
            let cells: Vec<&str> = line.split(',').map(str::trim).collect();
            if cells.len() != columns.len() {
                return Err(TrainingError::RowWidth {
                    line: line_no,
                    expected: columns.len(),
                    found: cells.len(),
                });
            }

            let cell = |col: usize| -> Result<f64, TrainingError> {
                let raw = cells[col];
                let parse_error = |message: String| TrainingError::Parse {
                    line: line_no,
                    column: columns[col].to_string(),
                    message,
                };
                let value: f64 = raw
                    .parse()
                    .map_err(|_| parse_error(format!("invalid number '{raw}'")))?;
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(parse_error(format!("non-finite value '{raw}'")))
                }
            };

            let mut features = [0.0; NUM_FEATURES];
            for (slot, &col) in features.iter_mut().zip(&feature_cols) {
                *slot = cell(col)?;
            }
            let mut targets = [0.0; NUM_TARGETS];
            for (slot, &col) in targets.iter_mut().zip(&target_cols) {
                *slot = cell(col)?;
            }
            dataset.push(features, targets);
        }

        if dataset.is_empty() {
            return Err(TrainingError::EmptyDataset);
        }
        Ok(dataset)
    }

    /// Render as CSV with a canonical header.
    pub fn to_csv(&self) -> String {
        let mut out = FEATURE_NAMES
            .iter()
            .chain(TARGET_NAMES.iter())
            .copied()
            .collect::<Vec<_>>()
            .join(",");
        out.push('\n');

        for (features, targets) in self.features.iter().zip(&self.targets) {
            let row = features
                .iter()
                .chain(targets.iter())
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            let _ = writeln!(out, "{row}");
        }
        out
    }

    /// Write CSV to `path`, creating parent directories.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), TrainingError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| TrainingError::io(parent, e))?;
        }
        std::fs::write(path, self.to_csv()).map_err(|e| TrainingError::io(path, e))
    }

    /// Seeded shuffle, then split off `ceil(test_size * n)` rows for testing.
    ///
    /// At least one row always stays in the training half.
    pub fn split(&self, test_size: f64, seed: u64) -> Result<(Self, Self), TrainingError> {
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(TrainingError::InvalidParams(format!(
                "test_size must be in (0, 1), got {test_size}"
            )));
        }
        let n = self.len();
        if n < 2 {
            return Err(TrainingError::InvalidParams(format!(
                "need at least 2 samples to split, got {n}"
            )));
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut StdRng::seed_from_u64(seed));

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let n_test = ((test_size * n as f64).ceil() as usize).clamp(1, n - 1);

        let (test_idx, train_idx) = order.split_at(n_test);
        Ok((self.select(train_idx), self.select(test_idx)))
    }

    fn select(&self, indices: &[usize]) -> Self {
        Self {
            features: indices.iter().map(|&i| self.features[i]).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }
}
