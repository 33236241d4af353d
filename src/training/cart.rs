//! Multi-output CART regression trees and bootstrap-aggregated forests.
//!
//! Splits are chosen exact-greedily: every feature, every midpoint between
//! consecutive distinct sorted values, scored by the total squared error of
//! all targets in the two children. Leaves hold the per-target mean.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::model::{RandomForest, RegressionTree, TreeNode};
use crate::types::{NUM_FEATURES, NUM_TARGETS};

use super::{Dataset, TrainingError};

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    /// `None` grows until leaves are pure or too small to split
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub tree: TreeParams,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            tree: TreeParams::default(),
            seed: 42,
        }
    }
}

/// Best split found for a node
#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
    /// Summed child SSE
    cost: f64,
}

/// Running per-target sums for SSE = Σy² - (Σy)²/n
#[derive(Debug, Clone, Copy)]
struct Moments {
    n: usize,
    sum: [f64; NUM_TARGETS],
    sum_sq: [f64; NUM_TARGETS],
}

impl Moments {
    const fn empty() -> Self {
        Self {
            n: 0,
            sum: [0.0; NUM_TARGETS],
            sum_sq: [0.0; NUM_TARGETS],
        }
    }

    fn add(&mut self, y: &[f64; NUM_TARGETS]) {
        self.n += 1;
        for k in 0..NUM_TARGETS {
            self.sum[k] += y[k];
            self.sum_sq[k] += y[k] * y[k];
        }
    }

    fn remove(&mut self, y: &[f64; NUM_TARGETS]) {
        self.n -= 1;
        for k in 0..NUM_TARGETS {
            self.sum[k] -= y[k];
            self.sum_sq[k] -= y[k] * y[k];
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn sse(&self) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        let n = self.n as f64;
        (0..NUM_TARGETS)
            .map(|k| (self.sum_sq[k] - self.sum[k] * self.sum[k] / n).max(0.0))
            .sum()
    }
}

struct TreeBuilder<'a> {
    x: &'a [[f64; NUM_FEATURES]],
    y: &'a [[f64; NUM_TARGETS]],
    params: TreeParams,
    nodes: Vec<TreeNode>,
}

impl<'a> TreeBuilder<'a> {
    fn new(x: &'a [[f64; NUM_FEATURES]], y: &'a [[f64; NUM_TARGETS]], params: TreeParams) -> Self {
        Self {
            x,
            y,
            params,
            nodes: Vec::new(),
        }
    }

    /// Grow the subtree for `rows`; returns its root index.
    ///
    /// The node is pushed before its children, so child indices are always
    /// greater than the parent's.
    fn grow(&mut self, rows: &mut [usize], depth: usize) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(self.leaf(rows));

        let depth_ok = self.params.max_depth.map_or(true, |max| depth < max);
        if !depth_ok || rows.len() < self.params.min_samples_split.max(2) {
            return idx;
        }

        let Some(split) = self.best_split(rows) else {
            return idx;
        };

        let (left_rows, right_rows) = partition(rows, |r| self.x[r][split.feature] <= split.threshold);
        let left = self.grow(left_rows, depth + 1);
        let right = self.grow(right_rows, depth + 1);

        self.nodes[idx] = TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        idx
    }

    #[allow(clippy::cast_precision_loss)]
    fn leaf(&self, rows: &[usize]) -> TreeNode {
        let mut values = vec![0.0; NUM_TARGETS];
        for &r in rows {
            for (acc, v) in values.iter_mut().zip(&self.y[r]) {
                *acc += v;
            }
        }
        let n = rows.len().max(1) as f64;
        for v in &mut values {
            *v /= n;
        }
        TreeNode::Leaf { values }
    }

    fn best_split(&self, rows: &[usize]) -> Option<Split> {
        let mut total = Moments::empty();
        for &r in rows {
            total.add(&self.y[r]);
        }
        let parent_cost = total.sse();
        if parent_cost <= 0.0 {
            return None;
        }

        let min_leaf = self.params.min_samples_leaf.max(1);
        let mut best: Option<Split> = None;
        let mut sorted = rows.to_vec();

        for feature in 0..NUM_FEATURES {
            sorted.sort_by(|&a, &b| self.x[a][feature].total_cmp(&self.x[b][feature]));

            let mut left = Moments::empty();
            let mut right = total;
            for i in 0..sorted.len() - 1 {
                let row = sorted[i];
                left.add(&self.y[row]);
                right.remove(&self.y[row]);

                let here = self.x[row][feature];
                let next = self.x[sorted[i + 1]][feature];
                if here >= next || left.n < min_leaf || right.n < min_leaf {
                    continue;
                }

                let cost = left.sse() + right.sse();
                if best.map_or(true, |b| cost < b.cost) {
                    let mut threshold = here + (next - here) / 2.0;
                    // Midpoint can round up to `next` for adjacent floats.
                    if threshold >= next {
                        threshold = here;
                    }
                    best = Some(Split {
                        feature,
                        threshold,
                        cost,
                    });
                }
            }
        }

        best.filter(|b| b.cost < parent_cost)
    }
}

/// Stable partition of `rows` into (`pred` true, `pred` false).
fn partition(rows: &mut [usize], pred: impl Fn(usize) -> bool) -> (&mut [usize], &mut [usize]) {
    let (mut yes, no): (Vec<usize>, Vec<usize>) = rows.iter().copied().partition(|&r| pred(r));
    let split_at = yes.len();
    yes.extend(no);
    rows.copy_from_slice(&yes);
    rows.split_at_mut(split_at)
}

/// Fit one tree on the given rows (duplicates allowed, as in a bootstrap).
pub fn fit_tree(dataset: &Dataset, rows: &[usize], params: TreeParams) -> RegressionTree {
    let mut builder = TreeBuilder::new(&dataset.features, &dataset.targets, params);
    let mut rows = rows.to_vec();
    builder.grow(&mut rows, 0);
    RegressionTree::new(builder.nodes)
}

/// Fit a bagged forest. Trees are grown in parallel; each tree's bootstrap
/// sample comes from a seed drawn up front, so the result depends only on
/// `params.seed`.
pub fn fit_forest(dataset: &Dataset, params: &ForestParams) -> Result<RandomForest, TrainingError> {
    if dataset.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }
    if params.n_estimators == 0 {
        return Err(TrainingError::InvalidParams(
            "n_estimators must be at least 1".to_string(),
        ));
    }
    if params.tree.max_depth == Some(0) {
        return Err(TrainingError::InvalidParams(
            "max_depth must be at least 1".to_string(),
        ));
    }

    let mut master = StdRng::seed_from_u64(params.seed);
    let tree_seeds: Vec<u64> = (0..params.n_estimators).map(|_| master.gen()).collect();
    let n = dataset.len();

    let trees: Vec<RegressionTree> = tree_seeds
        .into_par_iter()
        .map(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let rows: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            fit_tree(dataset, &rows, params.tree)
        })
        .collect();

    Ok(RandomForest::new(NUM_TARGETS, trees))
}
