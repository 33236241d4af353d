//! Multi-output random-forest regressor (inference side).
//!
//! Trees are stored as flat node arenas with the root at index 0 and every
//! child index greater than its parent's, so traversal always terminates.
//! Fitting lives in `training::cart`.

use serde::{Deserialize, Serialize};

use super::{ModelOutput, Predictor};
use crate::types::{FeatureVector, NUM_FEATURES};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// `x[feature] <= threshold` goes left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf { values: Vec<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    pub const fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    /// Leaf values reached by `x`. Call only on validated trees.
    pub fn predict(&self, x: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { values } => return values,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, TreeNode::Leaf { .. }))
            .count()
    }

    /// Longest root-to-leaf path, in edges.
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.nodes.len()];
        let mut max_depth = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split { left, right, .. } = node {
                let parent = depths[i];
                for child in [*left, *right] {
                    if let Some(d) = depths.get_mut(child) {
                        *d = parent + 1;
                        max_depth = max_depth.max(*d);
                    }
                }
            }
        }
        max_depth
    }

    fn validate(&self, n_outputs: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= NUM_FEATURES {
                        return Err(format!("node {i} splits on feature {feature}"));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {i} has a non-finite threshold"));
                    }
                    for child in [*left, *right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(format!("node {i} has invalid child index {child}"));
                        }
                    }
                }
                TreeNode::Leaf { values } => {
                    if values.len() != n_outputs {
                        return Err(format!(
                            "leaf {i} has {} values, expected {n_outputs}",
                            values.len()
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_outputs: usize,
    pub trees: Vec<RegressionTree>,
}

impl RandomForest {
    pub const fn new(n_outputs: usize, trees: Vec<RegressionTree>) -> Self {
        Self { n_outputs, trees }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_outputs)
                .map_err(|e| format!("tree {t}: {e}"))?;
        }
        Ok(())
    }

    /// Mean of the leaf values reached in every tree.
    pub fn predict_row(&self, x: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.n_outputs];
        for tree in &self.trees {
            for (acc, v) in out.iter_mut().zip(tree.predict(x)) {
                *acc += v;
            }
        }
        let n = self.trees.len().max(1) as f64;
        for v in &mut out {
            *v /= n;
        }
        out
    }
}

impl Predictor for RandomForest {
    fn predict(&self, features: &FeatureVector) -> ModelOutput {
        ModelOutput::Rows(vec![self.predict_row(features.as_slice())])
    }

    fn kind(&self) -> &'static str {
        "random_forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(threshold: f64, low: f64, high: f64) -> RegressionTree {
        RegressionTree::new(vec![
            TreeNode::Split {
                feature: 0,
                threshold,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { values: vec![low] },
            TreeNode::Leaf { values: vec![high] },
        ])
    }

    #[test]
    fn test_tree_traversal() {
        let tree = stump(50.0, 1.0, 2.0);
        assert_eq!(tree.predict(&[50.0; NUM_FEATURES]), &[1.0]);
        assert_eq!(tree.predict(&[50.1; NUM_FEATURES]), &[2.0]);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.n_leaves(), 2);
    }

    #[test]
    fn test_forest_averages_trees() {
        let forest = RandomForest::new(1, vec![stump(50.0, 1.0, 2.0), stump(60.0, 3.0, 4.0)]);
        assert!(forest.validate().is_ok());
        assert_eq!(forest.predict_row(&[55.0; NUM_FEATURES]), vec![2.5]);
    }

    #[test]
    fn test_validate_rejects_cycles_and_bad_leaves() {
        let cyclic = RegressionTree::new(vec![TreeNode::Split {
            feature: 0,
            threshold: 1.0,
            left: 0,
            right: 0,
        }]);
        assert!(RandomForest::new(1, vec![cyclic]).validate().is_err());

        let wrong_width = stump(1.0, 0.0, 0.0);
        assert!(RandomForest::new(2, vec![wrong_width]).validate().is_err());

        let bad_feature = RegressionTree::new(vec![
            TreeNode::Split {
                feature: NUM_FEATURES,
                threshold: 1.0,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { values: vec![0.0] },
            TreeNode::Leaf { values: vec![0.0] },
        ]);
        assert!(RandomForest::new(1, vec![bad_feature]).validate().is_err());
        assert!(RandomForest::new(1, Vec::new()).validate().is_err());
    }
}
