//! Additive forest of decision trees.

use super::tree::{Tree, TreeValidationError};

/// Structural validation errors for [`Forest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForestValidationError {
    #[error("forest has no trees")]
    Empty,
    #[error("tree {tree_idx}: {error}")]
    InvalidTree {
        tree_idx: usize,
        error: TreeValidationError,
    },
    #[error("tree {tree_idx} splits on feature {feature} but the model has {n_features} features")]
    FeatureOutOfRange {
        tree_idx: usize,
        feature: u32,
        n_features: usize,
    },
}

/// Single-output forest: `margin = base_score + Σ tree(x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Forest {
    trees: Vec<Tree>,
    base_score: f64,
}

impl Forest {
    /// Create an empty forest with the given base score.
    pub fn new(base_score: f64) -> Self {
        Self {
            trees: Vec::new(),
            base_score,
        }
    }

    /// Builder-style tree addition.
    pub fn with_tree(mut self, tree: Tree) -> Self {
        self.trees.push(tree);
        self
    }

    /// Add a tree to the forest.
    pub fn push_tree(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    #[inline]
    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    #[inline]
    pub fn tree(&self, idx: usize) -> &Tree {
        &self.trees[idx]
    }

    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter()
    }

    /// Smallest feature count that covers every split.
    pub fn min_features(&self) -> usize {
        self.trees
            .iter()
            .filter_map(Tree::max_split_index)
            .max()
            .map_or(0, |max| max as usize + 1)
    }

    /// Validate every tree, and that all splits fit within `n_features`.
    pub fn validate(&self, n_features: usize) -> Result<(), ForestValidationError> {
        if self.trees.is_empty() {
            return Err(ForestValidationError::Empty);
        }

        for (tree_idx, tree) in self.trees.iter().enumerate() {
            tree.validate()
                .map_err(|error| ForestValidationError::InvalidTree { tree_idx, error })?;

            match tree.max_split_index() {
                Some(feature) if feature as usize >= n_features => {
                    return Err(ForestValidationError::FeatureOutOfRange {
                        tree_idx,
                        feature,
                        n_features,
                    });
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Raw additive score for one row.
    ///
    /// Callers must ensure `features` covers [`min_features`](Self::min_features).
    pub fn predict_margin(&self, features: &[f64]) -> f64 {
        self.trees
            .iter()
            .fold(self.base_score, |acc, tree| acc + tree.predict(features))
    }
}
