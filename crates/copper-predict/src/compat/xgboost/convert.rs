//! Conversion from XGBoost JSON types to a native [`ScoringModel`].

use ndarray::Array1;

use crate::model::{Booster, ModelMeta, ModelStructureError, OutputTransform, ScoringModel, TaskKind};
use crate::repr::gbdt::{Forest, ForestValidationError, Tree};
use crate::repr::gblinear::LinearModel;

use super::json::{GradientBooster, ModelTrees, Objective, Tree as XgbTree, XgbModel};

/// Error type for XGBoost model conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("XGBoost model version {}.{}.{} is older than 1.0", .0[0], .0[1], .0[2])]
    UnsupportedVersion([u32; 3]),
    #[error("multi-output models are not supported (num_class = {num_class}, num_target = {num_target})")]
    MultiOutput { num_class: i64, num_target: i64 },
    #[error("model declares {0} features")]
    InvalidFeatureCount(i64),
    #[error("tree {0} has no nodes")]
    EmptyTree(usize),
    #[error("tree {tree}: {array} has length {len}, expected {num_nodes}")]
    ArrayLength {
        tree: usize,
        array: &'static str,
        len: usize,
        num_nodes: usize,
    },
    #[error(
        "invalid node index in tree {tree}: node {node} references child {child} but tree has {num_nodes} nodes"
    )]
    InvalidNodeIndex {
        tree: usize,
        node: usize,
        child: i32,
        num_nodes: usize,
    },
    #[error("tree {tree}: node {node} splits on negative feature {feature}")]
    InvalidFeatureIndex { tree: usize, node: usize, feature: i32 },
    #[error("tree {tree}: node {node} is a categorical split, which is not supported")]
    CategoricalSplit { tree: usize, node: usize },
    #[error("gblinear weights length {actual} doesn't match num_features + 1 = {expected}")]
    InvalidLinearWeights { actual: usize, expected: usize },
    #[error(transparent)]
    Structure(#[from] ModelStructureError),
}

/// Convert base_score from probability space to margin space based on objective.
///
/// XGBoost stores base_score in probability/original space in JSON, but the
/// predictor works in margin space. This replicates XGBoost's `ProbToMargin`.
fn prob_to_margin(base_score: f64, objective: Objective) -> f64 {
    match objective {
        Objective::BinaryLogistic | Objective::RegLogistic => {
            let p = base_score.clamp(1e-7, 1.0 - 1e-7);
            (p / (1.0 - p)).ln()
        }
        _ => base_score,
    }
}

/// Task and output transform implied by an objective.
fn task_of(objective: Objective) -> (TaskKind, OutputTransform) {
    match objective {
        Objective::RegSquaredError
        | Objective::RegLinear
        | Objective::RegAbsoluteError
        | Objective::RegPseudohuberError => (TaskKind::Regression, OutputTransform::Identity),
        Objective::RegLogistic => (TaskKind::Regression, OutputTransform::Sigmoid),
        Objective::BinaryLogistic => (TaskKind::BinaryClassification, OutputTransform::Sigmoid),
        Objective::BinaryLogitRaw => (TaskKind::BinaryClassification, OutputTransform::Identity),
        Objective::BinaryHinge => (TaskKind::BinaryClassification, OutputTransform::Step),
    }
}

impl XgbModel {
    /// Convert to a validated [`ScoringModel`].
    pub fn to_scoring_model(&self) -> Result<ScoringModel, ConversionError> {
        if self.version[0] < 1 {
            return Err(ConversionError::UnsupportedVersion(self.version));
        }

        let param = &self.learner.learner_model_param;
        if param.n_class > 1 || param.num_target > 1 {
            return Err(ConversionError::MultiOutput {
                num_class: param.n_class,
                num_target: param.num_target,
            });
        }
        if param.n_features <= 0 {
            return Err(ConversionError::InvalidFeatureCount(param.n_features));
        }
        let n_features = param.n_features as usize;

        let objective = self.learner.objective;
        let base_score = prob_to_margin(param.base_score, objective);
        let (task, transform) = task_of(objective);

        let booster = match &self.learner.gradient_booster {
            GradientBooster::Gbtree { model } => Booster::Tree(convert_forest(model, base_score)?),
            GradientBooster::Gblinear { model } => {
                Booster::Linear(convert_linear(&model.weights, n_features, base_score)?)
            }
        };

        let mut meta = ModelMeta {
            task,
            n_features,
            feature_names: None,
            objective_name: Some(objective.name().to_string()),
        };
        if !self.learner.feature_names.is_empty() {
            meta.feature_names = Some(self.learner.feature_names.clone());
        }

        Ok(ScoringModel::new(booster, meta, transform)?)
    }
}

/// XGBoost stores gblinear weights as `[n_features + 1]` for a single output,
/// with the bias in the last slot.
fn convert_linear(
    weights: &[f32],
    n_features: usize,
    base_score: f64,
) -> Result<LinearModel, ConversionError> {
    let expected = n_features + 1;
    if weights.len() != expected {
        return Err(ConversionError::InvalidLinearWeights {
            actual: weights.len(),
            expected,
        });
    }
    let coefficients: Array1<f64> = weights[..n_features].iter().map(|&w| w as f64).collect();
    Ok(LinearModel::new(
        coefficients,
        weights[n_features] as f64,
        base_score,
    ))
}

fn convert_forest(model: &ModelTrees, base_score: f64) -> Result<Forest, ConversionError> {
    let mut forest = Forest::new(base_score);
    for (tree_idx, xgb_tree) in model.trees.iter().enumerate() {
        forest.push_tree(convert_tree(xgb_tree, tree_idx)?);
    }
    Ok(forest)
}

/// Convert a single XGBoost tree to a native [`Tree`].
fn convert_tree(xgb_tree: &XgbTree, tree_idx: usize) -> Result<Tree, ConversionError> {
    let num_nodes = xgb_tree.tree_param.num_nodes.max(0) as usize;
    if num_nodes == 0 {
        return Err(ConversionError::EmptyTree(tree_idx));
    }

    for (array, len) in [
        ("left_children", xgb_tree.left_children.len()),
        ("right_children", xgb_tree.right_children.len()),
        ("split_indices", xgb_tree.split_indices.len()),
        ("split_conditions", xgb_tree.split_conditions.len()),
        ("default_left", xgb_tree.default_left.len()),
    ] {
        if len != num_nodes {
            return Err(ConversionError::ArrayLength {
                tree: tree_idx,
                array,
                len,
                num_nodes,
            });
        }
    }

    let mut split_indices = vec![0u32; num_nodes];
    let mut thresholds = vec![0.0f32; num_nodes];
    let mut left_children = vec![0u32; num_nodes];
    let mut right_children = vec![0u32; num_nodes];
    let mut default_left = vec![false; num_nodes];
    let mut is_leaf = vec![false; num_nodes];
    let mut leaf_values = vec![0.0f64; num_nodes];

    for node in 0..num_nodes {
        let left = xgb_tree.left_children[node];
        let right = xgb_tree.right_children[node];

        // A node is a leaf if left_child == -1 (XGBoost convention)
        if left == -1 {
            is_leaf[node] = true;
            leaf_values[node] = xgb_tree.split_conditions[node] as f64;
            continue;
        }

        if xgb_tree.split_type.get(node).copied().unwrap_or(0) == 1 {
            return Err(ConversionError::CategoricalSplit { tree: tree_idx, node });
        }

        for child in [left, right] {
            if child < 0 || child as usize >= num_nodes {
                return Err(ConversionError::InvalidNodeIndex {
                    tree: tree_idx,
                    node,
                    child,
                    num_nodes,
                });
            }
        }

        let feature = xgb_tree.split_indices[node];
        if feature < 0 {
            return Err(ConversionError::InvalidFeatureIndex {
                tree: tree_idx,
                node,
                feature,
            });
        }

        split_indices[node] = feature as u32;
        thresholds[node] = xgb_tree.split_conditions[node];
        left_children[node] = left as u32;
        right_children[node] = right as u32;
        default_left[node] = xgb_tree.default_left[node] != 0;
    }

    Tree::new(
        split_indices,
        thresholds,
        left_children,
        right_children,
        default_left,
        is_leaf,
        leaf_values,
    )
    .map_err(|error| {
        ConversionError::Structure(ModelStructureError::Forest(
            ForestValidationError::InvalidTree { tree_idx, error },
        ))
    })
}
