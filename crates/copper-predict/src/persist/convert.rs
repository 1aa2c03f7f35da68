//! Conversions between runtime types and schema types.

use ndarray::Array1;

use crate::model::{Booster, ModelStructureError, ScoringModel};
use crate::repr::gbdt::{Forest, ForestValidationError, Tree, TreeValidationError};
use crate::repr::gblinear::LinearModel;

use super::error::ReadError;
use super::schema::{ForestSchema, GBDTModelSchema, GBLinearModelSchema, TreeSchema};

// =============================================================================
// Tree conversions
// =============================================================================

impl From<&Tree> for TreeSchema {
    fn from(tree: &Tree) -> Self {
        let n_nodes = tree.n_nodes();

        let mut split_indices = Vec::with_capacity(n_nodes);
        let mut thresholds = Vec::with_capacity(n_nodes);
        let mut children_left = Vec::with_capacity(n_nodes);
        let mut children_right = Vec::with_capacity(n_nodes);
        let mut default_left = Vec::with_capacity(n_nodes);
        let mut leaf_values = Vec::with_capacity(n_nodes);

        for node in 0..n_nodes as u32 {
            let leaf = tree.is_leaf(node);
            split_indices.push(if leaf { 0 } else { tree.split_index(node) });
            thresholds.push(if leaf { 0.0 } else { tree.split_threshold(node) as f64 });
            children_left.push(if leaf { 0 } else { tree.left_child(node) });
            children_right.push(if leaf { 0 } else { tree.right_child(node) });
            default_left.push(tree.default_left(node));
            leaf_values.push(if leaf { tree.leaf_value(node) } else { 0.0 });
        }

        TreeSchema {
            num_nodes: n_nodes as u32,
            split_indices,
            thresholds,
            children_left,
            children_right,
            default_left,
            leaf_values,
        }
    }
}

impl TryFrom<TreeSchema> for Tree {
    type Error = TreeValidationError;

    fn try_from(schema: TreeSchema) -> Result<Self, Self::Error> {
        if schema.children_left.len() != schema.num_nodes as usize {
            return Err(TreeValidationError::LengthMismatch {
                array: "children_left",
                len: schema.children_left.len(),
                n_nodes: schema.num_nodes as usize,
            });
        }

        // 0 is the "no child" sentinel
        let is_leaf: Vec<bool> = schema.children_left.iter().map(|&left| left == 0).collect();

        Tree::new(
            schema.split_indices,
            schema.thresholds.into_iter().map(|t| t as f32).collect(),
            schema.children_left,
            schema.children_right,
            schema.default_left,
            is_leaf,
            schema.leaf_values,
        )
    }
}

// =============================================================================
// Forest conversions
// =============================================================================

impl From<&Forest> for ForestSchema {
    fn from(forest: &Forest) -> Self {
        ForestSchema {
            trees: forest.trees().map(TreeSchema::from).collect(),
            base_score: forest.base_score(),
        }
    }
}

impl TryFrom<ForestSchema> for Forest {
    type Error = ForestValidationError;

    fn try_from(schema: ForestSchema) -> Result<Self, Self::Error> {
        let mut forest = Forest::new(schema.base_score);
        for (tree_idx, tree_schema) in schema.trees.into_iter().enumerate() {
            let tree = Tree::try_from(tree_schema)
                .map_err(|error| ForestValidationError::InvalidTree { tree_idx, error })?;
            forest.push_tree(tree);
        }
        Ok(forest)
    }
}

// =============================================================================
// Model conversions
// =============================================================================

impl TryFrom<GBDTModelSchema> for ScoringModel {
    type Error = ReadError;

    fn try_from(schema: GBDTModelSchema) -> Result<Self, Self::Error> {
        let forest = Forest::try_from(schema.forest).map_err(ModelStructureError::from)?;
        Ok(ScoringModel::new(
            Booster::Tree(forest),
            schema.meta,
            schema.output_transform,
        )?)
    }
}

impl TryFrom<GBLinearModelSchema> for ScoringModel {
    type Error = ReadError;

    fn try_from(schema: GBLinearModelSchema) -> Result<Self, Self::Error> {
        let linear = LinearModel::new(
            Array1::from(schema.weights),
            schema.bias,
            schema.base_score,
        );
        Ok(ScoringModel::new(
            Booster::Linear(linear),
            schema.meta,
            schema.output_transform,
        )?)
    }
}

/// Split a model into its type tag and serialized body.
pub(crate) fn model_to_parts(
    model: &ScoringModel,
) -> Result<(&'static str, serde_json::Value), serde_json::Error> {
    match model.booster() {
        Booster::Tree(forest) => {
            let schema = GBDTModelSchema {
                meta: model.meta().clone(),
                forest: ForestSchema::from(forest),
                output_transform: model.output_transform(),
            };
            Ok((GBDTModelSchema::MODEL_TYPE, serde_json::to_value(schema)?))
        }
        Booster::Linear(linear) => {
            let schema = GBLinearModelSchema {
                meta: model.meta().clone(),
                weights: linear.weights().to_vec(),
                bias: linear.bias(),
                base_score: linear.base_score(),
                output_transform: model.output_transform(),
            };
            Ok((GBLinearModelSchema::MODEL_TYPE, serde_json::to_value(schema)?))
        }
    }
}
