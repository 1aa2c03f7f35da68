//! Schema types for model serialization.
//!
//! These types provide a stable serialization format independent of runtime
//! types, so the on-disk layout can evolve separately from [`ScoringModel`].
//!
//! [`ScoringModel`]: crate::model::ScoringModel

use serde::{Deserialize, Serialize};

use crate::model::{ModelMeta, OutputTransform};

/// Current native schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Top-level wrapper around every native model file.
///
/// `model` is kept as raw JSON until `schema_version` and `model_type` have
/// been checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEnvelope {
    pub schema_version: u32,
    pub model_type: String,
    pub model: serde_json::Value,
}

/// Tree schema (SoA layout).
///
/// A node is a leaf when `children_left` is 0; the root can never be a child.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSchema {
    /// Number of nodes (internal + leaves).
    pub num_nodes: u32,
    /// Split feature index for each node (ignored for leaves).
    pub split_indices: Vec<u32>,
    /// Split threshold for each node (ignored for leaves).
    pub thresholds: Vec<f64>,
    pub children_left: Vec<u32>,
    pub children_right: Vec<u32>,
    /// Default direction (true = left) for missing values.
    pub default_left: Vec<bool>,
    /// Leaf value for each node (ignored for internal nodes).
    pub leaf_values: Vec<f64>,
}

/// Forest schema (collection of trees).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestSchema {
    pub trees: Vec<TreeSchema>,
    #[serde(default)]
    pub base_score: f64,
}

/// Full GBDT model schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GBDTModelSchema {
    pub meta: ModelMeta,
    pub forest: ForestSchema,
    #[serde(default)]
    pub output_transform: OutputTransform,
}

impl GBDTModelSchema {
    /// Model type string.
    pub const MODEL_TYPE: &'static str = "gbdt";
}

/// Full GBLinear model schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GBLinearModelSchema {
    pub meta: ModelMeta,
    /// One weight per feature.
    pub weights: Vec<f64>,
    #[serde(default)]
    pub bias: f64,
    #[serde(default)]
    pub base_score: f64,
    #[serde(default)]
    pub output_transform: OutputTransform,
}

impl GBLinearModelSchema {
    /// Model type string.
    pub const MODEL_TYPE: &'static str = "gblinear";
}
