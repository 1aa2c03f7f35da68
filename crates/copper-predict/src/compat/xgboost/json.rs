//! XGBoost JSON model loader.
//!
//! Parses the XGBoost >= 1.0 JSON format. These are "foreign types" used only
//! for parsing; see `convert` for the mapping onto native types.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serde_with::{DisplayFromStr, serde_as};

// =============================================================================
// Custom deserializers for XGBoost-specific formats
// =============================================================================

/// `base_score` appears as a number, a string, a one-element array, or a
/// bracketed string such as `"[5E-1]"` depending on the XGBoost version.
fn deserialize_base_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as SerdeError;

    let mut cur = Value::deserialize(deserializer)?;
    loop {
        cur = match cur {
            Value::Number(n) => {
                return n.as_f64().ok_or_else(|| SerdeError::custom("invalid number"));
            }
            Value::String(s) => {
                let t = s.trim();
                if let Ok(f) = t.parse::<f64>() {
                    return Ok(f);
                }
                match serde_json::from_str::<Vec<Value>>(t) {
                    Ok(arr) => first_element::<D::Error>(arr)?,
                    Err(_) => {
                        let inner = t.strip_prefix('[').and_then(|t| t.strip_suffix(']'));
                        return inner.and_then(|i| i.trim().parse::<f64>().ok()).ok_or_else(
                            || SerdeError::custom(format!("cannot parse base_score from string: {s}")),
                        );
                    }
                }
            }
            Value::Array(arr) => first_element::<D::Error>(arr)?,
            _ => {
                return Err(SerdeError::custom(
                    "base_score must be number, string, or array",
                ));
            }
        };
    }
}

fn first_element<E: serde::de::Error>(arr: Vec<Value>) -> Result<Value, E> {
    arr.into_iter()
        .next()
        .ok_or_else(|| E::custom("empty base_score array"))
}

fn deserialize_bool_any<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as SerdeError;

    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Bool(b) => Ok(b),
        Value::Number(n) => n
            .as_f64()
            .map(|f| f != 0.0)
            .ok_or_else(|| SerdeError::custom("invalid number for bool")),
        Value::String(s) => {
            let t = s.trim();
            if t.eq_ignore_ascii_case("true") || t == "1" {
                Ok(true)
            } else if t.eq_ignore_ascii_case("false") || t == "0" {
                Ok(false)
            } else {
                Err(SerdeError::custom(format!("cannot parse bool from string: {s}")))
            }
        }
        _ => Err(SerdeError::custom("unsupported type for bool")),
    }
}

fn default_num_target() -> i64 {
    1
}
fn default_boost_from_average() -> bool {
    true
}

// =============================================================================
// Tree / model level definitions
// =============================================================================

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeParam {
    #[serde_as(as = "DisplayFromStr")]
    pub num_nodes: i64,
    #[serde_as(as = "DisplayFromStr")]
    pub num_feature: i64,
}

/// One tree in XGBoost's SoA layout. Leaves have `left_children == -1` and
/// store their value in `split_conditions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub tree_param: TreeParam,
    pub id: i32,
    pub left_children: Vec<i32>,
    pub right_children: Vec<i32>,
    pub split_indices: Vec<i32>,
    pub split_conditions: Vec<f32>,
    #[serde(default)]
    pub split_type: Vec<i32>,
    pub default_left: Vec<i32>,
    #[serde(default)]
    pub base_weights: Vec<f32>,
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GBTreeModelParam {
    #[serde_as(as = "DisplayFromStr")]
    pub num_trees: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelTrees {
    pub trees: Vec<Tree>,
    #[serde(default)]
    pub tree_info: Vec<i32>,
    pub gbtree_model_param: GBTreeModelParam,
}

impl ModelTrees {
    /// Number of trees in this model.
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }
}

// =============================================================================
// Gradient booster variants (gbtree | gblinear)
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbLinearModel {
    pub weights: Vec<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum GradientBooster {
    Gbtree { model: ModelTrees },
    Gblinear { model: GbLinearModel },
}

// =============================================================================
// Objective / learner-level definitions
// =============================================================================

/// Objectives this crate can score. Their parameters are training-only and
/// are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum Objective {
    #[serde(rename = "reg:squarederror")]
    RegSquaredError,
    #[serde(rename = "reg:linear")]
    RegLinear,
    #[serde(rename = "reg:absoluteerror")]
    RegAbsoluteError,
    #[serde(rename = "reg:pseudohubererror")]
    RegPseudohuberError,
    #[serde(rename = "reg:logistic")]
    RegLogistic,
    #[serde(rename = "binary:logistic")]
    BinaryLogistic,
    #[serde(rename = "binary:logitraw")]
    BinaryLogitRaw,
    #[serde(rename = "binary:hinge")]
    BinaryHinge,
}

impl Objective {
    /// Get the objective name as it appears in XGBoost JSON.
    pub fn name(&self) -> &'static str {
        match self {
            Objective::RegSquaredError => "reg:squarederror",
            Objective::RegLinear => "reg:linear",
            Objective::RegAbsoluteError => "reg:absoluteerror",
            Objective::RegPseudohuberError => "reg:pseudohubererror",
            Objective::RegLogistic => "reg:logistic",
            Objective::BinaryLogistic => "binary:logistic",
            Objective::BinaryLogitRaw => "binary:logitraw",
            Objective::BinaryHinge => "binary:hinge",
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerModelParam {
    #[serde(deserialize_with = "deserialize_base_score")]
    pub base_score: f64,
    #[serde(rename = "num_class")]
    #[serde_as(as = "DisplayFromStr")]
    pub n_class: i64,
    #[serde(rename = "num_feature")]
    #[serde_as(as = "DisplayFromStr")]
    pub n_features: i64,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_num_target")]
    pub num_target: i64,
    #[serde(deserialize_with = "deserialize_bool_any")]
    #[serde(default = "default_boost_from_average")]
    pub boost_from_average: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Learner {
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub gradient_booster: GradientBooster,
    pub objective: Objective,
    pub learner_model_param: LearnerModelParam,
}

// =============================================================================
// Top-level XGBoost model
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XgbModel {
    pub version: [u32; 3],
    pub learner: Learner,
}

impl XgbModel {
    /// Load a model from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Parse a model from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    /// Parse a model from a serde_json Value.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Returns true if this model uses the gblinear booster.
    pub fn is_linear(&self) -> bool {
        matches!(
            &self.learner.gradient_booster,
            GradientBooster::Gblinear { .. }
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
