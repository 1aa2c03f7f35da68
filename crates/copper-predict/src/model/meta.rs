//! Model metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a model was trained to predict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Continuous target (here: log selling price).
    #[default]
    Regression,
    /// Two classes (here: Won = 1, Lost = 0).
    BinaryClassification,
}

impl TaskKind {
    pub fn is_classification(&self) -> bool {
        matches!(self, Self::BinaryClassification)
    }

    pub fn is_regression(&self) -> bool {
        matches!(self, Self::Regression)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regression => "regression",
            Self::BinaryClassification => "binary_classification",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Introspection data carried alongside a booster.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelMeta {
    pub task: TaskKind,
    /// Length of the feature vector the model expects.
    #[serde(rename = "num_features")]
    pub n_features: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    /// Training objective, when known (e.g. `binary:logistic`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective_name: Option<String>,
}

impl ModelMeta {
    pub fn for_regression(n_features: usize) -> Self {
        Self {
            task: TaskKind::Regression,
            n_features,
            ..Default::default()
        }
    }

    pub fn for_binary_classification(n_features: usize) -> Self {
        Self {
            task: TaskKind::BinaryClassification,
            n_features,
            ..Default::default()
        }
    }

    pub fn with_feature_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.feature_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_objective(mut self, name: impl Into<String>) -> Self {
        self.objective_name = Some(name.into());
        self
    }
}
