//! Model resources on disk.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compat::xgboost::{ConversionError, XgbModel};
use crate::model::{ScoringModel, TaskKind};
use crate::persist::{self, ReadError};

/// On-disk layout of a model resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ModelFormat {
    /// Decide from the document: a top-level `learner` key means XGBoost.
    #[default]
    Auto,
    /// The crate's own versioned schema (see [`persist`]).
    Native,
    /// XGBoost's JSON model format.
    Xgboost,
}

impl ModelFormat {
    /// Resolve `Auto` against a parsed document.
    pub fn detect(self, document: &serde_json::Value) -> ModelFormat {
        match self {
            ModelFormat::Auto if document.get("learner").is_some() => ModelFormat::Xgboost,
            ModelFormat::Auto => ModelFormat::Native,
            other => other,
        }
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModelFormat::Auto => "auto",
            ModelFormat::Native => "native",
            ModelFormat::Xgboost => "xgboost",
        })
    }
}

/// Failure obtaining a usable model from its resource.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("cannot open model {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("model {path}: {source}")]
    Native {
        path: PathBuf,
        #[source]
        source: ReadError,
    },
    #[error("model {path}: {source}")]
    Xgboost {
        path: PathBuf,
        #[source]
        source: ConversionError,
    },
    #[error("model {path} is a {actual} model, expected {expected}")]
    TaskMismatch {
        path: PathBuf,
        expected: TaskKind,
        actual: TaskKind,
    },
    #[error("model {path}: feature {index} is named {actual:?}, expected {expected:?}")]
    FeatureName {
        path: PathBuf,
        index: usize,
        expected: &'static str,
        actual: String,
    },
}

/// Where a model lives and how to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSource {
    path: PathBuf,
    format: ModelFormat,
}

impl ModelSource {
    pub fn new(path: impl Into<PathBuf>, format: ModelFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ModelFormat {
        self.format
    }

    /// Read, parse and validate the resource.
    pub fn load(&self) -> Result<ScoringModel, ModelLoadError> {
        let path = &self.path;
        let file = File::open(path).map_err(|source| ModelLoadError::Io {
            path: path.clone(),
            source,
        })?;
        let document: serde_json::Value =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| ModelLoadError::Json {
                path: path.clone(),
                source,
            })?;

        let format = self.format.detect(&document);
        let model = match format {
            ModelFormat::Xgboost => XgbModel::from_value(document)
                .map_err(|source| ModelLoadError::Json {
                    path: path.clone(),
                    source,
                })?
                .to_scoring_model()
                .map_err(|source| ModelLoadError::Xgboost {
                    path: path.clone(),
                    source,
                })?,
            _ => persist::from_json_value(document).map_err(|source| ModelLoadError::Native {
                path: path.clone(),
                source,
            })?,
        };

        tracing::info!(
            path = %path.display(),
            %format,
            booster = model.booster().kind(),
            task = %model.task(),
            n_features = model.n_features(),
            "loaded model"
        );
        Ok(model)
    }
}
