//! Predictor configuration with builder pattern.
//!
//! # Example
//!
//! ```
//! use copper_predict::{LoadPolicy, PredictorConfig};
//!
//! // All defaults: models next to the working directory, shared loading.
//! let config = PredictorConfig::builder().build().unwrap();
//! assert_eq!(config.load_policy, LoadPolicy::Shared);
//!
//! let config = PredictorConfig::builder()
//!     .regression_model("models/price.json")
//!     .load_policy(LoadPolicy::PerCall)
//!     .build()
//!     .unwrap();
//! ```
//!
//! The same settings can be read from TOML:
//!
//! ```toml
//! regression_model = "models/regression_model.json"
//! classification_model = "models/classification_model.json"
//! format = "auto"
//! load_policy = "shared"
//! ```

use std::path::{Path, PathBuf};

use bon::Builder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adapter::ModelFormat;

/// Default regression model resource.
pub const DEFAULT_REGRESSION_MODEL: &str = "regression_model.json";
/// Default classification model resource.
pub const DEFAULT_CLASSIFICATION_MODEL: &str = "classification_model.json";

// =============================================================================
// ConfigError
// =============================================================================

/// Errors from building or reading a [`PredictorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    EmptyPath { field: &'static str },
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

// =============================================================================
// LoadPolicy
// =============================================================================

/// When model resources are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Load on first use and share the immutable model across calls.
    #[default]
    Shared,
    /// Read the resource on every prediction.
    PerCall,
}

// =============================================================================
// PredictorConfig
// =============================================================================

/// Where the two model resources live and how they are loaded.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
#[serde(default, deny_unknown_fields)]
pub struct PredictorConfig {
    /// Regression (selling price) model. Default: `regression_model.json`.
    #[builder(into, default = PathBuf::from(DEFAULT_REGRESSION_MODEL))]
    pub regression_model: PathBuf,

    /// Classification (status) model. Default: `classification_model.json`.
    #[builder(into, default = PathBuf::from(DEFAULT_CLASSIFICATION_MODEL))]
    pub classification_model: PathBuf,

    /// Resource format. Default: detect per file.
    #[builder(default)]
    pub format: ModelFormat,

    /// Default: [`LoadPolicy::Shared`].
    #[builder(default)]
    pub load_policy: LoadPolicy,
}

/// Custom finishing function that validates the config.
impl<S: predictor_config_builder::IsComplete> PredictorConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPath`] if either model path is empty.
    pub fn build(self) -> Result<PredictorConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            regression_model: PathBuf::from(DEFAULT_REGRESSION_MODEL),
            classification_model: PathBuf::from(DEFAULT_CLASSIFICATION_MODEL),
            format: ModelFormat::default(),
            load_policy: LoadPolicy::default(),
        }
    }
}

impl PredictorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.regression_model.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath {
                field: "regression_model",
            });
        }
        if self.classification_model.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath {
                field: "classification_model",
            });
        }
        Ok(())
    }

    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: PredictorConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML config file. Relative model paths are resolved against
    /// the config file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;
        if let Some(dir) = path.parent() {
            config.regression_model = dir.join(&config.regression_model);
            config.classification_model = dir.join(&config.classification_model);
        }
        tracing::debug!(?config, "loaded config");
        Ok(config)
    }
}
