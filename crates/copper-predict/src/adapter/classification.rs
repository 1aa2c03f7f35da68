//! Deal-outcome adapter.

use std::fmt;
use std::path::PathBuf;

use crate::codes::OUTCOME;
use crate::config::LoadPolicy;
use crate::error::Result;
use crate::features::{CLASSIFICATION_FEATURES, FeatureVector};
use crate::model::TaskKind;

use super::handle::ModelHandle;
use super::source::{ModelFormat, ModelSource};

/// Predicted outcome of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DealOutcome {
    Won,
    Lost,
}

impl DealOutcome {
    /// `Won` only when `raw` is exactly the Won code (1.0); anything else is `Lost`.
    pub fn from_raw(raw: f64) -> Self {
        match OUTCOME.label_for(raw) {
            Some("Won") => DealOutcome::Won,
            _ => DealOutcome::Lost,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DealOutcome::Won => "Won",
            DealOutcome::Lost => "Lost",
        }
    }

    /// Numeric outcome code.
    pub fn code(&self) -> f64 {
        match self {
            DealOutcome::Won => 1.0,
            DealOutcome::Lost => 0.0,
        }
    }
}

impl fmt::Display for DealOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores 19-feature classification vectors.
#[derive(Debug)]
pub struct ClassificationModel {
    handle: ModelHandle,
}

impl ClassificationModel {
    /// Shared, auto-detected model at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::from_source(ModelSource::new(path, ModelFormat::Auto), LoadPolicy::Shared)
    }

    pub fn from_source(source: ModelSource, policy: LoadPolicy) -> Self {
        Self {
            handle: ModelHandle::new(
                source,
                TaskKind::BinaryClassification,
                &CLASSIFICATION_FEATURES,
                policy,
            ),
        }
    }

    pub fn handle(&self) -> &ModelHandle {
        &self.handle
    }

    /// Predict Won/Lost for a classification vector.
    pub fn predict(&self, features: &FeatureVector) -> Result<DealOutcome> {
        let model = self.handle.acquire()?;
        let raw = model.predict(features.as_slice())?;
        let outcome = DealOutcome::from_raw(raw);
        tracing::debug!(raw, %outcome, "predicted deal outcome");
        Ok(outcome)
    }
}
