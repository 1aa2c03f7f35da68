//! Lazily acquired, task-checked model handle.

use std::sync::{Arc, OnceLock};

use crate::config::LoadPolicy;
use crate::model::{ScoringModel, TaskKind};

use super::source::{ModelLoadError, ModelSource};

/// A model resource bound to the task and feature layout its caller expects.
///
/// Under [`LoadPolicy::Shared`] the first successful [`acquire`](Self::acquire)
/// caches the model and every later call returns the same `Arc`. A failed load
/// is not cached. Under [`LoadPolicy::PerCall`] every call re-reads the resource.
#[derive(Debug)]
pub struct ModelHandle {
    source: ModelSource,
    task: TaskKind,
    feature_names: &'static [&'static str],
    policy: LoadPolicy,
    cached: OnceLock<Arc<ScoringModel>>,
}

impl ModelHandle {
    pub fn new(
        source: ModelSource,
        task: TaskKind,
        feature_names: &'static [&'static str],
        policy: LoadPolicy,
    ) -> Self {
        Self {
            source,
            task,
            feature_names,
            policy,
            cached: OnceLock::new(),
        }
    }

    pub fn source(&self) -> &ModelSource {
        &self.source
    }

    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    /// Task the loaded model must be trained for.
    pub fn task(&self) -> TaskKind {
        self.task
    }

    /// Returns true if a shared model has been loaded and cached.
    pub fn is_loaded(&self) -> bool {
        self.cached.get().is_some()
    }

    /// Obtain the model, loading it if the policy requires.
    pub fn acquire(&self) -> Result<Arc<ScoringModel>, ModelLoadError> {
        match self.policy {
            LoadPolicy::PerCall => self.load_checked().map(Arc::new),
            LoadPolicy::Shared => {
                if let Some(model) = self.cached.get() {
                    return Ok(Arc::clone(model));
                }
                let loaded = Arc::new(self.load_checked()?);
                // A concurrent caller may have won the race; keep whichever landed first.
                Ok(Arc::clone(self.cached.get_or_init(|| loaded)))
            }
        }
    }

    fn load_checked(&self) -> Result<ScoringModel, ModelLoadError> {
        let model = self.source.load()?;
        let path = self.source.path();

        if model.task() != self.task {
            return Err(ModelLoadError::TaskMismatch {
                path: path.to_path_buf(),
                expected: self.task,
                actual: model.task(),
            });
        }

        if let Some(names) = &model.meta().feature_names {
            if names.len() == self.feature_names.len() {
                let mismatch = names
                    .iter()
                    .zip(self.feature_names)
                    .position(|(actual, expected)| actual != expected);
                if let Some(index) = mismatch {
                    return Err(ModelLoadError::FeatureName {
                        path: path.to_path_buf(),
                        index,
                        expected: self.feature_names[index],
                        actual: names[index].clone(),
                    });
                }
            }
        }

        Ok(model)
    }
}
