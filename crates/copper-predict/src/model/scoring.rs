//! Immutable scoring model: booster + metadata + output transform.

use thiserror::Error;

use crate::repr::gbdt::{Forest, ForestValidationError};
use crate::repr::gblinear::LinearModel;

use super::{ModelMeta, OutputTransform, TaskKind};

/// Failure while scoring a feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PredictionError {
    #[error("model expects {expected} features, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },
    #[error("model produced a non-finite output ({0})")]
    NonFinite(f64),
}

/// A booster and its metadata do not describe a usable model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelStructureError {
    #[error("model declares zero features")]
    NoFeatures,
    #[error(transparent)]
    Forest(#[from] ForestValidationError),
    #[error("linear model has {weights} weights but declares {n_features} features")]
    LinearFeatureCount { weights: usize, n_features: usize },
}

/// The model family behind a [`ScoringModel`].
#[derive(Debug, Clone, PartialEq)]
pub enum Booster {
    Tree(Forest),
    Linear(LinearModel),
}

impl Booster {
    /// Short name used in logs and `inspect` output.
    pub fn kind(&self) -> &'static str {
        match self {
            Booster::Tree(_) => "gbtree",
            Booster::Linear(_) => "gblinear",
        }
    }

    pub fn predict_margin(&self, features: &[f64]) -> f64 {
        match self {
            Booster::Tree(forest) => forest.predict_margin(features),
            Booster::Linear(linear) => linear.predict_margin(features),
        }
    }
}

/// A loaded, validated predictive model.
///
/// Construct with [`ScoringModel::new`], which checks that every split or
/// weight fits within `meta.n_features`, so [`predict`](Self::predict) can
/// index the feature slice without further checks once its length matches.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringModel {
    booster: Booster,
    meta: ModelMeta,
    transform: OutputTransform,
}

impl ScoringModel {
    pub fn new(
        booster: Booster,
        meta: ModelMeta,
        transform: OutputTransform,
    ) -> Result<Self, ModelStructureError> {
        if meta.n_features == 0 {
            return Err(ModelStructureError::NoFeatures);
        }
        match &booster {
            Booster::Tree(forest) => forest.validate(meta.n_features)?,
            Booster::Linear(linear) => {
                if linear.n_features() != meta.n_features {
                    return Err(ModelStructureError::LinearFeatureCount {
                        weights: linear.n_features(),
                        n_features: meta.n_features,
                    });
                }
            }
        }
        Ok(Self {
            booster,
            meta,
            transform,
        })
    }

    #[inline]
    pub fn booster(&self) -> &Booster {
        &self.booster
    }

    #[inline]
    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    #[inline]
    pub fn task(&self) -> TaskKind {
        self.meta.task
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.meta.n_features
    }

    #[inline]
    pub fn output_transform(&self) -> OutputTransform {
        self.transform
    }

    fn check_len(&self, features: &[f64]) -> Result<(), PredictionError> {
        if features.len() != self.meta.n_features {
            return Err(PredictionError::FeatureCountMismatch {
                expected: self.meta.n_features,
                actual: features.len(),
            });
        }
        Ok(())
    }

    /// Raw additive score, before any output transform.
    pub fn predict_margin(&self, features: &[f64]) -> Result<f64, PredictionError> {
        self.check_len(features)?;
        let margin = self.booster.predict_margin(features);
        if !margin.is_finite() {
            return Err(PredictionError::NonFinite(margin));
        }
        Ok(margin)
    }

    /// Score one row.
    ///
    /// - Regression: the transformed output.
    /// - Binary classification with a sigmoid transform: the predicted class,
    ///   `1.0` when the probability exceeds 0.5 and `0.0` otherwise.
    /// - Binary classification with a step transform: `1.0` for a positive
    ///   margin, else `0.0`.
    /// - Binary classification with an identity transform: the raw margin,
    ///   which such models emit as the label directly.
    pub fn predict(&self, features: &[f64]) -> Result<f64, PredictionError> {
        let margin = self.predict_margin(features)?;
        let output = match (self.meta.task, self.transform) {
            (TaskKind::BinaryClassification, OutputTransform::Sigmoid) => {
                if self.transform.apply(margin) > 0.5 { 1.0 } else { 0.0 }
            }
            (_, transform) => transform.apply(margin),
        };
        tracing::trace!(margin, output, "scored row");
        Ok(output)
    }
}
