//! Selling-price adapter.

use std::fmt;
use std::path::PathBuf;

use crate::config::LoadPolicy;
use crate::error::Result;
use crate::features::{FeatureVector, REGRESSION_FEATURES};
use crate::model::{PredictionError, TaskKind};
use crate::utils::round_to;

use super::handle::ModelHandle;
use super::source::{ModelFormat, ModelSource};

/// A predicted selling price.
///
/// The regression model is trained on log price, so `value = exp(raw)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SellingPrice {
    raw: f64,
    value: f64,
}

impl SellingPrice {
    /// Build from the model's raw (log-scale) output.
    pub fn from_raw(raw: f64) -> std::result::Result<Self, PredictionError> {
        let value = raw.exp();
        if !value.is_finite() {
            return Err(PredictionError::NonFinite(value));
        }
        Ok(Self { raw, value })
    }

    /// Model output before exponentiation.
    pub fn raw(&self) -> f64 {
        self.raw
    }

    /// Unrounded price.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Price rounded to 3 decimal places.
    pub fn amount(&self) -> f64 {
        round_to(self.value, 3)
    }
}

impl fmt::Display for SellingPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$ {}", self.amount())
    }
}

/// Scores 18-feature regression vectors.
#[derive(Debug)]
pub struct RegressionModel {
    handle: ModelHandle,
}

impl RegressionModel {
    /// Shared, auto-detected model at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::from_source(ModelSource::new(path, ModelFormat::Auto), LoadPolicy::Shared)
    }

    pub fn from_source(source: ModelSource, policy: LoadPolicy) -> Self {
        Self {
            handle: ModelHandle::new(source, TaskKind::Regression, &REGRESSION_FEATURES, policy),
        }
    }

    pub fn handle(&self) -> &ModelHandle {
        &self.handle
    }

    /// Predict the selling price for a regression vector.
    pub fn predict(&self, features: &FeatureVector) -> Result<SellingPrice> {
        let model = self.handle.acquire()?;
        let raw = model.predict(features.as_slice())?;
        let price = SellingPrice::from_raw(raw)?;
        tracing::debug!(raw, amount = price.amount(), "predicted selling price");
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exp_then_round() {
        let price = SellingPrice::from_raw(7.56008).unwrap();
        assert_eq!(price.amount(), 1919.999);
        assert_eq!(price.to_string(), "$ 1919.999");
        assert_eq!(price.raw(), 7.56008);
    }

    #[test]
    fn zero_log_is_one() {
        let price = SellingPrice::from_raw(0.0).unwrap();
        assert_eq!(price.amount(), 1.0);
        assert_eq!(price.to_string(), "$ 1");
    }

    #[test]
    fn overflow_is_prediction_error() {
        assert!(matches!(
            SellingPrice::from_raw(1e6),
            Err(PredictionError::NonFinite(v)) if v.is_infinite()
        ));
    }
}
