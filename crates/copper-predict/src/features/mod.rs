//! Feature transform: raw sale attributes → fixed-order model inputs.
//!
//! # Overview
//!
//! - [`RegressionInput`] / [`ClassificationInput`]: raw fields from the host
//! - [`regression_features`] / [`classification_features`]: the two entry points
//! - [`FeatureVector`]: the result, in training-time order
//!
//! The vector layouts are part of the models' training contract and are
//! listed in [`REGRESSION_FEATURES`] and [`CLASSIFICATION_FEATURES`].
//!
//! Two magnitudes (quantity and thickness) are passed through a Box-Cox power
//! transform whose λ is fitted on just those two values for every request;
//! see [`power`].

pub mod bounds;
pub mod calendar;
mod input;
mod pipeline;
pub mod power;

use std::ops::Index;

use thiserror::Error;

pub use bounds::InvalidRangeError;
pub use input::{ClassificationInput, RegressionInput};
pub use pipeline::{classification_features, regression_features};
pub use power::PowerTransformError;

use crate::codes::UnknownLabelError;

/// Regression vector layout (18 features).
pub const REGRESSION_FEATURES: [&str; 18] = [
    "quantity_tons",
    "customer",
    "status",
    "item_type",
    "application",
    "country",
    "thickness",
    "width",
    "product_ref",
    "quantity_tons_boxcox",
    "thickness_boxcox",
    "day_difference",
    "item_day",
    "item_month",
    "item_year",
    "delivery_day",
    "delivery_month",
    "delivery_year",
];

/// Classification vector layout (19 features).
pub const CLASSIFICATION_FEATURES: [&str; 19] = [
    "quantity_tons",
    "customer",
    "item_type",
    "application",
    "country",
    "thickness",
    "width",
    "product_ref",
    "selling_price",
    "selling_price_log1p",
    "quantity_tons_boxcox",
    "thickness_boxcox",
    "day_difference",
    "item_day",
    "item_month",
    "item_year",
    "delivery_day",
    "delivery_month",
    "delivery_year",
];

/// Errors raised while building a feature vector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error(transparent)]
    UnknownLabel(#[from] UnknownLabelError),
    #[error(transparent)]
    InvalidRange(#[from] InvalidRangeError),
    #[error(transparent)]
    PowerTransform(#[from] PowerTransformError),
}

/// Fixed-order model input. Built fresh for every request.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    /// Wrap raw values. Order is the caller's responsibility.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Number of features.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the vector holds no features.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Feature values in order.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Consume the vector, returning the values.
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}

impl Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}

impl AsRef<[f64]> for FeatureVector {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}
