//! copper-predict: selling-price and deal-outcome prediction for industrial copper sales.
//!
//! A host (web form, CLI, service) collects raw sale attributes and hands them
//! to this crate, which derives a fixed-order feature vector and scores it with
//! one of two pre-trained gradient-boosted models loaded from disk.
//!
//! # Key Types
//!
//! - [`RegressionInput`] / [`ClassificationInput`] - Raw, host-supplied fields
//! - [`FeatureVector`] - Model input in training-time order
//! - [`RegressionModel`] / [`ClassificationModel`] - Task adapters over a model resource
//! - [`Predictor`] - Transform-then-predict facade for both tasks
//! - [`PredictorConfig`] - Where model resources live and how they are loaded
//!
//! # Example
//!
//! ```ignore
//! use copper_predict::{Predictor, PredictorConfig, RegressionInput};
//!
//! let config = PredictorConfig::builder()
//!     .regression_model("models/regression_model.json")
//!     .classification_model("models/classification_model.json")
//!     .build()?;
//! let predictor = Predictor::new(config);
//!
//! let price = predictor.predict_selling_price(&input)?;
//! println!("Selling Price : {price}");
//! ```
//!
//! # Model Resources
//!
//! Models are read either from the native JSON schema (see [`persist`]) or
//! from XGBoost's JSON model format (see [`compat::xgboost`]).

// Re-export approx traits for callers comparing predictions
pub use approx;

pub mod adapter;
pub mod codes;
pub mod compat;
pub mod config;
pub mod error;
pub mod features;
pub mod model;
pub mod persist;
pub mod predictor;
pub mod repr;
pub mod testing;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use adapter::{
    ClassificationModel, DealOutcome, ModelFormat, ModelHandle, ModelLoadError, ModelSource,
    RegressionModel, SellingPrice,
};
pub use codes::{CodeSet, CodeTable, UnknownLabelError};
pub use config::{ConfigError, LoadPolicy, PredictorConfig};
pub use error::{Error, Result};
pub use features::{
    ClassificationInput, FeatureError, FeatureVector, InvalidRangeError, RegressionInput,
    classification_features, regression_features,
};
pub use model::{OutputTransform, PredictionError, ScoringModel, TaskKind};
pub use predictor::Predictor;
