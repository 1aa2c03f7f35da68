//! Crate-level error type.

use thiserror::Error;

use crate::adapter::ModelLoadError;
use crate::codes::UnknownLabelError;
use crate::features::{FeatureError, InvalidRangeError};
use crate::model::PredictionError;

/// Any failure on the transform-then-predict path.
#[derive(Debug, Error)]
pub enum Error {
    /// The raw input was rejected before any model was touched.
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

impl From<UnknownLabelError> for Error {
    fn from(err: UnknownLabelError) -> Self {
        Error::Feature(err.into())
    }
}

impl From<InvalidRangeError> for Error {
    fn from(err: InvalidRangeError) -> Self {
        Error::Feature(err.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
