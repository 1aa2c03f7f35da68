//! Scoring models.
//!
//! # Overview
//!
//! - [`ScoringModel`]: an immutable booster plus its metadata and output transform
//! - [`ModelMeta`] / [`TaskKind`]: what the model was trained to do
//! - [`OutputTransform`]: margin → prediction
//!
//! A `ScoringModel` is produced by [`persist`](crate::persist) or
//! [`compat::xgboost`](crate::compat::xgboost) and consumed by the task
//! adapters in [`adapter`](crate::adapter).

mod meta;
mod scoring;
mod transform;

pub use meta::{ModelMeta, TaskKind};
pub use scoring::{Booster, ModelStructureError, PredictionError, ScoringModel};
pub use transform::OutputTransform;
