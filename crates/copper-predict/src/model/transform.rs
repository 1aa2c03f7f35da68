//! Output transformation for inference.
//!
//! The [`OutputTransform`] enum defines how raw model outputs (margins)
//! are converted to final predictions. It is persisted with the model so
//! that inference doesn't require the original objective.

use serde::{Deserialize, Serialize};

/// Inference-time output transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputTransform {
    /// No transformation; output = margin.
    #[default]
    Identity,
    /// Logistic sigmoid: output = 1 / (1 + exp(-margin)).
    Sigmoid,
    /// Hinge decision: output = 1 if margin > 0, else 0.
    Step,
}

impl OutputTransform {
    /// Apply the transformation to a single margin.
    ///
    /// NaN propagates through `Identity` and `Sigmoid`.
    #[inline]
    pub fn apply(&self, margin: f64) -> f64 {
        match self {
            OutputTransform::Identity => margin,
            OutputTransform::Sigmoid => sigmoid(margin),
            OutputTransform::Step => {
                if margin > 0.0 { 1.0 } else { 0.0 }
            }
        }
    }
}

/// Numerically stable sigmoid.
/// Clamps input to [-500, 500] to prevent overflow.
#[inline]
fn sigmoid(x: f64) -> f64 {
    let clamped = x.clamp(-500.0, 500.0);
    if clamped >= 0.0 {
        1.0 / (1.0 + (-clamped).exp())
    } else {
        let e = clamped.exp();
        e / (1.0 + e)
    }
}
