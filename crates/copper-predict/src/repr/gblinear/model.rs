//! Linear model data structure.

use ndarray::{Array1, ArrayView1};

/// Single-output linear booster: `margin = base_score + bias + w · x`.
///
/// # Example
///
/// ```
/// use copper_predict::repr::gblinear::LinearModel;
/// use ndarray::array;
///
/// let model = LinearModel::new(array![0.5, -1.0], 0.25, 0.0);
/// assert_eq!(model.n_features(), 2);
/// assert_eq!(model.predict_margin(&[2.0, 1.0]), 0.25);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    weights: Array1<f64>,
    bias: f64,
    base_score: f64,
}

impl LinearModel {
    pub fn new(weights: Array1<f64>, bias: f64, base_score: f64) -> Self {
        Self {
            weights,
            bias,
            base_score,
        }
    }

    /// Number of input features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    #[inline]
    pub fn weight(&self, feature: usize) -> f64 {
        self.weights[feature]
    }

    #[inline]
    pub fn bias(&self) -> f64 {
        self.bias
    }

    #[inline]
    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    /// Raw score for one row. `features.len()` must equal [`n_features`](Self::n_features).
    pub fn predict_margin(&self, features: &[f64]) -> f64 {
        let x = ArrayView1::from(features);
        self.base_score + self.bias + self.weights.dot(&x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn margin_is_dot_plus_offsets() {
        let model = LinearModel::new(array![1.0, 2.0, -0.5], 0.1, 0.5);
        assert_abs_diff_eq!(model.predict_margin(&[1.0, 1.0, 2.0]), 0.6 + 1.0 + 2.0 - 1.0);
    }

    #[test]
    fn accessors() {
        let model = LinearModel::new(array![3.0, 4.0], -1.0, 0.0);
        assert_eq!(model.n_features(), 2);
        assert_eq!(model.weight(1), 4.0);
        assert_eq!(model.bias(), -1.0);
        assert_eq!(model.weights().sum(), 7.0);
    }
}
