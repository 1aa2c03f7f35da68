//! Box-Cox power transform with a per-call maximum-likelihood λ.
//!
//! The transform maps a positive magnitude `x` to `(x^λ - 1) / λ`, or to
//! `ln x` when `λ == 0`. [`BoxCox::fit`] estimates λ from exactly the values
//! it is given by maximising the Box-Cox log-likelihood
//!
//! ```text
//! llf(λ) = (λ - 1) · Σ ln xᵢ  -  n/2 · ln(var(y(λ)))
//! ```
//!
//! where `var` is the population variance of the transformed values.
//!
//! The likelihood is never evaluated in that form. With `cᵢ = ln xᵢ - mean(ln x)`
//! the `λ · Σ ln xᵢ` terms cancel exactly, leaving
//!
//! ```text
//! llf(λ) = -Σ ln xᵢ  -  n/2 · ln(var(e^(λ·c) / λ))
//! ```
//!
//! and the variance is built from pairwise differences
//! `e^(λ(cᵢ+cⱼ)/2) · (cᵢ - cⱼ) · sinh(λ(cᵢ-cⱼ)/2) / (λ(cᵢ-cⱼ)/2)`, so two
//! nearly equal magnitudes keep their separation instead of cancelling.
//!
//! The feature pipeline calls this with the two magnitudes of a single
//! request, so λ is re-estimated for every prediction instead of being
//! fixed at training time. For two distinct values the likelihood is even in
//! λ and peaks at λ = 0, which makes the fitted transform numerically close
//! to `ln x`.

use std::f64::consts::LN_2;

use thiserror::Error;

use crate::utils::{DEFAULT_XTOL, MinimizeError, minimize_scalar};

/// Initial downhill interval for the λ search.
const LAMBDA_BRACKET: (f64, f64) = (-2.0, 2.0);

/// Errors from fitting or applying the power transform.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PowerTransformError {
    /// Fewer than two values were supplied.
    #[error("power transform needs at least 2 values, got {0}")]
    NotEnoughValues(usize),
    /// A value was zero, negative or not finite.
    #[error("power transform input must be positive and finite, got {0}")]
    NonPositive(f64),
    /// All values were identical, so the likelihood is flat.
    #[error("power transform input must not be constant")]
    ConstantInput,
    /// The λ search failed.
    #[error("lambda estimation failed: {0}")]
    Estimation(#[from] MinimizeError),
}

/// A fitted Box-Cox transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCox {
    lambda: f64,
}

impl BoxCox {
    /// Create a transform with a known λ.
    pub fn with_lambda(lambda: f64) -> Self {
        Self { lambda }
    }

    /// Estimate λ by maximum likelihood over `data`.
    pub fn fit(data: &[f64]) -> Result<Self, PowerTransformError> {
        validate(data)?;

        let likelihood = Likelihood::new(data);
        let half_n = data.len() as f64 / 2.0;
        // Only the λ-dependent term is minimized.
        let (lambda, _) = minimize_scalar(
            |lambda| half_n * likelihood.log_spread(lambda),
            LAMBDA_BRACKET.0,
            LAMBDA_BRACKET.1,
            DEFAULT_XTOL,
        )?;

        tracing::trace!(lambda, n = data.len(), "fitted box-cox lambda");
        Ok(Self { lambda })
    }

    /// The fitted λ.
    #[inline]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Transform a single positive value.
    #[inline]
    pub fn transform(&self, x: f64) -> f64 {
        boxcox(x, self.lambda)
    }

    /// Transform every value of `data`.
    pub fn transform_all(&self, data: &[f64]) -> Vec<f64> {
        data.iter().map(|&x| self.transform(x)).collect()
    }
}

/// Fit λ on `data` and return the transformed values with the fitted transform.
pub fn fit_transform(data: &[f64]) -> Result<(Vec<f64>, BoxCox), PowerTransformError> {
    let fitted = BoxCox::fit(data)?;
    Ok((fitted.transform_all(data), fitted))
}

/// Box-Cox transform of one value.
///
/// Uses `expm1` so that small λ stays accurate and switches to `ln x` when λ
/// is indistinguishable from zero.
#[inline]
pub fn boxcox(x: f64, lambda: f64) -> f64 {
    if lambda.abs() < 1e-19 {
        x.ln()
    } else {
        (lambda * x.ln()).exp_m1() / lambda
    }
}

/// Box-Cox log-likelihood of `data` at `lambda`.
pub fn log_likelihood(data: &[f64], lambda: f64) -> f64 {
    Likelihood::new(data).value(lambda)
}

/// `ln(sinh(z/2) / (z/2))`. Even in `z`, zero at `z = 0`.
fn log_sinhc(z: f64) -> f64 {
    let z = z.abs();
    if z < SINHC_SERIES_LIMIT {
        let z2 = z * z;
        return z2 / 24.0 - z2 * z2 / 2880.0;
    }
    let half = 0.5 * z;
    half + (-(-z).exp_m1()).ln() - LN_2 - half.ln()
}

const SINHC_SERIES_LIMIT: f64 = 1e-2;

/// Log-space pieces of the likelihood that do not depend on λ.
#[derive(Debug, Clone)]
struct Likelihood {
    /// `(cᵢ + cⱼ, cᵢ - cⱼ)` for every pair with `cᵢ != cⱼ`.
    pairs: Vec<(f64, f64)>,
    /// `max |cᵢ - cⱼ|`; differences are scaled by it before squaring.
    max_gap: f64,
    log_sum: f64,
    n: f64,
}

impl Likelihood {
    fn new(data: &[f64]) -> Self {
        // Logs relative to the first value, so close inputs keep every digit
        // of their ratio.
        let reference = data.first().copied().unwrap_or(1.0);
        let relative: Vec<f64> = data
            .iter()
            .map(|&x| ((x - reference) / reference).ln_1p())
            .collect();
        let mean = relative.iter().sum::<f64>() / relative.len() as f64;
        let centered: Vec<f64> = relative.iter().map(|r| r - mean).collect();

        let mut pairs = Vec::with_capacity(centered.len() * centered.len().saturating_sub(1) / 2);
        for (i, &ci) in centered.iter().enumerate() {
            for &cj in &centered[i + 1..] {
                if ci != cj {
                    pairs.push((ci + cj, ci - cj));
                }
            }
        }
        let max_gap = pairs.iter().fold(0.0f64, |acc, &(_, gap)| acc.max(gap.abs()));

        Self {
            pairs,
            max_gap,
            log_sum: data.iter().map(|x| x.ln()).sum(),
            n: data.len() as f64,
        }
    }

    /// `ln Σ_{i<j} ((cᵢ - cⱼ) / max_gap)² · e^(λ(cᵢ+cⱼ)) · sinhc(λ(cᵢ-cⱼ))²`.
    ///
    /// Equals `ln(n² · var(e^(λ·c) / λ)) - 2 ln max_gap`; `-inf` for constant data.
    fn log_spread(&self, lambda: f64) -> f64 {
        let terms = self.pairs.iter().map(|&(sum, gap)| {
            let scaled = gap / self.max_gap;
            (scaled * scaled).ln() + lambda * sum + 2.0 * log_sinhc(lambda * gap)
        });
        log_sum_exp(terms)
    }

    fn value(&self, lambda: f64) -> f64 {
        let log_variance = 2.0 * self.max_gap.ln() + self.log_spread(lambda) - 2.0 * self.n.ln();
        -self.log_sum - self.n / 2.0 * log_variance
    }
}

fn log_sum_exp(terms: impl Iterator<Item = f64> + Clone) -> f64 {
    let max = terms.clone().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    max + terms.map(|t| (t - max).exp()).sum::<f64>().ln()
}

fn validate(data: &[f64]) -> Result<(), PowerTransformError> {
    if data.len() < 2 {
        return Err(PowerTransformError::NotEnoughValues(data.len()));
    }
    if let Some(&bad) = data.iter().find(|x| !(x.is_finite() && **x > 0.0)) {
        return Err(PowerTransformError::NonPositive(bad));
    }
    if data.iter().all(|&x| x == data[0]) {
        return Err(PowerTransformError::ConstantInput);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[test]
    fn zero_lambda_is_log() {
        assert_eq!(boxcox(std::f64::consts::E, 0.0), 1.0);
        assert_eq!(boxcox(1.0, 0.0), 0.0);
    }

    #[test]
    fn unit_lambda_is_shift() {
        assert_abs_diff_eq!(boxcox(5.0, 1.0), 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(boxcox(0.5, 1.0), -0.5, epsilon = 1e-12);
    }

    #[test]
    fn two_values_fit_lambda_near_zero() {
        let data = [5874.904, 2.56482];
        let fitted = BoxCox::fit(&data).unwrap();
        assert!(fitted.lambda().abs() < 1e-6, "lambda = {}", fitted.lambda());

        let out = fitted.transform_all(&data);
        assert_abs_diff_eq!(out[0], 5874.904f64.ln(), epsilon = 1e-5);
        assert_abs_diff_eq!(out[1], 2.56482f64.ln(), epsilon = 1e-5);
    }

    #[test]
    fn extreme_magnitudes_still_fit() {
        let data = [1e-5, 1e9];
        let (out, fitted) = fit_transform(&data).unwrap();
        assert!(fitted.lambda().abs() < 1e-6);
        assert_abs_diff_eq!(out[0], 1e-5f64.ln(), epsilon = 1e-5);
        assert_abs_diff_eq!(out[1], 1e9f64.ln(), epsilon = 1e-5);
    }

    #[rstest]
    #[case(2.0, 2.000_000_1)]
    #[case(2500.0, 2499.9999)]
    #[case(0.18, 0.180_000_01)]
    #[case(100.0, 100.000_000_000_01)]
    #[case(1e-5, 1.000_000_1e-5)]
    #[case(1e9, 999_999_999.0)]
    fn nearly_equal_values_fit_lambda_near_zero(#[case] a: f64, #[case] b: f64) {
        let (out, fitted) = fit_transform(&[a, b]).unwrap();
        assert!(fitted.lambda().abs() < 1e-6, "lambda = {}", fitted.lambda());
        assert_abs_diff_eq!(out[0], a.ln(), epsilon = 1e-9);
        assert_abs_diff_eq!(out[1], b.ln(), epsilon = 1e-9);
        assert_eq!(a > b, out[0] > out[1]);
    }

    #[test]
    fn two_value_likelihood_is_even() {
        let data = [2.0, 2.000_000_1];
        for lambda in [0.5, 3.0, 63.3] {
            assert_eq!(log_likelihood(&data, lambda), log_likelihood(&data, -lambda));
        }
        assert!(log_likelihood(&data, 0.0) > log_likelihood(&data, 63.3));
    }

    #[test]
    fn likelihood_matches_direct_formula() {
        // Well separated values, where the textbook form is accurate.
        let data = [1.2f64, 3.4, 7.7, 20.1];
        let direct = |lambda: f64| {
            let n = data.len() as f64;
            let y: Vec<f64> = data.iter().map(|&x| boxcox(x, lambda)).collect();
            let mean = y.iter().sum::<f64>() / n;
            let var = y.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            (lambda - 1.0) * data.iter().map(|x| x.ln()).sum::<f64>() - n / 2.0 * var.ln()
        };
        for lambda in [-1.5, -0.2, 0.0, 0.3, 1.0, 2.0] {
            assert_abs_diff_eq!(log_likelihood(&data, lambda), direct(lambda), epsilon = 1e-10);
        }
        // Reference value computed at 50-digit precision.
        assert_abs_diff_eq!(log_likelihood(&data, 0.3), -6.7089277763885, epsilon = 1e-10);
    }

    #[test]
    fn fit_is_deterministic() {
        let data = [0.18, 2500.0];
        let first = fit_transform(&data).unwrap();
        let second = fit_transform(&data).unwrap();
        assert_eq!(first.1.lambda().to_bits(), second.1.lambda().to_bits());
        assert_eq!(first.0, second.0);
    }

    #[test]
    fn lambda_maximizes_likelihood() {
        let data = [1.2, 3.4, 7.7, 20.1];
        let fitted = BoxCox::fit(&data).unwrap();
        let best = log_likelihood(&data, fitted.lambda());
        for delta in [-0.1, -0.01, 0.01, 0.1] {
            assert!(best >= log_likelihood(&data, fitted.lambda() + delta));
        }
    }

    #[test]
    fn rejects_constant_input() {
        assert_eq!(
            BoxCox::fit(&[2.0, 2.0]),
            Err(PowerTransformError::ConstantInput)
        );
    }

    #[test]
    fn rejects_non_positive_input() {
        assert_eq!(
            BoxCox::fit(&[0.0, 2.0]),
            Err(PowerTransformError::NonPositive(0.0))
        );
        assert_eq!(
            BoxCox::fit(&[-5.0, 2.0]),
            Err(PowerTransformError::NonPositive(-5.0))
        );
        assert!(matches!(
            BoxCox::fit(&[f64::NAN, 2.0]),
            Err(PowerTransformError::NonPositive(_))
        ));
    }

    #[test]
    fn rejects_single_value() {
        assert_eq!(
            BoxCox::fit(&[3.0]),
            Err(PowerTransformError::NotEnoughValues(1))
        );
    }
}
