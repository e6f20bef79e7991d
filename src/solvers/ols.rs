//! Ordinary Least Squares regression solver.

use crate::core::{RegressionOptions, RegressionOptionsBuilder, RegressionResult};
use crate::inference::CoefficientInference;
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use crate::utils::{center_columns, center_vector, detect_constant_columns};
use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Ordinary Least Squares regression estimator.
///
/// Solves the least squares problem with a column-pivoted QR decomposition of
/// the (centred, when an intercept is fitted) design matrix. Degenerate input
/// is rejected instead of producing NaN coefficients: a model needs at least
/// one residual degree of freedom, and with an intercept every predictor must
/// vary.
///
/// # Example
///
/// ```rust
/// use research_gdp::solvers::{FittedRegressor, OlsRegressor, Regressor};
/// use faer::{Col, Mat};
///
/// let x = Mat::from_fn(5, 1, |i, _| (i + 1) as f64);
/// let y = Col::from_fn(5, |i| [2.0, 4.0, 5.0, 4.0, 5.0][i]);
///
/// let fitted = OlsRegressor::builder().build().fit(&x, &y).unwrap();
/// assert!((fitted.slope() - 0.6).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OlsRegressor {
    options: RegressionOptions,
}

impl OlsRegressor {
    /// Create a new OLS regressor with the given options.
    pub fn new(options: RegressionOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> OlsRegressorBuilder {
        OlsRegressorBuilder::default()
    }

    /// Minimum number of observations for a fit with `n_features` predictors.
    pub fn min_observations(&self, n_features: usize) -> usize {
        n_features + usize::from(self.options.with_intercept) + 1
    }
}

impl Regressor for OlsRegressor {
    type Fitted = FittedOls;

    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
        self.options.validate()?;

        let n_samples = x.nrows();
        let n_features = x.ncols();

        if x.nrows() != y.nrows() {
            return Err(RegressionError::DimensionMismatch {
                x_rows: x.nrows(),
                y_len: y.nrows(),
            });
        }

        let needed = self.min_observations(n_features);
        if n_samples < needed {
            return Err(RegressionError::InsufficientObservations {
                needed,
                got: n_samples,
            });
        }

        if (0..n_samples).any(|i| (0..n_features).any(|j| !x[(i, j)].is_finite())) {
            return Err(RegressionError::NonFiniteInput("predictors"));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(RegressionError::NonFiniteInput("response"));
        }

        let (coefficients, intercept) = if self.options.with_intercept {
            // A constant column is indistinguishable from the intercept.
            let constant = detect_constant_columns(x, self.options.rank_tolerance);
            if let Some(column) = constant.iter().position(|&c| c) {
                return Err(RegressionError::ConstantPredictor { column });
            }

            let (x_centered, x_means) = center_columns(x);
            let (y_centered, y_mean) = center_vector(y);

            let coefficients = self.solve_with_qr(&x_centered, &y_centered)?;

            // intercept = y_mean - x_means' * coefficients
            let intercept = y_mean
                - (0..n_features)
                    .map(|j| x_means[j] * coefficients[j])
                    .sum::<f64>();

            (coefficients, Some(intercept))
        } else {
            (self.solve_with_qr(x, y)?, None)
        };

        let fitted_values = linear_predictor(x, &coefficients, intercept);
        let residuals = Col::from_fn(n_samples, |i| y[i] - fitted_values[i]);

        let n_params = n_features + usize::from(intercept.is_some());
        let result = self.compute_statistics(
            x,
            y,
            coefficients,
            intercept,
            residuals,
            fitted_values,
            n_params,
        )?;

        Ok(FittedOls { result })
    }
}

impl OlsRegressor {
    /// Solve the least squares problem using QR decomposition with column pivoting.
    ///
    /// Rank-deficient designs are an error.
    fn solve_with_qr(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Col<f64>, RegressionError> {
        let n_features = x.ncols();

        let qr = x.col_piv_qr();
        let q = qr.compute_Q();
        let r = qr.R();
        let perm = qr.P();

        // perm_pos[j] = pivoted position of original column j
        let perm_pos = perm.arrays().0;

        for i in 0..n_features {
            if r[(i, i)].abs() <= self.options.rank_tolerance {
                return Err(RegressionError::SingularMatrix);
            }
        }

        // Solve R * beta_perm = Q' * y
        let qty = q.transpose() * y;

        let mut beta_perm = Col::zeros(n_features);
        for i in (0..n_features).rev() {
            let mut sum = qty[i];
            for j in (i + 1)..n_features {
                sum -= r[(i, j)] * beta_perm[j];
            }
            beta_perm[i] = sum / r[(i, i)];
        }

        Ok(Col::from_fn(n_features, |j| beta_perm[perm_pos[j]]))
    }

    /// Compute fit statistics and optionally inference statistics.
    #[allow(clippy::too_many_arguments)]
    fn compute_statistics(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
        coefficients: Col<f64>,
        intercept: Option<f64>,
        residuals: Col<f64>,
        fitted_values: Col<f64>,
        n_params: usize,
    ) -> Result<RegressionResult, RegressionError> {
        let n = y.nrows();
        let n_features = x.ncols();

        let y_mean: f64 = y.iter().sum::<f64>() / n as f64;

        // Centred TSS with an intercept, raw sum of squares without
        let tss: f64 = if intercept.is_some() {
            y.iter().map(|&yi| (yi - y_mean).powi(2)).sum()
        } else {
            y.iter().map(|&yi| yi.powi(2)).sum()
        };
        let rss: f64 = residuals.iter().map(|&r| r.powi(2)).sum();

        let r_squared = if tss > 0.0 {
            (1.0 - rss / tss).clamp(0.0, 1.0)
        } else if rss < 1e-10 {
            1.0
        } else {
            0.0
        };

        let df_total = (if intercept.is_some() { n - 1 } else { n }) as f64;
        let df_resid = (n - n_params) as f64;
        let adj_r_squared = 1.0 - (1.0 - r_squared) * df_total / df_resid;

        let mse = rss / df_resid;
        let rmse = mse.sqrt();

        let ess = tss - rss;
        let df_model = n_features as f64;
        let f_statistic = if mse > 0.0 {
            (ess / df_model) / mse
        } else {
            f64::INFINITY
        };

        let f_pvalue = if f_statistic.is_finite() {
            FisherSnedecor::new(df_model, df_resid)
                .map_or(f64::NAN, |d| 1.0 - d.cdf(f_statistic))
        } else {
            0.0
        };

        // Gaussian log-likelihood at the ML variance estimate RSS / n
        let sigma2_ml = rss / n as f64;
        let log_likelihood = if sigma2_ml > 0.0 {
            -0.5 * n as f64 * (1.0 + (2.0 * std::f64::consts::PI).ln() + sigma2_ml.ln())
        } else {
            f64::NAN
        };

        // Variance counts as a parameter, as in R's logLik
        let k = (n_params + 1) as f64;
        let aic = 2.0 * k - 2.0 * log_likelihood;
        let aicc = if n as f64 - k - 1.0 > 0.0 {
            aic + 2.0 * k * (k + 1.0) / (n as f64 - k - 1.0)
        } else {
            f64::NAN
        };
        let bic = k * (n as f64).ln() - 2.0 * log_likelihood;

        let mut result = RegressionResult::empty(n_features, n);
        result.coefficients = coefficients;
        result.intercept = intercept;
        result.residuals = residuals;
        result.fitted_values = fitted_values;
        result.rank = n_features;
        result.n_parameters = n_params;
        result.n_observations = n;
        result.r_squared = r_squared;
        result.adj_r_squared = adj_r_squared;
        result.mse = mse;
        result.rmse = rmse;
        result.f_statistic = f_statistic;
        result.f_pvalue = f_pvalue;
        result.aic = aic;
        result.aicc = aicc;
        result.bic = bic;
        result.log_likelihood = log_likelihood;
        result.confidence_level = self.options.confidence_level;

        if self.options.compute_inference {
            self.compute_inference(x, &mut result)?;
        }

        Ok(result)
    }

    /// Compute inference statistics (standard errors, t-stats, p-values, CIs).
    fn compute_inference(
        &self,
        x: &Mat<f64>,
        result: &mut RegressionResult,
    ) -> Result<(), RegressionError> {
        let df = result.residual_df() as f64;
        let level = self.options.confidence_level;

        let (se, se_int) =
            CoefficientInference::standard_errors(x, result.mse, result.intercept.is_some())
                .map_err(|_| RegressionError::SingularMatrix)?;

        let t_stats = CoefficientInference::t_statistics(&result.coefficients, &se);
        let p_vals = CoefficientInference::p_values(&t_stats, df);
        let (ci_lower, ci_upper) =
            CoefficientInference::confidence_intervals(&result.coefficients, &se, df, level);

        result.std_errors = Some(se);
        result.t_statistics = Some(t_stats);
        result.p_values = Some(p_vals);
        result.conf_interval_lower = Some(ci_lower);
        result.conf_interval_upper = Some(ci_upper);

        if let (Some(intercept), Some(se_int)) = (result.intercept, se_int) {
            let t_int = CoefficientInference::t_statistic(intercept, se_int);
            let t_crit = CoefficientInference::t_critical(level, df);

            result.intercept_std_error = Some(se_int);
            result.intercept_t_statistic = Some(t_int);
            result.intercept_p_value = Some(CoefficientInference::two_sided_p_value(t_int, df));
            result.intercept_conf_interval =
                Some((intercept - t_crit * se_int, intercept + t_crit * se_int));
        }

        Ok(())
    }
}

/// `intercept + X * coefficients`, row by row.
fn linear_predictor(x: &Mat<f64>, coefficients: &Col<f64>, intercept: Option<f64>) -> Col<f64> {
    let base = intercept.unwrap_or(0.0);
    Col::from_fn(x.nrows(), |i| {
        base + (0..x.ncols())
            .map(|j| x[(i, j)] * coefficients[j])
            .sum::<f64>()
    })
}

/// A fitted OLS regression model.
#[derive(Debug, Clone)]
pub struct FittedOls {
    result: RegressionResult,
}

impl FittedOls {
    /// Two-sided p-value of the first predictor's coefficient.
    pub fn slope_p_value(&self) -> Option<f64> {
        self.result.get_p_value(0)
    }
}

impl FittedRegressor for FittedOls {
    fn predict(&self, x: &Mat<f64>) -> Col<f64> {
        linear_predictor(x, &self.result.coefficients, self.result.intercept)
    }

    fn result(&self) -> &RegressionResult {
        &self.result
    }
}

/// Builder for `OlsRegressor`.
#[derive(Debug, Clone, Default)]
pub struct OlsRegressorBuilder {
    builder: RegressionOptionsBuilder,
}

impl OlsRegressorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.builder = self.builder.with_intercept(include);
        self
    }

    /// Set whether to compute inference statistics.
    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.builder = self.builder.compute_inference(compute);
        self
    }

    /// Set the confidence level for coefficient intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.builder = self.builder.confidence_level(level);
        self
    }

    /// Set the rank tolerance for QR decomposition.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.builder = self.builder.rank_tolerance(tol);
        self
    }

    /// Build the OLS regressor. Options are validated when fitting.
    pub fn build(self) -> OlsRegressor {
        OlsRegressor::new(self.builder.build_unchecked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_fit() {
        let x = Mat::from_fn(5, 1, |i, _| i as f64);
        let y = Col::from_fn(5, |i| 2.0 + 3.0 * i as f64);

        let model = OlsRegressor::builder().with_intercept(true).build();
        let fitted = model.fit(&x, &y).expect("model should fit");

        assert!((fitted.coefficients()[0] - 3.0).abs() < 1e-10);
        assert!((fitted.intercept().expect("intercept exists") - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_predict() {
        let x = Mat::from_fn(5, 1, |i, _| i as f64);
        let y = Col::from_fn(5, |i| 2.0 + 3.0 * i as f64);

        let fitted = OlsRegressor::builder().build().fit(&x, &y).unwrap();

        let x_new = Mat::from_fn(2, 1, |i, _| (i + 10) as f64);
        let preds = fitted.predict(&x_new);

        assert!((preds[0] - 32.0).abs() < 1e-10);
        assert!((preds[1] - 35.0).abs() < 1e-10);
    }

    #[test]
    fn test_min_observations() {
        let with = OlsRegressor::builder().build();
        let without = OlsRegressor::builder().with_intercept(false).build();
        assert_eq!(with.min_observations(1), 3);
        assert_eq!(without.min_observations(1), 2);
    }

    #[test]
    fn test_two_rows_rejected() {
        let x = Mat::from_fn(2, 1, |i, _| i as f64);
        let y = Col::from_fn(2, |i| i as f64);

        let err = OlsRegressor::builder().build().fit(&x, &y).unwrap_err();
        assert_eq!(
            err,
            RegressionError::InsufficientObservations { needed: 3, got: 2 }
        );
    }

    #[test]
    fn test_constant_predictor_rejected() {
        let x = Mat::from_fn(6, 1, |_, _| 4.0);
        let y = Col::from_fn(6, |i| i as f64);

        let err = OlsRegressor::builder().build().fit(&x, &y).unwrap_err();
        assert_eq!(err, RegressionError::ConstantPredictor { column: 0 });
    }

    #[test]
    fn test_non_finite_rejected() {
        let x = Mat::from_fn(4, 1, |i, _| i as f64);
        let y = Col::from_fn(4, |i| if i == 2 { f64::NAN } else { 1.0 });

        let err = OlsRegressor::builder().build().fit(&x, &y).unwrap_err();
        assert_eq!(err, RegressionError::NonFiniteInput("response"));
    }

    #[test]
    fn test_invalid_options_reported_on_fit() {
        let x = Mat::from_fn(4, 1, |i, _| i as f64);
        let y = Col::from_fn(4, |i| i as f64);

        let err = OlsRegressor::builder()
            .confidence_level(2.0)
            .build()
            .fit(&x, &y)
            .unwrap_err();
        assert!(matches!(err, RegressionError::InvalidOptions(_)));
    }
}
