//! Coefficient inference calculations.

use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Computes inference statistics for regression coefficients.
pub struct CoefficientInference;

impl CoefficientInference {
    /// Compute standard errors for OLS coefficients.
    ///
    /// SE(β_j) = sqrt(σ² * (X'X)^(-1)_{jj}), where X is augmented with a
    /// leading column of ones when the model has an intercept, matching R's `lm()`.
    ///
    /// Returns (coefficient_SE, intercept_SE).
    pub fn standard_errors(
        x: &Mat<f64>,
        mse: f64,
        with_intercept: bool,
    ) -> Result<(Col<f64>, Option<f64>), &'static str> {
        let n_features = x.ncols();
        let offset = usize::from(with_intercept);

        let design = Self::design_matrix(x, with_intercept);
        let xtx_inv = Self::invert(&(design.transpose() * &design))?;

        let se_of = |k: usize| {
            let var = mse * xtx_inv[(k, k)];
            if var >= 0.0 {
                var.sqrt()
            } else {
                f64::NAN
            }
        };

        let se_coef = Col::from_fn(n_features, |j| se_of(j + offset));
        let se_intercept = with_intercept.then(|| se_of(0));

        Ok((se_coef, se_intercept))
    }

    /// Compute t-statistics for coefficients.
    ///
    /// t_j = β_j / SE(β_j)
    pub fn t_statistics(coefficients: &Col<f64>, std_errors: &Col<f64>) -> Col<f64> {
        Col::from_fn(coefficients.nrows(), |j| {
            Self::t_statistic(coefficients[j], std_errors[j])
        })
    }

    /// Single t-statistic; NaN when the standard error is zero or undefined.
    pub fn t_statistic(estimate: f64, std_error: f64) -> f64 {
        if std_error.is_nan() || std_error == 0.0 {
            f64::NAN
        } else {
            estimate / std_error
        }
    }

    /// Compute p-values from t-statistics.
    ///
    /// p_j = 2 * P(|T| > |t_j|) where T ~ t(df)
    pub fn p_values(t_statistics: &Col<f64>, df: f64) -> Col<f64> {
        Col::from_fn(t_statistics.nrows(), |j| {
            Self::two_sided_p_value(t_statistics[j], df)
        })
    }

    /// Two-tailed p-value of a single t-statistic.
    pub fn two_sided_p_value(t: f64, df: f64) -> f64 {
        if t.is_nan() {
            return f64::NAN;
        }
        match Self::t_distribution(df) {
            Some(dist) => 2.0 * (1.0 - dist.cdf(t.abs())),
            None => f64::NAN,
        }
    }

    /// Critical value t_{α/2, df} for a two-sided interval at `confidence_level`.
    pub fn t_critical(confidence_level: f64, df: f64) -> f64 {
        Self::t_distribution(df).map_or(f64::NAN, |dist| {
            dist.inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0)
        })
    }

    /// Compute confidence intervals for coefficients.
    ///
    /// CI_j = β_j ± t_{α/2, df} * SE(β_j)
    pub fn confidence_intervals(
        coefficients: &Col<f64>,
        std_errors: &Col<f64>,
        df: f64,
        confidence_level: f64,
    ) -> (Col<f64>, Col<f64>) {
        let n = coefficients.nrows();
        let t_crit = Self::t_critical(confidence_level, df);

        let lower = Col::from_fn(n, |j| coefficients[j] - t_crit * std_errors[j]);
        let upper = Col::from_fn(n, |j| coefficients[j] + t_crit * std_errors[j]);

        (lower, upper)
    }

    fn t_distribution(df: f64) -> Option<StudentsT> {
        if df > 0.0 {
            StudentsT::new(0.0, 1.0, df).ok()
        } else {
            None
        }
    }

    /// `[1 | X]` when an intercept is fitted, otherwise a copy of `X`.
    fn design_matrix(x: &Mat<f64>, with_intercept: bool) -> Mat<f64> {
        if with_intercept {
            Mat::from_fn(x.nrows(), x.ncols() + 1, |i, j| {
                if j == 0 {
                    1.0
                } else {
                    x[(i, j - 1)]
                }
            })
        } else {
            x.clone()
        }
    }

    /// Invert a small square matrix through its QR decomposition.
    fn invert(a: &Mat<f64>) -> Result<Mat<f64>, &'static str> {
        let size = a.nrows();
        let qr = a.qr();
        let q = qr.compute_Q();
        let r = qr.R();

        for i in 0..size {
            if r[(i, i)].abs() < 1e-10 {
                return Err("matrix is singular");
            }
        }

        // Solve R * X = Q' column by column
        let qt = q.transpose();
        let mut inv = Mat::zeros(size, size);
        for col in 0..size {
            for i in (0..size).rev() {
                let mut sum = qt[(i, col)];
                for j in (i + 1)..size {
                    sum -= r[(i, j)] * inv[(j, col)];
                }
                inv[(i, col)] = sum / r[(i, i)];
            }
        }

        Ok(inv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_t_statistics() {
        let coefficients = Col::from_fn(3, |i| (i + 1) as f64);
        let std_errors = Col::from_fn(3, |_| 0.5);

        let t_stats = CoefficientInference::t_statistics(&coefficients, &std_errors);

        assert!((t_stats[0] - 2.0).abs() < 1e-10);
        assert!((t_stats[1] - 4.0).abs() < 1e-10);
        assert!((t_stats[2] - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_t_statistic_zero_se_is_nan() {
        assert!(CoefficientInference::t_statistic(1.0, 0.0).is_nan());
    }

    #[test]
    fn test_p_values_bounds() {
        let t_stats = Col::from_fn(3, |i| (i + 1) as f64);
        let p_vals = CoefficientInference::p_values(&t_stats, 10.0);

        for j in 0..3 {
            assert!(p_vals[j] > 0.0 && p_vals[j] < 1.0);
        }
        // Larger |t| gives smaller p
        assert!(p_vals[0] > p_vals[1]);
        assert!(p_vals[1] > p_vals[2]);
    }

    #[test]
    fn test_p_value_symmetric_in_sign() {
        let p_pos = CoefficientInference::two_sided_p_value(2.1, 3.0);
        let p_neg = CoefficientInference::two_sided_p_value(-2.1, 3.0);
        assert!((p_pos - p_neg).abs() < 1e-12);
    }

    #[test]
    fn test_p_value_undefined_without_df() {
        assert!(CoefficientInference::two_sided_p_value(2.0, 0.0).is_nan());
    }

    #[test]
    fn test_t_critical_large_df_approaches_normal() {
        let t = CoefficientInference::t_critical(0.95, 1e6);
        assert!((t - 1.959964).abs() < 1e-3);
    }

    #[test]
    fn test_standard_errors_simple_regression() {
        // x = 1..5, residual variance 0.8 => SE(slope) = sqrt(0.8 / 10)
        let x = Mat::from_fn(5, 1, |i, _| (i + 1) as f64);
        let (se, se_int) = CoefficientInference::standard_errors(&x, 0.8, true).unwrap();

        assert!((se[0] - (0.08f64).sqrt()).abs() < 1e-10);
        // SE(intercept) = sqrt(mse * (1/n + xbar^2 / Sxx)) = sqrt(0.8 * 1.1)
        assert!((se_int.unwrap() - (0.88f64).sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_standard_errors_singular() {
        let x = Mat::from_fn(4, 1, |_, _| 2.0);
        assert!(CoefficientInference::standard_errors(&x, 1.0, true).is_err());
    }
}
