//! The complete analysis: model summaries and resampling intervals for the
//! full table and its low-outlier-trimmed variant.

use crate::data::{load_funding, load_gdp, AnalysisTable, DataError, Description, LoadOptions};
use crate::resampling::{
    bootstrap_slope_ci, cross_validated_mse_ci, BootstrapOptions, CrossValidationOptions,
    MseEvaluation, PercentileInterval, ResampleError,
};
use crate::solvers::{FittedOls, FittedRegressor, RegressionError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Errors from running the report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("model fit failed: {0}")]
    Regression(#[from] RegressionError),

    #[error("resampling failed: {0}")]
    Resample(#[from] ResampleError),
}

/// Settings shared by every randomized procedure of the report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportConfig {
    /// Every procedure draws from its own `StdRng` seeded with this value.
    pub seed: u64,
    pub iterations: usize,
    pub train_prob: f64,
    pub level: f64,
    /// Quantile of `gdp_change` below which rows are trimmed.
    pub trim_quantile: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            iterations: 1000,
            train_prob: 0.6,
            level: 0.95,
            trim_quantile: 0.05,
        }
    }
}

impl ReportConfig {
    fn bootstrap(&self) -> BootstrapOptions {
        BootstrapOptions::default()
            .iterations(self.iterations)
            .level(self.level)
    }

    fn cross_validation(&self, evaluation: MseEvaluation) -> CrossValidationOptions {
        CrossValidationOptions::default()
            .iterations(self.iterations)
            .train_prob(self.train_prob)
            .level(self.level)
            .evaluation(evaluation)
    }
}

/// Headline statistics of one OLS fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub n: usize,
    pub slope: f64,
    pub intercept: f64,
    pub slope_std_error: f64,
    pub slope_t: f64,
    pub slope_p_value: f64,
    pub intercept_p_value: f64,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub f_p_value: f64,
}

impl ModelSummary {
    pub fn from_fitted(fitted: &FittedOls) -> Self {
        let result = fitted.result();
        Self {
            n: result.n_observations,
            slope: fitted.slope(),
            intercept: result.intercept.unwrap_or(f64::NAN),
            slope_std_error: result.get_std_error(0).unwrap_or(f64::NAN),
            slope_t: result
                .t_statistics
                .as_ref()
                .map_or(f64::NAN, |t| t[0]),
            slope_p_value: fitted.slope_p_value().unwrap_or(f64::NAN),
            intercept_p_value: result.intercept_p_value.unwrap_or(f64::NAN),
            r_squared: result.r_squared,
            adj_r_squared: result.adj_r_squared,
            f_statistic: result.f_statistic,
            f_p_value: result.f_pvalue,
        }
    }
}

/// Model and intervals for one table variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantReport {
    pub model: ModelSummary,
    pub slope_interval: PercentileInterval,
    /// Whether the bootstrap slope interval contains zero.
    pub slope_interval_contains_zero: bool,
    pub train_mse: PercentileInterval,
    pub test_mse: PercentileInterval,
}

impl VariantReport {
    pub fn run(table: &AnalysisTable, config: &ReportConfig) -> Result<Self, ReportError> {
        let fitted = table.fit_ols()?;

        let slope_interval = bootstrap_slope_ci(
            table,
            &config.bootstrap(),
            &mut StdRng::seed_from_u64(config.seed),
        )?;
        let train_mse = cross_validated_mse_ci(
            table,
            &config.cross_validation(MseEvaluation::Train),
            &mut StdRng::seed_from_u64(config.seed),
        )?;
        let test_mse = cross_validated_mse_ci(
            table,
            &config.cross_validation(MseEvaluation::Test),
            &mut StdRng::seed_from_u64(config.seed),
        )?;

        Ok(Self {
            model: ModelSummary::from_fitted(&fitted),
            slope_interval_contains_zero: slope_interval.contains_zero(),
            slope_interval,
            train_mse,
            test_mse,
        })
    }
}

/// Result of analysing one table variant that is allowed to fail.
///
/// A trimmed table can be too small for every procedure, e.g. no split of
/// three rows has both three train rows and a test row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum VariantOutcome {
    Complete(VariantReport),
    Unavailable { reason: String },
}

impl VariantOutcome {
    fn run(table: &AnalysisTable, config: &ReportConfig) -> Self {
        match VariantReport::run(table, config) {
            Ok(report) => Self::Complete(report),
            Err(err) => {
                warn!(rows = table.len(), %err, "variant analysis unavailable");
                Self::Unavailable {
                    reason: err.to_string(),
                }
            }
        }
    }

    pub fn report(&self) -> Option<&VariantReport> {
        match self {
            Self::Complete(report) => Some(report),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Rows removed by the low-tail trim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrimSummary {
    pub quantile: f64,
    pub threshold: f64,
    pub removed: usize,
    pub removed_years: Vec<i32>,
}

/// The full analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub config: ReportConfig,
    pub description: Description,
    pub trim: TrimSummary,
    /// All joined years (`d`).
    pub full: VariantReport,
    /// Low-tail outliers removed (`dfilt`).
    pub filtered: VariantOutcome,
}

impl Report {
    /// Run every model and resampling procedure on `d` and its trimmed variant.
    pub fn run(d: &AnalysisTable, config: &ReportConfig) -> Result<Self, ReportError> {
        let description = d.describe().ok_or(DataError::EmptyTable)?;
        let trimmed = d.trim_low_outliers(config.trim_quantile)?;

        let kept = trimmed.table.years();
        let removed_years = d.years().into_iter().filter(|y| !kept.contains(y)).collect();

        info!(rows = d.len(), "analysing full table");
        let full = VariantReport::run(d, config)?;
        info!(rows = trimmed.table.len(), "analysing trimmed table");
        let filtered = VariantOutcome::run(&trimmed.table, config);

        Ok(Self {
            config: *config,
            description,
            trim: TrimSummary {
                quantile: trimmed.quantile,
                threshold: trimmed.threshold,
                removed: trimmed.removed,
                removed_years,
            },
            full,
            filtered,
        })
    }

    /// Load both input files, join them and run the report.
    pub fn from_files(
        funding: impl AsRef<Path>,
        gdp: impl AsRef<Path>,
        load: &LoadOptions,
        config: &ReportConfig,
    ) -> Result<Self, ReportError> {
        let funding = load_funding(funding, load)?;
        let gdp = load_gdp(gdp, load)?;
        let d = AnalysisTable::join(&funding, &gdp);
        Self::run(&d, config)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.description;
        writeln!(
            f,
            "Research funding vs GDP change, {}-{} ({} years)",
            d.first_year, d.last_year, d.n
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<20} {:>16} {:>16} {:>16} {:>16} {:>16}",
            "column", "mean", "std dev", "min", "median", "max"
        )?;
        for (name, s) in [("commitment", &d.commitment), ("gdp change (%)", &d.gdp_change)] {
            writeln!(
                f,
                "{:<20} {:>16.4} {:>16.4} {:>16.4} {:>16.4} {:>16.4}",
                name, s.mean, s.std_dev, s.min, s.median, s.max
            )?;
        }
        writeln!(f, "correlation: {:.4}", d.correlation)?;
        writeln!(f)?;
        writeln!(
            f,
            "Trim: gdp change < {:.4} (q = {}) removed {} row(s) {:?}",
            self.trim.threshold, self.trim.quantile, self.trim.removed, self.trim.removed_years
        )?;

        write_variant(f, "All years", &self.full, self.config.level)?;
        match &self.filtered {
            VariantOutcome::Complete(v) => {
                write_variant(f, "Low outliers removed", v, self.config.level)?
            }
            VariantOutcome::Unavailable { reason } => {
                writeln!(f)?;
                writeln!(f, "== Low outliers removed ==")?;
                writeln!(f, "unavailable: {reason}")?;
            }
        }

        writeln!(f)?;
        write!(
            f,
            "seed {}, {} iterations, P(train) = {}",
            self.config.seed, self.config.iterations, self.config.train_prob
        )
    }
}

fn write_variant(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    v: &VariantReport,
    level: f64,
) -> fmt::Result {
    let m = &v.model;
    let level = level * 100.0;
    writeln!(f)?;
    writeln!(f, "== {title} (n = {}) ==", m.n)?;
    writeln!(
        f,
        "slope      {:>14.6e}  se {:.6e}  t {:.4}  p {:.4}",
        m.slope, m.slope_std_error, m.slope_t, m.slope_p_value
    )?;
    writeln!(
        f,
        "intercept  {:>14.6}  p {:.4}",
        m.intercept, m.intercept_p_value
    )?;
    writeln!(
        f,
        "R² {:.4}  adj R² {:.4}  F {:.4} (p {:.4})",
        m.r_squared, m.adj_r_squared, m.f_statistic, m.f_p_value
    )?;
    write_interval(f, &format!("bootstrap slope {level}% CI"), &v.slope_interval)?;
    if v.slope_interval_contains_zero {
        writeln!(f, "  contains 0: cannot reject H0 of no linear relationship")?;
    } else {
        writeln!(f, "  interval excludes 0")?;
    }
    write_interval(f, &format!("train MSE {level}% CI"), &v.train_mse)?;
    write_interval(f, &format!("test MSE {level}% CI"), &v.test_mse)
}

fn write_interval(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    interval: &PercentileInterval,
) -> fmt::Result {
    writeln!(
        f,
        "{label:<28} [{:.6e}, {:.6e}]  ({} used, {} skipped)",
        interval.lower, interval.upper, interval.used, interval.skipped
    )
}
