//! Percentile intervals over a resampled statistic.

use super::ResampleError;
use crate::core::validate_level;
use crate::utils::quantiles;
use serde::Serialize;

/// Values of a statistic collected over resampling iterations.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampleDistribution {
    /// One value per iteration that produced a defined statistic, in draw order.
    pub values: Vec<f64>,
    /// Iterations requested.
    pub iterations: usize,
    /// Iterations excluded because the statistic was undefined.
    pub skipped: usize,
}

impl ResampleDistribution {
    /// The equal-tailed percentile interval at `level`, e.g. the 2.5th and
    /// 97.5th percentiles for `level = 0.95`.
    pub fn percentile_interval(&self, level: f64) -> Result<PercentileInterval, ResampleError> {
        validate_level(level)?;
        let alpha = (1.0 - level) / 2.0;

        let bounds = quantiles(&self.values, &[alpha, 1.0 - alpha]).ok_or(
            ResampleError::NoValidIterations {
                iterations: self.iterations,
            },
        )?;

        Ok(PercentileInterval {
            lower: bounds[0],
            upper: bounds[1],
            level,
            iterations: self.iterations,
            used: self.values.len(),
            skipped: self.skipped,
        })
    }
}

/// Percentile confidence interval from a resampling run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileInterval {
    pub lower: f64,
    pub upper: f64,
    pub level: f64,
    pub iterations: usize,
    /// Iterations that contributed a value.
    pub used: usize,
    /// Iterations excluded as undefined.
    pub skipped: usize,
}

impl PercentileInterval {
    /// Whether `value` lies within `[lower, upper]`.
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// For a slope interval: `true` means the hypothesis of no linear
    /// relationship cannot be rejected at this level.
    pub fn contains_zero(&self) -> bool {
        self.contains(0.0)
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}
