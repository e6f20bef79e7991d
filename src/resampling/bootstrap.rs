//! Nonparametric (case-resampling) bootstrap of the OLS slope.

use super::{PercentileInterval, ResampleDistribution, ResampleError};
use crate::core::{validate_level, OptionsError};
use crate::data::AnalysisTable;
use crate::solvers::{FittedRegressor, OlsRegressor, Regressor};
use crate::utils::select_rows;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Bootstrap configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootstrapOptions {
    /// Number of resamples (default: 1000).
    pub iterations: usize,
    /// Interval level (default: 0.95).
    pub level: f64,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            iterations: 1000,
            level: 0.95,
        }
    }
}

impl BootstrapOptions {
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn level(mut self, level: f64) -> Self {
        self.level = level;
        self
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.iterations == 0 {
            return Err(OptionsError::InvalidIterations(self.iterations));
        }
        validate_level(self.level)
    }
}

/// Row indices of one bootstrap resample: `n` independent uniform draws
/// with replacement from `0..n`, so duplicates are expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resample {
    pub indices: Vec<usize>,
}

impl Resample {
    pub fn draw<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        Self {
            indices: (0..n).map(|_| rng.gen_range(0..n)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Slopes fitted on `options.iterations` bootstrap resamples of `table`.
///
/// A resample whose predictor values are all equal cannot be fitted; it is
/// counted in `skipped` and contributes no slope. The iteration count is not
/// extended to compensate.
pub fn bootstrap_slopes<R: Rng + ?Sized>(
    table: &AnalysisTable,
    options: &BootstrapOptions,
    rng: &mut R,
) -> Result<ResampleDistribution, ResampleError> {
    options.validate()?;

    let regressor = OlsRegressor::builder().compute_inference(false).build();
    let (x, y) = table.design();
    regressor.fit(&x, &y)?;

    let n = table.len();
    let mut values = Vec::with_capacity(options.iterations);
    let mut skipped = 0;

    for iteration in 0..options.iterations {
        let resample = Resample::draw(n, rng);
        let (xb, yb) = select_rows(&x, &y, &resample.indices);

        match regressor.fit(&xb, &yb) {
            Ok(fitted) => values.push(fitted.slope()),
            Err(err) => {
                debug!(iteration, %err, "skipping degenerate bootstrap resample");
                skipped += 1;
            }
        }
    }

    Ok(ResampleDistribution {
        values,
        iterations: options.iterations,
        skipped,
    })
}

/// Percentile bootstrap confidence interval for the slope of
/// `gdp_change ~ ontario_commitment`.
pub fn bootstrap_slope_ci<R: Rng + ?Sized>(
    table: &AnalysisTable,
    options: &BootstrapOptions,
    rng: &mut R,
) -> Result<PercentileInterval, ResampleError> {
    let distribution = bootstrap_slopes(table, options, rng)?;
    let interval = distribution.percentile_interval(options.level)?;

    info!(
        rows = table.len(),
        iterations = interval.iterations,
        skipped = interval.skipped,
        lower = interval.lower,
        upper = interval.upper,
        "bootstrap slope interval"
    );
    Ok(interval)
}

/// [`bootstrap_slope_ci`] at the 95% level with a `StdRng` seeded from `seed`.
pub fn bootstrap_slope_ci_seeded(
    table: &AnalysisTable,
    iterations: usize,
    seed: u64,
) -> Result<PercentileInterval, ResampleError> {
    let mut rng = StdRng::seed_from_u64(seed);
    bootstrap_slope_ci(
        table,
        &BootstrapOptions::default().iterations(iterations),
        &mut rng,
    )
}
