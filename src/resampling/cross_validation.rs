//! Repeated random train/test splitting with mean-squared-error scoring.

use super::{PercentileInterval, ResampleDistribution, ResampleError};
use crate::core::{validate_level, OptionsError};
use crate::data::AnalysisTable;
use crate::solvers::{FittedRegressor, OlsRegressor, Regressor};
use crate::utils::select_rows;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

/// Which partition the mean squared error is computed on.
///
/// Both choices skip the same iterations, so train and test intervals drawn
/// with one seed come from the same splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MseEvaluation {
    /// In-sample error on the rows the model was fitted to.
    Train,
    /// Out-of-sample error on the held-out rows.
    #[default]
    Test,
}

/// Cross-validation configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossValidationOptions {
    /// Number of random splits (default: 1000).
    pub iterations: usize,
    /// Probability that a row is labelled train (default: 0.6).
    pub train_prob: f64,
    /// Interval level (default: 0.95).
    pub level: f64,
    /// Partition scored on each split (default: test).
    pub evaluation: MseEvaluation,
}

impl Default for CrossValidationOptions {
    fn default() -> Self {
        Self {
            iterations: 1000,
            train_prob: 0.6,
            level: 0.95,
            evaluation: MseEvaluation::Test,
        }
    }
}

impl CrossValidationOptions {
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn train_prob(mut self, train_prob: f64) -> Self {
        self.train_prob = train_prob;
        self
    }

    pub fn level(mut self, level: f64) -> Self {
        self.level = level;
        self
    }

    pub fn evaluation(mut self, evaluation: MseEvaluation) -> Self {
        self.evaluation = evaluation;
        self
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.iterations == 0 {
            return Err(OptionsError::InvalidIterations(self.iterations));
        }
        if !(self.train_prob > 0.0 && self.train_prob < 1.0) {
            return Err(OptionsError::InvalidTrainProbability(self.train_prob));
        }
        validate_level(self.level)
    }
}

/// Label of a row within one split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

/// Train/test labelling of every row of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub labels: Vec<Split>,
}

impl Partition {
    /// Label each of `n` rows independently: train with probability
    /// `train_prob`, test otherwise. Split sizes vary from draw to draw.
    ///
    /// `train_prob` must lie in `[0, 1]`.
    pub fn draw<R: Rng + ?Sized>(n: usize, train_prob: f64, rng: &mut R) -> Self {
        let labels = (0..n)
            .map(|_| {
                if rng.gen_bool(train_prob) {
                    Split::Train
                } else {
                    Split::Test
                }
            })
            .collect();
        Self { labels }
    }

    pub fn train_indices(&self) -> Vec<usize> {
        self.indices_of(Split::Train)
    }

    pub fn test_indices(&self) -> Vec<usize> {
        self.indices_of(Split::Test)
    }

    /// Share of rows labelled train; `None` for an empty partition.
    pub fn train_fraction(&self) -> Option<f64> {
        if self.labels.is_empty() {
            return None;
        }
        let train = self.labels.iter().filter(|&&s| s == Split::Train).count();
        Some(train as f64 / self.labels.len() as f64)
    }

    fn indices_of(&self, split: Split) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == split)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Mean squared errors over `options.iterations` random splits of `table`.
///
/// An iteration is skipped, and counted in `skipped`, when its test partition
/// is empty or when the model cannot be fitted on its train rows (fewer than
/// three, or all with the same commitment). Both rules apply whichever
/// partition is evaluated, so train and test runs with the same seed keep the
/// same iterations. Skipped iterations are not retried.
pub fn cross_validated_mse<R: Rng + ?Sized>(
    table: &AnalysisTable,
    options: &CrossValidationOptions,
    rng: &mut R,
) -> Result<ResampleDistribution, ResampleError> {
    options.validate()?;

    let regressor = OlsRegressor::builder().compute_inference(false).build();
    let (x, y) = table.design();
    regressor.fit(&x, &y)?;

    let mut values = Vec::with_capacity(options.iterations);
    let mut skipped = 0;

    for iteration in 0..options.iterations {
        let partition = Partition::draw(table.len(), options.train_prob, rng);
        let train = partition.train_indices();
        let test = partition.test_indices();
        if test.is_empty() {
            debug!(iteration, "skipping split: test partition is empty");
            skipped += 1;
            continue;
        }

        let (x_train, y_train) = select_rows(&x, &y, &train);
        let fitted = match regressor.fit(&x_train, &y_train) {
            Ok(fitted) => fitted,
            Err(err) => {
                debug!(iteration, train = train.len(), %err, "skipping split: train fit failed");
                skipped += 1;
                continue;
            }
        };

        let evaluated = match options.evaluation {
            MseEvaluation::Train => &train,
            MseEvaluation::Test => &test,
        };
        let (x_eval, y_eval) = select_rows(&x, &y, evaluated);
        match fitted.mean_squared_error(&x_eval, &y_eval) {
            Some(mse) => values.push(mse),
            None => {
                debug!(iteration, "skipping split: evaluated partition is empty");
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

/// Percentile interval of the cross-validated mean squared error.
pub fn cross_validated_mse_ci<R: Rng + ?Sized>(
    table: &AnalysisTable,
    options: &CrossValidationOptions,
    rng: &mut R,
) -> Result<PercentileInterval, ResampleError> {
    let distribution = cross_validated_mse(table, options, rng)?;
    let interval = distribution.percentile_interval(options.level)?;

    info!(
        rows = table.len(),
        evaluation = ?options.evaluation,
        iterations = interval.iterations,
        skipped = interval.skipped,
        lower = interval.lower,
        upper = interval.upper,
        "cross-validated MSE interval"
    );
    Ok(interval)
}

/// [`cross_validated_mse_ci`] at the 95% level with a `StdRng` seeded from `seed`.
pub fn cross_validated_mse_ci_seeded(
    table: &AnalysisTable,
    iterations: usize,
    train_prob: f64,
    evaluation: MseEvaluation,
    seed: u64,
) -> Result<PercentileInterval, ResampleError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let options = CrossValidationOptions::default()
        .iterations(iterations)
        .train_prob(train_prob)
        .evaluation(evaluation);
    cross_validated_mse_ci(table, &options, &mut rng)
}
