//! Resampling estimates of model reliability: bootstrap intervals for the
//! slope and cross-validated mean squared error.
//!
//! Every procedure takes its random source as an explicit `&mut R where R:
//! Rng`, so a run is fully determined by the generator state it is handed.
//! The `*_seeded` variants construct a `StdRng` from a `u64` seed.

mod bootstrap;
mod cross_validation;
mod interval;

pub use bootstrap::{
    bootstrap_slope_ci, bootstrap_slope_ci_seeded, bootstrap_slopes, BootstrapOptions, Resample,
};
pub use cross_validation::{
    cross_validated_mse, cross_validated_mse_ci, cross_validated_mse_ci_seeded,
    CrossValidationOptions, MseEvaluation, Partition, Split,
};
pub use interval::{PercentileInterval, ResampleDistribution};

use crate::core::OptionsError;
use crate::solvers::RegressionError;
use thiserror::Error;

/// Errors from resampling procedures.
#[derive(Debug, Error)]
pub enum ResampleError {
    #[error("invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),

    #[error("model cannot be fitted on the full table: {0}")]
    Unfittable(#[from] RegressionError),

    #[error("all {iterations} iterations produced an undefined statistic")]
    NoValidIterations { iterations: usize },
}
