//! Ontario research funding and GDP growth: ordinary least squares with
//! bootstrap and cross-validated reliability estimates.
//!
//! The analysis joins annual research-funding commitments with the annual
//! percent change of Ontario GDP, regresses the latter on the former, and
//! asks how stable that fit is:
//!
//! - a percentile bootstrap interval for the slope;
//! - percentile intervals of in-sample and out-of-sample mean squared error
//!   over repeated random train/test splits.
//!
//! # Example
//!
//! ```rust
//! use research_gdp::prelude::*;
//!
//! let d = AnalysisTable::from_records(
//!     [(1.0, 2.0), (2.0, 4.0), (3.0, 5.0), (4.0, 4.0), (5.0, 5.0)]
//!         .iter()
//!         .zip(2001..)
//!         .map(|(&(ontario_commitment, gdp_change), year)| JoinedRecord {
//!             year,
//!             ontario_commitment,
//!             gdp_change,
//!         })
//!         .collect(),
//! );
//!
//! let fitted = d.fit_ols()?;
//! println!("slope = {}, R² = {}", fitted.slope(), fitted.r_squared());
//!
//! let ci = bootstrap_slope_ci_seeded(&d, 1000, 0)?;
//! println!("95% CI [{}, {}], contains 0: {}", ci.lower, ci.upper, ci.contains_zero());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod data;
pub mod inference;
pub mod report;
pub mod resampling;
pub mod solvers;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{OptionsError, RegressionOptions, RegressionOptionsBuilder, RegressionResult};
    pub use crate::data::{
        load_funding, load_gdp, AnalysisTable, DataError, FundingRecord, GdpRecord, JoinedRecord,
        LoadOptions,
    };
    pub use crate::report::{Report, ReportConfig, ReportError, VariantOutcome};
    pub use crate::resampling::{
        bootstrap_slope_ci, bootstrap_slope_ci_seeded, cross_validated_mse_ci,
        cross_validated_mse_ci_seeded, BootstrapOptions, CrossValidationOptions, MseEvaluation,
        PercentileInterval, ResampleError,
    };
    pub use crate::solvers::{FittedOls, FittedRegressor, OlsRegressor, RegressionError, Regressor};
}

pub use crate::core::{OptionsError, RegressionOptions, RegressionResult};
pub use crate::data::{AnalysisTable, DataError, LoadOptions};
pub use crate::report::{Report, ReportConfig, ReportError};
pub use crate::solvers::{FittedOls, FittedRegressor, OlsRegressor, RegressionError, Regressor};
