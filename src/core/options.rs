//! Regression and resampling options.

use thiserror::Error;

/// Configuration options for the OLS estimator.
#[derive(Debug, Clone)]
pub struct RegressionOptions {
    /// Whether to include an intercept term (default: true).
    pub with_intercept: bool,
    /// Whether to compute standard errors and inference statistics (default: true).
    pub compute_inference: bool,
    /// Confidence level for coefficient confidence intervals (default: 0.95).
    pub confidence_level: f64,
    /// Tolerance used for rank determination and constant-column detection.
    pub rank_tolerance: f64,
}

impl Default for RegressionOptions {
    fn default() -> Self {
        Self {
            with_intercept: true,
            compute_inference: true,
            confidence_level: 0.95,
            rank_tolerance: 1e-10,
        }
    }
}

/// Errors that can occur when validating options.
#[derive(Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("confidence_level must be in (0, 1), got {0}")]
    InvalidConfidenceLevel(f64),
    #[error("rank_tolerance must be positive, got {0}")]
    InvalidRankTolerance(f64),
    #[error("iterations must be at least 1, got {0}")]
    InvalidIterations(usize),
    #[error("train_prob must be in (0, 1), got {0}")]
    InvalidTrainProbability(f64),
    #[error("quantile must be in [0, 1], got {0}")]
    InvalidQuantile(f64),
}

impl RegressionOptions {
    /// Create a new builder for regression options.
    pub fn builder() -> RegressionOptionsBuilder {
        RegressionOptionsBuilder::default()
    }

    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        validate_level(self.confidence_level)?;
        if self.rank_tolerance.is_nan() || self.rank_tolerance <= 0.0 {
            return Err(OptionsError::InvalidRankTolerance(self.rank_tolerance));
        }
        Ok(())
    }
}

/// Check that a confidence level lies strictly inside (0, 1).
pub(crate) fn validate_level(level: f64) -> Result<(), OptionsError> {
    if level > 0.0 && level < 1.0 {
        Ok(())
    } else {
        Err(OptionsError::InvalidConfidenceLevel(level))
    }
}

/// Builder for `RegressionOptions`.
#[derive(Debug, Clone, Default)]
pub struct RegressionOptionsBuilder {
    options: RegressionOptions,
}

impl RegressionOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.options.with_intercept = include;
        self
    }

    /// Set whether to compute inference statistics.
    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.options.compute_inference = compute;
        self
    }

    /// Set the confidence level for coefficient intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.options.confidence_level = level;
        self
    }

    /// Set the rank tolerance for QR decomposition.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.options.rank_tolerance = tol;
        self
    }

    /// Build and validate the options.
    pub fn build(self) -> Result<RegressionOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }

    /// Build the options without validation.
    pub fn build_unchecked(self) -> RegressionOptions {
        self.options
    }
}
