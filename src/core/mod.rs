//! Core types for regression analysis.

mod options;
mod result;

pub(crate) use options::validate_level;
pub use options::{OptionsError, RegressionOptions, RegressionOptionsBuilder};
pub use result::RegressionResult;
