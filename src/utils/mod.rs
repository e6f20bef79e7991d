//! Numerical helpers shared by the solvers and resampling code.

mod matrix;
mod quantile;

pub use matrix::{center_columns, center_vector, detect_constant_columns, select_rows};
pub use quantile::{quantile, quantiles};
