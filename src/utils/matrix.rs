//! Matrix utility functions.

use faer::{Col, Mat};

/// Detect columns that are constant (zero variance).
pub fn detect_constant_columns(x: &Mat<f64>, tolerance: f64) -> Vec<bool> {
    let n_cols = x.ncols();
    let n_rows = x.nrows();

    if n_rows == 0 {
        return vec![true; n_cols];
    }

    (0..n_cols)
        .map(|j| {
            let first = x[(0, j)];
            (1..n_rows).all(|i| (x[(i, j)] - first).abs() < tolerance)
        })
        .collect()
}

/// Center a matrix by subtracting column means.
pub fn center_columns(x: &Mat<f64>) -> (Mat<f64>, Col<f64>) {
    let n_rows = x.nrows();
    let n_cols = x.ncols();

    let mut means = Col::zeros(n_cols);
    for j in 0..n_cols {
        let sum: f64 = (0..n_rows).map(|i| x[(i, j)]).sum();
        means[j] = sum / n_rows as f64;
    }

    let centered = Mat::from_fn(n_rows, n_cols, |i, j| x[(i, j)] - means[j]);

    (centered, means)
}

/// Center a vector by subtracting the mean.
pub fn center_vector(y: &Col<f64>) -> (Col<f64>, f64) {
    let n = y.nrows();
    let mean: f64 = y.iter().sum::<f64>() / n as f64;

    let centered = Col::from_fn(n, |i| y[i] - mean);

    (centered, mean)
}

/// Gather the given rows of `x` and `y` (indices may repeat).
pub fn select_rows(x: &Mat<f64>, y: &Col<f64>, rows: &[usize]) -> (Mat<f64>, Col<f64>) {
    let x_sel = Mat::from_fn(rows.len(), x.ncols(), |i, j| x[(rows[i], j)]);
    let y_sel = Col::from_fn(rows.len(), |i| y[rows[i]]);
    (x_sel, y_sel)
}
