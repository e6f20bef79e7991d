//! Sample quantiles.

/// Sample quantile with linear interpolation between order statistics
/// (Hyndman & Fan type 7, the default of R's `quantile()`).
///
/// Returns `None` for an empty sample, a `q` outside `[0, 1]`, or a sample
/// containing NaN.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) || values.iter().any(|v| v.is_nan()) {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(quantile_sorted(&sorted, q))
}

/// Several quantiles of the same sample with a single sort.
pub fn quantiles(values: &[f64], qs: &[f64]) -> Option<Vec<f64>> {
    if values.is_empty()
        || qs.iter().any(|q| !(0.0..=1.0).contains(q))
        || values.iter().any(|v| v.is_nan())
    {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(qs.iter().map(|&q| quantile_sorted(&sorted, q)).collect())
}

/// Type-7 quantile of an already sorted, non-empty slice.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let h = (n - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;

    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
    }
}
