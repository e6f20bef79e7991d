//! The joined analysis table and its one-sided outlier trim.

use super::{DataError, FundingRecord, GdpRecord};
use crate::core::OptionsError;
use crate::solvers::{FittedOls, OlsRegressor, RegressionError, Regressor};
use crate::utils::{quantile, quantiles};
use faer::{Col, Mat};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// One year present in both datasets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JoinedRecord {
    pub year: i32,
    /// Total research commitment approved that year (predictor).
    pub ontario_commitment: f64,
    /// GDP percent change from the prior year (response).
    pub gdp_change: f64,
}

/// Immutable analysis table, sorted by year.
///
/// Built once by [`AnalysisTable::join`]; every model fit and resampling run
/// reads it without modification.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnalysisTable {
    records: Vec<JoinedRecord>,
}

/// A trimmed table together with the threshold that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrimmedTable {
    pub table: AnalysisTable,
    /// Rows with `gdp_change` below this value were removed.
    pub threshold: f64,
    pub quantile: f64,
    pub removed: usize,
}

impl AnalysisTable {
    /// Inner join on year.
    ///
    /// Years missing from either side are dropped silently, as are years whose
    /// GDP percent change is undefined.
    pub fn join(funding: &[FundingRecord], gdp: &[GdpRecord]) -> Self {
        let changes: BTreeMap<i32, Option<f64>> =
            gdp.iter().map(|g| (g.year, g.percent_change)).collect();

        let records: Vec<JoinedRecord> = funding
            .iter()
            .filter_map(|f| {
                let change = changes.get(&f.year).copied().flatten()?;
                Some(JoinedRecord {
                    year: f.year,
                    ontario_commitment: f.total_commitment,
                    gdp_change: change,
                })
            })
            .collect();

        debug!(
            funding_years = funding.len(),
            gdp_years = gdp.len(),
            joined = records.len(),
            "joined funding and GDP"
        );
        Self::from_records(records)
    }

    /// Wrap already-joined rows, sorting them by year.
    pub fn from_records(mut records: Vec<JoinedRecord>) -> Self {
        records.sort_by_key(|r| r.year);
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[JoinedRecord] {
        &self.records
    }

    pub fn years(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.year).collect()
    }

    pub fn commitments(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.ontario_commitment).collect()
    }

    pub fn gdp_changes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.gdp_change).collect()
    }

    /// Design matrix (commitment as the single column) and response vector.
    pub fn design(&self) -> (Mat<f64>, Col<f64>) {
        let n = self.records.len();
        let x = Mat::from_fn(n, 1, |i, _| self.records[i].ontario_commitment);
        let y = Col::from_fn(n, |i| self.records[i].gdp_change);
        (x, y)
    }

    /// Fit `gdp_change ~ ontario_commitment` with the given estimator.
    pub fn fit(&self, regressor: &OlsRegressor) -> Result<FittedOls, RegressionError> {
        let (x, y) = self.design();
        regressor.fit(&x, &y)
    }

    /// Fit `gdp_change ~ ontario_commitment` by OLS with an intercept.
    pub fn fit_ols(&self) -> Result<FittedOls, RegressionError> {
        self.fit(&OlsRegressor::default())
    }

    /// Remove the low tail of `gdp_change`.
    ///
    /// Keeps rows with `gdp_change` in `[quantile(q), max]`: only values
    /// strictly below the `q`-th quantile go, high values are always retained.
    pub fn trim_low_outliers(&self, q: f64) -> Result<TrimmedTable, DataError> {
        if self.is_empty() {
            return Err(DataError::EmptyTable);
        }
        let threshold =
            quantile(&self.gdp_changes(), q).ok_or(OptionsError::InvalidQuantile(q))?;

        let kept: Vec<JoinedRecord> = self
            .records
            .iter()
            .filter(|r| r.gdp_change >= threshold)
            .copied()
            .collect();
        let removed = self.len() - kept.len();

        debug!(q, threshold, removed, "trimmed low gdp_change outliers");
        Ok(TrimmedTable {
            table: AnalysisTable { records: kept },
            threshold,
            quantile: q,
            removed,
        })
    }

    /// Per-column summaries and the commitment/GDP-change correlation.
    ///
    /// Returns `None` for an empty table.
    pub fn describe(&self) -> Option<Description> {
        let commitment = ColumnSummary::of(&self.commitments())?;
        let gdp_change = ColumnSummary::of(&self.gdp_changes())?;
        let correlation = pearson(&self.commitments(), &self.gdp_changes());

        Some(Description {
            n: self.len(),
            first_year: self.records.first()?.year,
            last_year: self.records.last()?.year,
            commitment,
            gdp_change,
            correlation,
        })
    }
}

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub mean: f64,
    /// Sample standard deviation (n - 1); NaN for a single value.
    pub std_dev: f64,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

impl ColumnSummary {
    fn of(values: &[f64]) -> Option<Self> {
        let qs = quantiles(values, &[0.0, 0.5, 1.0])?;
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);

        Some(Self {
            mean,
            std_dev: var.sqrt(),
            min: qs[0],
            median: qs[1],
            max: qs[2],
        })
    }
}

/// Descriptive overview of an analysis table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Description {
    pub n: usize,
    pub first_year: i32,
    pub last_year: i32,
    pub commitment: ColumnSummary,
    pub gdp_change: ColumnSummary,
    /// Pearson correlation; NaN when either column is constant.
    pub correlation: f64,
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;

    let (sxy, sxx, syy) = x.iter().zip(y).fold((0.0, 0.0, 0.0), |acc, (&a, &b)| {
        let (da, db) = (a - mx, b - my);
        (acc.0 + da * db, acc.1 + da * da, acc.2 + db * db)
    });

    if sxx == 0.0 || syy == 0.0 {
        f64::NAN
    } else {
        sxy / (sxx * syy).sqrt()
    }
}
