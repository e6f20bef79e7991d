//! Data preparation: loading, cleaning, reshaping and joining the two
//! annual datasets into the analysis table.
//!
//! ```
//! use research_gdp::data::{AnalysisTable, FundingRecord, GdpRecord};
//!
//! let funding = FundingRecord::aggregate([(2008, 10.0), (2008, 5.0), (2009, 20.0)]);
//! let gdp = GdpRecord::from_series(2007, &[100.0, 102.0, 101.0]);
//!
//! let d = AnalysisTable::join(&funding, &gdp);
//! assert_eq!(d.years(), vec![2008, 2009]);
//! assert_eq!(d.commitments(), vec![15.0, 20.0]);
//! ```

mod currency;
mod funding;
mod gdp;
mod table;

pub use currency::{parse_currency, parse_year};
pub use funding::{load_funding, read_funding, FundingRecord};
pub use gdp::{load_gdp, read_gdp, GdpRecord};
pub use table::{AnalysisTable, ColumnSummary, Description, JoinedRecord, TrimmedTable};

use crate::core::OptionsError;
use thiserror::Error;

/// Errors raised while loading or preparing the input tables.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("malformed number: {value:?}")]
    MalformedNumber { value: String },

    #[error("no four-digit year in date {value:?}")]
    MalformedDate { value: String },

    #[error("negative commitment {value} in year {year}")]
    NegativeCommitment { year: i32, value: f64 },

    #[error("missing column {name:?}; available columns: {available:?}")]
    MissingColumn {
        name: String,
        available: Vec<String>,
    },

    #[error("line {line}: {source}")]
    Field {
        line: u64,
        #[source]
        source: Box<DataError>,
    },

    #[error("industry {industry:?} not found in GDP table")]
    IndustryNotFound { industry: String },

    #[error("industry {industry:?} appears more than once in GDP table")]
    DuplicateIndustry { industry: String },

    #[error("GDP table has no year columns")]
    NoYearColumns,

    #[error("analysis table is empty")]
    EmptyTable,

    #[error("failed to read {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),
}

impl DataError {
    /// Attach the 1-based input line to a field-level error.
    pub(crate) fn at_line(self, line: u64) -> Self {
        DataError::Field {
            line,
            source: Box::new(self),
        }
    }
}

/// Column layout and labels of the two input files.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Funding column holding the approval date.
    pub date_column: String,
    /// Funding column holding the currency-formatted commitment.
    pub commitment_column: String,
    /// Zero-based index of the GDP column holding the industry label.
    pub industry_column: usize,
    /// Industry row to select from the GDP table.
    pub industry: String,
    /// Zero-based index of the first GDP year column.
    pub first_year_column: usize,
    /// Year of the first GDP year column.
    pub base_year: i32,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            date_column: "Approval Date".to_string(),
            commitment_column: "Ontario Commitment".to_string(),
            industry_column: 0,
            industry: "All industries".to_string(),
            first_year_column: 1,
            base_year: 2007,
        }
    }
}

impl LoadOptions {
    /// Set the GDP industry row to select.
    pub fn industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = industry.into();
        self
    }

    /// Set the year of the first GDP year column.
    pub fn base_year(mut self, year: i32) -> Self {
        self.base_year = year;
        self
    }

    /// Set the funding approval-date column name.
    pub fn date_column(mut self, name: impl Into<String>) -> Self {
        self.date_column = name.into();
        self
    }

    /// Set the funding commitment column name.
    pub fn commitment_column(mut self, name: impl Into<String>) -> Self {
        self.commitment_column = name.into();
        self
    }
}

/// Position of `name` among `headers`, compared after trimming.
pub(crate) fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| DataError::MissingColumn {
            name: name.to_string(),
            available: headers.iter().map(str::to_string).collect(),
        })
}

/// True when every field of the record is blank.
pub(crate) fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}
