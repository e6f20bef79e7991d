//! Research funding records, aggregated per approval year.

use super::{column_index, is_blank, parse_currency, parse_year, DataError, LoadOptions};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Total research commitment approved in one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FundingRecord {
    pub year: i32,
    pub total_commitment: f64,
}

impl FundingRecord {
    /// Sum per-project `(year, commitment)` pairs into one record per year,
    /// sorted by year.
    pub fn aggregate<I>(projects: I) -> Vec<FundingRecord>
    where
        I: IntoIterator<Item = (i32, f64)>,
    {
        let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
        for (year, commitment) in projects {
            *totals.entry(year).or_insert(0.0) += commitment;
        }

        totals
            .into_iter()
            .map(|(year, total_commitment)| FundingRecord {
                year,
                total_commitment,
            })
            .collect()
    }
}

/// Load and aggregate the funding CSV at `path`.
pub fn load_funding(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<Vec<FundingRecord>, DataError> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|source| DataError::Csv {
            path: origin.clone(),
            source,
        })?;
    from_csv(reader, options, &origin)
}

/// Aggregate funding records from any CSV source with a header row.
pub fn read_funding<R: Read>(
    reader: R,
    options: &LoadOptions,
) -> Result<Vec<FundingRecord>, DataError> {
    let reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    from_csv(reader, options, "<input>")
}

fn from_csv<R: Read>(
    mut reader: csv::Reader<R>,
    options: &LoadOptions,
    origin: &str,
) -> Result<Vec<FundingRecord>, DataError> {
    let csv_error = |source| DataError::Csv {
        path: origin.to_string(),
        source,
    };

    let headers = reader.headers().map_err(csv_error)?.clone();
    let date_idx = column_index(&headers, &options.date_column)?;
    let amount_idx = column_index(&headers, &options.commitment_column)?;

    let mut projects = Vec::new();
    for row in reader.records() {
        let record = row.map_err(csv_error)?;
        if is_blank(&record) {
            continue;
        }
        let line = record.position().map_or(0, |p| p.line());

        let field = |idx: usize| record.get(idx).unwrap_or("");
        let year = parse_year(field(date_idx)).map_err(|e| e.at_line(line))?;
        let commitment = parse_currency(field(amount_idx)).map_err(|e| e.at_line(line))?;
        if commitment < 0.0 {
            return Err(DataError::NegativeCommitment {
                year,
                value: commitment,
            }
            .at_line(line));
        }

        projects.push((year, commitment));
    }

    let records = FundingRecord::aggregate(projects.iter().copied());
    debug!(
        projects = projects.len(),
        years = records.len(),
        "aggregated funding records"
    );
    Ok(records)
}
