//! GDP by industry: selection of one industry row, wide-to-long reshape and
//! year-over-year percent change.

use super::{is_blank, parse_currency, DataError, LoadOptions};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// GDP of one year (millions of chained dollars) and its change from the prior year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GdpRecord {
    pub year: i32,
    pub gdp: f64,
    /// `(gdp - previous) / previous * 100`; `None` for the first year of the
    /// series or when the previous value is zero.
    pub percent_change: Option<f64>,
}

impl GdpRecord {
    /// Build the long-format series from consecutive yearly values starting
    /// at `base_year`.
    pub fn from_series(base_year: i32, values: &[f64]) -> Vec<GdpRecord> {
        let mut previous: Option<f64> = None;

        values
            .iter()
            .zip(base_year..)
            .map(|(&gdp, year)| {
                let percent_change = previous
                    .filter(|&prev| prev != 0.0)
                    .map(|prev| (gdp - prev) / prev * 100.0);
                previous = Some(gdp);
                GdpRecord {
                    year,
                    gdp,
                    percent_change,
                }
            })
            .collect()
    }
}

/// Load the GDP CSV at `path` and reshape the configured industry row.
pub fn load_gdp(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Vec<GdpRecord>, DataError> {
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

/// Reshape the configured industry row from any CSV source with a header row.
pub fn read_gdp<R: Read>(reader: R, options: &LoadOptions) -> Result<Vec<GdpRecord>, DataError> {
    let reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    from_csv(reader, options, "<input>")
}

fn from_csv<R: Read>(
    mut reader: csv::Reader<R>,
    options: &LoadOptions,
    origin: &str,
) -> Result<Vec<GdpRecord>, DataError> {
    let csv_error = |source| DataError::Csv {
        path: origin.to_string(),
        source,
    };

    let mut selected: Option<csv::StringRecord> = None;
    for row in reader.records() {
        let record = row.map_err(csv_error)?;
        if is_blank(&record) {
            continue;
        }
        let label = record.get(options.industry_column).unwrap_or("").trim();
        if label != options.industry {
            continue;
        }
        if selected.is_some() {
            return Err(DataError::DuplicateIndustry {
                industry: options.industry.clone(),
            });
        }
        selected = Some(record);
    }

    let record = selected.ok_or_else(|| DataError::IndustryNotFound {
        industry: options.industry.clone(),
    })?;
    let line = record.position().map_or(0, |p| p.line());

    // Trailing empty cells are padding, not missing years.
    let mut cells: Vec<&str> = record
        .iter()
        .skip(options.first_year_column)
        .map(str::trim)
        .collect();
    while cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    if cells.is_empty() {
        return Err(DataError::NoYearColumns);
    }

    let values = cells
        .iter()
        .map(|cell| parse_currency(cell))
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|e| e.at_line(line))?;

    let records = GdpRecord::from_series(options.base_year, &values);
    debug!(
        industry = %options.industry,
        years = records.len(),
        "reshaped GDP row"
    );
    Ok(records)
}
