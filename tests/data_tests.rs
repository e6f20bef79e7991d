//! Loading, joining and trimming the input tables.

mod common;

use approx::assert_relative_eq;
use common::{csv_file, table_from, FUNDING_CSV, GDP_CSV};
use research_gdp::FittedRegressor;
use research_gdp::data::{
    load_funding, load_gdp, read_funding, AnalysisTable, DataError, FundingRecord, GdpRecord,
    LoadOptions,
};

fn fixture_table() -> AnalysisTable {
    let funding_file = csv_file(FUNDING_CSV);
    let gdp_file = csv_file(GDP_CSV);
    let options = LoadOptions::default();

    let funding = load_funding(funding_file.path(), &options).expect("funding loads");
    let gdp = load_gdp(gdp_file.path(), &options).expect("gdp loads");
    AnalysisTable::join(&funding, &gdp)
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_funding_aggregates_by_year() {
    let file = csv_file(FUNDING_CSV);
    let records = load_funding(file.path(), &LoadOptions::default()).unwrap();

    let years: Vec<i32> = records.iter().map(|r| r.year).collect();
    assert_eq!(
        years,
        vec![2008, 2009, 2010, 2011, 2012, 2013, 2014, 2015, 2016, 2017, 2019]
    );
    // two projects in each of 2008 and 2010
    assert_relative_eq!(records[0].total_commitment, 2_000_000.0);
    assert_relative_eq!(records[2].total_commitment, 3_000_000.0);
}

#[test]
fn test_load_gdp_reshapes_selected_industry() {
    let file = csv_file(GDP_CSV);
    let records = load_gdp(file.path(), &LoadOptions::default()).unwrap();

    assert_eq!(records.len(), 11);
    assert_eq!(records[0].year, 2007);
    assert_eq!(records[0].percent_change, None);
    assert_relative_eq!(records[0].gdp, 600_000.0);
    assert_relative_eq!(
        records[1].percent_change.unwrap(),
        4_000.0 / 600_000.0 * 100.0,
        epsilon = 1e-12
    );
}

#[test]
fn test_load_gdp_other_industry() {
    let file = csv_file(GDP_CSV);
    let options = LoadOptions::default().industry("Goods-producing industries");
    let records = load_gdp(file.path(), &options).unwrap();

    assert_relative_eq!(records[0].gdp, 180_000.0);
    assert!(records[1].percent_change.unwrap() < 0.0);
}

#[test]
fn test_missing_file_is_csv_error() {
    let err = load_funding("/nonexistent/funding.csv", &LoadOptions::default()).unwrap_err();
    match err {
        DataError::Csv { path, .. } => assert!(path.contains("funding.csv")),
        other => panic!("expected Csv error, got {other:?}"),
    }
}

#[test]
fn test_malformed_commitment_names_line() {
    let input = "\
Approval Date,Ontario Commitment
2010-01-01,\"$1,000\"
2011-01-01,12abc
";
    let err = read_funding(input.as_bytes(), &LoadOptions::default()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("line 3"), "{message}");
    assert!(message.contains("12abc"), "{message}");
}

// ============================================================================
// Join
// ============================================================================

#[test]
fn test_join_keeps_years_present_in_both() {
    let table = fixture_table();

    // 2007 has no percent change, 2019 has no GDP column
    assert_eq!(table.years(), (2008..=2017).collect::<Vec<_>>());

    let first = table.records()[0];
    assert_relative_eq!(first.ontario_commitment, 2_000_000.0);
    assert_relative_eq!(first.gdp_change, 4_000.0 / 600_000.0 * 100.0, epsilon = 1e-12);
}

#[test]
fn test_join_of_disjoint_years_is_empty() {
    let funding = vec![FundingRecord {
        year: 1999,
        total_commitment: 1.0,
    }];
    let gdp = GdpRecord::from_series(2007, &[1.0, 2.0, 3.0]);

    let table = AnalysisTable::join(&funding, &gdp);
    assert!(table.is_empty());
    assert!(table.describe().is_none());
}

#[test]
fn test_fixture_fits() {
    let table = fixture_table();
    let fitted = table.fit_ols().expect("ten distinct years fit");
    assert_eq!(fitted.result().n_observations, 10);
}

// ============================================================================
// Low-tail Trim
// ============================================================================

#[test]
fn test_trim_removes_recession_year_only() {
    let table = fixture_table();
    let trimmed = table.trim_low_outliers(0.05).unwrap();

    assert_eq!(trimmed.removed, 1);
    assert!(!trimmed.table.years().contains(&2009));
    assert_eq!(trimmed.table.len(), 9);
}

#[test]
fn test_trim_never_removes_high_values() {
    let changes = [-10.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0];
    let commitments: Vec<f64> = (0..changes.len()).map(|i| i as f64).collect();
    let table = table_from(&commitments, &changes);

    let trimmed = table.trim_low_outliers(0.05).unwrap();
    let kept = trimmed.table.gdp_changes();

    assert!(kept.contains(&100.0));
    assert!(!kept.contains(&-10.0));
    assert!(kept.iter().all(|&c| c >= trimmed.threshold));
}

#[test]
fn test_trim_threshold_is_type7_quantile() {
    let changes: Vec<f64> = (1..=10).map(f64::from).collect();
    let table = table_from(&changes, &changes);

    let trimmed = table.trim_low_outliers(0.05).unwrap();
    assert_relative_eq!(trimmed.threshold, 1.45, epsilon = 1e-12);
    assert_eq!(trimmed.removed, 1);
}

#[test]
fn test_describe_fixture() {
    let table = fixture_table();
    let description = table.describe().unwrap();

    assert_eq!(description.n, 10);
    assert_eq!(description.first_year, 2008);
    assert_eq!(description.last_year, 2017);
    assert_relative_eq!(description.commitment.max, 4_100_000.0);
    assert!(description.gdp_change.min < 0.0);
    assert!(description.correlation.abs() <= 1.0);
}
