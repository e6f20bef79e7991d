//! End-to-end report tests.

mod common;

use common::{csv_file, five_row_table, table_from, FUNDING_CSV, GDP_CSV};
use research_gdp::data::LoadOptions;
use research_gdp::report::VariantOutcome;
use research_gdp::{DataError, Report, ReportConfig, ReportError};

fn fixture_report(config: &ReportConfig) -> Report {
    let funding = csv_file(FUNDING_CSV);
    let gdp = csv_file(GDP_CSV);
    Report::from_files(funding.path(), gdp.path(), &LoadOptions::default(), config)
        .expect("report runs")
}

fn quick_config() -> ReportConfig {
    ReportConfig {
        iterations: 300,
        ..ReportConfig::default()
    }
}

#[test]
fn test_report_from_files() {
    let report = fixture_report(&quick_config());

    assert_eq!(report.description.n, 10);
    assert_eq!(report.full.model.n, 10);
    assert_eq!(report.trim.removed_years, vec![2009]);
    let filtered = report.filtered.report().expect("trimmed table analyses");
    assert_eq!(filtered.model.n, 9);

    for variant in [&report.full, filtered] {
        assert_eq!(variant.slope_interval.iterations, 300);
        assert_eq!(
            variant.slope_interval_contains_zero,
            variant.slope_interval.contains_zero()
        );
        assert!(variant.train_mse.lower >= 0.0);
        assert!(variant.test_mse.lower <= variant.test_mse.upper);
    }
}

#[test]
fn test_report_is_deterministic() {
    let config = quick_config();
    assert_eq!(fixture_report(&config), fixture_report(&config));
}

#[test]
fn test_report_text_output() {
    let text = fixture_report(&quick_config()).to_string();

    assert!(text.contains("All years"));
    assert!(text.contains("Low outliers removed"));
    assert!(text.contains("bootstrap slope"));
    assert!(text.contains("test MSE"));
    assert!(text.contains("seed 0, 300 iterations"));
}

#[test]
fn test_report_json_output() {
    let report = fixture_report(&quick_config());
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["config"]["iterations"], 300);
    assert_eq!(json["full"]["model"]["n"], 10);
    assert_eq!(json["trim"]["removed"], 1);
    assert_eq!(json["filtered"]["status"], "complete");
    assert!(json["filtered"]["slope_interval"]["lower"].is_number());
}

#[test]
fn test_report_on_reference_table() {
    let report = Report::run(&five_row_table(), &quick_config()).unwrap();

    assert!((report.full.model.slope - 0.6).abs() < 1e-10);
    assert!((report.full.model.r_squared - 0.6).abs() < 1e-10);
    // q = 0.05 over [2, 4, 5, 4, 5] gives a threshold of 2.4, so the first row goes
    assert_eq!(report.trim.removed_years, vec![2008]);
}

#[test]
fn test_report_missing_industry() {
    let funding = csv_file(FUNDING_CSV);
    let gdp = csv_file(GDP_CSV);
    let options = LoadOptions::default().industry("Fisheries");

    let err = Report::from_files(funding.path(), gdp.path(), &options, &quick_config())
        .unwrap_err();
    assert!(matches!(
        err,
        ReportError::Data(DataError::IndustryNotFound { .. })
    ));
}

#[test]
fn test_report_empty_join() {
    let funding = csv_file("Approval Date,Ontario Commitment\n1990-01-01,100\n");
    let gdp = csv_file(GDP_CSV);

    let err = Report::from_files(
        funding.path(),
        gdp.path(),
        &LoadOptions::default(),
        &quick_config(),
    )
    .unwrap_err();
    assert!(matches!(err, ReportError::Data(DataError::EmptyTable)));
}

#[test]
fn test_small_table_keeps_full_results_when_trimmed_variant_fails() {
    // four rows trim to three, and no split of three rows has both three
    // train rows and a test row
    let table = table_from(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 5.0, 3.0]);
    let report = Report::run(&table, &ReportConfig::default()).expect("full table analyses");

    assert_eq!(report.full.model.n, 4);
    assert_eq!(report.trim.removed_years, vec![2008]);
    match &report.filtered {
        VariantOutcome::Unavailable { reason } => {
            assert!(reason.contains("1000 iterations"), "{reason}")
        }
        other => panic!("expected unavailable trimmed variant, got {other:?}"),
    }
    assert!(report.filtered.report().is_none());

    let text = report.to_string();
    assert!(text.contains("All years"));
    assert!(text.contains("unavailable:"));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["filtered"]["status"], "unavailable");
    assert!(json["full"]["test_mse"]["upper"].is_number());
}
