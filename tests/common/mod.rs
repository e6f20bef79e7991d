//! Common test utilities and data generators.
#![allow(dead_code)]

use research_gdp::data::{AnalysisTable, JoinedRecord};
use std::io::Write;
use tempfile::NamedTempFile;

/// Table with consecutive years from 2008 and the given columns.
pub fn table_from(commitments: &[f64], changes: &[f64]) -> AnalysisTable {
    assert_eq!(commitments.len(), changes.len());
    AnalysisTable::from_records(
        commitments
            .iter()
            .zip(changes)
            .zip(2008..)
            .map(|((&ontario_commitment, &gdp_change), year)| JoinedRecord {
                year,
                ontario_commitment,
                gdp_change,
            })
            .collect(),
    )
}

/// The five-row reference table: commitments 1..5, changes [2, 4, 5, 4, 5].
pub fn five_row_table() -> AnalysisTable {
    table_from(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 5.0, 4.0, 5.0])
}

/// Noisy linear data: change = 1 + 0.002 * commitment + noise.
///
/// Commitments are spread over roughly 100..(100 + 90 n) with jitter.
pub fn noisy_table(n: usize, noise_std: f64, seed: u64) -> AnalysisTable {
    // Simple deterministic "random" for reproducibility
    let mut rng_state = seed;
    let mut next_rand = || -> f64 {
        rng_state = rng_state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((rng_state >> 33) as f64) / (u32::MAX as f64) * 2.0 - 1.0
    };

    let mut commitments = Vec::with_capacity(n);
    let mut changes = Vec::with_capacity(n);
    for i in 0..n {
        let x = 100.0 + 90.0 * i as f64 + 20.0 * next_rand();
        commitments.push(x);
        changes.push(1.0 + 0.002 * x + noise_std * next_rand());
    }

    table_from(&commitments, &changes)
}

/// Write `contents` to a temporary CSV file kept alive by the returned handle.
pub fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

/// Funding CSV with one or more projects per year.
pub const FUNDING_CSV: &str = "\
Project Title,Institution,Approval Date,Ontario Commitment
Quantum sensing,U of T,2008-02-11,\"$1,200,000\"
Battery chemistry,Waterloo,2008-09-30,\"$800,000\"
Crop genomics,Guelph,2009-05-14,\"$1,500,000\"
Imaging platform,Western,2010-03-01,\"$900,000\"
Robotics lab,McMaster,2010-11-20,\"$2,100,000\"
Water research,Queen's,2011-06-06,\"$2,600,000\"
Photonics,Ottawa,2012-01-17,\"$1,700,000\"
Materials,York,2013-08-08,\"$3,300,000\"
Neuroscience,U of T,2014-04-04,\"$2,900,000\"
Climate models,Waterloo,2015-10-10,\"$3,800,000\"
Vaccines,McMaster,2016-02-02,\"$4,100,000\"
Ag-tech,Guelph,2017-07-07,\"$3,600,000\"
Space systems,York,2019-03-03,\"$5,000,000\"
";

/// GDP CSV, wide format, 2007..2017 (no 2018 or 2019 columns).
pub const GDP_CSV: &str = "\
North American Industry Classification System (NAICS),2007,2008,2009,2010,2011,2012,2013,2014,2015,2016,2017
All industries,\"600,000\",\"604,000\",\"584,000\",\"602,000\",\"618,000\",\"627,000\",\"641,000\",\"656,000\",\"673,000\",\"690,000\",\"708,000\"
Goods-producing industries,\"180,000\",\"176,000\",\"160,000\",\"166,000\",\"170,000\",\"171,000\",\"174,000\",\"176,000\",\"179,000\",\"181,000\",\"185,000\"
";

/// Approximate equality check for floating point values.
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}
