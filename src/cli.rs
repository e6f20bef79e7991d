use clap::{Parser, ValueEnum};
use research_gdp::{LoadOptions, ReportConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "research-gdp")]
#[command(version)]
#[command(
    about = "Regress Ontario GDP percent change on research funding, with bootstrap and cross-validated intervals",
    long_about = None
)]
pub struct Cli {
    /// Funding CSV with approval-date and commitment columns
    #[arg(value_name = "FUNDING_CSV")]
    pub funding: PathBuf,

    /// GDP-by-industry CSV with one column per year
    #[arg(value_name = "GDP_CSV")]
    pub gdp: PathBuf,

    /// Seed for every randomized procedure
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Bootstrap resamples and cross-validation splits
    #[arg(long, default_value = "1000")]
    pub iterations: usize,

    /// Probability that a row is assigned to the training partition
    #[arg(long = "train-prob", default_value = "0.6")]
    pub train_prob: f64,

    /// Quantile of GDP change below which rows are trimmed
    #[arg(long = "trim-quantile", default_value = "0.05")]
    pub trim_quantile: f64,

    /// Year of the first GDP data column
    #[arg(long = "base-year", default_value = "2007")]
    pub base_year: i32,

    /// Industry row to select from the GDP table
    #[arg(long, default_value = "All industries")]
    pub industry: String,

    /// Funding column holding the approval date
    #[arg(long = "date-column", default_value = "Approval Date")]
    pub date_column: String,

    /// Funding column holding the commitment amount
    #[arg(long = "commitment-column", default_value = "Ontario Commitment")]
    pub commitment_column: String,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable trace-level logging on stderr
    #[arg(long)]
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::default()
            .industry(self.industry.clone())
            .base_year(self.base_year)
            .date_column(self.date_column.clone())
            .commitment_column(self.commitment_column.clone())
    }

    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            seed: self.seed,
            iterations: self.iterations,
            train_prob: self.train_prob,
            trim_quantile: self.trim_quantile,
            ..ReportConfig::default()
        }
    }
}
