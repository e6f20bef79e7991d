mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, OutputFormat};
use research_gdp::Report;
use tracing_subscriber::EnvFilter;

/// Log to stderr; `--debug` forces TRACE, otherwise `RUST_LOG` (default: warn).
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let report = Report::from_files(
        &cli.funding,
        &cli.gdp,
        &cli.load_options(),
        &cli.report_config(),
    )
    .with_context(|| {
        format!(
            "analysis of {} and {} failed",
            cli.funding.display(),
            cli.gdp.display()
        )
    })?;

    match cli.format {
        OutputFormat::Text => println!("{report}"),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialize report")?
        ),
    }

    Ok(())
}
