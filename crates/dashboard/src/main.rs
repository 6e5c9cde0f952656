//! CLI for rendering the lab operations dashboard
//!
//! Run `lab-dashboard --help` for usage information.

// CLI binaries legitimately need println! for user output
#![allow(clippy::disallowed_macros)]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "lab-dashboard")]
#[command(about = "Render the lab operations dashboard from JSON reports")]
#[command(version)]
struct Cli {
    /// Directory holding health_report.json, repo_analysis.json and performance_analysis.json
    #[arg(short, long, env = "DASHBOARD_REPORTS_DIR", default_value = "reports")]
    reports_dir: PathBuf,

    /// Output HTML file
    #[arg(short, long, env = "DASHBOARD_OUTPUT", default_value = "dashboard.html")]
    output: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("lab_dashboard={default_level}"))),
        )
        .init();

    let summary = lab_dashboard::build_dashboard(&cli.reports_dir, &cli.output)
        .context("Failed to build dashboard")?;

    println!(
        "✓ Dashboard written to {} ({} of 3 reports, {} active alerts)",
        summary.output.display(),
        summary.reports_loaded,
        summary.alert_count
    );

    Ok(())
}
