//! Static HTML dashboard for lab operations reports.
//!
//! Reads up to three independently produced JSON reports from a directory,
//! folds them into an immutable [`view::DashboardView`], and renders that into
//! a single self-contained HTML page.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let summary = lab_dashboard::build_dashboard(Path::new("reports"), Path::new("dashboard.html"))?;
//! println!("{} alerts", summary.alert_count);
//! # Ok::<(), lab_dashboard::DashboardError>(())
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod render;
pub mod reports;
pub mod view;

pub use error::{DashboardError, ReportError};
pub use render::{render_dashboard, DashboardRenderer};
pub use reports::{ReportKind, ReportSet};
pub use view::DashboardView;

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

/// Outcome of a successful dashboard build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    /// Where the page was written.
    pub output: PathBuf,
    /// How many of the three reports were usable.
    pub reports_loaded: usize,
    /// Number of active alerts shown.
    pub alert_count: usize,
    /// Size of the written page.
    pub bytes_written: usize,
}

/// Load reports from `reports_dir`, render, and write the page to `output`.
pub fn build_dashboard(
    reports_dir: &Path,
    output: &Path,
) -> Result<DashboardSummary, DashboardError> {
    build_dashboard_at(reports_dir, output, Utc::now())
}

/// Same as [`build_dashboard`] with an explicit render timestamp.
pub fn build_dashboard_at(
    reports_dir: &Path,
    output: &Path,
    generated_at: DateTime<Utc>,
) -> Result<DashboardSummary, DashboardError> {
    let reports = ReportSet::load(reports_dir);
    let view = DashboardView::build(&reports, generated_at);
    let html = render_dashboard(&view)?;

    std::fs::write(output, &html).map_err(|source| DashboardError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    let summary = DashboardSummary {
        output: output.to_path_buf(),
        reports_loaded: reports.loaded_count(),
        alert_count: view.alerts.len(),
        bytes_written: html.len(),
    };

    info!(
        output = %output.display(),
        reports_loaded = summary.reports_loaded,
        alerts = summary.alert_count,
        "Dashboard written"
    );

    Ok(summary)
}
