//! Error types for the dashboard renderer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a dashboard build.
///
/// Missing or unreadable report files are not errors; they degrade the
/// affected sections to their defaults.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Embedded template failed to compile
    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    /// Template rendering failed
    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),

    /// Output file could not be written
    #[error("Failed to write dashboard to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reasons a single report could not be loaded.
#[derive(Debug, Error)]
pub enum ReportError {
    /// File missing or unreadable
    #[error("read failed: {0}")]
    Read(#[from] std::io::Error),

    /// File is not valid JSON
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
