//! Loading of the externally produced JSON reports.

use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::ReportError;

/// The report files the dashboard knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// `health_report.json`
    Health,
    /// `repo_analysis.json`
    Repository,
    /// `performance_analysis.json`
    Performance,
}

impl ReportKind {
    /// All kinds, in load order.
    pub const ALL: [Self; 3] = [Self::Health, Self::Repository, Self::Performance];

    /// File name inside the reports directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Health => "health_report.json",
            Self::Repository => "repo_analysis.json",
            Self::Performance => "performance_analysis.json",
        }
    }
}

/// Up to three loosely-typed report documents.
///
/// Each slot is `None` when its file was missing or unparseable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSet {
    pub health: Option<Value>,
    pub repository: Option<Value>,
    pub performance: Option<Value>,
}

impl ReportSet {
    /// Load every known report from `dir`, sequentially.
    ///
    /// A failure affects only its own slot and is logged as a warning.
    #[must_use]
    pub fn load(dir: &Path) -> Self {
        let mut set = Self::default();
        for kind in ReportKind::ALL {
            let path = dir.join(kind.file_name());
            let value = match load_report(&path) {
                Ok(value) => {
                    debug!(report = kind.file_name(), "Loaded report");
                    Some(value)
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Report unavailable, using defaults"
                    );
                    None
                }
            };
            *set.slot_mut(kind) = value;
        }
        set
    }

    /// Number of reports that loaded successfully.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        ReportKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind).is_some())
            .count()
    }

    /// Borrow one report.
    #[must_use]
    pub fn get(&self, kind: ReportKind) -> Option<&Value> {
        match kind {
            ReportKind::Health => self.health.as_ref(),
            ReportKind::Repository => self.repository.as_ref(),
            ReportKind::Performance => self.performance.as_ref(),
        }
    }

    fn slot_mut(&mut self, kind: ReportKind) -> &mut Option<Value> {
        match kind {
            ReportKind::Health => &mut self.health,
            ReportKind::Repository => &mut self.repository,
            ReportKind::Performance => &mut self.performance,
        }
    }
}

/// Read and parse a single report file.
pub fn load_report(path: &Path) -> Result<Value, ReportError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
