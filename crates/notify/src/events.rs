//! Notification event types for lab operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity levels for alerts and notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational - normal operations
    Info,
    /// Warning - something needs attention
    Warning,
    /// Critical - immediate action required
    Critical,
}

impl Severity {
    /// Get the card theme color for this severity.
    #[must_use]
    pub const fn color(&self) -> u32 {
        match self {
            Self::Info => 0x0034_98db,     // Blue
            Self::Warning => 0x00f3_9c12,  // Orange
            Self::Critical => 0x00e7_4c3c, // Red
        }
    }

    /// Map a producer's level string onto a severity.
    ///
    /// `high` and `critical` page someone; `medium` and `warning` do not.
    #[must_use]
    pub fn from_level(level: &str) -> Self {
        match level.trim().to_ascii_lowercase().as_str() {
            "critical" | "high" => Self::Critical,
            "medium" | "warning" => Self::Warning,
            _ => Self::Info,
        }
    }

    /// Get display name for this severity.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        }
    }
}

/// Events that can trigger notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotifyEvent {
    /// A page in a tracked Notion database changed
    NotionPageChanged {
        page_id: String,
        /// Raw Notion event type, e.g. `page.updated`
        action: String,
        #[serde(default = "Utc::now")]
        timestamp: DateTime<Utc>,
    },

    /// A tracked Notion database changed (schema or rows)
    NotionDatabaseChanged {
        database_id: String,
        action: String,
        #[serde(default = "Utc::now")]
        timestamp: DateTime<Utc>,
    },

    /// Any other Notion activity worth relaying (comments, etc.)
    NotionActivity {
        event_type: String,
        #[serde(default)]
        entity_id: Option<String>,
        #[serde(default = "Utc::now")]
        timestamp: DateTime<Utc>,
    },

    /// An operational bottleneck or crisis, e.g. TAT compliance below target
    LabAlert {
        /// Free-form level from the producer: `critical`, `high`, `medium`, `low`
        severity: String,
        area: String,
        message: String,
        impact: String,
        #[serde(default = "Utc::now")]
        timestamp: DateTime<Utc>,
    },
}

impl NotifyEvent {
    /// Get a short title for this event type.
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::NotionPageChanged { action, .. } => match action.as_str() {
                "page.created" => "Notion Page Created".to_string(),
                "page.deleted" => "Notion Page Deleted".to_string(),
                _ => "Notion Page Updated".to_string(),
            },
            Self::NotionDatabaseChanged { .. } => "Notion Database Updated".to_string(),
            Self::NotionActivity { event_type, .. } => format!("Notion Activity: {event_type}"),
            Self::LabAlert { area, .. } => format!("Lab Alert: {area}"),
        }
    }

    /// Get the severity/color for this event.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::NotionPageChanged { action, .. } if action == "page.deleted" => {
                Severity::Warning
            }
            Self::LabAlert { severity, .. } => Severity::from_level(severity),
            Self::NotionPageChanged { .. }
            | Self::NotionDatabaseChanged { .. }
            | Self::NotionActivity { .. } => Severity::Info,
        }
    }

    /// Get the timestamp for this event.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::NotionPageChanged { timestamp, .. }
            | Self::NotionDatabaseChanged { timestamp, .. }
            | Self::NotionActivity { timestamp, .. }
            | Self::LabAlert { timestamp, .. } => *timestamp,
        }
    }
}
