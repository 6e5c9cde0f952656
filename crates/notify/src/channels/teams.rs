//! Microsoft Teams incoming-webhook notification channel.
//!
//! Messages are sent as legacy `MessageCard` payloads, which every Teams
//! incoming webhook connector still accepts.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ChannelError;
use crate::events::NotifyEvent;
use crate::NotifyChannel;

/// Environment variable for Teams webhook URL.
const ENV_TEAMS_WEBHOOK_URL: &str = "TEAMS_WEBHOOK_URL";

/// Fallback wait when Teams throttles without a `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 30;

/// Microsoft Teams webhook notification channel.
pub struct TeamsChannel {
    webhook_url: Option<String>,
    client: reqwest::Client,
}

impl TeamsChannel {
    /// Create a new Teams channel from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let webhook_url = std::env::var(ENV_TEAMS_WEBHOOK_URL)
            .ok()
            .filter(|url| !url.is_empty());

        if webhook_url.is_some() {
            debug!("Teams notifications enabled");
        } else {
            debug!("Teams notifications disabled (TEAMS_WEBHOOK_URL not set)");
        }

        Self {
            webhook_url,
            client: reqwest::Client::new(),
        }
    }

    /// Create a Teams channel with a specific webhook URL.
    #[must_use]
    pub fn new(webhook_url: String) -> Self {
        Self {
            webhook_url: Some(webhook_url),
            client: reqwest::Client::new(),
        }
    }

    /// Format an event as a Teams `MessageCard`.
    fn format_payload(event: &NotifyEvent) -> MessageCard {
        let severity = event.severity();
        let title = event.title();

        let mut facts: Vec<Fact> = Self::format_facts(event)
            .into_iter()
            .map(|(name, value)| Fact { name, value })
            .collect();
        facts.push(Fact {
            name: "Time".to_string(),
            value: event
                .timestamp()
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
        });

        MessageCard {
            card_type: "MessageCard",
            context: "http://schema.org/extensions",
            theme_color: format!("{:06X}", severity.color()),
            summary: format!("Lab Operations: {title}"),
            sections: vec![Section {
                activity_title: title,
                activity_subtitle: format!("Severity: {}", severity.as_str()),
                facts,
                markdown: true,
            }],
        }
    }

    /// Format the fact rows for an event.
    fn format_facts(event: &NotifyEvent) -> Vec<(String, String)> {
        match event {
            NotifyEvent::NotionPageChanged {
                page_id, action, ..
            } => vec![
                ("Page ID".to_string(), page_id.clone()),
                ("Event".to_string(), action.clone()),
            ],

            NotifyEvent::NotionDatabaseChanged {
                database_id,
                action,
                ..
            } => vec![
                ("Database ID".to_string(), database_id.clone()),
                ("Event".to_string(), action.clone()),
            ],

            NotifyEvent::NotionActivity {
                event_type,
                entity_id,
                ..
            } => vec![
                ("Event".to_string(), event_type.clone()),
                (
                    "Entity ID".to_string(),
                    entity_id.clone().unwrap_or_else(|| "N/A".to_string()),
                ),
            ],

            NotifyEvent::LabAlert {
                area,
                message,
                impact,
                ..
            } => vec![
                ("Area".to_string(), area.clone()),
                ("Message".to_string(), message.clone()),
                ("Impact".to_string(), impact.clone()),
            ],
        }
    }
}

#[async_trait]
impl NotifyChannel for TeamsChannel {
    fn name(&self) -> &'static str {
        "teams"
    }

    fn enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    async fn send(&self, event: &NotifyEvent) -> Result<(), ChannelError> {
        let webhook_url = self
            .webhook_url
            .as_ref()
            .ok_or(ChannelError::NotConfigured(ENV_TEAMS_WEBHOOK_URL))?;

        let payload = Self::format_payload(event);

        debug!(channel = "teams", event_type = ?event.title(), "Sending notification");

        let response = self.client.post(webhook_url).json(&payload).send().await?;
        let status = response.status();

        if status.is_success() {
            debug!(channel = "teams", "Notification sent successfully");
            return Ok(());
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            warn!(channel = "teams", retry_after_secs, "Teams webhook rate limited");
            return Err(ChannelError::RateLimited { retry_after_secs });
        }

        let body = response.text().await.unwrap_or_default();

        warn!(
            channel = "teams",
            status = %status,
            body = %body,
            "Teams webhook request failed"
        );

        Err(ChannelError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

// =============================================================================
// Teams connector types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MessageCard {
    #[serde(rename = "@type")]
    card_type: &'static str,
    #[serde(rename = "@context")]
    context: &'static str,
    theme_color: String,
    summary: String,
    sections: Vec<Section>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Section {
    activity_title: String,
    activity_subtitle: String,
    facts: Vec<Fact>,
    markdown: bool,
}

#[derive(Debug, Serialize)]
struct Fact {
    name: String,
    value: String,
}
