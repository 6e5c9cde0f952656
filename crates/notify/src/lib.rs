//! Alert dispatch for lab operations events.
//!
//! This crate provides a fire-and-forget notification system for relaying
//! Notion tracker activity to Microsoft Teams channels.
//!
//! # Usage
//!
//! ```no_run
//! use lab_notify::{Notifier, NotifyEvent};
//!
//! # async fn run() {
//! // Create notifier from environment variables
//! let notifier = Notifier::from_env();
//!
//! // Send a notification (fire-and-forget)
//! notifier.notify(NotifyEvent::NotionPageChanged {
//!     page_id: "2f1c...".to_string(),
//!     action: "page.updated".to_string(),
//!     timestamp: chrono::Utc::now(),
//! });
//! # }
//! ```
//!
//! # Configuration
//!
//! The notifier is configured via environment variables:
//!
//! - `TEAMS_WEBHOOK_URL`: Teams incoming webhook URL (enables Teams channel)
//! - `NOTIFY_DISABLED`: Set to "true" to disable all notifications

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channels;
pub mod error;
pub mod events;

pub use channels::teams::TeamsChannel;
pub use channels::NotifyChannel;
pub use error::ChannelError;
pub use events::{NotifyEvent, Severity};

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Environment variable to disable all notifications.
const ENV_NOTIFY_DISABLED: &str = "NOTIFY_DISABLED";

/// Relays lab events to every configured channel.
///
/// Each channel gets its own Tokio task, so a slow or throttled Teams
/// connector never holds up the caller. A notifier with no channels only
/// logs what it would have sent.
pub struct Notifier {
    channels: Vec<Arc<dyn NotifyChannel>>,
}

impl Notifier {
    /// Build the channel list from `TEAMS_WEBHOOK_URL` and `NOTIFY_DISABLED`.
    #[must_use]
    pub fn from_env() -> Self {
        let disabled = std::env::var(ENV_NOTIFY_DISABLED)
            .is_ok_and(|v| v.eq_ignore_ascii_case("true") || v == "1");
        if disabled {
            info!("Lab alerts disabled via NOTIFY_DISABLED");
            return Self::disabled();
        }

        let teams = TeamsChannel::from_env();
        if !teams.enabled() {
            warn!("TEAMS_WEBHOOK_URL not set, lab events will only be logged");
            return Self::disabled();
        }

        info!("Relaying lab events to Teams");
        Self::with_channels(vec![Arc::new(teams)])
    }

    /// Relay to exactly these channels.
    #[must_use]
    pub fn with_channels(channels: Vec<Arc<dyn NotifyChannel>>) -> Self {
        Self { channels }
    }

    /// A notifier that relays nothing.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// Number of channels that will actually receive events.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.iter().filter(|c| c.enabled()).count()
    }

    /// Relay an event without waiting for delivery.
    ///
    /// Failures are logged by the delivery task and never reach the caller.
    /// Must be called from within a Tokio runtime.
    pub fn notify(&self, event: NotifyEvent) {
        self.spawn_deliveries(event);
    }

    /// Relay an event and collect each channel's outcome, in channel order.
    pub async fn notify_and_wait(
        &self,
        event: NotifyEvent,
    ) -> Vec<(&'static str, Result<(), ChannelError>)> {
        let mut results = Vec::new();
        for (name, delivery) in self.spawn_deliveries(event) {
            let result = delivery.await.unwrap_or_else(|e| Err(ChannelError::Task(e)));
            results.push((name, result));
        }
        results
    }

    fn spawn_deliveries(
        &self,
        event: NotifyEvent,
    ) -> Vec<(&'static str, JoinHandle<Result<(), ChannelError>>)> {
        let title = event.title();
        let severity = event.severity();

        let channels: Vec<_> = self.channels.iter().filter(|c| c.enabled()).collect();
        if channels.is_empty() {
            debug!(
                title = %title,
                severity = severity.as_str(),
                "No alert channels, event not relayed"
            );
            return Vec::new();
        }

        info!(
            title = %title,
            severity = severity.as_str(),
            channels = channels.len(),
            "Relaying lab event"
        );

        let event = Arc::new(event);
        channels
            .into_iter()
            .map(|channel| {
                let channel = Arc::clone(channel);
                let event = Arc::clone(&event);
                let name = channel.name();
                let delivery = tokio::spawn(async move {
                    let result = channel.send(&event).await;
                    if let Err(e) = &result {
                        log_failure(name, &event, e);
                    } else {
                        debug!(channel = name, title = %event.title(), "Lab event delivered");
                    }
                    result
                });
                (name, delivery)
            })
            .collect()
    }
}

fn log_failure(channel: &str, event: &NotifyEvent, err: &ChannelError) {
    if let Some(wait) = err.retry_after() {
        warn!(
            channel,
            title = %event.title(),
            retry_after_secs = wait.as_secs(),
            "Alert channel throttled, event dropped"
        );
    } else {
        error!(
            channel,
            title = %event.title(),
            severity = event.severity().as_str(),
            error = %err,
            "Failed to deliver lab event"
        );
    }
}
