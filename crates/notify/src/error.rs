//! Delivery failures for lab alert channels.

use std::time::Duration;
use thiserror::Error;

/// Why a single channel failed to deliver an event.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Connector could not be reached
    #[error("Teams webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The named environment variable holds no webhook URL
    #[error("{0} is not set")]
    NotConfigured(&'static str),

    /// Teams answered 429
    #[error("Teams throttled the connector, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Teams answered with any other non-2xx status
    #[error("Teams rejected the card with {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The spawned delivery task panicked or was cancelled
    #[error("Delivery task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ChannelError {
    /// How long the connector asked us to back off, if it did.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after_secs } => Some(Duration::from_secs(*retry_after_secs)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_hint_only_for_throttling() {
        let throttled = ChannelError::RateLimited {
            retry_after_secs: 12,
        };
        assert_eq!(throttled.retry_after(), Some(Duration::from_secs(12)));
        assert_eq!(
            throttled.to_string(),
            "Teams throttled the connector, retry in 12s"
        );

        let rejected = ChannelError::Rejected {
            status: 400,
            body: "Bad payload".to_string(),
        };
        assert_eq!(rejected.retry_after(), None);
        assert_eq!(
            rejected.to_string(),
            "Teams rejected the card with 400: Bad payload"
        );
    }
}
