//! Event dispatch for Notion change events.
//!
//! Handled kinds are relayed to the alerting channels through
//! [`lab_notify::Notifier`]. Delivery is fire-and-forget: the acknowledgement
//! returned here only says the event was accepted for processing.

use chrono::Utc;
use lab_notify::{Notifier, NotifyEvent};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::webhooks::{EventKind, NotionEvent};

/// Errors raised while turning an event into downstream work.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The event names a kind that needs a subject id, but none was sent.
    #[error("{event_type} event is missing its {entity} id")]
    MissingEntity {
        /// Raw event type.
        event_type: String,
        /// Entity the id was expected for.
        entity: &'static str,
    },
}

/// Acknowledgement body returned to Notion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Ack {
    /// Event was handed to downstream processing.
    Processed {
        /// Raw event type.
        event: String,
    },
    /// Event type has no handler.
    Ignored {
        /// Raw event type.
        event_type: String,
    },
    /// Event was structurally valid but processing failed.
    Received {
        /// Raw event type.
        event: String,
    },
}

/// Log an event and hand it to the notifier.
pub fn dispatch_event(notifier: &Notifier, event: &NotionEvent) -> Result<Ack, HandlerError> {
    info!(
        event_type = %event.raw_type,
        event_id = event.id.as_deref().unwrap_or("none"),
        entity_id = event.entity_id.as_deref().unwrap_or("none"),
        "Processing Notion webhook event"
    );

    let notification = match event.kind {
        EventKind::PageCreated | EventKind::PageUpdated | EventKind::PageDeleted => {
            NotifyEvent::NotionPageChanged {
                page_id: require_entity(event, "page")?,
                action: event.raw_type.clone(),
                timestamp: Utc::now(),
            }
        }
        EventKind::DatabaseUpdated => NotifyEvent::NotionDatabaseChanged {
            database_id: require_entity(event, "database")?,
            action: event.raw_type.clone(),
            timestamp: Utc::now(),
        },
        EventKind::CommentCreated => NotifyEvent::NotionActivity {
            event_type: event.raw_type.clone(),
            entity_id: event.entity_id.clone(),
            timestamp: Utc::now(),
        },
        EventKind::Other => {
            debug!(event_type = %event.raw_type, "Unhandled event type");
            return Ok(Ack::Ignored {
                event_type: event.raw_type.clone(),
            });
        }
    };

    notifier.notify(notification);

    Ok(Ack::Processed {
        event: event.raw_type.clone(),
    })
}

fn require_entity(event: &NotionEvent, entity: &'static str) -> Result<String, HandlerError> {
    event
        .entity_id
        .clone()
        .ok_or_else(|| HandlerError::MissingEntity {
            event_type: event.raw_type.clone(),
            entity,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhooks::NotionWebhook;

    fn event(json: &str) -> NotionEvent {
        match NotionWebhook::decode(json.as_bytes()).unwrap() {
            NotionWebhook::Event(event) => event,
            other => panic!("expected event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_page_updated_is_processed() {
        let ack = dispatch_event(
            &Notifier::disabled(),
            &event(r#"{"type": "page.updated", "page_id": "p-1"}"#),
        )
        .unwrap();
        assert_eq!(
            ack,
            Ack::Processed {
                event: "page.updated".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_type_is_ignored() {
        let ack = dispatch_event(
            &Notifier::disabled(),
            &event(r#"{"type": "workspace.renamed"}"#),
        )
        .unwrap();
        assert_eq!(
            ack,
            Ack::Ignored {
                event_type: "workspace.renamed".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_missing_entity_is_error() {
        let err = dispatch_event(
            &Notifier::disabled(),
            &event(r#"{"type": "database.updated"}"#),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "database.updated event is missing its database id"
        );
    }

    #[test]
    fn test_ack_serialization() {
        let json = serde_json::to_value(Ack::Processed {
            event: "page.updated".to_string(),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "processed", "event": "page.updated"})
        );

        let json = serde_json::to_value(Ack::Ignored {
            event_type: "x".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"status": "ignored", "event_type": "x"}));
    }
}
