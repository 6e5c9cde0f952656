//! Webhook payload decoding and signature verification.
//!
//! Notion posts two kinds of bodies to a webhook subscription: a one-off
//! verification (either a `challenge` to echo or a verification token to
//! paste into the integration settings) and typed change events. The raw
//! body is decoded exactly once into [`NotionWebhook`]; nothing downstream
//! looks at raw JSON again.

use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Signature header sent by current Notion webhook subscriptions.
pub const SIGNATURE_HEADER: &str = "x-notion-signature";

/// Signature header used by older Notion webhook setups.
pub const LEGACY_SIGNATURE_HEADER: &str = "notion-webhook-signature";

/// Errors raised while decoding an inbound webhook body.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Body is not valid JSON.
    #[error("invalid JSON body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// Body is valid JSON but not an object.
    #[error("webhook body must be a JSON object")]
    NotAnObject,
}

/// Verify a Notion webhook signature using HMAC-SHA256.
///
/// # Arguments
/// * `body` - Raw webhook body bytes
/// * `signature` - Hex-encoded signature, optionally prefixed with `sha256=`
/// * `secret` - Shared webhook secret
///
/// # Returns
/// `true` if signature is valid, `false` otherwise
#[must_use]
pub fn verify_webhook_signature(body: &[u8], signature: &str, secret: &str) -> bool {
    let signature = signature.trim();
    let signature = signature.strip_prefix("sha256=").unwrap_or(signature);

    let Ok(signature_bytes) = hex::decode(signature) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    let computed = mac.finalize().into_bytes();

    computed.as_slice().ct_eq(&signature_bytes).into()
}

/// Extract the signature header, preferring the current header name.
#[must_use]
pub fn signature_from_headers(headers: &HeaderMap) -> Option<String> {
    [SIGNATURE_HEADER, LEGACY_SIGNATURE_HEADER]
        .into_iter()
        .find_map(|name| headers.get(name).and_then(|v| v.to_str().ok()))
        .map(String::from)
}

/// Notion event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    /// `page.created`
    PageCreated,
    /// `page.updated` (also `page.content_updated` / `page.properties_updated`)
    PageUpdated,
    /// `page.deleted`
    PageDeleted,
    /// `database.updated` (also `database.schema_updated` / `database.content_updated`)
    DatabaseUpdated,
    /// `comment.created`
    CommentCreated,
    /// Anything else
    Other,
}

impl EventKind {
    /// Map a raw Notion `type` string onto a known kind.
    #[must_use]
    pub fn from_type(raw: &str) -> Self {
        match raw {
            "page.created" => Self::PageCreated,
            "page.updated" | "page.content_updated" | "page.properties_updated" => {
                Self::PageUpdated
            }
            "page.deleted" => Self::PageDeleted,
            "database.updated" | "database.schema_updated" | "database.content_updated" => {
                Self::DatabaseUpdated
            }
            "comment.created" => Self::CommentCreated,
            _ => Self::Other,
        }
    }
}

/// A typed Notion change event.
#[derive(Debug, Clone, PartialEq)]
pub struct NotionEvent {
    /// Parsed event kind.
    pub kind: EventKind,
    /// Event type exactly as sent (`"unknown"` when absent).
    pub raw_type: String,
    /// Delivery id, when Notion supplies one.
    pub id: Option<String>,
    /// Id of the page/database/comment the event is about.
    pub entity_id: Option<String>,
    /// Full event body.
    pub payload: Value,
}

impl NotionEvent {
    fn from_object(map: Map<String, Value>) -> Self {
        let raw_type = map
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();

        let id = map.get("id").and_then(Value::as_str).map(String::from);

        // Legacy bodies carry page_id/database_id at the top level,
        // current ones nest the subject under `entity`.
        let entity_id = ["page_id", "database_id"]
            .into_iter()
            .find_map(|key| map.get(key).and_then(Value::as_str))
            .or_else(|| {
                map.get("entity")
                    .and_then(|e| e.get("id"))
                    .and_then(Value::as_str)
            })
            .map(String::from);

        Self {
            kind: EventKind::from_type(&raw_type),
            raw_type,
            id,
            entity_id,
            payload: Value::Object(map),
        }
    }
}

/// Body keys that carry a subscription verification token, in lookup order.
/// Notion's current payload uses `verification_token`; older subscriptions
/// send the bare `verification` key.
const VERIFICATION_TOKEN_KEYS: [&str; 2] = ["verification_token", "verification"];

/// Inbound Notion webhook body
#[derive(Debug, Clone, PartialEq)]
pub enum NotionWebhook {
    /// URL verification challenge that must be echoed back verbatim.
    Verification {
        /// Challenge token.
        challenge: String,
    },
    /// Subscription verification token to be confirmed in the Notion UI.
    VerificationToken {
        /// Token string.
        token: String,
    },
    /// Change event.
    Event(NotionEvent),
}

impl NotionWebhook {
    /// Decode a raw request body.
    pub fn decode(body: &[u8]) -> Result<Self, WebhookError> {
        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(value)
    }

    /// Classify an already-parsed JSON body.
    pub fn from_value(value: Value) -> Result<Self, WebhookError> {
        let Value::Object(map) = value else {
            return Err(WebhookError::NotAnObject);
        };

        if let Some(Value::String(challenge)) = map.get("challenge") {
            return Ok(Self::Verification {
                challenge: challenge.clone(),
            });
        }

        let token = VERIFICATION_TOKEN_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str));
        if let Some(token) = token {
            return Ok(Self::VerificationToken {
                token: token.to_string(),
            });
        }

        Ok(Self::Event(NotionEvent::from_object(map)))
    }
}
