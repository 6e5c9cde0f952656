//! HTTP server for Notion webhooks.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use lab_notify::Notifier;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::handlers::{dispatch_event, Ack};
use crate::webhooks::{signature_from_headers, verify_webhook_signature, NotionWebhook};

/// Service name reported by the health endpoint.
const SERVICE_NAME: &str = "notion-webhook";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Configuration.
    pub config: Config,
    /// Downstream alert dispatcher.
    pub notifier: Arc<Notifier>,
}

/// Build the HTTP router for the webhook service.
pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        // Webhook endpoints
        .route("/webhook/notion", post(notion_webhook_handler))
        .route(
            "/webhook/notion/verify",
            get(verify_probe).post(verify_handler),
        )
        // Health check
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(max_body_bytes)),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Connectivity probe for the verification endpoint.
async fn verify_probe() -> Json<Value> {
    Json(json!({
        "status": "ready",
        "message": "Notion webhook endpoint is ready for verification",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Echo a verification challenge, or acknowledge a test delivery.
async fn verify_handler(body: Bytes) -> Response {
    let data: Value = match serde_json::from_slice(&body) {
        Ok(data) => data,
        Err(e) => {
            warn!(error = %e, "Failed to parse verification payload");
            return reject(StatusCode::BAD_REQUEST, "Invalid JSON");
        }
    };

    if let Ok(NotionWebhook::Verification { challenge }) = NotionWebhook::from_value(data.clone())
    {
        info!(challenge = %challenge, "Verification challenge received");
        return Json(json!({ "challenge": challenge })).into_response();
    }

    Json(json!({
        "status": "received",
        "message": "Webhook test received successfully",
        "data": data,
    }))
    .into_response()
}

/// Handle incoming Notion webhooks.
///
/// This handler:
/// 1. Decodes the body into a verification or an event
/// 2. Answers verifications immediately
/// 3. Verifies the event signature (if secret configured)
/// 4. Dispatches the event and acknowledges receipt
pub async fn notion_webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let webhook = match NotionWebhook::decode(&body) {
        Ok(webhook) => webhook,
        Err(e) => {
            warn!(error = %e, "Failed to parse webhook payload");
            return reject(StatusCode::BAD_REQUEST, "Invalid JSON");
        }
    };

    let event = match webhook {
        NotionWebhook::Verification { challenge } => {
            info!(challenge = %challenge, "Responding to URL verification challenge");
            return Json(json!({ "challenge": challenge })).into_response();
        }
        NotionWebhook::VerificationToken { token } => {
            // Printed so the operator can paste it into the integration settings.
            info!(verification_token = %token, "Received Notion verification token");
            return token.into_response();
        }
        NotionWebhook::Event(event) => event,
    };

    // Verify signature if secret is configured
    if let Some(secret) = &state.config.webhook_secret {
        let Some(signature) = signature_from_headers(&headers) else {
            warn!(event_type = %event.raw_type, "Missing webhook signature header");
            return reject(StatusCode::UNAUTHORIZED, "Missing signature");
        };

        if !verify_webhook_signature(&body, &signature, secret) {
            warn!(event_type = %event.raw_type, "Invalid webhook signature");
            return reject(StatusCode::UNAUTHORIZED, "Invalid signature");
        }
        debug!("Webhook signature verified");
    }

    let ack = match dispatch_event(&state.notifier, &event) {
        Ok(ack) => ack,
        Err(e) => {
            error!(error = %e, event_type = %event.raw_type, "Event processing failed");
            Ack::Received {
                event: event.raw_type.clone(),
            }
        }
    };

    Json(ack).into_response()
}

fn reject(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
