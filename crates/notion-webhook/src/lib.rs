//! Notion webhook intake for lab operations.
//!
//! This crate provides:
//! - Webhook body decoding into verification challenges and typed events
//! - HMAC-SHA256 signature verification against a shared secret
//! - An HTTP server answering Notion's URL verification and acknowledging events
//! - Dispatch of verified events to Teams through `lab-notify`

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod handlers;
pub mod server;
pub mod webhooks;

pub use config::Config;
pub use webhooks::{verify_webhook_signature, EventKind, NotionEvent, NotionWebhook};
