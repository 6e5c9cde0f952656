//! Configuration for the Notion webhook service.

use std::env;

/// Default listen port when neither `PORT` nor `WEBHOOK_PORT` is set.
const DEFAULT_PORT: u16 = 8080;

/// Default request body limit (1 MiB).
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Notion webhook service configuration.
#[derive(Clone)]
pub struct Config {
    /// HTTP server port.
    pub port: u16,
    /// Shared secret for signature verification. Verification is skipped when unset.
    pub webhook_secret: Option<String>,
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
    /// Notion integration token, if outbound Notion calls are possible.
    pub notion_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Hosting platforms inject PORT; WEBHOOK_PORT is for local runs.
            port: env::var("PORT")
                .or_else(|_| env::var("WEBHOOK_PORT"))
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            webhook_secret: env::var("NOTION_WEBHOOK_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            max_body_bytes: env::var("WEBHOOK_MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_BODY_BYTES),
            notion_token: env::var("NOTION_API_TOKEN")
                .ok()
                .filter(|s| !s.is_empty()),
        }
    }
}

impl Config {
    /// Whether inbound events must carry a valid signature.
    #[must_use]
    pub fn signature_required(&self) -> bool {
        self.webhook_secret.is_some()
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("signature_required", &self.signature_required())
            .field("max_body_bytes", &self.max_body_bytes)
            .field("notion_token_set", &self.notion_token.is_some())
            .finish()
    }
}
