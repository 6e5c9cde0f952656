//! Notion webhook service binary.
//!
//! Standalone HTTP service for Notion webhook verification and event intake.

use anyhow::{Context, Result};
use lab_notify::Notifier;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use notion_webhook::{config::Config, server};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("notion_webhook=info".parse()?)
                .add_directive("lab_notify=info".parse()?),
        )
        .init();

    info!("Starting Notion webhook service...");

    let config = Config::default();

    if config.signature_required() {
        info!("Webhook signature verification enabled");
    } else {
        warn!("NOTION_WEBHOOK_SECRET not set - accepting unsigned events");
    }

    if config.notion_token.is_none() {
        info!("No NOTION_API_TOKEN configured - outbound Notion calls are disabled");
    }

    let notifier = Notifier::from_env();
    info!(channels = notifier.channel_count(), "Alert dispatch ready");

    let state = server::AppState {
        config: config.clone(),
        notifier: Arc::new(notifier),
    };

    let app = server::build_router(state);

    // Bind and serve
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(
        port = config.port,
        webhook = "/webhook/notion",
        verify = "/webhook/notion/verify",
        health = "/health",
        "Notion webhook service listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Notion webhook service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
