//! consult-chat - terminal client for a pet-health inference endpoint
//!
//! Forwards each message to the remote model with a single JSON POST and
//! renders the reply. One request in flight at a time.

mod api;
mod chat;
mod controller;
mod tui;

use api::{ApiConfig, ApiService};
use controller::Controller;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to a file; the terminal belongs to the UI
    let log_path = std::env::var("CHAT_LOG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir().join("consult-chat.log"));
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "consult_chat=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    let config = ApiConfig::from_env();
    tracing::info!(
        base_url = %config.base_url,
        timeout_ms = %config.timeout.as_millis(),
        log = %log_path.display(),
        "Configuration loaded"
    );

    // Single transport instance, constructed here and injected
    let transport = Arc::new(ApiService::new(config)?);
    let controller = Controller::new(transport);

    tui::run(controller).await?;

    tracing::info!("Chat session ended");
    Ok(())
}
