//! Bot runtime: startup checks, update polling and shutdown.
//!
//! Wires the service graph, verifies the bot token against Telegram and
//! then long-polls for updates until a shutdown signal arrives.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::bot::{BotHandlers, Dispatcher};
use crate::config::Config;
use crate::infrastructure::telegram::UpdatePoller;
use crate::state::AppState;

/// Runs the bot with the given configuration.
///
/// Initializes:
/// - Shared HTTP client
/// - One submission channel per service account key
/// - Sitemap crawler and run service
/// - Telegram update poller
///
/// # Errors
///
/// Returns an error if startup wiring fails or Telegram rejects the
/// bot token.
pub async fn run(config: Config) -> Result<()> {
    let state = AppState::from_config(&config)?;

    let me = state
        .telegram
        .get_me()
        .await
        .context("Failed to reach Telegram; check BOT_TOKEN")?;
    tracing::info!(
        "Authorized as @{}",
        me.username.as_deref().unwrap_or("unknown")
    );

    let handlers = BotHandlers::new(state.telegram.clone(), state.runs.clone());
    let dispatcher = Arc::new(Dispatcher::new(handlers));
    let poller = UpdatePoller::new(state.telegram.clone(), dispatcher, config.poll_timeout_secs);

    tracing::info!("Polling for updates");

    // The poller only returns if its loop is broken, so in practice this
    // waits for the shutdown signal.
    tokio::select! {
        _ = poller.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received, stopping");
        }
    }

    Ok(())
}
