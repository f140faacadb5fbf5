//! Long-poll loop feeding incoming updates to a handler.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, warn};

use super::client::TelegramClient;
use super::types::Update;

/// Attempts per backoff cycle before logging an error and starting over.
const POLL_RETRY_ATTEMPTS: usize = 8;

/// Receives updates pulled by the poller.
///
/// Each update is handled in its own task, so one slow conversation (a
/// submission run can take minutes) never blocks polling or other chats.
#[async_trait]
pub trait UpdateHandler: Send + Sync + 'static {
    async fn handle(&self, update: Update);
}

/// Pulls updates with `getUpdates` long polling and fans them out.
pub struct UpdatePoller<H> {
    client: Arc<TelegramClient>,
    handler: Arc<H>,
    poll_timeout_secs: u64,
}

impl<H: UpdateHandler> UpdatePoller<H> {
    pub fn new(client: Arc<TelegramClient>, handler: Arc<H>, poll_timeout_secs: u64) -> Self {
        Self {
            client,
            handler,
            poll_timeout_secs,
        }
    }

    /// Polls forever; runs until the surrounding task is dropped.
    ///
    /// The offset is only advanced past updates that were handed to a
    /// handler task, so a crash cannot silently skip updates.
    pub async fn run(&self) {
        let mut offset: Option<i64> = None;
        loop {
            for update in self.next_batch(offset).await {
                offset = Some(update.update_id + 1);
                debug!(update_id = update.update_id, "dispatching update");
                let handler = Arc::clone(&self.handler);
                tokio::spawn(async move {
                    handler.handle(update).await;
                });
            }
        }
    }

    /// One `getUpdates` call with exponential backoff on failure.
    ///
    /// When a whole backoff cycle fails the batch is empty and the outer
    /// loop starts a fresh cycle, so transient outages of any length are
    /// survived.
    async fn next_batch(&self, offset: Option<i64>) -> Vec<Update> {
        let strategy = ExponentialBackoff::from_millis(500)
            .max_delay(Duration::from_secs(30))
            .map(jitter)
            .take(POLL_RETRY_ATTEMPTS);

        let result = Retry::spawn(strategy, || async move {
            self.client
                .get_updates(offset, self.poll_timeout_secs)
                .await
                .map_err(|err| {
                    warn!(error = %err, "getUpdates failed, backing off");
                    err
                })
        })
        .await;

        match result {
            Ok(updates) => updates,
            Err(err) => {
                error!(error = %err, "getUpdates kept failing, restarting backoff cycle");
                Vec::new()
            }
        }
    }
}
