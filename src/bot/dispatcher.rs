//! Routes polled updates into the conversation handlers.

use async_trait::async_trait;
use tracing::{debug, error};

use crate::infrastructure::telegram::{ChatApi, Update, UpdateHandler};

use super::handlers::BotHandlers;

/// [`UpdateHandler`] splitting updates into messages and callbacks.
///
/// Reply failures end here: they are logged and dropped, never allowed to
/// take the poller down.
pub struct Dispatcher<C: ChatApi> {
    handlers: BotHandlers<C>,
}

impl<C: ChatApi> Dispatcher<C> {
    pub fn new(handlers: BotHandlers<C>) -> Self {
        Self { handlers }
    }
}

#[async_trait]
impl<C: ChatApi + 'static> UpdateHandler for Dispatcher<C> {
    async fn handle(&self, update: Update) {
        let update_id = update.update_id;
        let result = if let Some(message) = update.message {
            self.handlers.handle_message(message).await
        } else if let Some(callback) = update.callback_query {
            self.handlers.handle_callback(callback).await
        } else {
            debug!(update_id, "update carries nothing to handle");
            Ok(())
        };

        if let Err(err) = result {
            error!(update_id, error = %err, "update handling failed");
        }
    }
}
