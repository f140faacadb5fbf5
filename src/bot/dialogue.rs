//! Per-chat conversation state.
//!
//! The only multi-step flow is "press start, then send a domain", so the
//! state is one pending action per chat, kept in memory. Restarting the
//! process drops pending prompts, which is acceptable: the user just
//! presses the menu button again.

use std::collections::HashMap;

use tokio::sync::Mutex;

/// What the bot is waiting for from a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    /// The next text message is interpreted as a domain to index.
    AwaitingDomain,
}

/// Pending actions keyed by chat id.
#[derive(Default)]
pub struct DialogueState {
    pending: Mutex<HashMap<i64, PendingAction>>,
}

impl DialogueState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, chat_id: i64, action: PendingAction) {
        self.pending.lock().await.insert(chat_id, action);
    }

    /// Removes and returns the chat's pending action.
    pub async fn take(&self, chat_id: i64) -> Option<PendingAction> {
        self.pending.lock().await.remove(&chat_id)
    }

    /// Drops any pending action; `true` when something was pending.
    pub async fn clear(&self, chat_id: i64) -> bool {
        self.pending.lock().await.remove(&chat_id).is_some()
    }
}
