//! Conversation logic for the chat menu.
//!
//! All outbound traffic goes through the [`ChatApi`] trait, so every flow
//! here is testable with a mocked chat. Incoming updates arrive one per
//! task; a running submission only blocks its own conversation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::services::RunService;
use crate::domain::entities::SubmissionOutcome;
use crate::domain::progress::ProgressObserver;
use crate::infrastructure::telegram::{
    CallbackQuery, ChatApi, Message, OutgoingMessage, TelegramError,
};
use crate::utils::extract_domain;

use super::dialogue::{DialogueState, PendingAction};
use super::{keyboards, messages};

/// Menu and callback handling on top of a chat transport.
pub struct BotHandlers<C: ChatApi> {
    chat: Arc<C>,
    runs: Arc<RunService>,
    dialogue: DialogueState,
}

impl<C: ChatApi> BotHandlers<C> {
    pub fn new(chat: Arc<C>, runs: Arc<RunService>) -> Self {
        Self {
            chat,
            runs,
            dialogue: DialogueState::new(),
        }
    }

    /// Routes one incoming text message.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError`] when a reply cannot be delivered.
    pub async fn handle_message(&self, message: Message) -> Result<(), TelegramError> {
        let chat_id = message.chat.id;
        let Some(text) = message.text.as_deref() else {
            debug!(chat_id, "ignoring non-text message");
            return Ok(());
        };

        match text.trim() {
            "/start" => {
                self.dialogue.clear(chat_id).await;
                self.send_menu(chat_id, messages::greeting()).await
            }
            keyboards::START_INDEXING => {
                self.dialogue
                    .set(chat_id, PendingAction::AwaitingDomain)
                    .await;
                self.send(OutgoingMessage::text(chat_id, messages::ask_domain()))
                    .await
            }
            keyboards::CHECK_QUOTA => self.send_quota_report(chat_id).await,
            keyboards::CANCEL => {
                let had_pending = self.dialogue.clear(chat_id).await;
                let text = if had_pending {
                    messages::cancelled()
                } else {
                    messages::nothing_pending()
                };
                self.send_menu(chat_id, text).await
            }
            other => self.handle_free_text(chat_id, other).await,
        }
    }

    /// Routes one inline keyboard press.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError`] when the acknowledgement or a reply cannot
    /// be delivered.
    pub async fn handle_callback(&self, callback: CallbackQuery) -> Result<(), TelegramError> {
        self.chat.answer_callback_query(&callback.id).await?;

        let Some(message) = callback.message else {
            warn!(callback_id = %callback.id, "callback without a source message");
            return Ok(());
        };
        let chat_id = message.chat.id;

        match callback.data.as_deref() {
            Some(keyboards::CALLBACK_CANCEL) => {
                self.chat
                    .edit_message_text(chat_id, message.message_id, messages::cancelled())
                    .await
            }
            Some(data) => match keyboards::parse_index_callback(data) {
                Some(domain) => {
                    self.chat
                        .edit_message_text(
                            chat_id,
                            message.message_id,
                            messages::run_started(domain),
                        )
                        .await?;
                    self.execute_run(chat_id, domain).await
                }
                None => {
                    warn!(chat_id, data, "unknown callback payload");
                    Ok(())
                }
            },
            None => Ok(()),
        }
    }

    /// Text that is not a menu entry: either the awaited domain or noise.
    async fn handle_free_text(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        match self.dialogue.take(chat_id).await {
            Some(PendingAction::AwaitingDomain) => match extract_domain(text) {
                Ok(domain) => {
                    let accounts = self.channel_accounts();
                    let confirm =
                        OutgoingMessage::text(chat_id, messages::confirm_run(&domain, &accounts))
                            .with_inline_keyboard(keyboards::confirm_run(&domain));
                    self.send(confirm).await
                }
                Err(err) => {
                    debug!(chat_id, error = %err, "rejected domain input");
                    // Keep waiting for a usable domain.
                    self.dialogue
                        .set(chat_id, PendingAction::AwaitingDomain)
                        .await;
                    self.send(OutgoingMessage::text(chat_id, messages::invalid_domain()))
                        .await
                }
            },
            None => self.send_menu(chat_id, messages::fallback()).await,
        }
    }

    async fn execute_run(&self, chat_id: i64, domain: &str) -> Result<(), TelegramError> {
        let progress = ChatProgress {
            chat: self.chat.as_ref(),
            chat_id,
        };
        match self.runs.run(domain, &progress).await {
            Ok(report) => self.send_menu(chat_id, messages::run_report(&report)).await,
            Err(err) => {
                warn!(chat_id, domain, error = %err, "submission run failed");
                self.send_menu(chat_id, messages::run_failed(&err)).await
            }
        }
    }

    /// Emails of every configured channel, for the Search Console note.
    fn channel_accounts(&self) -> Vec<String> {
        self.runs
            .pool()
            .channels()
            .iter()
            .map(|channel| channel.name().to_string())
            .collect()
    }

    async fn send_quota_report(&self, chat_id: i64) -> Result<(), TelegramError> {
        let rows: Vec<_> = self
            .runs
            .pool()
            .channels()
            .iter()
            .map(|channel| (channel.name().to_string(), channel.quota().snapshot()))
            .collect();
        self.send_menu(chat_id, messages::quota_report(&rows)).await
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), TelegramError> {
        self.chat.send_message(message).await.map(|_| ())
    }

    async fn send_menu(&self, chat_id: i64, text: String) -> Result<(), TelegramError> {
        self.send(OutgoingMessage::text(chat_id, text).with_keyboard(keyboards::main_menu()))
            .await
    }
}

/// Streams run progress into the conversation; failures are logged, never
/// propagated, so a flaky chat cannot abort a submission run.
struct ChatProgress<'a, C: ChatApi> {
    chat: &'a C,
    chat_id: i64,
}

impl<C: ChatApi> ChatProgress<'_, C> {
    async fn best_effort(&self, text: String) {
        if let Err(err) = self
            .chat
            .send_message(OutgoingMessage::text(self.chat_id, text))
            .await
        {
            warn!(chat_id = self.chat_id, error = %err, "progress message not delivered");
        }
    }
}

#[async_trait]
impl<C: ChatApi> ProgressObserver for ChatProgress<'_, C> {
    async fn enumerated(&self, total: usize) {
        self.best_effort(messages::found_urls(total)).await;
    }

    async fn batch_done(&self, outcomes: &[SubmissionOutcome]) {
        if !outcomes.is_empty() {
            self.best_effort(messages::batch_progress(outcomes)).await;
        }
    }

    async fn quota_exhausted(&self, remaining_urls: usize) {
        self.best_effort(messages::quota_exhausted_notice(remaining_urls))
            .await;
    }
}
