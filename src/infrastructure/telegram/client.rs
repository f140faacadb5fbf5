//! Minimal Telegram Bot API client.
//!
//! Covers exactly the methods the bot uses: `getMe`, `getUpdates` long
//! polling, `sendMessage`, `editMessageText` and `answerCallbackQuery`.
//! Every call is an HTTPS POST with a JSON payload; responses arrive in the
//! standard `{ok, result, description}` envelope.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::types::{
    ApiResponse, Message, OutgoingMessage, ReplyMarkup, Update, User,
};

/// Production Bot API host.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

const MARKDOWN: &str = "Markdown";

/// Extra room on top of the long-poll timeout before reqwest gives up.
const POLL_GRACE_SECS: u64 = 10;

/// Errors produced by Bot API calls.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// The HTTP exchange failed or the envelope was unreadable.
    #[error("telegram {method} request failed")]
    Transport {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Telegram answered `ok: false`.
    #[error("telegram {method} rejected: {description}")]
    Api {
        method: &'static str,
        description: String,
    },
}

/// Outbound chat operations the bot logic depends on.
///
/// Handlers talk to this trait instead of [`TelegramClient`] directly so
/// conversations can be tested without a network.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Sends a message, returning the created [`Message`].
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError`] when delivery fails.
    async fn send_message(&self, message: OutgoingMessage) -> Result<Message, TelegramError>;

    /// Replaces the text of an existing bot message, dropping any inline
    /// keyboard it carried.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError`] when the edit is rejected.
    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: String,
    ) -> Result<(), TelegramError>;

    /// Acknowledges a callback query so the client stops showing a spinner.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError`] when the acknowledgement fails.
    async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), TelegramError>;
}

#[derive(Debug, Serialize)]
struct EmptyPayload {}

#[derive(Debug, Serialize)]
struct GetUpdatesPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: [&'static str; 2],
}

#[derive(Debug, Serialize)]
struct SendMessagePayload<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a ReplyMarkup>,
}

#[derive(Debug, Serialize)]
struct EditMessageTextPayload<'a> {
    chat_id: i64,
    message_id: i64,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Debug, Serialize)]
struct AnswerCallbackQueryPayload<'a> {
    callback_query_id: &'a str,
}

/// HTTP implementation of the Bot API.
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    /// Creates a client against the production API host.
    pub fn new(http: reqwest::Client, token: &str) -> Self {
        Self::with_api_base(http, token, TELEGRAM_API_BASE)
    }

    /// Creates a client against a custom API host, for tests.
    pub fn with_api_base(http: reqwest::Client, token: &str, api_base: &str) -> Self {
        Self {
            http,
            base_url: format!("{}/bot{token}", api_base.trim_end_matches('/')),
        }
    }

    /// Identifies the bot account behind the token.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError`] when the token is rejected or the API is
    /// unreachable; used as a startup check.
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &EmptyPayload {}, None).await
    }

    /// Long-polls for updates after `offset`.
    ///
    /// The per-request timeout is extended past `poll_timeout_secs` so the
    /// shared client's default timeout cannot cut the poll short.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError`] on transport failures or an `ok: false`
    /// envelope; callers are expected to retry with backoff.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        poll_timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let payload = GetUpdatesPayload {
            offset,
            timeout: poll_timeout_secs,
            allowed_updates: ["message", "callback_query"],
        };
        let timeout = Duration::from_secs(poll_timeout_secs + POLL_GRACE_SECS);
        self.call("getUpdates", &payload, Some(timeout)).await
    }

    async fn call<R>(
        &self,
        method: &'static str,
        payload: &impl Serialize,
        timeout: Option<Duration>,
    ) -> Result<R, TelegramError>
    where
        R: DeserializeOwned,
    {
        let mut request = self
            .http
            .post(format!("{}/{method}", self.base_url))
            .json(payload);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|source| TelegramError::Transport { method, source })?;

        // Telegram reports errors through the envelope, with the HTTP status
        // mirroring it, so the body is read regardless of status.
        let envelope: ApiResponse<R> = response
            .json()
            .await
            .map_err(|source| TelegramError::Transport { method, source })?;

        if !envelope.ok {
            return Err(TelegramError::Api {
                method,
                description: envelope
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }
        envelope.result.ok_or(TelegramError::Api {
            method,
            description: "envelope is ok but carries no result".to_string(),
        })
    }
}

#[async_trait]
impl ChatApi for TelegramClient {
    async fn send_message(&self, message: OutgoingMessage) -> Result<Message, TelegramError> {
        let payload = SendMessagePayload {
            chat_id: message.chat_id,
            text: &message.text,
            parse_mode: MARKDOWN,
            disable_web_page_preview: true,
            reply_markup: message.reply_markup.as_ref(),
        };
        self.call("sendMessage", &payload, None).await
    }

    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: String,
    ) -> Result<(), TelegramError> {
        let payload = EditMessageTextPayload {
            chat_id,
            message_id,
            text: &text,
            parse_mode: MARKDOWN,
        };
        self.call::<Message>("editMessageText", &payload, None)
            .await
            .map(|_| ())
    }

    async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), TelegramError> {
        let payload = AnswerCallbackQueryPayload { callback_query_id };
        self.call::<bool>("answerCallbackQuery", &payload, None)
            .await
            .map(|_| ())
    }
}
