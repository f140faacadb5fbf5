//! Telegram transport: wire types, API client and the update poller.

pub mod client;
pub mod poller;
pub mod types;

pub use client::{ChatApi, TELEGRAM_API_BASE, TelegramClient, TelegramError};
pub use poller::{UpdateHandler, UpdatePoller};
pub use types::{
    CallbackQuery, Chat, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, Message,
    OutgoingMessage, ReplyKeyboardMarkup, ReplyMarkup, Update, User,
};

#[cfg(test)]
pub use client::MockChatApi;
