//! Keyboard layouts and callback payloads for the chat menu.

use crate::infrastructure::telegram::{
    InlineKeyboardButton, InlineKeyboardMarkup, ReplyKeyboardMarkup,
};

/// Menu button labels. Incoming messages are matched against these, so the
/// strings double as the menu "commands".
pub const START_INDEXING: &str = "🚀 Start indexing";
pub const CHECK_QUOTA: &str = "📊 Check quota";
pub const CANCEL: &str = "❌ Cancel";

/// Callback payload of the confirmation cancel button.
pub const CALLBACK_CANCEL: &str = "cancel";

const CALLBACK_INDEX_PREFIX: &str = "index::";

/// Persistent main menu shown under the input field.
pub fn main_menu() -> ReplyKeyboardMarkup {
    ReplyKeyboardMarkup::from_rows(vec![vec![START_INDEXING], vec![CHECK_QUOTA, CANCEL]])
}

/// Inline yes/no keyboard confirming a run for `domain`.
pub fn confirm_run(domain: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::from_rows(vec![vec![
        InlineKeyboardButton::new("✅ Index now", index_callback(domain)),
        InlineKeyboardButton::new("❌ Cancel", CALLBACK_CANCEL),
    ]])
}

/// Callback payload that starts a run for `domain`.
pub fn index_callback(domain: &str) -> String {
    format!("{CALLBACK_INDEX_PREFIX}{domain}")
}

/// Extracts the domain from an `index::` callback payload.
pub fn parse_index_callback(data: &str) -> Option<&str> {
    data.strip_prefix(CALLBACK_INDEX_PREFIX)
        .filter(|domain| !domain.is_empty())
}
