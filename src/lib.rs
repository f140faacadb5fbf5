//! # Index Bot
//!
//! A Telegram bot that walks a website's sitemap tree and submits every
//! page URL to the Google Indexing API, spreading the work across
//! multiple service accounts with per-day quotas.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Quota channels, run outcomes and the submission port
//! - **Application Layer** ([`application`]) - Run orchestration: enumerate, select, submit
//! - **Infrastructure Layer** ([`infrastructure`]) - Telegram, sitemap and Google API clients
//! - **Bot Layer** ([`bot`]) - Dialogue state, keyboards and message texts
//!
//! ## Features
//!
//! - Recursive sitemap index traversal with cycle and depth guards
//! - Per-service-account daily quotas with UTC day rollover
//! - Channel selection that never splits a run across accounts
//! - Batched submission with live progress reports in chat
//! - Service account JWT auth with cached access tokens
//!
//! ## Quick Start
//!
//! ```bash
//! # Set required environment variables
//! export BOT_TOKEN="1234567890:AAE..."
//! export GOOGLE_APPLICATION_CREDENTIALS="/etc/index-bot/key.json"
//!
//! # Start the bot
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Bot configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod application;
pub mod bot;
pub mod domain;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod runtime;

pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{RunError, RunService, SubmissionService};
    pub use crate::config::Config;
    pub use crate::domain::entities::{Channel, QuotaSnapshot, RunReport};
    pub use crate::domain::pool::ChannelPool;
    pub use crate::state::AppState;
}
