//! Bot configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the bot
//! starts polling for updates.
//!
//! ## Service Account Credentials
//!
//! Indexing API credentials can be supplied three ways (first match wins):
//!
//! ```bash
//! # Method 1: inline JSON (single service account)
//! export GOOGLE_APPLICATION_CREDENTIALS_JSON='{"client_email":"...","private_key":"..."}'
//!
//! # Method 2: directory of key files (one quota channel per *.json file)
//! export GOOGLE_CREDENTIALS_DIR="/etc/index-bot/keys"
//!
//! # Method 3: path to a single key file
//! export GOOGLE_APPLICATION_CREDENTIALS="/etc/index-bot/service-account.json"
//! ```
//!
//! ## Required Variables
//!
//! - `BOT_TOKEN` - Telegram bot token issued by @BotFather
//! - One of the credential variables above
//!
//! ## Optional Variables
//!
//! - `DAILY_LIMIT` - Publish quota per service account per UTC day (default: 200)
//! - `BATCH_SIZE` - URLs submitted per progress report, 1-100 (default: 10)
//! - `SITEMAP_MAX_DEPTH` - Sitemap index nesting limit (default: 8)
//! - `HTTP_TIMEOUT_SECS` - Timeout for outbound HTTP requests (default: 30)
//! - `POLL_TIMEOUT_SECS` - Telegram long-poll duration, 1-50 (default: 30)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Where the service account keys come from.
///
/// Resolved once at startup; the keys themselves are read and parsed
/// when the channels are built, so a bad path fails fast but a bad key
/// fails with a message naming the offending file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Raw key JSON passed directly through the environment.
    Inline(String),
    /// Directory scanned for `*.json` key files, one channel each.
    Directory(PathBuf),
    /// Single key file.
    File(PathBuf),
}

impl CredentialSource {
    /// Human-readable description for the startup summary.
    pub fn describe(&self) -> String {
        match self {
            Self::Inline(_) => "inline JSON (GOOGLE_APPLICATION_CREDENTIALS_JSON)".to_string(),
            Self::Directory(dir) => format!("key directory {}", dir.display()),
            Self::File(path) => format!("key file {}", path.display()),
        }
    }
}

/// Bot configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub credentials: CredentialSource,
    /// Publish quota granted to each service account per UTC day.
    /// Google's Indexing API default is 200 requests/day.
    pub daily_limit: u32,
    /// Number of URLs submitted between progress reports in chat.
    pub batch_size: usize,
    /// Maximum sitemap index nesting depth before a crawl is aborted.
    pub sitemap_max_depth: usize,
    pub http_timeout_secs: u64,
    /// Long-poll duration for `getUpdates`, in seconds (Telegram caps it at 50).
    pub poll_timeout_secs: u64,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `BOT_TOKEN` or the credential source is missing.
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("BOT_TOKEN").context("BOT_TOKEN must be set")?;

        let credentials =
            Self::load_credentials().context("Failed to load service account configuration")?;

        let daily_limit = env::var("DAILY_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(200);

        let batch_size = env::var("BATCH_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let sitemap_max_depth = env::var("SITEMAP_MAX_DEPTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8);

        let http_timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let poll_timeout_secs = env::var("POLL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Ok(Self {
            bot_token,
            credentials,
            daily_limit,
            batch_size,
            sitemap_max_depth,
            http_timeout_secs,
            poll_timeout_secs,
            log_level,
            log_format,
        })
    }

    /// Resolves the service account source from the environment.
    ///
    /// Priority:
    /// 1. `GOOGLE_APPLICATION_CREDENTIALS_JSON` (inline key JSON)
    /// 2. `GOOGLE_CREDENTIALS_DIR` (directory of key files)
    /// 3. `GOOGLE_APPLICATION_CREDENTIALS` (single key file)
    ///
    /// Public because the CLI resolves credentials without loading the
    /// rest of the bot configuration.
    pub fn load_credentials() -> Result<CredentialSource> {
        if let Ok(raw) = env::var("GOOGLE_APPLICATION_CREDENTIALS_JSON") {
            return Ok(CredentialSource::Inline(raw));
        }

        if let Ok(dir) = env::var("GOOGLE_CREDENTIALS_DIR") {
            return Ok(CredentialSource::Directory(PathBuf::from(dir)));
        }

        if let Ok(path) = env::var("GOOGLE_APPLICATION_CREDENTIALS") {
            return Ok(CredentialSource::File(PathBuf::from(path)));
        }

        anyhow::bail!(
            "one of GOOGLE_APPLICATION_CREDENTIALS_JSON, GOOGLE_CREDENTIALS_DIR \
             or GOOGLE_APPLICATION_CREDENTIALS must be set"
        )
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `BOT_TOKEN` is empty or malformed
    /// - `DAILY_LIMIT`, `BATCH_SIZE` or `SITEMAP_MAX_DEPTH` are out of range
    /// - `LOG_FORMAT` is not `text` or `json`
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.is_empty() {
            anyhow::bail!("BOT_TOKEN must not be empty");
        }

        // Telegram tokens look like "<numeric id>:<secret>"
        if !self.bot_token.contains(':') {
            anyhow::bail!("BOT_TOKEN does not look like a Telegram bot token");
        }

        if self.daily_limit == 0 {
            anyhow::bail!("DAILY_LIMIT must be at least 1");
        }

        if self.daily_limit > 100_000 {
            anyhow::bail!(
                "DAILY_LIMIT is too large (max: 100000), got {}",
                self.daily_limit
            );
        }

        if self.batch_size == 0 {
            anyhow::bail!("BATCH_SIZE must be at least 1");
        }

        // One batch becomes one chat message; Telegram caps message length.
        if self.batch_size > 100 {
            anyhow::bail!("BATCH_SIZE is too large (max: 100), got {}", self.batch_size);
        }

        if self.sitemap_max_depth == 0 {
            anyhow::bail!("SITEMAP_MAX_DEPTH must be at least 1");
        }

        if self.sitemap_max_depth > 64 {
            anyhow::bail!(
                "SITEMAP_MAX_DEPTH is too large (max: 64), got {}",
                self.sitemap_max_depth
            );
        }

        if self.http_timeout_secs == 0 {
            anyhow::bail!("HTTP_TIMEOUT_SECS must be greater than 0");
        }

        if self.poll_timeout_secs == 0 || self.poll_timeout_secs > 50 {
            anyhow::bail!(
                "POLL_TIMEOUT_SECS must be between 1 and 50, got {}",
                self.poll_timeout_secs
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        Ok(())
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Bot token: {}", mask_bot_token(&self.bot_token));
        tracing::info!("  Credentials: {}", self.credentials.describe());
        tracing::info!("  Daily limit per channel: {}", self.daily_limit);
        tracing::info!("  Batch size: {}", self.batch_size);
        tracing::info!("  Sitemap max depth: {}", self.sitemap_max_depth);
        tracing::info!("  HTTP timeout: {}s", self.http_timeout_secs);
        tracing::info!("  Poll timeout: {}s", self.poll_timeout_secs);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Masks the secret half of a bot token for logging.
///
/// `1234567890:AAE...` becomes `1234567890:***`; anything that does not
/// look like a token is masked entirely.
fn mask_bot_token(token: &str) -> String {
    match token.split_once(':') {
        Some((bot_id, _)) => format!("{}:***", bot_id),
        None => "***".to_string(),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
