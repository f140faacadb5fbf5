//! Shared application state and startup wiring.
//!
//! Builds the full service graph out of a validated [`Config`]: one HTTP
//! client shared by every outbound integration, one quota channel per
//! service account key, and the services layered on top.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::services::RunService;
use crate::config::{Config, CredentialSource};
use crate::domain::entities::Channel;
use crate::domain::pool::ChannelPool;
use crate::infrastructure::google::{IndexingApiClient, ServiceAccountAuth, ServiceAccountKey};
use crate::infrastructure::sitemap::SitemapCrawler;
use crate::infrastructure::telegram::TelegramClient;

/// Shared state for the running bot.
#[derive(Clone)]
pub struct AppState {
    pub telegram: Arc<TelegramClient>,
    pub runs: Arc<RunService>,
}

impl AppState {
    /// Builds the service graph from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or no usable
    /// service account key is found.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = build_http_client(config.http_timeout_secs)?;

        let pool = build_channel_pool(&http, &config.credentials, config.daily_limit)?;
        tracing::info!("Loaded {} submission channel(s)", pool.len());

        let crawler = Arc::new(SitemapCrawler::new(http.clone(), config.sitemap_max_depth));
        let runs = Arc::new(RunService::new(crawler, Arc::new(pool), config.batch_size));
        let telegram = Arc::new(TelegramClient::new(http, &config.bot_token));

        Ok(Self { telegram, runs })
    }
}

/// Builds the HTTP client shared by the Telegram, sitemap and indexing calls.
///
/// Long-poll requests override this timeout per call.
pub fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("Failed to build HTTP client")
}

/// Loads keys from the configured source and wires one quota channel per key.
///
/// Channel order follows key order (directory sources sort by file name),
/// which is the order the selection rule consults them in.
pub fn build_channel_pool(
    http: &reqwest::Client,
    source: &CredentialSource,
    daily_limit: u32,
) -> Result<ChannelPool> {
    let keys = load_keys(source)?;

    let mut channels = Vec::with_capacity(keys.len());
    for key in keys {
        let email = key.client_email.clone();
        let auth = ServiceAccountAuth::new(http.clone(), key)
            .with_context(|| format!("Failed to prepare signing key for {email}"))?;
        let notifier = Arc::new(IndexingApiClient::new(http.clone(), auth));
        channels.push(Arc::new(Channel::new(email, notifier, daily_limit)));
    }

    Ok(ChannelPool::new(channels))
}

fn load_keys(source: &CredentialSource) -> Result<Vec<ServiceAccountKey>> {
    let keys = match source {
        CredentialSource::Inline(raw) => vec![ServiceAccountKey::from_json(raw)?],
        CredentialSource::Directory(dir) => ServiceAccountKey::load_dir(dir)?,
        CredentialSource::File(path) => vec![ServiceAccountKey::from_file(path)?],
    };
    Ok(keys)
}
