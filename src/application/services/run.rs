//! End-to-end submission runs: enumerate, pick a channel, submit.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::entities::{RunReport, utc_today};
use crate::domain::pool::ChannelPool;
use crate::domain::progress::ProgressObserver;
use crate::infrastructure::sitemap::{SitemapCrawler, SitemapError};

use super::submission::SubmissionService;

/// Errors that prevent a run from submitting anything.
///
/// Failures *during* submission are not errors at this level; they show up
/// in the [`RunReport`] counters instead.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Sitemap(#[from] SitemapError),

    /// The sitemap tree parsed fine but lists no pages.
    #[error("sitemap tree of {domain} contains no URLs")]
    NoUrls { domain: String },

    /// Every channel has less remaining quota than the URL list needs.
    #[error("no channel has enough quota for {url_count} URLs")]
    NoEligibleChannel { url_count: usize },
}

/// Orchestrates one submission run for a domain.
///
/// A run is atomic with respect to channel choice: the channel is picked
/// once, before any submission, and must cover the whole URL list. When no
/// channel can, the run fails without consuming any quota.
pub struct RunService {
    crawler: Arc<SitemapCrawler>,
    pool: Arc<ChannelPool>,
    submission: SubmissionService,
}

impl RunService {
    pub fn new(crawler: Arc<SitemapCrawler>, pool: Arc<ChannelPool>, batch_size: usize) -> Self {
        Self {
            crawler,
            pool,
            submission: SubmissionService::new(batch_size),
        }
    }

    /// Channels in configuration order, for quota reporting.
    pub fn pool(&self) -> &ChannelPool {
        &self.pool
    }

    /// Runs a full submission for `domain`.
    ///
    /// Steps: enumerate the sitemap tree, report the count through
    /// `progress`, select a channel, submit batch by batch.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Sitemap`] when enumeration fails,
    /// [`RunError::NoUrls`] for an empty tree and
    /// [`RunError::NoEligibleChannel`] when quota cannot cover the list.
    pub async fn run(
        &self,
        domain: &str,
        progress: &dyn ProgressObserver,
    ) -> Result<RunReport, RunError> {
        let urls = self.crawler.enumerate_domain(domain).await?;
        if urls.is_empty() {
            return Err(RunError::NoUrls {
                domain: domain.to_string(),
            });
        }
        progress.enumerated(urls.len()).await;

        let today = utc_today();
        let channel =
            self.pool
                .select_on(urls.len(), today)
                .ok_or(RunError::NoEligibleChannel {
                    url_count: urls.len(),
                })?;

        info!(
            domain,
            channel = channel.name(),
            urls = urls.len(),
            "starting submission run"
        );
        let summary = self
            .submission
            .submit_on(&channel, &urls, progress, today)
            .await;

        Ok(RunReport {
            domain: domain.to_string(),
            channel: channel.name().to_string(),
            summary,
        })
    }
}
