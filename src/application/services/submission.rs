//! Quota-gated URL submission loop.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::entities::{Channel, RunCompletion, RunSummary, SubmissionOutcome, utc_today};
use crate::domain::progress::ProgressObserver;

/// Submits URL lists through a channel, batch by batch.
///
/// One unit of quota is reserved immediately before each submission. A
/// submission that the indexing service rejects still counts against the
/// quota: the external call was spent either way, and the service's own
/// accounting sees it too.
pub struct SubmissionService {
    batch_size: usize,
}

impl SubmissionService {
    /// Creates a service that reports progress every `batch_size` URLs.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Submits `urls` through `channel` against the current UTC day.
    pub async fn submit(
        &self,
        channel: &Channel,
        urls: &[String],
        progress: &dyn ProgressObserver,
    ) -> RunSummary {
        self.submit_on(channel, urls, progress, utc_today()).await
    }

    /// Submits `urls` through `channel`, charging quota to `today`.
    ///
    /// The day is sampled once per run: a run that crosses UTC midnight
    /// keeps charging the day it started on.
    ///
    /// The run stops at the first refused quota reservation. The partial
    /// batch gathered so far is still reported through
    /// [`ProgressObserver::batch_done`] before
    /// [`ProgressObserver::quota_exhausted`] fires.
    pub async fn submit_on(
        &self,
        channel: &Channel,
        urls: &[String],
        progress: &dyn ProgressObserver,
        today: NaiveDate,
    ) -> RunSummary {
        let total = urls.len();
        let mut succeeded = 0usize;
        let mut failed = 0usize;
        let mut attempted = 0usize;
        let mut completion = RunCompletion::Completed;

        'run: for chunk in urls.chunks(self.batch_size) {
            let mut outcomes = Vec::with_capacity(chunk.len());
            for url in chunk {
                if !channel.quota().try_consume_on(today) {
                    completion = RunCompletion::QuotaExhausted;
                    if !outcomes.is_empty() {
                        progress.batch_done(&outcomes).await;
                    }
                    progress.quota_exhausted(total - attempted).await;
                    break 'run;
                }
                attempted += 1;

                match channel.notifier().publish(url).await {
                    Ok(()) => {
                        succeeded += 1;
                        outcomes.push(SubmissionOutcome::succeeded(url.clone()));
                    }
                    Err(err) => {
                        failed += 1;
                        warn!(
                            channel = channel.name(),
                            url = url.as_str(),
                            error = %err,
                            "url submission failed"
                        );
                        outcomes.push(SubmissionOutcome::failed(url.clone(), err));
                    }
                }
            }
            progress.batch_done(&outcomes).await;
        }

        let summary = RunSummary {
            total,
            succeeded,
            failed,
            remaining_quota: channel.quota().remaining_on(today),
            completion,
        };
        info!(
            channel = channel.name(),
            total,
            succeeded,
            failed,
            skipped = summary.skipped(),
            remaining_quota = summary.remaining_quota,
            "submission run finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::domain::entities::QuotaTracker;
    use crate::domain::notifier::{MockUrlNotifier, SubmissionError};

    #[derive(Default)]
    struct CaptureProgress {
        batch_sizes: Mutex<Vec<usize>>,
        exhausted_with: Mutex<Option<usize>>,
    }

    #[async_trait]
    impl ProgressObserver for CaptureProgress {
        async fn enumerated(&self, _total: usize) {}

        async fn batch_done(&self, outcomes: &[SubmissionOutcome]) {
            self.batch_sizes.lock().unwrap().push(outcomes.len());
        }

        async fn quota_exhausted(&self, remaining_urls: usize) {
            *self.exhausted_with.lock().unwrap() = Some(remaining_urls);
        }
    }

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://example.com/p{i}")).collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn channel(notifier: MockUrlNotifier, limit: u32, used: u32) -> Channel {
        Channel::with_quota(
            "test-channel",
            Arc::new(notifier),
            QuotaTracker::with_usage(limit, used, today()),
        )
    }

    #[tokio::test]
    async fn test_submits_everything_in_batches() {
        let mut notifier = MockUrlNotifier::new();
        notifier.expect_publish().times(25).returning(|_| Ok(()));
        let channel = channel(notifier, 200, 0);
        let progress = CaptureProgress::default();

        let summary = SubmissionService::new(10)
            .submit_on(&channel, &urls(25), &progress, today())
            .await;

        assert_eq!(summary.total, 25);
        assert_eq!(summary.succeeded, 25);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.completion, RunCompletion::Completed);
        assert_eq!(summary.remaining_quota, 175);
        assert_eq!(*progress.batch_sizes.lock().unwrap(), vec![10, 10, 5]);
        assert!(progress.exhausted_with.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_quota_stops_run_mid_batch() {
        let mut notifier = MockUrlNotifier::new();
        notifier.expect_publish().times(5).returning(|_| Ok(()));
        // 195 of 200 already used, so only 5 submissions fit.
        let channel = channel(notifier, 200, 195);
        let progress = CaptureProgress::default();

        let summary = SubmissionService::new(10)
            .submit_on(&channel, &urls(10), &progress, today())
            .await;

        assert_eq!(summary.succeeded, 5);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.skipped(), 5);
        assert_eq!(summary.completion, RunCompletion::QuotaExhausted);
        assert_eq!(summary.remaining_quota, 0);
        // The partial batch is flushed before the exhaustion event.
        assert_eq!(*progress.batch_sizes.lock().unwrap(), vec![5]);
        assert_eq!(*progress.exhausted_with.lock().unwrap(), Some(5));
    }

    #[tokio::test]
    async fn test_rejected_submission_still_consumes_quota() {
        let mut notifier = MockUrlNotifier::new();
        notifier.expect_publish().times(3).returning(|url| {
            if url.ends_with("/p1") {
                Err(SubmissionError::Service {
                    code: Some(403),
                    message: "Permission denied".to_string(),
                })
            } else {
                Ok(())
            }
        });
        let channel = channel(notifier, 10, 0);
        let progress = CaptureProgress::default();

        let summary = SubmissionService::new(10)
            .submit_on(&channel, &urls(3), &progress, today())
            .await;

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.completion, RunCompletion::Completed);
        // All three attempts are charged, including the rejected one.
        assert_eq!(summary.remaining_quota, 7);
    }

    #[tokio::test]
    async fn test_exhausted_channel_submits_nothing() {
        let mut notifier = MockUrlNotifier::new();
        notifier.expect_publish().times(0);
        let channel = channel(notifier, 200, 200);
        let progress = CaptureProgress::default();

        let summary = SubmissionService::new(10)
            .submit_on(&channel, &urls(4), &progress, today())
            .await;

        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.skipped(), 4);
        assert_eq!(summary.completion, RunCompletion::QuotaExhausted);
        assert!(progress.batch_sizes.lock().unwrap().is_empty());
        assert_eq!(*progress.exhausted_with.lock().unwrap(), Some(4));
    }

    #[tokio::test]
    async fn test_empty_url_list_is_a_trivial_run() {
        let mut notifier = MockUrlNotifier::new();
        notifier.expect_publish().times(0);
        let channel = channel(notifier, 200, 0);
        let progress = CaptureProgress::default();

        let summary = SubmissionService::new(10)
            .submit_on(&channel, &[], &progress, today())
            .await;

        assert_eq!(summary.total, 0);
        assert_eq!(summary.completion, RunCompletion::Completed);
        assert_eq!(summary.remaining_quota, 200);
        assert!(progress.batch_sizes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_outcome_order_matches_input_order() {
        let mut notifier = MockUrlNotifier::new();
        notifier.expect_publish().returning(|_| Ok(()));
        let channel = channel(notifier, 200, 0);

        #[derive(Default)]
        struct UrlCapture {
            seen: Mutex<Vec<String>>,
        }

        #[async_trait]
        impl ProgressObserver for UrlCapture {
            async fn enumerated(&self, _total: usize) {}

            async fn batch_done(&self, outcomes: &[SubmissionOutcome]) {
                let mut seen = self.seen.lock().unwrap();
                seen.extend(outcomes.iter().map(|o| o.url.clone()));
            }

            async fn quota_exhausted(&self, _remaining_urls: usize) {}
        }

        let progress = UrlCapture::default();
        let input = urls(7);
        SubmissionService::new(3)
            .submit_on(&channel, &input, &progress, today())
            .await;

        assert_eq!(*progress.seen.lock().unwrap(), input);
    }
}
