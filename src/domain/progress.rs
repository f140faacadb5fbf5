//! Progress reporting port for long-running submission runs.

use async_trait::async_trait;

use crate::domain::entities::SubmissionOutcome;

/// Receives interim events while a submission run executes.
///
/// The chat front end implements this to stream batch results into the
/// conversation; the CLI prints them to the terminal. Observers must not
/// fail: reporting problems are swallowed by the implementation so they
/// cannot abort a run.
#[async_trait]
pub trait ProgressObserver: Send + Sync {
    /// Called once after sitemap enumeration, before any submission.
    async fn enumerated(&self, total: usize);

    /// Called after each batch with that batch's per-URL outcomes.
    async fn batch_done(&self, outcomes: &[SubmissionOutcome]);

    /// Called at most once, when the channel runs out of quota mid-run.
    async fn quota_exhausted(&self, remaining_urls: usize);
}

/// Observer that discards all events.
///
/// Used by callers that only care about the final [`crate::domain::entities::RunReport`].
pub struct NullProgress;

#[async_trait]
impl ProgressObserver for NullProgress {
    async fn enumerated(&self, _total: usize) {}

    async fn batch_done(&self, _outcomes: &[SubmissionOutcome]) {}

    async fn quota_exhausted(&self, _remaining_urls: usize) {}
}
