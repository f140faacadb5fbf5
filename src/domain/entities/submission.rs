//! Per-URL submission outcomes and run-level summaries.

use crate::domain::notifier::SubmissionError;

/// Result of submitting one URL to the indexing service.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub url: String,
    pub result: Result<(), SubmissionError>,
}

impl SubmissionOutcome {
    /// Records a successful submission.
    pub fn succeeded(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            result: Ok(()),
        }
    }

    /// Records a failed submission.
    pub fn failed(url: impl Into<String>, error: SubmissionError) -> Self {
        Self {
            url: url.into(),
            result: Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// How a submission run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunCompletion {
    /// Every discovered URL was attempted.
    Completed,
    /// The channel ran out of daily quota before the list was exhausted.
    QuotaExhausted,
}

/// Aggregate counters for a finished submission run.
///
/// `total` counts URLs discovered in the sitemap; URLs never attempted
/// because quota ran out are `total - succeeded - failed`.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Quota left on the submitting channel after the run.
    pub remaining_quota: u32,
    pub completion: RunCompletion,
}

impl RunSummary {
    /// URLs that were discovered but never attempted.
    pub fn skipped(&self) -> usize {
        self.total.saturating_sub(self.succeeded + self.failed)
    }

    pub fn is_quota_exhausted(&self) -> bool {
        self.completion == RunCompletion::QuotaExhausted
    }
}

/// Everything a caller needs to report a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Domain whose sitemap was crawled, e.g. `example.com`.
    pub domain: String,
    /// Name of the channel that performed the submissions.
    pub channel: String,
    pub summary: RunSummary,
}
