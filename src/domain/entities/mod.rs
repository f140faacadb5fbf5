//! Core domain entities for sitemap submission runs.
//!
//! # Entity Types
//!
//! - [`Channel`] - One indexing credential with its daily quota
//! - [`QuotaTracker`] - Check-and-increment counter scoped to a UTC day
//! - [`SubmissionOutcome`] - Result of submitting a single URL
//! - [`RunSummary`] / [`RunReport`] - Aggregates describing a finished run

pub mod channel;
pub mod submission;

pub use channel::{Channel, QuotaSnapshot, QuotaTracker, utc_today};
pub use submission::{RunCompletion, RunReport, RunSummary, SubmissionOutcome};
