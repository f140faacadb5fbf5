//! User-facing message texts.
//!
//! The bot sends Markdown, so user-controlled values are never interpolated
//! raw; only validated domains and URLs taken from sitemaps end up in
//! messages.

use crate::application::services::RunError;
use crate::domain::entities::{QuotaSnapshot, RunReport, SubmissionOutcome};

/// A channel at or below this remaining quota is flagged in reports.
pub const LOW_QUOTA_THRESHOLD: u32 = 20;

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

pub fn greeting() -> String {
    "👋 Hi! I submit website pages to the search index.\n\n\
     Press *🚀 Start indexing* and send me a domain, or check today's quota."
        .to_string()
}

pub fn ask_domain() -> String {
    "🔎 Send me the domain to index, for example `example.com`.".to_string()
}

pub fn invalid_domain() -> String {
    "⚠️ That doesn't look like a domain. Send something like `example.com` or \
     `https://example.com`."
        .to_string()
}

pub fn confirm_run(domain: &str, accounts: &[String]) -> String {
    let mut text = format!(
        "Index *{domain}*?\n\nI'll crawl `{domain}/sitemap_index.xml` and submit every URL it \
         lists."
    );
    if !accounts.is_empty() {
        text.push_str(
            "\n\nMake sure these service accounts have *Owner* access to the site in Search \
             Console:",
        );
        for account in accounts {
            text.push_str(&format!("\n• `{account}`"));
        }
    }
    text
}

pub fn run_started(domain: &str) -> String {
    format!("⏳ Crawling the sitemap of *{domain}*...")
}

pub fn cancelled() -> String {
    "❌ Cancelled.".to_string()
}

pub fn nothing_pending() -> String {
    "Nothing to cancel. Pick an action from the menu.".to_string()
}

pub fn fallback() -> String {
    "🤖 I only understand the menu below. Press *🚀 Start indexing* to begin.".to_string()
}

pub fn found_urls(total: usize) -> String {
    format!("🔍 Found {total} URL{} in the sitemap.", plural(total))
}

/// One line per URL with its outcome.
pub fn batch_progress(outcomes: &[SubmissionOutcome]) -> String {
    outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(()) => format!("✅ {}", outcome.url),
            Err(err) => format!("❌ {}: {}", outcome.url, err.brief()),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn quota_exhausted_notice(remaining_urls: usize) -> String {
    format!(
        "⚠️ Daily quota is exhausted. {remaining_urls} URL{} left unsubmitted; run again after \
         the midnight UTC reset.",
        plural(remaining_urls)
    )
}

pub fn run_report(report: &RunReport) -> String {
    let summary = &report.summary;
    let mut lines = vec![
        format!("🏁 Indexing of *{}* finished.", report.domain),
        String::new(),
        format!("🔍 Found: {}", summary.total),
        format!("✅ Submitted: {}", summary.succeeded),
        format!("❌ Failed: {}", summary.failed),
    ];
    if summary.skipped() > 0 {
        lines.push(format!("⏭ Skipped (out of quota): {}", summary.skipped()));
    }
    lines.push(format!("📦 Channel: `{}`", report.channel));
    lines.push(format!("📊 Quota left today: {}", summary.remaining_quota));
    lines.join("\n")
}

pub fn run_failed(error: &RunError) -> String {
    match error {
        RunError::Sitemap(err) => format!(
            "❌ Could not read the sitemap: {err}. Check that the domain serves \
             `/sitemap_index.xml`."
        ),
        RunError::NoUrls { domain } => {
            format!("🤷 The sitemap of *{domain}* lists no pages. Nothing to submit.")
        }
        RunError::NoEligibleChannel { url_count } => format!(
            "⛔ Not enough quota left today for {url_count} URL{} on any channel. Try again \
             after the midnight UTC reset.",
            plural(*url_count)
        ),
    }
}

/// Per-channel usage table for the quota menu entry.
pub fn quota_report(rows: &[(String, QuotaSnapshot)]) -> String {
    let mut lines = vec![
        "📊 *Daily quota* (resets at midnight UTC)".to_string(),
        String::new(),
    ];
    for (name, snapshot) in rows {
        let mut line = format!(
            "• `{name}`: {}/{} used, {} left",
            snapshot.used, snapshot.daily_limit, snapshot.remaining
        );
        if snapshot.remaining <= LOW_QUOTA_THRESHOLD {
            line.push_str(" ⚠️");
        }
        lines.push(line);
    }
    lines.join("\n")
}
