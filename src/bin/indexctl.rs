//! Operator CLI for index-bot.
//!
//! Drives the same sitemap enumeration and submission pipeline as the
//! Telegram bot, without going through chat. Useful for one-off runs,
//! dry runs and key checks from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Submit every sitemap URL of a domain
//! cargo run --bin indexctl -- run example.com
//!
//! # Skip the confirmation prompt
//! cargo run --bin indexctl -- run example.com --yes
//!
//! # Enumerate a sitemap tree without submitting anything
//! cargo run --bin indexctl -- sitemap example.com
//!
//! # List configured service accounts
//! cargo run --bin indexctl -- channels
//! ```
//!
//! # Environment Variables
//!
//! - One of `GOOGLE_APPLICATION_CREDENTIALS_JSON`, `GOOGLE_CREDENTIALS_DIR`
//!   or `GOOGLE_APPLICATION_CREDENTIALS` (required for `run` and `channels`)
//!
//! `BOT_TOKEN` is not needed; the CLI talks to the indexing API directly.
//!
//! # Features
//!
//! - **Dry Runs**: Enumerate a sitemap tree without spending quota
//! - **Key Checks**: `channels` fails loudly when a key file does not parse
//! - **Interactive Prompts**: Confirmation before quota is spent
//! - **Colored Output**: Terminal-friendly formatting using `colored` crate

use index_bot::application::services::RunService;
use index_bot::config::Config;
use index_bot::domain::entities::SubmissionOutcome;
use index_bot::domain::progress::ProgressObserver;
use index_bot::infrastructure::sitemap::SitemapCrawler;
use index_bot::state::{build_channel_pool, build_http_client};
use index_bot::utils::extract_domain;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;

/// CLI tool for driving index-bot submission runs.
#[derive(Parser)]
#[command(name = "indexctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Daily quota per service account
    #[arg(long, default_value_t = 200)]
    daily_limit: u32,

    /// URLs submitted per progress batch
    #[arg(long, default_value_t = 10)]
    batch_size: usize,

    /// Sitemap index nesting limit
    #[arg(long, default_value_t = 8)]
    max_depth: usize,

    /// Outbound HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    http_timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Submit every sitemap URL of a domain
    Run {
        /// Domain to index, e.g. "example.com" or a full URL
        domain: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Enumerate a sitemap tree without submitting anything
    Sitemap {
        /// Domain to enumerate
        domain: String,
    },

    /// List configured service accounts and their daily limits
    Channels,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let Cli {
        daily_limit,
        batch_size,
        max_depth,
        http_timeout,
        command,
    } = Cli::parse();

    let http = build_http_client(http_timeout)?;

    match command {
        Commands::Run { domain, yes } => {
            run_submission(&http, &domain, yes, daily_limit, batch_size, max_depth).await?;
        }
        Commands::Sitemap { domain } => {
            enumerate_sitemap(&http, &domain, max_depth).await?;
        }
        Commands::Channels => {
            list_channels(&http, daily_limit)?;
        }
    }

    Ok(())
}

/// Runs a full submission for a domain with interactive confirmation.
///
/// # Flow
///
/// 1. Validate the domain argument
/// 2. Load service account keys and wire channels
/// 3. Confirm quota spend (unless `--yes` flag)
/// 4. Enumerate, select a channel, submit batch by batch
/// 5. Display the run summary
async fn run_submission(
    http: &reqwest::Client,
    domain: &str,
    skip_confirm: bool,
    daily_limit: u32,
    batch_size: usize,
    max_depth: usize,
) -> Result<()> {
    println!("{}", "🚀 Submission Run".bright_blue().bold());
    println!();

    let domain = extract_domain(domain).context("Invalid domain")?;

    let credentials = Config::load_credentials()?;
    let pool = build_channel_pool(http, &credentials, daily_limit)?;

    println!("  Domain:   {}", domain.cyan());
    println!("  Channels: {}", pool.len().to_string().bright_white());
    println!();

    // Confirm
    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Submit every sitemap URL of this domain?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
        println!();
    }

    let crawler = Arc::new(SitemapCrawler::new(http.clone(), max_depth));
    let runs = RunService::new(crawler, Arc::new(pool), batch_size);

    let report = runs.run(&domain, &TerminalProgress).await?;
    let summary = &report.summary;

    println!();
    println!("{}", "✅ Run finished".green().bold());
    println!();
    println!("  Channel:    {}", report.channel.cyan());
    println!(
        "  Submitted:  {}",
        summary.succeeded.to_string().bright_green().bold()
    );
    println!("  Failed:     {}", summary.failed.to_string().bright_red());
    if summary.skipped() > 0 {
        println!(
            "  Skipped:    {} (quota exhausted)",
            summary.skipped().to_string().yellow()
        );
    }
    println!(
        "  Quota left: {}",
        summary.remaining_quota.to_string().bright_white()
    );
    println!();

    Ok(())
}

/// Enumerates a sitemap tree and prints every URL without submitting.
async fn enumerate_sitemap(http: &reqwest::Client, domain: &str, max_depth: usize) -> Result<()> {
    println!("{}", "🗺  Sitemap Enumeration".bright_blue().bold());
    println!();

    let domain = extract_domain(domain).context("Invalid domain")?;
    let crawler = SitemapCrawler::new(http.clone(), max_depth);

    let urls = crawler.enumerate_domain(&domain).await?;

    if urls.is_empty() {
        println!("{}", "  No URLs found".yellow());
        println!();
        return Ok(());
    }

    for url in &urls {
        println!("  {url}");
    }

    println!();
    println!("  Total: {}", urls.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Lists configured service accounts with status indicators.
///
/// # Output Format
///
/// ```text
/// 📋 Submission Channels
///
///   #   Account                                          Daily limit
///   ─────────────────────────────────────────────────────────────────
///   1   indexer@project.iam.gserviceaccount.com          200
/// ```
fn list_channels(http: &reqwest::Client, daily_limit: u32) -> Result<()> {
    println!("{}", "📋 Submission Channels".bright_blue().bold());
    println!();

    let credentials = Config::load_credentials()?;
    let pool = build_channel_pool(http, &credentials, daily_limit)?;

    println!(
        "  {:<3} {:<48} {:<11}",
        "#".bright_white().bold(),
        "Account".bright_white().bold(),
        "Daily limit".bright_white().bold()
    );
    println!("  {}", "─".repeat(65).bright_black());

    for (index, channel) in pool.channels().iter().enumerate() {
        println!(
            "  {:<3} {:<48} {:<11}",
            (index + 1).to_string().bright_black(),
            channel.name().cyan(),
            channel.quota().daily_limit().to_string().bright_white()
        );
    }

    println!();
    println!("  Total: {}", pool.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Prints run progress to the terminal as batches complete.
struct TerminalProgress;

#[async_trait]
impl ProgressObserver for TerminalProgress {
    async fn enumerated(&self, total: usize) {
        println!("  Found {} URLs", total.to_string().bright_white().bold());
    }

    async fn batch_done(&self, outcomes: &[SubmissionOutcome]) {
        for outcome in outcomes {
            match &outcome.result {
                Ok(()) => println!("  {} {}", "✓".green(), outcome.url),
                Err(err) => println!(
                    "  {} {} {}",
                    "✗".red(),
                    outcome.url,
                    format!("({})", err.brief()).bright_black()
                ),
            }
        }
    }

    async fn quota_exhausted(&self, remaining_urls: usize) {
        println!();
        println!(
            "{}",
            format!("⚠️  Quota exhausted, {remaining_urls} URLs left unsubmitted").yellow()
        );
    }
}
