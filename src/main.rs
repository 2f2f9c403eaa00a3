//! Sumi-Harvest main entry point
//!
//! This is the command-line interface for the Sumi-Harvest document harvester.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use sumi_harvest::config::{load_config_with_hash, Config};
use sumi_harvest::fetch::ReqwestTransport;
use sumi_harvest::output::{print_records, print_statistics, write_results};
use sumi_harvest::{HtmlExtractor, Orchestrator};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Sumi-Harvest: a polite concurrent document harvester
///
/// Sumi-Harvest fetches a fixed set of URLs concurrently under a global
/// rate limit, retries transient failures with exponential backoff, and
/// extracts title, author, date and summary from each page.
#[derive(Parser, Debug)]
#[command(name = "sumi-harvest")]
#[command(version)]
#[command(about = "A polite concurrent document harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// URL to harvest, in addition to those in the config (repeatable)
    #[arg(long = "url", value_name = "URL")]
    urls: Vec<String>,

    /// Where to write the JSON results (overrides the config)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Stop the run after this many seconds, keeping finished results
    #[arg(long, value_name = "SECS")]
    deadline: Option<f64>,

    /// Maximum number of fetches in flight (overrides the config)
    #[arg(long, value_name = "N")]
    max_concurrency: Option<usize>,

    /// Validate config and show what would be fetched without fetching
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            (Config::default(), None)
        }
    };

    // Command-line overrides
    config.input.urls.extend(cli.urls.iter().cloned());
    if let Some(max_concurrency) = cli.max_concurrency {
        config.scraper.max_concurrency = max_concurrency;
    }
    if let Some(output) = &cli.output {
        config.output.results_path = output.display().to_string();
    }

    if config.input.urls.is_empty() {
        bail!("no URLs to harvest: add [input] urls to the config or pass --url");
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_harvest(config, config_hash, cli.deadline).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_harvest=info,warn"),
            1 => EnvFilter::new("sumi_harvest=debug,info"),
            2 => EnvFilter::new("sumi_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration and URLs
fn handle_dry_run(config: &Config) {
    println!("=== Sumi-Harvest Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Requests per second: {}", config.scraper.requests_per_second);
    println!("  Timeout: {}s", config.scraper.timeout_secs);
    println!("  Max retries: {}", config.scraper.max_retries);
    println!("  Max concurrency: {}", config.scraper.max_concurrency);
    println!(
        "  Backoff: {}s base, {}s max, jitter {}",
        config.scraper.base_delay_secs,
        config.scraper.max_delay_secs,
        if config.scraper.jitter { "on" } else { "off" }
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Results: {}", config.output.results_path);

    println!("\nURLs ({}):", config.input.urls.len());
    for url in &config.input.urls {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main harvest run
async fn handle_harvest(
    config: Config,
    config_hash: Option<String>,
    deadline: Option<f64>,
) -> anyhow::Result<()> {
    let transport = ReqwestTransport::new(&config.user_agent, &config.scraper)
        .context("failed to build HTTP client")?;
    let orchestrator = Orchestrator::new(
        &config.scraper,
        Arc::new(transport),
        Arc::new(HtmlExtractor::new()),
    )?;

    let cancel = CancellationToken::new();
    spawn_ctrl_c_watcher(cancel.clone());
    if let Some(secs) = deadline {
        let limit = Duration::try_from_secs_f64(secs)
            .with_context(|| format!("invalid deadline: {}", secs))?;
        spawn_deadline(cancel.clone(), limit);
    }

    tracing::info!(
        "Harvesting {} URLs at {} req/s",
        config.input.urls.len(),
        config.scraper.requests_per_second
    );

    let report = orchestrator
        .scrape_until(&config.input.urls, config.scraper.max_concurrency, cancel)
        .await?;

    print_records(&report.records);
    print_statistics(&report.statistics);

    let results_path = PathBuf::from(&config.output.results_path);
    write_results(&report, &results_path, config_hash.as_deref())
        .with_context(|| format!("failed to write {}", results_path.display()))?;
    println!("\n✓ Results saved to: {}", results_path.display());

    Ok(())
}

/// Cancels the run on Ctrl-C
fn spawn_ctrl_c_watcher(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing with the results gathered so far");
            cancel.cancel();
        }
    });
}

/// Cancels the run once `limit` has elapsed
fn spawn_deadline(cancel: CancellationToken, limit: Duration) {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(limit) => {
                tracing::warn!("Deadline of {:.1}s reached", limit.as_secs_f64());
                cancel.cancel();
            }
            _ = cancel.cancelled() => {}
        }
    });
}
