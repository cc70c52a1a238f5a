//! Threadweb main entry point
//!
//! This is the command-line interface for the Threadweb thread word-graph crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use threadweb::config::{load_config_with_hash, Config};
use threadweb::crawler::crawl_thread;
use threadweb::output::{print_report, write_outputs};
use threadweb::reddit::extract_post_id;
use tracing_subscriber::EnvFilter;

/// Threadweb: word co-occurrence graphs from Reddit threads
///
/// Threadweb finds everyone who commented on a thread, fetches their
/// comment and post history, and links words that appear close together.
/// The weighted graph is written as JSON.
#[derive(Parser, Debug)]
#[command(name = "threadweb")]
#[command(version)]
#[command(about = "Builds a word co-occurrence graph from a Reddit thread", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// URL of the Reddit thread to crawl
    #[arg(value_name = "THREAD_URL")]
    thread_url: String,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the configured minimum edge weight
    #[arg(long, value_name = "N")]
    min_weight: Option<u64>,

    /// Write compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Validate config and thread URL and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(min_weight) = cli.min_weight {
        config.output.min_weight = min_weight;
    }
    if cli.compact {
        config.output.pretty = false;
    }

    if cli.dry_run {
        handle_dry_run(&config, &cli.thread_url)
    } else {
        handle_crawl(&config, &cli.thread_url).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("threadweb=info,warn"),
            1 => EnvFilter::new("threadweb=debug,info"),
            2 => EnvFilter::new("threadweb=trace,debug"),
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

/// Handles the --dry-run mode: validates inputs and shows the effective settings
fn handle_dry_run(config: &Config, thread_url: &str) -> anyhow::Result<()> {
    let post_id = extract_post_id(thread_url)?;

    println!("=== Threadweb Dry Run ===\n");

    println!("Thread:");
    println!("  URL: {}", thread_url);
    println!("  Post id: {}", post_id);

    println!("\nCrawler Configuration:");
    println!("  Concurrency: {}", config.crawler.concurrency);
    println!("  Window size: {}", config.crawler.window_size);
    println!(
        "  Rate limit retries: {} ({}ms backoff)",
        config.crawler.max_rate_limit_retries, config.crawler.rate_limit_backoff_ms
    );
    println!("  Timeout: {}s", config.crawler.crawl_timeout_secs);
    match config.crawler.max_tokens_per_identity {
        Some(max) => println!("  Max tokens per identity: {}", max),
        None => println!("  Max tokens per identity: unlimited"),
    }

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nReddit:");
    println!("  API: {}", config.reddit.api_base_url);
    println!("  Token URL: {}", config.reddit.token_url);
    println!("  Account: {}", config.reddit.username);
    println!("  Listing limit: {}", config.reddit.listing_limit);

    println!("\nText:");
    println!("  Extra stop words: {}", config.text.extra_stop_words.len());
    println!("  Min token length: {}", config.text.min_token_length);

    println!(
        "\nExcluded Authors ({}):",
        config.filter.excluded_authors.len()
    );
    for author in &config.filter.excluded_authors {
        println!("  - {}", author);
    }

    println!("\nOutput:");
    println!("  Graph: {}", config.output.graph_path);
    if let Some(report_path) = &config.output.report_path {
        println!("  Report: {}", report_path);
    }
    println!("  Min weight: {}", config.output.min_weight);
    println!("  Pretty: {}", config.output.pretty);

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl the commenters of thread {}", post_id);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, thread_url: &str) -> anyhow::Result<()> {
    let crawl = crawl_thread(config, thread_url)
        .await
        .with_context(|| format!("Crawl of {} failed", thread_url))?;

    write_outputs(&crawl, &config.output).context("Failed to write crawl output")?;

    print_report(&crawl.report);

    if crawl.report.timed_out {
        tracing::warn!("Crawl hit its deadline; the graph is partial");
    } else {
        tracing::info!("Crawl of thread {} completed successfully", crawl.post_id);
    }

    Ok(())
}
