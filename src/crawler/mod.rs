//! Crawler module for building word graphs from a discussion thread
//!
//! This module contains the core crawling logic, including:
//! - Identity validation and author filtering
//! - The `Fetcher` seam and fetch error classification
//! - Rate-limit retry policy
//! - Overall crawl coordination and per-identity reporting

mod coordinator;
mod fetcher;
mod identity;
mod report;
mod retry;

pub use coordinator::{CrawlSettings, Coordinator};
pub use fetcher::{FetchError, Fetcher, SourceKind};
pub use identity::{Identity, IdentityFilter};
pub use report::{CrawlReport, UnitOutcome};
pub use retry::{RetryOutcome, RetryPolicy};

use crate::config::Config;
use crate::graph::{CoOccurrenceGraph, ExportedGraph};
use crate::reddit::{build_http_client, extract_post_id, fetch_access_token, RedditClient};
use crate::text::StopWordTokenizer;
use crate::ThreadwebError;
use std::sync::Arc;

/// Result of crawling one thread
#[derive(Debug, Clone)]
pub struct ThreadCrawl {
    /// Id of the crawled thread
    pub post_id: String,

    /// Weight-filtered graph, ready to write
    pub graph: ExportedGraph,

    /// Per-identity outcomes
    pub report: CrawlReport,
}

/// Runs a complete crawl of one thread
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Extract the post id from the thread URL
/// 2. Build the HTTP client and authenticate
/// 3. Discover the thread's commenters
/// 4. Crawl every commenter's history into a fresh graph
/// 5. Export the graph with the configured minimum weight
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `thread_url` - URL of the Reddit thread
///
/// # Returns
///
/// * `Ok(ThreadCrawl)` - Crawl finished (possibly partially, see the report)
/// * `Err(ThreadwebError)` - Crawl could not start
pub async fn crawl_thread(config: &Config, thread_url: &str) -> Result<ThreadCrawl, ThreadwebError> {
    let post_id = extract_post_id(thread_url)?;
    tracing::info!("Crawling thread {}", post_id);

    let http = build_http_client(&config.user_agent)?;
    let token = fetch_access_token(&http, &config.reddit).await?;
    let client = RedditClient::new(http, &config.reddit, token)?;

    let settings = CrawlSettings::from_config(&config.crawler);
    let filter = IdentityFilter::new(&config.filter.excluded_authors);
    let commenters = client
        .fetch_commenters(&post_id, &filter, &settings.retry)
        .await?;

    if commenters.is_empty() {
        return Err(ThreadwebError::InvalidInput(format!(
            "thread {} has no commenters to crawl",
            post_id
        )));
    }

    let coordinator = Coordinator::new(
        Arc::new(client),
        Arc::new(StopWordTokenizer::from_config(&config.text)),
        Arc::new(CoOccurrenceGraph::new()),
        settings,
    );

    let report = coordinator
        .crawl(&commenters, config.crawler.concurrency as usize)
        .await?;

    let graph = coordinator.graph().export(config.output.min_weight);
    tracing::info!(
        "Exported {} nodes and {} edges (min weight {})",
        graph.nodes.len(),
        graph.edges.len(),
        config.output.min_weight
    );

    Ok(ThreadCrawl {
        post_id,
        graph,
        report,
    })
}
