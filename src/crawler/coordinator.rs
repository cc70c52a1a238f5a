//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the worker pool that coordinates one crawl unit per
//! identity:
//! - Validating and deduplicating the identity set
//! - Bounding concurrency with a semaphore
//! - Fetching comments then posts, with rate-limit retries
//! - Tokenizing and folding tokens into the shared graph
//! - Enforcing the global deadline and cancelling stragglers
//! - Producing the per-identity report

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{Fetcher, SourceKind};
use crate::crawler::identity::Identity;
use crate::crawler::report::{CrawlReport, UnitTracker};
use crate::crawler::retry::{RetryOutcome, RetryPolicy};
use crate::graph::CoOccurrenceGraph;
use crate::state::UnitState;
use crate::text::Tokenizer;
use crate::ThreadwebError;
use chrono::Utc;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Tuning knobs for a crawl
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Co-occurrence window passed to the graph
    pub window_size: usize,

    /// Rate-limit retry policy for every fetch
    pub retry: RetryPolicy,

    /// Deadline for the whole crawl
    pub timeout: Duration,

    /// Keep only the first N tokens per identity
    pub max_tokens_per_identity: Option<usize>,
}

impl CrawlSettings {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            window_size: config.window_size,
            retry: RetryPolicy::from_config(config),
            timeout: Duration::from_secs(config.crawl_timeout_secs),
            max_tokens_per_identity: config.max_tokens_per_identity,
        }
    }
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            window_size: 3,
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(60),
            max_tokens_per_identity: None,
        }
    }
}

/// Main crawler coordinator structure
///
/// The graph is passed in rather than owned so callers decide its lifetime;
/// one graph normally lives for one crawl invocation.
pub struct Coordinator {
    fetcher: Arc<dyn Fetcher>,
    tokenizer: Arc<dyn Tokenizer>,
    graph: Arc<CoOccurrenceGraph>,
    settings: CrawlSettings,
}

/// Everything a worker task needs, shared behind one `Arc`
struct UnitContext {
    fetcher: Arc<dyn Fetcher>,
    tokenizer: Arc<dyn Tokenizer>,
    graph: Arc<CoOccurrenceGraph>,
    settings: CrawlSettings,
    tracker: UnitTracker,
}

impl Coordinator {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        tokenizer: Arc<dyn Tokenizer>,
        graph: Arc<CoOccurrenceGraph>,
        settings: CrawlSettings,
    ) -> Self {
        Self {
            fetcher,
            tokenizer,
            graph,
            settings,
        }
    }

    /// The graph this coordinator writes into
    pub fn graph(&self) -> &Arc<CoOccurrenceGraph> {
        &self.graph
    }

    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    /// Crawls every identity with at most `concurrency` units in flight
    ///
    /// Blocks until every unit is terminal or the deadline passes. On
    /// timeout the remaining units are aborted and reported as cancelled.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Outcome of every identity, possibly partial
    /// * `Err(ThreadwebError::InvalidInput)` - Blank identity, empty set, zero concurrency,
    ///   or a timeout too large to form a deadline
    pub async fn crawl<I, S>(
        &self,
        identities: I,
        concurrency: usize,
    ) -> Result<CrawlReport, ThreadwebError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if concurrency == 0 || concurrency > Semaphore::MAX_PERMITS {
            return Err(ThreadwebError::InvalidInput(format!(
                "concurrency must be between 1 and {}, got {}",
                Semaphore::MAX_PERMITS,
                concurrency
            )));
        }

        let deadline = Instant::now()
            .checked_add(self.settings.timeout)
            .ok_or_else(|| {
                ThreadwebError::InvalidInput(format!(
                    "crawl timeout {:?} is too large",
                    self.settings.timeout
                ))
            })?;

        let targets = collect_identities(identities)?;
        let started_at = Utc::now();

        tracing::info!(
            "Starting crawl of {} identities with {} workers (timeout {:?})",
            targets.len(),
            concurrency,
            self.settings.timeout
        );

        let context = Arc::new(UnitContext {
            fetcher: Arc::clone(&self.fetcher),
            tokenizer: Arc::clone(&self.tokenizer),
            graph: Arc::clone(&self.graph),
            settings: self.settings.clone(),
            tracker: UnitTracker::new(&targets),
        });

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut tasks = JoinSet::new();

        for identity in targets {
            let context = Arc::clone(&context);
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                context.run_unit(identity).await;
            });
        }

        tracing::debug!("All crawl units submitted. Awaiting completion...");

        let timed_out = loop {
            match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(Ok(()))) => {}
                Ok(Some(Err(e))) => {
                    tracing::error!("Crawl unit task ended abnormally: {}", e);
                }
                Ok(None) => break false,
                Err(_) => {
                    tracing::warn!(
                        "Crawl deadline of {:?} reached, cancelling {} outstanding units",
                        self.settings.timeout,
                        tasks.len()
                    );
                    tasks.abort_all();
                    while tasks.join_next().await.is_some() {}
                    break true;
                }
            }
        };

        let report = CrawlReport {
            started_at,
            finished_at: Utc::now(),
            timed_out,
            units: context.tracker.close(timed_out),
        };

        tracing::info!(
            "Crawl finished in {:.2}s: {} recorded, {} skipped, {} failed, {} cancelled",
            report.duration_seconds(),
            report.recorded(),
            report.skipped(),
            report.failed(),
            report.cancelled()
        );

        Ok(report)
    }
}

impl UnitContext {
    /// Processes one identity from `Fetching` to a terminal state
    ///
    /// Tokens are only written to the graph once every source has been
    /// fetched, so a failed or cancelled unit leaves the graph untouched.
    async fn run_unit(&self, identity: Identity) {
        let tracker = &self.tracker;
        let fetcher: &dyn Fetcher = self.fetcher.as_ref();
        let who = &identity;

        tracker.transition(who, UnitState::Fetching);

        let mut tokens: Vec<String> = Vec::new();

        for kind in SourceKind::ORDERED {
            let outcome = self
                .settings
                .retry
                .run(
                    move || {
                        tracker.transition(who, UnitState::Fetching);
                        fetcher.fetch_text(who, kind)
                    },
                    move |retry| {
                        tracing::warn!(
                            "Rate limited while fetching {} for {} (retry {}/{})",
                            kind,
                            who,
                            retry,
                            self.settings.retry.max_retries
                        );
                        tracker.rate_limited(who);
                    },
                )
                .await;

            match outcome {
                RetryOutcome::Success { value, .. } => {
                    for text in &value {
                        tokens.extend(self.tokenizer.tokenize(text));
                    }
                }
                RetryOutcome::Exhausted { retries } => {
                    tracing::warn!(
                        "Too many retries. Skipping {} after {} rate-limited retries on {}",
                        who,
                        retries,
                        kind
                    );
                    tracker.finish(
                        who,
                        UnitState::Skipped,
                        0,
                        Some(format!("rate limited on {} after {} retries", kind, retries)),
                    );
                    return;
                }
                RetryOutcome::Failed { error, .. } => {
                    tracing::error!("Error fetching {} for {}: {}", kind, who, error);
                    tracker.finish(
                        who,
                        UnitState::Failed,
                        0,
                        Some(format!("{}: {}", kind, error)),
                    );
                    return;
                }
            }
        }

        if let Some(max) = self.settings.max_tokens_per_identity {
            tokens.truncate(max);
        }

        if !tokens.is_empty() {
            self.graph
                .record_co_occurrences(&tokens, self.settings.window_size);
        }
        tracker.finish(who, UnitState::Recorded, tokens.len(), None);

        tracing::info!("Fetched {} words for user: {}", tokens.len(), who);
    }
}

/// Validates and deduplicates the raw identity set
fn collect_identities<I, S>(identities: I) -> Result<BTreeSet<Identity>, ThreadwebError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut targets = BTreeSet::new();

    for raw in identities {
        let identity = Identity::parse(raw.as_ref())?;
        if !targets.insert(identity) {
            tracing::debug!("Dropping duplicate identity: {}", raw.as_ref().trim());
        }
    }

    if targets.is_empty() {
        return Err(ThreadwebError::InvalidInput(
            "identity set cannot be empty".to_string(),
        ));
    }

    Ok(targets)
}
