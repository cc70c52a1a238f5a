//! Fetcher interface consumed by the crawl coordinator
//!
//! The coordinator never talks HTTP itself. It asks a [`Fetcher`] for the
//! raw text an identity has written and classifies the failure modes:
//! - rate limiting (retried with backoff, then skipped)
//! - transient fetch errors (unit fails, siblings continue)
//! - malformed responses (handled like transient errors)

use crate::crawler::identity::Identity;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Which part of an identity's history to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Comments,
    Posts,
}

impl SourceKind {
    /// Fetch order within one crawl unit; defines the token sequence order
    pub const ORDERED: [SourceKind; 2] = [SourceKind::Comments, SourceKind::Posts];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comments => "comments",
            Self::Posts => "posts",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single fetch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("rate limited")]
    RateLimited,

    #[error("transient fetch error: {0}")]
    Transient(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

/// Source of raw text blobs for an identity
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the text blobs of one source kind, in the source's own order
    async fn fetch_text(
        &self,
        identity: &Identity,
        kind: SourceKind,
    ) -> Result<Vec<String>, FetchError>;
}
