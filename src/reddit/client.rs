//! HTTP client for the Reddit API
//!
//! This module handles every authenticated request the crawler makes:
//! - Building HTTP clients with proper user agent strings
//! - Listing user comments and submissions
//! - Fetching a thread's comment tree
//! - Classifying HTTP failures into [`FetchError`]s

use crate::config::{RedditConfig, UserAgentConfig};
use crate::crawler::{
    FetchError, Fetcher, Identity, IdentityFilter, RetryOutcome, RetryPolicy, SourceKind,
};
use crate::reddit::thread::parse_commenters;
use crate::{ConfigError, ThreadwebError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::BTreeSet;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use threadweb::config::UserAgentConfig;
/// use threadweb::reddit::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "threadweb".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Authenticated Reddit API client
///
/// Implements [`Fetcher`] so the coordinator can pull user histories
/// through it.
#[derive(Debug, Clone)]
pub struct RedditClient {
    http: Client,
    api_base: Url,
    access_token: String,
    listing_limit: u32,
}

impl RedditClient {
    /// Creates a client for the configured API base URL
    ///
    /// # Arguments
    ///
    /// * `http` - Shared HTTP client (see [`build_http_client`])
    /// * `config` - Reddit endpoint configuration
    /// * `access_token` - OAuth bearer token
    pub fn new(
        http: Client,
        config: &RedditConfig,
        access_token: impl Into<String>,
    ) -> Result<Self, ThreadwebError> {
        let api_base = Url::parse(&config.api_base_url)?;
        if api_base.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl(config.api_base_url.clone()).into());
        }

        Ok(Self {
            http,
            api_base,
            access_token: access_token.into(),
            listing_limit: config.listing_limit,
        })
    }

    /// Builds `{api_base}/{segments...}`, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Transient(format!("invalid API base: {}", self.api_base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends an authenticated GET and decodes the JSON body
    async fn get_json(&self, url: Url, query: &[(&str, String)]) -> Result<Value, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .query(query)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| FetchError::Transient(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            return Err(FetchError::Transient(format!("HTTP {} from {}", status, url)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transient(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| FetchError::MalformedResponse(e.to_string()))
    }

    /// Fetches one listing of a user's history
    async fn fetch_listing(
        &self,
        identity: &Identity,
        kind: SourceKind,
    ) -> Result<Value, FetchError> {
        let section = match kind {
            SourceKind::Comments => "comments",
            SourceKind::Posts => "submitted",
        };
        let url = self.endpoint(&["user", identity.as_str(), section])?;
        self.get_json(url, &[("limit", self.listing_limit.to_string())])
            .await
    }

    /// Fetches the raw comment tree of a thread
    pub async fn fetch_thread(&self, post_id: &str) -> Result<Value, FetchError> {
        let url = self.endpoint(&["comments", &format!("{}.json", post_id)])?;
        self.get_json(url, &[]).await
    }

    /// Collects the distinct authors who commented on a thread
    ///
    /// Rate limits are retried under `retry`; running out of retries is
    /// reported as `Fetch(RateLimited)` since there is nothing to crawl
    /// without the commenter set.
    ///
    /// # Arguments
    ///
    /// * `post_id` - Thread id (see [`crate::reddit::extract_post_id`])
    /// * `filter` - Authors to leave out
    /// * `retry` - Rate-limit retry policy
    pub async fn fetch_commenters(
        &self,
        post_id: &str,
        filter: &IdentityFilter,
        retry: &RetryPolicy,
    ) -> Result<BTreeSet<Identity>, ThreadwebError> {
        let outcome = retry
            .run(
                || self.fetch_thread(post_id),
                |attempt| {
                    tracing::warn!(
                        "Rate limited fetching thread {}. Retrying (attempt {}/{})",
                        post_id,
                        attempt,
                        retry.max_retries
                    );
                },
            )
            .await;

        match outcome {
            RetryOutcome::Success { value, .. } => {
                let commenters = parse_commenters(&value, filter)?;
                tracing::info!(
                    "Found {} commenters in thread {}",
                    commenters.len(),
                    post_id
                );
                Ok(commenters)
            }
            RetryOutcome::Exhausted { retries } => {
                tracing::error!("Too many retries. Giving up on thread {}", post_id);
                tracing::debug!("Thread {} rate limited {} times", post_id, retries);
                Err(FetchError::RateLimited.into())
            }
            RetryOutcome::Failed { error, .. } => Err(error.into()),
        }
    }
}

#[async_trait]
impl Fetcher for RedditClient {
    async fn fetch_text(
        &self,
        identity: &Identity,
        kind: SourceKind,
    ) -> Result<Vec<String>, FetchError> {
        let listing = self.fetch_listing(identity, kind).await?;
        listing_texts(&listing, kind)
    }
}

/// Extracts the text blobs of a user listing
///
/// Comments contribute `body`; posts contribute `title` then `selftext`.
/// Empty strings are dropped. Anything other than a `data.children` array
/// is malformed.
pub fn listing_texts(listing: &Value, kind: SourceKind) -> Result<Vec<String>, FetchError> {
    let children = listing
        .pointer("/data/children")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            FetchError::MalformedResponse("listing has no data.children array".to_string())
        })?;

    let fields: &[&str] = match kind {
        SourceKind::Comments => &["body"],
        SourceKind::Posts => &["title", "selftext"],
    };

    let texts = children
        .iter()
        .filter_map(|child| child.get("data"))
        .flat_map(|data| fields.iter().filter_map(move |field| data.get(*field)))
        .filter_map(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
        .collect();

    Ok(texts)
}
