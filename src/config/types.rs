use serde::Deserialize;

/// Main configuration structure for Threadweb
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub reddit: RedditConfig,
    #[serde(default)]
    pub text: TextConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of crawl units allowed to run at once
    pub concurrency: u32,

    /// Maximum token distance within which two words co-occur
    #[serde(rename = "window-size", default = "default_window_size")]
    pub window_size: usize,

    /// Retries after the first rate-limited attempt before a unit is skipped
    #[serde(rename = "max-rate-limit-retries", default = "default_max_retries")]
    pub max_rate_limit_retries: u32,

    /// Fixed delay between rate-limit retries (milliseconds)
    #[serde(rename = "rate-limit-backoff-ms", default = "default_backoff_ms")]
    pub rate_limit_backoff_ms: u64,

    /// Deadline for the whole crawl (seconds)
    #[serde(rename = "crawl-timeout-secs", default = "default_timeout_secs")]
    pub crawl_timeout_secs: u64,

    /// Keep only the first N tokens of each identity
    #[serde(rename = "max-tokens-per-identity", default)]
    pub max_tokens_per_identity: Option<usize>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Reddit API endpoints and script-app credentials
#[derive(Debug, Clone, Deserialize)]
pub struct RedditConfig {
    #[serde(rename = "api-base-url", default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(rename = "token-url", default = "default_token_url")]
    pub token_url: String,

    /// Number of items requested per listing
    #[serde(rename = "listing-limit", default = "default_listing_limit")]
    pub listing_limit: u32,

    #[serde(rename = "client-id", default)]
    pub client_id: String,

    #[serde(rename = "client-secret", default)]
    pub client_secret: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            token_url: default_token_url(),
            listing_limit: default_listing_limit(),
            client_id: String::new(),
            client_secret: String::new(),
            username: String::new(),
            password: String::new(),
        }
    }
}

/// Tokenizer settings
#[derive(Debug, Clone, Deserialize)]
pub struct TextConfig {
    /// Stop words dropped in addition to the built-in English set
    #[serde(rename = "extra-stop-words", default)]
    pub extra_stop_words: Vec<String>,

    /// Tokens shorter than this (in characters) are dropped
    #[serde(rename = "min-token-length", default = "default_min_token_length")]
    pub min_token_length: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            extra_stop_words: Vec::new(),
            min_token_length: default_min_token_length(),
        }
    }
}

/// Author exclusion rules applied when deriving crawl targets
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Author names never crawled (case-insensitive exact match)
    #[serde(rename = "excluded-authors", default = "default_excluded_authors")]
    pub excluded_authors: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            excluded_authors: default_excluded_authors(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the exported graph JSON
    #[serde(rename = "graph-path")]
    pub graph_path: String,

    /// Optional path of the per-identity crawl report JSON
    #[serde(rename = "report-path", default)]
    pub report_path: Option<String>,

    /// Edges lighter than this are left out of the export
    #[serde(rename = "min-weight", default = "default_min_weight")]
    pub min_weight: u64,

    /// Pretty-print the exported JSON
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_window_size() -> usize {
    3
}

fn default_max_retries() -> u32 {
    5
}

fn default_backoff_ms() -> u64 {
    2000
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_api_base_url() -> String {
    "https://oauth.reddit.com".to_string()
}

fn default_token_url() -> String {
    "https://www.reddit.com/api/v1/access_token".to_string()
}

fn default_listing_limit() -> u32 {
    25
}

fn default_min_token_length() -> usize {
    1
}

fn default_excluded_authors() -> Vec<String> {
    vec!["[deleted]".to_string(), "[removed]".to_string()]
}

fn default_min_weight() -> u64 {
    3
}

fn default_pretty() -> bool {
    true
}
