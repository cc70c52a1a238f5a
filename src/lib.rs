//! Threadweb: a discussion-thread word graph crawler
//!
//! This crate crawls the participants of a Reddit discussion thread, fetches
//! each participant's comment and post history, and accumulates a weighted
//! co-occurrence graph over the words they use.

pub mod config;
pub mod crawler;
pub mod graph;
pub mod output;
pub mod reddit;
pub mod state;
pub mod text;

use thiserror::Error;

pub use crawler::FetchError;

/// Main error type for Threadweb operations
#[derive(Debug, Error)]
pub enum ThreadwebError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Threadweb operations
pub type Result<T> = std::result::Result<T, ThreadwebError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlReport, Identity};
pub use graph::{CoOccurrenceGraph, EdgeKey, ExportedGraph};
pub use state::UnitState;
pub use text::{StopWordTokenizer, Tokenizer};
