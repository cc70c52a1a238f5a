//! Reddit API access
//!
//! This module contains:
//! - `build_http_client`: the shared reqwest client with the crawler's user agent
//! - `fetch_access_token`: OAuth password-grant authentication
//! - `RedditClient`: the [`crate::crawler::Fetcher`] backed by the Reddit API
//! - `extract_post_id` / `parse_commenters`: deriving crawl targets from a thread

mod auth;
mod client;
mod thread;

pub use auth::fetch_access_token;
pub use client::{build_http_client, listing_texts, RedditClient};
pub use thread::{extract_post_id, parse_commenters};
