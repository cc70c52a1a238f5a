//! Thread URL parsing and commenter discovery

use crate::crawler::{FetchError, Identity, IdentityFilter};
use crate::ThreadwebError;
use serde_json::Value;
use std::collections::BTreeSet;
use url::Url;

/// Extracts the post id from a Reddit thread URL
///
/// The id is the path segment right after `comments`, as in
/// `https://www.reddit.com/r/rust/comments/abc123/some_title/`. The host
/// must be `reddit.com` or one of its subdomains.
///
/// # Returns
///
/// * `Ok(String)` - The post id
/// * `Err(ThreadwebError::InvalidInput)` - Not a Reddit thread URL
pub fn extract_post_id(thread_url: &str) -> Result<String, ThreadwebError> {
    let invalid = || ThreadwebError::InvalidInput(format!("Invalid Reddit post URL: {}", thread_url));

    let url = Url::parse(thread_url.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || !is_reddit_host(url.host_str()) {
        return Err(invalid());
    }

    let mut segments = url.path_segments().ok_or_else(invalid)?;

    segments
        .by_ref()
        .find(|segment| *segment == "comments")
        .ok_or_else(invalid)?;

    match segments.next() {
        Some(id) if !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric()) => {
            Ok(id.to_string())
        }
        _ => Err(invalid()),
    }
}

fn is_reddit_host(host: Option<&str>) -> bool {
    match host {
        Some(host) => {
            let host = host.to_ascii_lowercase();
            host == "reddit.com" || host.ends_with(".reddit.com")
        }
        None => false,
    }
}

/// Collects the distinct comment authors of a thread response
///
/// The response is Reddit's two-element array `[post listing, comment
/// listing]`. Every comment in the second listing is visited, including
/// nested replies; authors are lower-cased and passed through `filter`.
pub fn parse_commenters(
    thread: &Value,
    filter: &IdentityFilter,
) -> Result<BTreeSet<Identity>, FetchError> {
    let top_level = thread
        .get(1)
        .and_then(|listing| listing.pointer("/data/children"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            FetchError::MalformedResponse("thread has no comment listing".to_string())
        })?;

    let mut commenters = BTreeSet::new();
    let mut pending: Vec<&Value> = top_level.iter().collect();

    while let Some(node) = pending.pop() {
        let Some(data) = node.get("data") else {
            continue;
        };

        if let Some(author) = data.get("author").and_then(Value::as_str) {
            let author = author.to_lowercase();
            if filter.allows(&author) {
                if let Ok(identity) = Identity::parse(&author) {
                    commenters.insert(identity);
                }
            } else {
                tracing::debug!("Excluding author: {}", author);
            }
        }

        // `replies` is "" when a comment has none
        if let Some(children) = data
            .pointer("/replies/data/children")
            .and_then(Value::as_array)
        {
            pending.extend(children);
        }
    }

    Ok(commenters)
}
