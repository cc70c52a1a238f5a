//! Crawl target identities and author filtering

use crate::ThreadwebError;
use std::collections::HashSet;
use std::fmt;

/// A validated crawl target (a username)
///
/// Surrounding whitespace is trimmed; the remaining name is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(String);

impl Identity {
    /// Validates and trims a raw identity
    ///
    /// # Returns
    ///
    /// * `Ok(Identity)` - The trimmed identity
    /// * `Err(ThreadwebError::InvalidInput)` - The input was empty or blank
    pub fn parse(raw: &str) -> Result<Self, ThreadwebError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ThreadwebError::InvalidInput(
                "identity cannot be empty or blank".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Exclusion rule for authors that must never become crawl targets
///
/// Matching is exact after trimming and lower-casing, so `"[Deleted]"`
/// matches an excluded `"[deleted]"` but `"[deleted"` does not.
#[derive(Debug, Clone, Default)]
pub struct IdentityFilter {
    excluded: HashSet<String>,
}

impl IdentityFilter {
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            excluded: excluded
                .into_iter()
                .map(|name| name.as_ref().trim().to_lowercase())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }

    /// Returns true if `name` may be crawled
    pub fn allows(&self, name: &str) -> bool {
        let normalized = name.trim().to_lowercase();
        !normalized.is_empty() && !self.excluded.contains(&normalized)
    }
}
