//! Canonical unordered word pairs

use std::fmt;

/// An unordered pair of distinct tokens
///
/// The smaller token (by code point order) is always stored first, so
/// `EdgeKey::new("b", "a")` and `EdgeKey::new("a", "b")` are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    first: String,
    second: String,
}

impl EdgeKey {
    /// Builds the canonical key for two tokens
    ///
    /// Returns `None` for a self-pair.
    pub fn new(a: &str, b: &str) -> Option<Self> {
        let (first, second) = match a.cmp(b) {
            std::cmp::Ordering::Less => (a, b),
            std::cmp::Ordering::Greater => (b, a),
            std::cmp::Ordering::Equal => return None,
        };

        Some(Self {
            first: first.to_string(),
            second: second.to_string(),
        })
    }

    /// The lexicographically smaller token
    pub fn first(&self) -> &str {
        &self.first
    }

    /// The lexicographically larger token
    pub fn second(&self) -> &str {
        &self.second
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.first, self.second)
    }
}
