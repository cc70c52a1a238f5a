/// Crawl unit state definitions
///
/// A crawl unit moves through
/// `Pending -> Fetching -> (RateLimited -> Fetching)* -> terminal`.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the current state of one identity's crawl unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitState {
    // ===== Active States =====
    /// Scheduled but not yet holding a worker slot
    Pending,

    /// Fetching or tokenizing the identity's history
    Fetching,

    /// Waiting out the backoff after a rate-limit response
    RateLimited,

    // ===== Terminal States =====
    /// Tokens were folded into the graph (possibly zero tokens)
    Recorded,

    /// Rate-limit retries were exhausted
    Skipped,

    /// A non rate-limit fetch error ended the unit
    Failed,

    /// The crawl deadline passed before the unit finished
    Cancelled,
}

impl UnitState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Returns true if the unit may still make progress
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Fetching | Self::RateLimited)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// Terminal states never transition. Every active state may be
    /// cancelled or failed.
    pub fn can_transition_to(&self, next: UnitState) -> bool {
        use UnitState::*;

        match (self, next) {
            (Pending, Fetching) => true,
            (Fetching, RateLimited) | (RateLimited, Fetching) => true,
            (Fetching, Recorded) | (Fetching, Skipped) | (Fetching, Failed) => true,
            (RateLimited, Skipped) => true,
            (Pending | Fetching | RateLimited, Cancelled) => true,
            (Pending | RateLimited, Failed) => true,
            _ => false,
        }
    }

    /// Stable lower-case name used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::RateLimited => "rate_limited",
            Self::Recorded => "recorded",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns the terminal states in report order
    pub fn terminal_states() -> [Self; 4] {
        [Self::Recorded, Self::Skipped, Self::Failed, Self::Cancelled]
    }
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
