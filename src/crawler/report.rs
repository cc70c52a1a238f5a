//! Per-identity crawl outcomes
//!
//! `UnitTracker` is the only mutable state shared between workers besides
//! the graph. Its lock is held for single map updates and never across an
//! await point.

use crate::crawler::identity::Identity;
use crate::state::UnitState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Final record for one identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitOutcome {
    pub state: UnitState,

    /// Tokens folded into the graph
    pub tokens: usize,

    /// Backoff rounds spent on rate limits
    pub rate_limit_retries: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UnitOutcome {
    fn pending() -> Self {
        Self {
            state: UnitState::Pending,
            tokens: 0,
            rate_limit_retries: 0,
            message: None,
        }
    }
}

/// Summary of one crawl invocation
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Whether the global deadline cut the crawl short
    pub timed_out: bool,

    /// Outcome per identity, keyed by identity
    pub units: BTreeMap<String, UnitOutcome>,
}

impl CrawlReport {
    /// Number of units that ended in `state`
    pub fn count(&self, state: UnitState) -> usize {
        self.units.values().filter(|u| u.state == state).count()
    }

    pub fn recorded(&self) -> usize {
        self.count(UnitState::Recorded)
    }

    pub fn skipped(&self) -> usize {
        self.count(UnitState::Skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(UnitState::Failed)
    }

    pub fn cancelled(&self) -> usize {
        self.count(UnitState::Cancelled)
    }

    pub fn total(&self) -> usize {
        self.units.len()
    }

    /// Outcome of a single identity
    pub fn outcome(&self, identity: &str) -> Option<&UnitOutcome> {
        self.units.get(identity)
    }

    /// Identities that ended in `state`, in sorted order
    pub fn identities_in(&self, state: UnitState) -> Vec<&str> {
        self.units
            .iter()
            .filter(|(_, u)| u.state == state)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Total tokens recorded across all identities
    pub fn total_tokens(&self) -> usize {
        self.units.values().map(|u| u.tokens).sum()
    }

    /// Wall-clock duration of the crawl in seconds
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

/// Shared accumulator of unit states during a crawl
#[derive(Debug)]
pub(crate) struct UnitTracker {
    units: Mutex<BTreeMap<Identity, UnitOutcome>>,
}

impl UnitTracker {
    pub(crate) fn new(identities: &BTreeSet<Identity>) -> Self {
        Self {
            units: Mutex::new(
                identities
                    .iter()
                    .map(|id| (id.clone(), UnitOutcome::pending()))
                    .collect(),
            ),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<Identity, UnitOutcome>> {
        // Every update is a single field write, so a poisoned map is still consistent.
        self.units.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves a unit to `next`; illegal transitions are logged and ignored
    pub(crate) fn transition(&self, identity: &Identity, next: UnitState) -> bool {
        let mut units = self.lock();
        let Some(unit) = units.get_mut(identity) else {
            tracing::warn!("Unknown crawl unit: {}", identity);
            return false;
        };

        if unit.state == next {
            return true;
        }

        if !unit.state.can_transition_to(next) {
            tracing::warn!(
                "Ignoring invalid transition for {}: {} -> {}",
                identity,
                unit.state,
                next
            );
            return false;
        }

        tracing::debug!("Unit {}: {} -> {}", identity, unit.state, next);
        unit.state = next;
        true
    }

    /// Records a rate-limit backoff round
    pub(crate) fn rate_limited(&self, identity: &Identity) {
        if self.transition(identity, UnitState::RateLimited) {
            if let Some(unit) = self.lock().get_mut(identity) {
                unit.rate_limit_retries += 1;
            }
        }
    }

    /// Moves a unit into a terminal state with its result
    pub(crate) fn finish(
        &self,
        identity: &Identity,
        state: UnitState,
        tokens: usize,
        message: Option<String>,
    ) {
        if self.transition(identity, state) {
            if let Some(unit) = self.lock().get_mut(identity) {
                unit.tokens = tokens;
                unit.message = message;
            }
        }
    }

    /// Closes the books: every unit still active becomes terminal
    ///
    /// After a timeout unfinished units are `Cancelled`; otherwise an
    /// unfinished unit means its task died, so it is `Failed`.
    pub(crate) fn close(&self, timed_out: bool) -> BTreeMap<String, UnitOutcome> {
        let mut units = self.lock();

        for (identity, unit) in units.iter_mut() {
            if unit.state.is_terminal() {
                continue;
            }

            if timed_out {
                unit.state = UnitState::Cancelled;
                unit.message = Some("crawl deadline reached".to_string());
            } else {
                tracing::error!("Crawl unit for {} ended without a result", identity);
                unit.state = UnitState::Failed;
                unit.message = Some("worker task aborted".to_string());
            }
        }

        units
            .iter()
            .map(|(id, unit)| (id.to_string(), unit.clone()))
            .collect()
    }
}
