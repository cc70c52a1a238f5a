//! Thread-safe co-occurrence accumulator
//!
//! Counters live in a sharded concurrent map keyed by [`EdgeKey`]. An
//! existing counter is bumped under the shard's read lock; only the first
//! sighting of a pair takes the shard's write lock to insert it. No lock is
//! ever held by a caller across an await point because every operation here
//! is synchronous.

use crate::graph::edge::EdgeKey;
use crate::graph::export::ExportedGraph;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Weighted undirected graph of words seen near each other
#[derive(Debug, Default)]
pub struct CoOccurrenceGraph {
    edges: DashMap<EdgeKey, AtomicU64>,
}

impl CoOccurrenceGraph {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one token sequence into the graph
    ///
    /// Every pair `(i, j)` with `i < j <= i + window_size` and distinct
    /// tokens adds 1 to the weight of the pair's edge. Safe to call from many
    /// threads at once; concurrent increments of one edge are never lost.
    pub fn record_co_occurrences<S: AsRef<str>>(&self, tokens: &[S], window_size: usize) {
        for (i, left) in tokens.iter().enumerate() {
            let end = tokens.len().min(i.saturating_add(window_size).saturating_add(1));

            for right in &tokens[i + 1..end] {
                if let Some(key) = EdgeKey::new(left.as_ref(), right.as_ref()) {
                    self.increment(key);
                }
            }
        }
    }

    fn increment(&self, key: EdgeKey) {
        if let Some(counter) = self.edges.get(&key) {
            counter.fetch_add(1, Ordering::Relaxed);
            return;
        }

        self.edges
            .entry(key)
            .or_default()
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Current weight of the edge between `a` and `b` (0 if never seen)
    pub fn weight(&self, a: &str, b: &str) -> u64 {
        EdgeKey::new(a, b)
            .and_then(|key| self.edges.get(&key).map(|c| c.load(Ordering::Relaxed)))
            .unwrap_or(0)
    }

    /// Number of distinct edges recorded so far
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Copies out every edge with its weight, in unspecified order
    pub fn snapshot(&self) -> Vec<(EdgeKey, u64)> {
        self.edges
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
            .collect()
    }

    /// Node/edge view of every edge with `weight >= min_weight`
    ///
    /// Intended for use once writers have finished; during active writes the
    /// result is a best-effort view.
    pub fn export(&self, min_weight: u64) -> ExportedGraph {
        ExportedGraph::from_edges(self.snapshot(), min_weight)
    }
}
