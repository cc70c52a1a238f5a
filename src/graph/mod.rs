//! Word co-occurrence graph
//!
//! This module contains:
//! - `EdgeKey`: canonical unordered pair of distinct words
//! - `CoOccurrenceGraph`: the concurrent weight accumulator shared by crawl workers
//! - `ExportedGraph`: the weight-filtered node/edge snapshot written at the end of a crawl

mod cooccurrence;
mod edge;
mod export;

pub use cooccurrence::CoOccurrenceGraph;
pub use edge::EdgeKey;
pub use export::{ExportedGraph, GraphEdge, GraphNode};
