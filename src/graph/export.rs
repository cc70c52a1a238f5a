//! Node/edge export of a co-occurrence graph

use crate::graph::edge::EdgeKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// A word that appears in at least one exported edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
}

/// A weighted edge between two words
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: u64,
}

/// Immutable snapshot of the graph filtered by weight
///
/// Nodes are sorted by id and edges by `(source, target)`, so the same graph
/// state always serializes to the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl ExportedGraph {
    /// Builds the export from raw `(edge, weight)` pairs
    ///
    /// An edge survives iff `weight >= min_weight`; a node survives iff it
    /// is an endpoint of a surviving edge.
    pub fn from_edges<I>(edges: I, min_weight: u64) -> Self
    where
        I: IntoIterator<Item = (EdgeKey, u64)>,
    {
        let mut kept: Vec<(EdgeKey, u64)> = edges
            .into_iter()
            .filter(|(_, weight)| *weight >= min_weight)
            .collect();
        kept.sort_by(|a, b| a.0.cmp(&b.0));

        let node_ids: BTreeSet<&str> = kept
            .iter()
            .flat_map(|(key, _)| [key.first(), key.second()])
            .collect();
        let nodes = node_ids
            .into_iter()
            .map(|id| GraphNode { id: id.to_string() })
            .collect();

        let edges = kept
            .iter()
            .map(|(key, weight)| GraphEdge {
                source: key.first().to_string(),
                target: key.second().to_string(),
                weight: *weight,
            })
            .collect();

        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Serializes to JSON with fields `nodes`, `edges`, `id`, `source`, `target`, `weight`
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Writes the JSON export to `path`, replacing any existing file
    pub fn write_json(&self, path: &Path, pretty: bool) -> crate::Result<()> {
        let json = self.to_json(pretty)?;
        std::fs::write(path, json)?;
        tracing::info!(
            "Exported {} nodes and {} edges to {}",
            self.nodes.len(),
            self.edges.len(),
            path.display()
        );
        Ok(())
    }
}
