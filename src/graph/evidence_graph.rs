//! Concurrency-safe evidence graph container.
//!
//! One graph per scan. All access goes through a single reader/writer lock:
//! stage producers take the write side, snapshot export and status polling
//! share the read side. Inserts key on ID and overwrite, so re-running a
//! stage or re-deriving an edge never duplicates entries.

use std::collections::BTreeMap;

use thiserror::Error;
use tokio::sync::RwLock;

use super::{Edge, GraphSnapshot, Node};

/// Errors from graph export.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Default)]
struct GraphState {
    nodes: BTreeMap<String, Node>,
    edges: BTreeMap<String, Edge>,
}

/// Scan-scoped node and edge store.
///
/// Edges may reference endpoints that have not been inserted; lookups for
/// those endpoints simply return `None`.
pub struct EvidenceGraph {
    state: RwLock<GraphState>,
}

impl EvidenceGraph {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(GraphState::default()),
        }
    }

    /// Insert a node, replacing any node with the same ID.
    pub async fn add_node(&self, node: Node) {
        let mut state = self.state.write().await;
        state.nodes.insert(node.id.clone(), node);
    }

    /// Insert an edge, replacing any edge with the same ID.
    pub async fn add_edge(&self, edge: Edge) {
        let mut state = self.state.write().await;
        state.edges.insert(edge.id.clone(), edge);
    }

    pub async fn get_node(&self, id: &str) -> Option<Node> {
        self.state.read().await.nodes.get(id).cloned()
    }

    pub async fn get_edge(&self, id: &str) -> Option<Edge> {
        self.state.read().await.edges.get(id).cloned()
    }

    pub async fn node_count(&self) -> usize {
        self.state.read().await.nodes.len()
    }

    pub async fn edge_count(&self) -> usize {
        self.state.read().await.edges.len()
    }

    /// Apply an in-place update to a node. Returns whether the node existed.
    pub async fn update_node<F>(&self, id: &str, update: F) -> bool
    where
        F: FnOnce(&mut Node),
    {
        let mut state = self.state.write().await;
        match state.nodes.get_mut(id) {
            Some(node) => {
                update(node);
                true
            }
            None => false,
        }
    }

    /// Edges whose source endpoint is the given column.
    pub async fn edges_from(&self, table: &str, column: &str) -> Vec<Edge> {
        let state = self.state.read().await;
        state
            .edges
            .values()
            .filter(|edge| {
                edge.properties.from_table.as_deref() == Some(table)
                    && edge.properties.from_column.as_deref() == Some(column)
            })
            .cloned()
            .collect()
    }

    /// Export a serializable copy of the full graph.
    pub async fn export_snapshot(&self) -> GraphSnapshot {
        let state = self.state.read().await;
        GraphSnapshot {
            nodes: state.nodes.clone(),
            edges: state.edges.clone(),
        }
    }

    /// Export the snapshot as pretty-printed JSON.
    pub async fn to_json(&self) -> Result<String, GraphError> {
        let snapshot = self.export_snapshot().await;
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }
}

impl Default for EvidenceGraph {
    fn default() -> Self {
        Self::new()
    }
}
