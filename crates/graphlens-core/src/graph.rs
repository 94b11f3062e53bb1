//! Graph store using petgraph::StableDiGraph keyed by snapshot ids

use crate::error::{Result, StoreError};
use crate::model::*;
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// What to do with an edge whose endpoint is missing from its snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// Refuse the whole snapshot.
    #[default]
    Reject,
    /// Skip the edge and keep loading.
    Drop,
}

/// Counts reported after a snapshot has been loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    pub nodes: usize,
    pub edges: usize,
    /// Edges skipped under [`EdgePolicy::Drop`].
    pub dropped_edges: usize,
}

/// Owns the current snapshot. Replacing it is wholesale: clear, then add.
pub struct GraphStore {
    inner: StableDiGraph<GraphNode, GraphEdge>,
    node_ids: HashMap<String, NodeIndex>,
    edge_ids: HashMap<String, EdgeIndex>,
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl GraphStore {
    pub fn new() -> Self {
        GraphStore {
            inner: StableDiGraph::new(),
            node_ids: HashMap::new(),
            edge_ids: HashMap::new(),
        }
    }

    /// Check a snapshot against the store's invariants without touching state.
    ///
    /// Returns the positions of edges that must be skipped under `policy`.
    pub fn validate(snapshot: &GraphSnapshot, policy: EdgePolicy) -> Result<HashSet<usize>> {
        let mut node_ids = HashSet::with_capacity(snapshot.nodes.len());
        for node in &snapshot.nodes {
            if !node_ids.insert(node.id.as_str()) {
                return Err(StoreError::invalid(format!("duplicate node id '{}'", node.id)));
            }
        }

        let mut edge_ids = HashSet::with_capacity(snapshot.edges.len());
        let mut dangling = HashSet::new();
        for (pos, edge) in snapshot.edges.iter().enumerate() {
            if !edge_ids.insert(edge.id.as_str()) {
                return Err(StoreError::invalid(format!("duplicate edge id '{}'", edge.id)));
            }
            let missing = [&edge.source, &edge.target]
                .into_iter()
                .find(|end| !node_ids.contains(end.as_str()));
            if let Some(missing) = missing {
                match policy {
                    EdgePolicy::Reject => {
                        return Err(StoreError::invalid(format!(
                            "edge '{}' references missing node '{}'",
                            edge.id, missing
                        )));
                    }
                    EdgePolicy::Drop => {
                        tracing::warn!(
                            "Dropping edge {} with missing endpoint {}",
                            edge.id,
                            missing
                        );
                        dangling.insert(pos);
                    }
                }
            }
        }
        Ok(dangling)
    }

    /// Replace the current snapshot. Validation happens first, so a rejected
    /// snapshot leaves the previous one in place.
    pub fn replace(&mut self, snapshot: GraphSnapshot, policy: EdgePolicy) -> Result<LoadSummary> {
        let skip = Self::validate(&snapshot, policy)?;
        self.clear();

        for node in snapshot.nodes {
            let id = node.id.clone();
            let idx = self.inner.add_node(node);
            self.node_ids.insert(id, idx);
        }

        for (pos, edge) in snapshot.edges.into_iter().enumerate() {
            if skip.contains(&pos) {
                continue;
            }
            let (Some(&source), Some(&target)) =
                (self.node_ids.get(&edge.source), self.node_ids.get(&edge.target))
            else {
                continue;
            };
            let id = edge.id.clone();
            let idx = self.inner.add_edge(source, target, edge);
            self.edge_ids.insert(id, idx);
        }

        Ok(LoadSummary {
            nodes: self.node_count(),
            edges: self.edge_count(),
            dropped_edges: skip.len(),
        })
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.inner.clear();
        self.node_ids.clear();
        self.edge_ids.clear();
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_ids.get(id).copied()
    }

    pub fn edge_index(&self, id: &str) -> Option<EdgeIndex> {
        self.edge_ids.get(id).copied()
    }

    /// Get a node by snapshot id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index(id).and_then(|idx| self.inner.node_weight(idx))
    }

    /// Get an edge by snapshot id.
    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edge_index(id).and_then(|idx| self.inner.edge_weight(idx))
    }

    pub fn node_at(&self, idx: NodeIndex) -> Option<&GraphNode> {
        self.inner.node_weight(idx)
    }

    pub fn edge_at(&self, idx: EdgeIndex) -> Option<&GraphEdge> {
        self.inner.edge_weight(idx)
    }

    /// Iterate over all nodes in insertion order.
    pub fn all_nodes(&self) -> impl Iterator<Item = (NodeIndex, &GraphNode)> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx).map(|n| (idx, n)))
    }

    /// Iterate over all edges in insertion order.
    pub fn all_edges(&self) -> impl Iterator<Item = (EdgeIndex, &GraphEdge)> {
        self.inner
            .edge_indices()
            .filter_map(move |idx| self.inner.edge_weight(idx).map(|e| (idx, e)))
    }

    pub fn endpoints(&self, edge: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.inner.edge_endpoints(edge)
    }

    /// Every edge touching `node`, in either direction.
    pub fn incident_edges(&self, node: NodeIndex) -> HashSet<EdgeIndex> {
        self.inner
            .edges_directed(node, Direction::Outgoing)
            .chain(self.inner.edges_directed(node, Direction::Incoming))
            .map(|edge_ref| edge_ref.id())
            .collect()
    }

    /// Nodes sharing an edge with `node`, ignoring direction. Excludes `node`
    /// itself unless it has a self-loop.
    pub fn neighbors(&self, node: NodeIndex) -> HashSet<NodeIndex> {
        self.inner.neighbors_undirected(node).collect()
    }

    /// Clone the current contents back into a snapshot.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.all_nodes().map(|(_, n)| n.clone()).collect(),
            edges: self.all_edges().map(|(_, e)| e.clone()).collect(),
        }
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
