//! Neighbourhood highlighting over the current snapshot's adjacency.

use crate::graph::GraphStore;
use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use std::collections::HashSet;

/// Visual mark of one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementState {
    Neutral,
    Highlighted,
    Faded,
}

/// A node, every node sharing an edge with it, and those edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Neighborhood {
    pub nodes: HashSet<NodeIndex>,
    pub edges: HashSet<EdgeIndex>,
}

impl Neighborhood {
    /// Closed neighbourhood of `center`, ignoring edge direction.
    pub fn closed(store: &GraphStore, center: NodeIndex) -> Self {
        let mut nodes = store.neighbors(center);
        nodes.insert(center);
        Self {
            nodes,
            edges: store.incident_edges(center),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len() + self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Partition of the snapshot into highlighted / faded / neutral elements.
///
/// Neutral is the absence of a mark, so an empty state is all-neutral.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    highlighted_nodes: HashSet<NodeIndex>,
    highlighted_edges: HashSet<EdgeIndex>,
    faded_nodes: HashSet<NodeIndex>,
    faded_edges: HashSet<EdgeIndex>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlight `neighborhood` and fade everything else in `store`.
    /// Any previous marks are cleared first.
    pub fn highlight(&mut self, store: &GraphStore, neighborhood: &Neighborhood) {
        self.reset();
        for (idx, _) in store.all_nodes() {
            if neighborhood.nodes.contains(&idx) {
                self.highlighted_nodes.insert(idx);
            } else {
                self.faded_nodes.insert(idx);
            }
        }
        for (idx, _) in store.all_edges() {
            if neighborhood.edges.contains(&idx) {
                self.highlighted_edges.insert(idx);
            } else {
                self.faded_edges.insert(idx);
            }
        }
    }

    /// Drop every mark. Idempotent.
    pub fn reset(&mut self) {
        self.highlighted_nodes.clear();
        self.highlighted_edges.clear();
        self.faded_nodes.clear();
        self.faded_edges.clear();
    }

    pub fn is_neutral(&self) -> bool {
        self.highlighted_nodes.is_empty()
            && self.highlighted_edges.is_empty()
            && self.faded_nodes.is_empty()
            && self.faded_edges.is_empty()
    }

    pub fn node_state(&self, idx: NodeIndex) -> ElementState {
        if self.highlighted_nodes.contains(&idx) {
            ElementState::Highlighted
        } else if self.faded_nodes.contains(&idx) {
            ElementState::Faded
        } else {
            ElementState::Neutral
        }
    }

    pub fn edge_state(&self, idx: EdgeIndex) -> ElementState {
        if self.highlighted_edges.contains(&idx) {
            ElementState::Highlighted
        } else if self.faded_edges.contains(&idx) {
            ElementState::Faded
        } else {
            ElementState::Neutral
        }
    }

    pub fn highlighted_nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.highlighted_nodes.iter().copied()
    }

    pub fn highlighted_edges(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.highlighted_edges.iter().copied()
    }

    pub fn faded_count(&self) -> usize {
        self.faded_nodes.len() + self.faded_edges.len()
    }
}
