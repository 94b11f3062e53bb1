//! Snapshot fixtures for Graphlens tests

use crate::model::{GraphEdge, GraphNode, GraphSnapshot};

/// A → B, A → C
pub fn triangle_fan() -> GraphSnapshot {
    GraphSnapshot::new(
        vec![
            GraphNode::new("A", "main", "Function"),
            GraphNode::new("B", "helper", "Function"),
            GraphNode::new("C", "utils.py", "File"),
        ],
        vec![
            GraphEdge::new("e-1", "CALLS", "A", "B"),
            GraphEdge::new("e-2", "CONTAINS", "C", "A"),
        ],
    )
}

/// A → B plus an unrelated pair C → D and a lone E.
pub fn two_components() -> GraphSnapshot {
    GraphSnapshot::new(
        ["A", "B", "C", "D", "E"]
            .iter()
            .map(|id| GraphNode::new(*id, format!("node_{id}"), "Class"))
            .collect(),
        vec![
            GraphEdge::new("ab", "CALLS", "A", "B"),
            GraphEdge::new("cd", "CALLS", "C", "D"),
        ],
    )
}

/// `n` nodes where every node links to the next three, wrapping around.
pub fn dense(n: usize) -> GraphSnapshot {
    let nodes = (0..n)
        .map(|i| GraphNode::new(format!("n{i}"), format!("function_number_{i}"), "Function"))
        .collect();
    let mut edges = Vec::new();
    for i in 0..n {
        for step in 1..=3 {
            let j = (i + step) % n;
            if i != j {
                edges.push(GraphEdge::new(
                    format!("e{i}-{j}"),
                    "CALLS",
                    format!("n{i}"),
                    format!("n{j}"),
                ));
            }
        }
    }
    GraphSnapshot::new(nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_fixture_shape() {
        let snapshot = dense(10);
        assert_eq!(snapshot.node_count(), 10);
        assert_eq!(snapshot.edge_count(), 30);
    }
}
