//! Display state for the controls around the graph

use graphlens_core::InspectorView;
use std::time::Duration;

/// The run control. Disabled and busy while a query is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunButton {
    pub enabled: bool,
    pub busy: bool,
}

impl Default for RunButton {
    fn default() -> Self {
        Self {
            enabled: true,
            busy: false,
        }
    }
}

/// Counters shown above the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsView {
    pub nodes: usize,
    pub edges: usize,
    pub query_time: Option<Duration>,
    /// Aggregate from the stats endpoint; `None` shows as `?`.
    pub total_nodes: Option<u64>,
}

impl StatsView {
    pub fn set_counts(&mut self, nodes: usize, edges: usize) {
        self.nodes = nodes;
        self.edges = edges;
    }

    pub fn nodes_text(&self) -> String {
        format!("{} Nodes", self.nodes)
    }

    pub fn edges_text(&self) -> String {
        format!("{} Relationships", self.edges)
    }

    pub fn query_time_text(&self) -> String {
        self.query_time
            .map(|d| format!("{}ms", d.as_millis()))
            .unwrap_or_default()
    }

    pub fn total_text(&self) -> String {
        self.total_nodes
            .map(group_thousands)
            .unwrap_or_else(|| "?".to_string())
    }
}

impl std::fmt::Display for StatsView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} | {}", self.nodes_text(), self.edges_text())?;
        if self.query_time.is_some() {
            write!(f, " | {}", self.query_time_text())?;
        }
        write!(f, " | total {}", self.total_text())
    }
}

/// `1234567` → `1,234,567`
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Side panel showing one node or edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InspectorPanel {
    view: Option<InspectorView>,
}

impl InspectorPanel {
    pub fn open(&mut self, view: InspectorView) {
        self.view = Some(view);
    }

    pub fn close(&mut self) {
        self.view = None;
    }

    pub fn is_open(&self) -> bool {
        self.view.is_some()
    }

    pub fn view(&self) -> Option<&InspectorView> {
        self.view.as_ref()
    }
}
