//! Read-only property view for a selected node or edge.
//!
//! Property values come from untrusted query results, so everything that
//! ends up in markup goes through [`escape_markup`].

use crate::model::{GraphEdge, GraphNode, Properties};
use serde_json::Value;

pub const NO_PROPERTIES: &str = "No properties";
const EDGE_TITLE_PREFIX: &str = "REL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Node,
    Edge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRow {
    pub key: String,
    /// Scalar text, or compact JSON for structured values. Not escaped.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectorBody {
    Rows(Vec<PropertyRow>),
    /// Explicit placeholder for an empty property map.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorView {
    pub kind: TargetKind,
    pub title: String,
    pub body: InspectorBody,
}

impl InspectorView {
    /// Build the view. `title_part` is the node label or the edge type.
    pub fn present(kind: TargetKind, title_part: &str, properties: &Properties) -> Self {
        let title = match kind {
            TargetKind::Node if title_part.is_empty() => "Node: Node".to_string(),
            TargetKind::Node => format!("Node: {title_part}"),
            TargetKind::Edge => format!("{EDGE_TITLE_PREFIX}: {title_part}"),
        };

        let body = if properties.is_empty() {
            InspectorBody::Empty
        } else {
            InspectorBody::Rows(
                properties
                    .iter()
                    .map(|(key, value)| PropertyRow {
                        key: key.clone(),
                        value: display_value(value),
                    })
                    .collect(),
            )
        };

        Self { kind, title, body }
    }

    pub fn for_node(node: &GraphNode) -> Self {
        Self::present(TargetKind::Node, &node.label, &node.properties)
    }

    pub fn for_edge(edge: &GraphEdge) -> Self {
        Self::present(TargetKind::Edge, &edge.kind, &edge.properties)
    }

    /// Markup fragment for the property list, every text run escaped.
    pub fn body_html(&self) -> String {
        match &self.body {
            InspectorBody::Empty => {
                format!("<div class=\"prop-empty\">{NO_PROPERTIES}</div>")
            }
            InspectorBody::Rows(rows) => rows
                .iter()
                .map(|row| {
                    format!(
                        "<div class=\"prop-row\"><div class=\"prop-key\">{}</div><div class=\"prop-value\">{}</div></div>",
                        escape_markup(&row.key),
                        escape_markup(&row.value)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Escaped title for markup surfaces.
    pub fn title_html(&self) -> String {
        escape_markup(&self.title)
    }

    /// Plain text rendering for terminals.
    pub fn to_text(&self) -> String {
        let mut out = self.title.clone();
        match &self.body {
            InspectorBody::Empty => {
                out.push_str("\n  ");
                out.push_str(NO_PROPERTIES);
            }
            InspectorBody::Rows(rows) => {
                for row in rows {
                    out.push_str(&format!("\n  {}: {}", row.key, row.value));
                }
            }
        }
        out
    }
}

/// Strings are shown raw; everything else (including `null`) as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Escape `&`, `<`, `>` and quotes.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
