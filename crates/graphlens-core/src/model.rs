//! Core data structures for graph snapshots

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Free-form property bag carried by nodes and edges.
pub type Properties = Map<String, Value>;

/// Closed set of node categories the renderer knows how to style.
///
/// Any type label outside this set maps to [`NodeType::Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Function,
    Class,
    File,
    Module,
    Repository,
    Default,
}

impl NodeType {
    pub const ALL: [NodeType; 6] = [
        NodeType::Function,
        NodeType::Class,
        NodeType::File,
        NodeType::Module,
        NodeType::Repository,
        NodeType::Default,
    ];

    /// Map a backend type label onto the closed set.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Function" => NodeType::Function,
            "Class" => NodeType::Class,
            "File" => NodeType::File,
            "Module" => NodeType::Module,
            "Repository" => NodeType::Repository,
            _ => NodeType::Default,
        }
    }
}

/// A single node as returned by one query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphNode {
    #[serde(deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub label: String,
    /// Raw type label from the backend (e.g. `Function`, `Variable`).
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Properties,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            type_name: type_name.into(),
            properties: Properties::new(),
        }
    }

    /// Builder: attach a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn node_type(&self) -> NodeType {
        NodeType::from_label(&self.type_name)
    }
}

/// A directed relationship between two nodes of the same snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphEdge {
    #[serde(deserialize_with = "scalar_string")]
    pub id: String,
    /// Relationship label, e.g. `CALLS` or `CONTAINS`.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(deserialize_with = "scalar_string")]
    pub source: String,
    #[serde(deserialize_with = "scalar_string")]
    pub target: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Properties,
}

impl GraphEdge {
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            source: source.into(),
            target: target.into(),
            properties: Properties::new(),
        }
    }

    /// Builder: attach a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// The full node/edge set returned by one query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphSnapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphSnapshot {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Addresses one visual element of the current snapshot by its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementRef {
    Node(String),
    Edge(String),
}

impl ElementRef {
    pub fn node(id: impl Into<String>) -> Self {
        ElementRef::Node(id.into())
    }

    pub fn edge(id: impl Into<String>) -> Self {
        ElementRef::Edge(id.into())
    }

    pub fn id(&self) -> &str {
        match self {
            ElementRef::Node(id) | ElementRef::Edge(id) => id,
        }
    }
}

/// Backends stringify ids, but some hand back raw numbers; accept both.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Properties, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Properties>::deserialize(deserializer)?.unwrap_or_default())
}
