//! JSON envelopes returned by the backend

use crate::error::{ClientError, Result};
use graphlens_core::{GraphEdge, GraphNode, GraphSnapshot};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Used when the backend reports failure without saying why.
const UNSPECIFIED_FAILURE: &str = "Query failed without an error message";

/// `GET /api/query`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A successful query: the snapshot plus the backend's result count.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub snapshot: GraphSnapshot,
    /// Backend `count`, or the node count when the field is absent.
    pub count: u64,
}

impl QueryResponse {
    pub fn into_result(self) -> Result<QueryResult> {
        if !self.success {
            return Err(failure(self.error));
        }
        let count = self.count.unwrap_or(self.nodes.len() as u64);
        Ok(QueryResult {
            snapshot: GraphSnapshot::new(self.nodes, self.edges),
            count,
        })
    }
}

/// `GET /api/schema`. Everything but `success`/`error` is schema payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Schema fields as reported by the backend, passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Schema(pub Map<String, Value>);

impl Schema {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl SchemaResponse {
    pub fn into_schema(self) -> Result<Schema> {
        if !self.success {
            return Err(failure(self.error));
        }
        Ok(Schema(self.fields))
    }
}

/// `GET /api/stats`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub total_nodes: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StatsResponse {
    /// `Ok(None)` when the backend succeeded but has no total to report.
    pub fn into_total(self) -> Result<Option<u64>> {
        if !self.success {
            return Err(failure(self.error));
        }
        Ok(self.total_nodes)
    }
}

fn failure(error: Option<String>) -> ClientError {
    ClientError::query(error.unwrap_or_else(|| UNSPECIFIED_FAILURE.to_string()))
}
