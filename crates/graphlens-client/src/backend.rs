//! Seam between the controller and whatever answers graph queries

use crate::error::Result;
use crate::wire::{QueryResult, Schema};
use async_trait::async_trait;

/// A source of query results. [`crate::QueryClient`] talks HTTP; tests and
/// offline front-ends can supply their own.
#[async_trait]
pub trait GraphBackend: Send + Sync {
    /// Run one query. A single attempt: failures are returned, never retried.
    async fn execute_query(&self, query: &str) -> Result<QueryResult>;

    async fn get_schema(&self) -> Result<Schema>;

    /// Aggregate node total, `None` when the backend has none to offer.
    async fn get_stats(&self) -> Result<Option<u64>>;
}
