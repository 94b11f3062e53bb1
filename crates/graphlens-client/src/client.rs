//! HTTP query client

use crate::backend::GraphBackend;
use crate::error::{ClientError, Result};
use crate::wire::{QueryResponse, QueryResult, Schema, SchemaResponse, StatsResponse};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const QUERY_PATH: &str = "/api/query";
const SCHEMA_PATH: &str = "/api/schema";
const STATS_PATH: &str = "/api/stats";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// Name of the URL parameter carrying the query text.
    pub query_param: String,
    /// Whole-request timeout; `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            query_param: "query".to_string(),
            timeout_secs: Some(30),
        }
    }
}

/// Stateless apart from the base address; cheap to clone.
#[derive(Debug, Clone)]
pub struct QueryClient {
    http: reqwest::Client,
    base_url: String,
    query_param: String,
}

impl QueryClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::transport("Failed to build HTTP client", e))?;
        Ok(Self::with_http(http, config))
    }

    /// Use an existing `reqwest::Client` (shared pools, custom TLS).
    pub fn with_http(http: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            query_param: config.query_param.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path`, decode the body as `T` whatever the HTTP status.
    ///
    /// Backends report query errors as `success: false` bodies, sometimes
    /// with a 4xx/5xx status, so the status code alone is not a failure.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| ClientError::transport(format!("Request to {url} failed"), e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::transport(format!("Failed to read response from {url}"), e))?;

        serde_json::from_slice(&body).map_err(|e| {
            ClientError::transport(format!("Invalid JSON from {url} (HTTP {status})"), e)
        })
    }
}

#[async_trait]
impl GraphBackend for QueryClient {
    async fn execute_query(&self, query: &str) -> Result<QueryResult> {
        tracing::debug!("Executing query ({} chars)", query.len());
        let response: QueryResponse = self
            .get_json(QUERY_PATH, &[(self.query_param.as_str(), query)])
            .await?;
        let result = response.into_result();
        if let Err(e) = &result {
            tracing::error!("Query execution failed: {}", e);
        }
        result
    }

    async fn get_schema(&self) -> Result<Schema> {
        let response: SchemaResponse = self.get_json(SCHEMA_PATH, &[]).await?;
        let schema = response.into_schema();
        if let Err(e) = &schema {
            tracing::error!("Schema fetch failed: {}", e);
        }
        schema
    }

    async fn get_stats(&self) -> Result<Option<u64>> {
        let response: StatsResponse = self.get_json(STATS_PATH, &[]).await?;
        response.into_total()
    }
}
