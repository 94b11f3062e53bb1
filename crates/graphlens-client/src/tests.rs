//! Client tests against an in-process axum backend

use crate::*;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::HashMap;

async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn client_for(base_url: String) -> QueryClient {
    QueryClient::new(&ClientConfig {
        base_url,
        timeout_secs: Some(5),
        ..ClientConfig::default()
    })
    .unwrap()
}

async fn query_handler(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    let query = params.get("query").cloned().unwrap_or_default();
    if query.contains("WHERE WHERE") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": "syntax error near 'WHERE'"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "nodes": [
                {"id": "A", "label": "main", "type": "Function", "properties": {"echo": query}},
                {"id": "B", "label": "helper", "type": "Function", "properties": {}},
                {"id": "C", "label": "utils.py", "type": "File", "properties": {}}
            ],
            "edges": [
                {"id": "ab", "type": "CALLS", "source": "A", "target": "B", "properties": {}},
                {"id": "ac", "type": "CONTAINS", "source": "A", "target": "C", "properties": {}}
            ],
            "count": 3
        })),
    )
}

fn backend_router() -> Router {
    Router::new()
        .route("/api/query", get(query_handler))
        .route(
            "/api/schema",
            get(|| async {
                Json(json!({
                    "success": true,
                    "labels": ["Function", "Class", "File"],
                    "relationships": ["CALLS", "CONTAINS"]
                }))
            }),
        )
        .route(
            "/api/stats",
            get(|| async { Json(json!({"success": true, "total_nodes": 12345})) }),
        )
}

#[tokio::test]
async fn test_execute_query_success() {
    let client = client_for(spawn_backend(backend_router()).await);
    let result = client.execute_query("MATCH (n) RETURN n").await.unwrap();

    assert_eq!(result.count, 3);
    assert_eq!(result.snapshot.node_count(), 3);
    assert_eq!(result.snapshot.edge_count(), 2);
    // query text travels URL-encoded and arrives intact
    assert_eq!(
        result.snapshot.nodes[0].properties.get("echo"),
        Some(&json!("MATCH (n) RETURN n"))
    );
}

#[tokio::test]
async fn test_query_failure_carries_server_message() {
    let client = client_for(spawn_backend(backend_router()).await);
    let err = client
        .execute_query("MATCH (n) WHERE WHERE")
        .await
        .unwrap_err();

    assert!(err.is_query());
    assert_eq!(err.to_string(), "syntax error near 'WHERE'");
    assert_eq!(err.user_message(), "syntax error near 'WHERE'");
}

#[tokio::test]
async fn test_query_param_is_configurable() {
    let router = Router::new().route(
        "/api/query",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            match params.get("cypher") {
                Some(_) => Json(json!({"success": true, "nodes": [], "edges": [], "count": 0})),
                None => Json(json!({"success": false, "error": "missing cypher"})),
            }
        }),
    );
    let base_url = spawn_backend(router).await;

    let default_client = client_for(base_url.clone());
    assert!(default_client.execute_query("RETURN 1").await.is_err());

    let cypher_client = QueryClient::new(&ClientConfig {
        base_url,
        query_param: "cypher".to_string(),
        timeout_secs: Some(5),
    })
    .unwrap();
    let result = cypher_client.execute_query("RETURN 1").await.unwrap();
    assert_eq!(result.count, 0);
    assert!(result.snapshot.is_empty());
}

#[tokio::test]
async fn test_non_json_body_is_transport_failure() {
    let router = Router::new().route("/api/query", get(|| async { "<html>oops</html>" }));
    let client = client_for(spawn_backend(router).await);

    let err = client.execute_query("RETURN 1").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport { .. }));
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(format!("http://{addr}"));
    let err = client.execute_query("RETURN 1").await.unwrap_err();
    assert!(!err.is_query());
}

#[tokio::test]
async fn test_schema_and_stats() {
    let client = client_for(spawn_backend(backend_router()).await);

    let schema = client.get_schema().await.unwrap();
    assert_eq!(schema.get("relationships"), Some(&json!(["CALLS", "CONTAINS"])));

    assert_eq!(client.get_stats().await.unwrap(), Some(12345));
}

#[tokio::test]
async fn test_schema_failure_follows_query_contract() {
    let router = Router::new().route(
        "/api/schema",
        get(|| async { Json(json!({"success": false, "error": "database offline"})) }),
    );
    let client = client_for(spawn_backend(router).await);
    let err = client.get_schema().await.unwrap_err();
    assert_eq!(err.to_string(), "database offline");
}

#[test]
fn test_trailing_slash_trimmed() {
    let client = QueryClient::new(&ClientConfig {
        base_url: "http://localhost:8000/".to_string(),
        ..ClientConfig::default()
    })
    .unwrap();
    assert_eq!(client.base_url(), "http://localhost:8000");
}
