//! Integration tests for Graphlens
//!
//! Query → layout → selection → export against an in-process backend.

use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use graphlens_app::{AppController, GraphlensConfig, LogNotifier, QueryOutcome, UiEvent};
use graphlens_client::{GraphBackend, QueryClient};
use graphlens_core::{ElementRef, ElementState};
use graphlens_export::{DirectorySink, ExportFormat, ExportOptions, ExportWarning};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

/// A small call graph: main → parse, main → render, render → draw; lib.rs
/// contains main. Queries containing "BROKEN" fail.
async fn query(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let text = params.get("query").cloned().unwrap_or_default();
    if text.contains("BROKEN") {
        return Json(json!({"success": false, "error": "Invalid input 'BROKEN'"}));
    }
    Json(json!({
        "success": true,
        "nodes": [
            {"id": 1, "label": "main", "type": "Function", "properties": {"line_number": 3}},
            {"id": 2, "label": "parse_arguments", "type": "Function", "properties": {}},
            {"id": 3, "label": "render", "type": "Function", "properties": {}},
            {"id": 4, "label": "draw", "type": "Function", "properties": {}},
            {"id": 5, "label": "lib.rs", "type": "File", "properties": {"path": "src/lib.rs"}}
        ],
        "edges": [
            {"id": "c1", "type": "CALLS", "source": 1, "target": 2, "properties": {}},
            {"id": "c2", "type": "CALLS", "source": 1, "target": 3, "properties": {}},
            {"id": "c3", "type": "CALLS", "source": 3, "target": 4, "properties": {}},
            {"id": "f1", "type": "CONTAINS", "source": 5, "target": 1, "properties": {}}
        ],
        "count": 5
    }))
}

async fn spawn_backend() -> String {
    let router = Router::new()
        .route("/api/query", get(query))
        .route(
            "/api/stats",
            get(|| async { Json(json!({"success": true, "total_nodes": 2048})) }),
        )
        .route(
            "/api/schema",
            get(|| async { Json(json!({"success": true, "labels": ["Function", "File"]})) }),
        );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn app_with_config(output_dir: &std::path::Path) -> (AppController, GraphlensConfig) {
    let mut config = GraphlensConfig::default();
    config.backend.base_url = spawn_backend().await;
    config.layout.seed = Some(2024);
    config.export.output_dir = output_dir.to_path_buf();
    config.app.initial_query = Some("MATCH (n)-[r]->(m) RETURN n, r, m".to_string());

    let client = assert_ok!(QueryClient::new(&config.backend));
    let app = AppController::from_config(Arc::new(client), Box::new(LogNotifier), &config);
    (app, config)
}

#[tokio::test]
async fn test_query_to_export_round() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, config) = app_with_config(dir.path()).await;

    let outcome = app.initialize().await;
    assert!(matches!(outcome, Some(QueryOutcome::Loaded { nodes: 5, edges: 4, .. })));
    assert_eq!(app.stats().nodes_text(), "5 Nodes");
    assert_eq!(app.stats().total_text(), "2,048");

    // double tap "render": itself, main, draw and the two calls touching it
    app.handle_event(UiEvent::DoubleTapNode("3".to_string())).await;
    let renderer = app.renderer();
    for id in ["1", "3", "4"] {
        assert_eq!(
            renderer.element_state(&ElementRef::node(id)),
            Some(ElementState::Highlighted)
        );
    }
    for id in ["2", "5"] {
        assert_eq!(
            renderer.element_state(&ElementRef::node(id)),
            Some(ElementState::Faded)
        );
    }
    assert_eq!(
        renderer.element_state(&ElementRef::edge("f1")),
        Some(ElementState::Faded)
    );

    let mut sink = DirectorySink::new(&config.export.output_dir);
    let options = ExportOptions::new(ExportFormat::Pdf).with_filename("neighbourhood");
    let report = assert_ok!(app.export(&options, &mut sink));
    assert_eq!(report.path, dir.path().join("neighbourhood.pdf"));
    assert!(std::fs::read(&report.path).unwrap().starts_with(b"%PDF"));

    let report = assert_ok!(app.export_png(&mut sink));
    assert_eq!(report.path, dir.path().join("codegraph.png"));
}

#[tokio::test]
async fn test_failed_query_leaves_graph() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, _config) = app_with_config(dir.path()).await;
    app.initialize().await;

    let outcome = app
        .handle_event(UiEvent::Action("MATCH BROKEN".to_string()))
        .await;
    assert_eq!(
        outcome,
        Some(QueryOutcome::Failed {
            message: "Invalid input 'BROKEN'".to_string()
        })
    );
    assert_eq!(app.renderer().node_count(), 5);
    assert!(app.run_button().enabled);
}

#[tokio::test]
async fn test_svg_request_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, config) = app_with_config(dir.path()).await;
    app.initialize().await;

    let mut sink = DirectorySink::new(&config.export.output_dir);
    let options = ExportOptions::new(ExportFormat::Svg).with_filename("vector");
    let report = assert_ok!(app.export(&options, &mut sink));
    assert_eq!(report.warnings, vec![ExportWarning::SvgFallbackToPng]);
    assert!(dir.path().join("vector.png").exists());
}

#[tokio::test]
async fn test_schema_passthrough_and_unreachable_backend() {
    let base_url = spawn_backend().await;
    let mut config = GraphlensConfig::default();
    config.backend.base_url = base_url;
    let client = assert_ok!(QueryClient::new(&config.backend));
    let schema = assert_ok!(client.get_schema().await);
    assert_eq!(schema.get("labels"), Some(&json!(["Function", "File"])));

    config.backend.base_url = "http://127.0.0.1:9".to_string();
    config.backend.timeout_secs = Some(2);
    let offline = assert_ok!(QueryClient::new(&config.backend));
    assert_err!(offline.execute_query("RETURN 1").await);
}
