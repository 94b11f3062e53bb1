//! Query lifecycle state machine and UI event routing

use crate::config::{AppConfig, GraphlensConfig};
use crate::events::{Key, UiEvent};
use crate::notifier::Notifier;
use crate::panels::{InspectorPanel, RunButton, StatsView};
use graphlens_client::{ClientError, GraphBackend, QueryResult};
use graphlens_core::{ElementRef, InspectorView, Renderer, StoreError};
use graphlens_export::{
    DownloadSink, ExportError, ExportOptions, ExportReport, export_element, export_full_png,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    Idle,
    Running,
    Success,
    Failed,
}

/// A query that has left `Idle` and must be completed with
/// [`AppController::complete`].
#[derive(Debug)]
pub struct PendingQuery {
    pub text: String,
    started: Instant,
}

impl PendingQuery {
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// The backend's answer to a [`PendingQuery`].
#[derive(Debug)]
pub struct FinishedQuery {
    pub pending: PendingQuery,
    pub result: Result<QueryResult, ClientError>,
}

/// A started query whose backend request is still outstanding.
///
/// It owns its request, so the controller keeps handling events while the
/// caller polls it. Resolve it with [`AppController::finish`].
pub struct InFlightQuery {
    response: Pin<Box<dyn Future<Output = FinishedQuery> + Send>>,
}

impl std::fmt::Debug for InFlightQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InFlightQuery").finish_non_exhaustive()
    }
}

impl Future for InFlightQuery {
    type Output = FinishedQuery;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<FinishedQuery> {
        self.response.as_mut().poll(cx)
    }
}

/// How a query run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Loaded {
        nodes: usize,
        edges: usize,
        count: u64,
        elapsed: Duration,
    },
    /// The message shown to the user.
    Failed { message: String },
}

/// Owns the renderer and panels; the single writer of both.
pub struct AppController {
    backend: Arc<dyn GraphBackend>,
    renderer: Renderer,
    notifier: Box<dyn Notifier>,
    config: AppConfig,
    state: QueryState,
    last_outcome: Option<QueryState>,
    query_input: String,
    run_button: RunButton,
    stats: StatsView,
    inspector: InspectorPanel,
}

impl std::fmt::Debug for AppController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppController")
            .field("state", &self.state)
            .field("node_count", &self.renderer.node_count())
            .field("edge_count", &self.renderer.edge_count())
            .field("inspector_open", &self.inspector.is_open())
            .finish()
    }
}

impl AppController {
    pub fn new(
        backend: Arc<dyn GraphBackend>,
        renderer: Renderer,
        notifier: Box<dyn Notifier>,
        config: AppConfig,
    ) -> Self {
        let query_input = config.initial_query.clone().unwrap_or_default();
        Self {
            backend,
            renderer,
            notifier,
            config,
            state: QueryState::Idle,
            last_outcome: None,
            query_input,
            run_button: RunButton::default(),
            stats: StatsView::default(),
            inspector: InspectorPanel::default(),
        }
    }

    /// Build the renderer from a full configuration.
    pub fn from_config(
        backend: Arc<dyn GraphBackend>,
        notifier: Box<dyn Notifier>,
        config: &GraphlensConfig,
    ) -> Self {
        let renderer = Renderer::new(config.view.clone(), config.layout.clone());
        Self::new(backend, renderer, notifier, config.app.clone())
    }

    /// Load the aggregate total once, then run the initial query if any.
    pub async fn initialize(&mut self) -> Option<QueryOutcome> {
        self.refresh_stats().await;
        if self.query_input.trim().is_empty() {
            return None;
        }
        self.run_query().await
    }

    // ── Query lifecycle ─────────────────────────────────────

    /// Leave `Idle` for `Running` if there is something to run.
    ///
    /// Returns `None` when the trimmed input is empty or a query is already
    /// in flight; such triggers are dropped, not queued.
    pub fn trigger(&mut self) -> Option<PendingQuery> {
        if self.state == QueryState::Running {
            tracing::debug!("Query already running, trigger ignored");
            return None;
        }
        let text = self.query_input.trim();
        if text.is_empty() {
            return None;
        }
        let pending = PendingQuery {
            text: text.to_string(),
            started: Instant::now(),
        };
        self.state = QueryState::Running;
        self.run_button = RunButton {
            enabled: false,
            busy: true,
        };
        tracing::debug!("Idle -> Running");
        Some(pending)
    }

    /// Apply the backend's answer to a pending query and return to `Idle`.
    ///
    /// Returns the outcome and whether the aggregate total should be
    /// refreshed. Controls are restored on every path.
    pub fn complete(
        &mut self,
        pending: PendingQuery,
        result: Result<QueryResult, ClientError>,
    ) -> (QueryOutcome, bool) {
        let loaded = result
            .map_err(|e| e.user_message())
            .and_then(|result| {
                let count = result.count;
                self.renderer
                    .load_graph(result.snapshot)
                    .map(|summary| (summary, count))
                    .map_err(|e: StoreError| e.to_string())
            });

        let (outcome, refresh) = match loaded {
            Ok((summary, count)) => {
                let elapsed = pending.elapsed();
                self.stats.set_counts(summary.nodes, summary.edges);
                self.stats.query_time = Some(elapsed);
                self.inspector.close();
                self.state = QueryState::Success;
                tracing::info!(
                    "Query returned {} nodes, {} edges in {}ms",
                    summary.nodes,
                    summary.edges,
                    elapsed.as_millis()
                );
                let outcome = QueryOutcome::Loaded {
                    nodes: summary.nodes,
                    edges: summary.edges,
                    count,
                    elapsed,
                };
                (outcome, count > self.config.stats_threshold)
            }
            Err(message) => {
                self.state = QueryState::Failed;
                self.notifier.alert(&message);
                (QueryOutcome::Failed { message }, false)
            }
        };

        tracing::debug!("Running -> {:?} -> Idle", self.state);
        self.last_outcome = Some(self.state);
        self.state = QueryState::Idle;
        self.run_button = RunButton::default();
        (outcome, refresh)
    }

    /// Trigger a query and send it to the backend without waiting.
    pub fn start_query(&mut self) -> Option<InFlightQuery> {
        let pending = self.trigger()?;
        let backend = Arc::clone(&self.backend);
        Some(InFlightQuery {
            response: Box::pin(async move {
                let result = backend.execute_query(&pending.text).await;
                FinishedQuery { pending, result }
            }),
        })
    }

    /// Complete a started query and refresh the total if it was large.
    pub async fn finish(&mut self, done: FinishedQuery) -> QueryOutcome {
        let (outcome, refresh) = self.complete(done.pending, done.result);
        if refresh {
            self.refresh_stats().await;
        }
        outcome
    }

    /// Trigger, execute and complete one query.
    pub async fn run_query(&mut self) -> Option<QueryOutcome> {
        let in_flight = self.start_query()?;
        let done = in_flight.await;
        Some(self.finish(done).await)
    }

    /// Best-effort aggregate total. Failures show `?` and are only logged.
    pub async fn refresh_stats(&mut self) {
        self.stats.total_nodes = match self.backend.get_stats().await {
            Ok(total) => total,
            Err(e) => {
                tracing::warn!("Stats load error: {}", e);
                None
            }
        };
    }

    /// Empty the graph, zero the counters and close the inspector.
    /// Only honoured while `Idle`.
    pub fn clear(&mut self) -> bool {
        if self.state != QueryState::Idle {
            return false;
        }
        self.renderer.clear();
        self.stats.set_counts(0, 0);
        self.inspector.close();
        true
    }

    // ── Interaction ─────────────────────────────────────────

    /// Route one UI event and wait for any query it starts.
    pub async fn handle_event(&mut self, event: UiEvent) -> Option<QueryOutcome> {
        let in_flight = self.dispatch(event)?;
        let done = in_flight.await;
        Some(self.finish(done).await)
    }

    /// Route one UI event without waiting on the backend.
    ///
    /// A run trigger hands back the started query for the caller to drive.
    /// Triggers that arrive while a query is running return `None` and are
    /// dropped.
    pub fn dispatch(&mut self, event: UiEvent) -> Option<InFlightQuery> {
        match event {
            UiEvent::QueryEdited(text) => self.query_input = text,
            UiEvent::Action(query) => {
                self.query_input = query;
                return self.start_query();
            }
            UiEvent::RunClicked
            | UiEvent::KeyDown {
                key: Key::Enter,
                ctrl: true,
            } => return self.start_query(),
            UiEvent::KeyDown {
                key: Key::Escape, ..
            } => self.inspector.close(),
            UiEvent::KeyDown { .. } => {}
            UiEvent::ClearClicked => {
                self.clear();
            }
            UiEvent::TapNode(id) => self.inspect(&ElementRef::Node(id)),
            UiEvent::TapEdge(id) => self.inspect(&ElementRef::Edge(id)),
            UiEvent::DoubleTapNode(id) => {
                if let Err(e) = self.renderer.highlight_neighborhood(&id) {
                    tracing::warn!("Cannot highlight: {}", e);
                }
            }
            UiEvent::TapBackground => {
                self.inspector.close();
                self.renderer.deselect();
                self.renderer.reset_highlight();
            }
            UiEvent::CloseInspector => self.inspector.close(),
        }
        None
    }

    /// Select `element` and show it in the inspector.
    pub fn inspect(&mut self, element: &ElementRef) {
        if let Err(e) = self.renderer.select(element) {
            tracing::warn!("Cannot inspect: {}", e);
            return;
        }
        let store = self.renderer.store();
        let view = match element {
            ElementRef::Node(id) => store.node(id).map(InspectorView::for_node),
            ElementRef::Edge(id) => store.edge(id).map(InspectorView::for_edge),
        };
        if let Some(view) = view {
            self.inspector.open(view);
        }
    }

    // ── Export ──────────────────────────────────────────────

    /// Export the current frame. Failures are alerted and returned.
    pub fn export<S: DownloadSink + ?Sized>(
        &self,
        options: &ExportOptions,
        sink: &mut S,
    ) -> Result<ExportReport, ExportError> {
        let scene = self.renderer.scene();
        self.report_export(export_element(&scene, options, sink))
    }

    /// Whole graph as `codegraph.png`.
    pub fn export_png<S: DownloadSink + ?Sized>(&self, sink: &mut S) -> Result<ExportReport, ExportError> {
        self.report_export(export_full_png(&self.renderer, sink))
    }

    fn report_export(
        &self,
        result: Result<ExportReport, ExportError>,
    ) -> Result<ExportReport, ExportError> {
        if let Err(e) = &result {
            self.notifier.alert(&e.to_string());
        }
        result
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn state(&self) -> QueryState {
        self.state
    }

    /// `Success` or `Failed` for the most recent completed query.
    pub fn last_outcome(&self) -> Option<QueryState> {
        self.last_outcome
    }

    pub fn query_input(&self) -> &str {
        &self.query_input
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query_input = text.into();
    }

    pub fn run_button(&self) -> RunButton {
        self.run_button
    }

    pub fn stats(&self) -> &StatsView {
        &self.stats
    }

    pub fn inspector(&self) -> &InspectorPanel {
        &self.inspector
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }
}
