use graphlens_app::{
    AppController, FinishedQuery, GraphlensConfig, InFlightQuery, Notifier, QueryOutcome,
    StatsView, UiEvent,
};
use graphlens_client::{GraphBackend, QueryClient};
use graphlens_core::{Point, Renderer};
use graphlens_export::{
    DirectorySink, ExportFormat, ExportOptions, ExportReport, optimal_export_settings,
};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Prints alerts to stderr.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }
}

fn controller(config: &GraphlensConfig) -> anyhow::Result<AppController> {
    let client = QueryClient::new(&config.backend)?;
    Ok(AppController::from_config(
        Arc::new(client),
        Box::new(ConsoleNotifier),
        config,
    ))
}

pub async fn query(
    config: &GraphlensConfig,
    text: String,
    export: Option<(String, ExportFormat)>,
) -> anyhow::Result<ExitCode> {
    let mut app = controller(config)?;
    app.set_query(text);

    match app.run_query().await {
        Some(QueryOutcome::Loaded { .. }) => {}
        // already alerted on stderr
        Some(QueryOutcome::Failed { .. }) => return Ok(ExitCode::FAILURE),
        None => anyhow::bail!("Query text is empty"),
    }
    println!("{}", app.stats());
    print_nodes(app.renderer());

    if let Some((name, format)) = export {
        let report = export_frame(&app, config, format, Some(name))?;
        print_report(&report);
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn schema(config: &GraphlensConfig) -> anyhow::Result<ExitCode> {
    let client = QueryClient::new(&config.backend)?;
    let schema = client.get_schema().await?;
    if schema.is_empty() {
        println!("(empty schema)");
    } else {
        println!("{}", serde_json::to_string_pretty(&schema)?);
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn stats(config: &GraphlensConfig) -> anyhow::Result<ExitCode> {
    let client = QueryClient::new(&config.backend)?;
    let total_nodes = match client.get_stats().await {
        Ok(total) => total,
        Err(e) => {
            tracing::warn!("Stats load error: {}", e);
            None
        }
    };
    let view = StatsView {
        total_nodes,
        ..StatsView::default()
    };
    println!("{}", view.total_text());
    Ok(ExitCode::SUCCESS)
}

pub async fn shell(config: &GraphlensConfig) -> anyhow::Result<ExitCode> {
    let mut app = controller(config)?;
    if let Some(outcome) = app.initialize().await {
        print_outcome(&app, &outcome);
    }
    println!("Total nodes: {}", app.stats().total_text());
    println!("Type a query and press Enter, or :help");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight: Option<InFlightQuery> = None;
    loop {
        tokio::select! {
            done = next_answer(&mut in_flight) => {
                in_flight = None;
                let outcome = app.finish(done).await;
                print_outcome(&app, &outcome);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match ShellCommand::parse(&line) {
                    ShellCommand::Quit => break,
                    command => run_command(&mut app, config, command, &mut in_flight).await,
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Resolves when the running query answers; pends forever when idle.
async fn next_answer(in_flight: &mut Option<InFlightQuery>) -> FinishedQuery {
    match in_flight {
        Some(query) => query.await,
        None => std::future::pending().await,
    }
}

async fn run_command(
    app: &mut AppController,
    config: &GraphlensConfig,
    command: ShellCommand,
    in_flight: &mut Option<InFlightQuery>,
) {
    match command {
        ShellCommand::Empty | ShellCommand::Quit => {}
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Query(text) => {
            app.dispatch(UiEvent::QueryEdited(text));
            dispatch(app, UiEvent::RunClicked, in_flight);
        }
        ShellCommand::Event(event) => {
            dispatch(app, event, in_flight);
            print_focus(app);
        }
        ShellCommand::Fit => {
            app.renderer_mut().fit_to_view();
            println!("zoom {:.3}", app.renderer().viewport().zoom);
        }
        ShellCommand::Zoom { factor, anchor } => {
            let viewport = app.renderer_mut().viewport_mut();
            let anchor =
                anchor.unwrap_or_else(|| Point::new(viewport.width / 2.0, viewport.height / 2.0));
            viewport.zoom_by(factor, anchor);
            println!("zoom {:.3}", viewport.zoom);
        }
        ShellCommand::Stats => {
            app.refresh_stats().await;
            println!("{}", app.stats());
        }
        ShellCommand::Export { format, name } => {
            // alerts already went to stderr
            if let Ok(report) = export_frame(app, config, format, name) {
                print_report(&report);
            }
        }
        ShellCommand::QuickPng => {
            let mut sink = DirectorySink::new(&config.export.output_dir);
            if let Ok(report) = app.export_png(&mut sink) {
                print_report(&report);
            }
        }
        ShellCommand::Unknown(cmd) => println!("Unknown command: {cmd} (try :help)"),
    }
}

/// Route `event` without blocking the prompt. A query it starts is parked
/// in `in_flight`; triggers while one is running are dropped.
fn dispatch(app: &mut AppController, event: UiEvent, in_flight: &mut Option<InFlightQuery>) {
    let is_trigger = event.is_run_trigger();
    match app.dispatch(event) {
        Some(query) => *in_flight = Some(query),
        None if is_trigger && in_flight.is_some() => {
            println!("A query is already running; ignored");
        }
        None => {}
    }
}

fn export_frame(
    app: &AppController,
    config: &GraphlensConfig,
    format: ExportFormat,
    name: Option<String>,
) -> anyhow::Result<ExportReport> {
    let viewport = app.renderer().viewport();
    let settings = optimal_export_settings(viewport.width, viewport.height, format);
    let mut options = ExportOptions::new(format)
        .with_quality(config.export.quality)
        .with_background(config.export.background)
        .with_settings(settings);
    if let Some(name) = name {
        options = options.with_filename(name);
    }
    let mut sink = DirectorySink::new(&config.export.output_dir);
    Ok(app.export(&options, &mut sink)?)
}

fn print_outcome(app: &AppController, outcome: &QueryOutcome) {
    if let QueryOutcome::Loaded { .. } = outcome {
        println!("{}", app.stats());
        print_nodes(app.renderer());
    }
}

fn print_nodes(renderer: &Renderer) {
    for (_, node) in renderer.store().all_nodes() {
        println!("  [{}] {} ({})", node.type_name, node.label, node.id);
    }
}

/// Inspector contents, or the highlight summary after a double tap.
fn print_focus(app: &AppController) {
    if let Some(view) = app.inspector().view() {
        println!("{}", view.to_text());
    }
    let selection = app.renderer().selection();
    if !selection.is_neutral() {
        let store = app.renderer().store();
        let mut highlighted: Vec<&str> = selection
            .highlighted_nodes()
            .filter_map(|idx| store.node_at(idx))
            .map(|node| node.id.as_str())
            .collect();
        highlighted.sort_unstable();
        println!(
            "highlighted: {} ({} edges, {} faded)",
            highlighted.join(", "),
            selection.highlighted_edges().count(),
            selection.faded_count()
        );
    }
}

fn print_report(report: &ExportReport) {
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    println!(
        "Saved {} ({}x{} px, {} bytes)",
        report.path.display(),
        report.width_px,
        report.height_px,
        report.bytes
    );
}

const HELP: &str = "\
<query>               run a query
:tap <node-id>        select a node and inspect it
:edge <edge-id>       select an edge and inspect it
:dbl <node-id>        highlight a node's neighbourhood
:bg                   background tap: close inspector, reset highlight
:close                close the inspector
:fit                  fit the view to the whole graph
:zoom <f> [x y]       zoom by factor f around a screen point (default centre)
:clear                clear the graph
:export <fmt> [name]  export the current view (png, jpeg, pdf, svg)
:png                  export the whole graph as codegraph.png
:stats                refresh the total node count
:quit                 leave";

#[derive(Debug, PartialEq)]
enum ShellCommand {
    Empty,
    Quit,
    Help,
    Query(String),
    Event(UiEvent),
    Fit,
    Zoom {
        factor: f64,
        anchor: Option<Point>,
    },
    Stats,
    Export {
        format: ExportFormat,
        name: Option<String>,
    },
    QuickPng,
    Unknown(String),
}

impl ShellCommand {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ShellCommand::Empty;
        }
        let Some(rest) = line.strip_prefix(':') else {
            return ShellCommand::Query(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        let cmd = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::to_string);
        match (cmd, arg) {
            ("q" | "quit", _) => ShellCommand::Quit,
            ("help", _) => ShellCommand::Help,
            ("tap", Some(id)) => ShellCommand::Event(UiEvent::TapNode(id)),
            ("edge", Some(id)) => ShellCommand::Event(UiEvent::TapEdge(id)),
            ("dbl", Some(id)) => ShellCommand::Event(UiEvent::DoubleTapNode(id)),
            ("bg", _) => ShellCommand::Event(UiEvent::TapBackground),
            ("close", _) => ShellCommand::Event(UiEvent::CloseInspector),
            ("clear", _) => ShellCommand::Event(UiEvent::ClearClicked),
            ("fit", _) => ShellCommand::Fit,
            ("zoom", Some(factor)) => {
                let anchor: Vec<f64> = parts.filter_map(|v| v.parse().ok()).collect();
                match (factor.parse::<f64>(), anchor.as_slice()) {
                    (Ok(factor), []) if factor > 0.0 => ShellCommand::Zoom {
                        factor,
                        anchor: None,
                    },
                    (Ok(factor), [x, y]) if factor > 0.0 => ShellCommand::Zoom {
                        factor,
                        anchor: Some(Point::new(*x, *y)),
                    },
                    _ => ShellCommand::Unknown(line.to_string()),
                }
            }
            ("stats", _) => ShellCommand::Stats,
            ("png", _) => ShellCommand::QuickPng,
            ("export", Some(fmt)) => match fmt.parse() {
                Ok(format) => ShellCommand::Export {
                    format,
                    name: parts.next().map(str::to_string),
                },
                Err(e) => ShellCommand::Unknown(e),
            },
            _ => ShellCommand::Unknown(line.to_string()),
        }
    }
}
