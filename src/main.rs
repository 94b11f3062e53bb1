//! Graphlens CLI entry point

use clap::{Parser, Subcommand};
use graphlens_export::ExportFormat;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "graphlens")]
#[command(about = "Query a property graph backend, explore the result and export it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./graphlens.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one query and print the resulting counts
    Query {
        /// Query text, sent to the backend as-is
        text: String,

        /// Export the laid-out result under this name
        #[arg(short, long)]
        export: Option<String>,

        /// Export format
        #[arg(short, long, default_value = "png")]
        format: ExportFormat,

        /// Seed for the layout's initial placement
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the backend schema as JSON
    Schema,
    /// Print the backend's total node count
    Stats,
    /// Interactive session
    Shell {
        /// Seed for the layout's initial placement
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!("graphlens={}", log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Graphlens v{}", env!("CARGO_PKG_VERSION"));
    let mut config = graphlens_app::GraphlensConfig::load(cli.config.as_deref())?;
    tracing::debug!("Backend: {}", config.backend.base_url);

    match cli.command {
        Commands::Query {
            text,
            export,
            format,
            seed,
        } => {
            if let Some(seed) = seed {
                config.layout.seed = Some(seed);
            }
            commands::query(&config, text, export.map(|name| (name, format))).await
        }
        Commands::Schema => commands::schema(&config).await,
        Commands::Stats => commands::stats(&config).await,
        Commands::Shell { seed } => {
            if let Some(seed) = seed {
                config.layout.seed = Some(seed);
            }
            commands::shell(&config).await
        }
    }
}
