//! Graphlens App: query lifecycle, panels and configuration
//!
//! [`AppController`] owns the renderer and a [`GraphBackend`] handle and
//! drives the `Idle → Running → Success | Failed → Idle` cycle. Front-ends
//! feed it [`UiEvent`]s and read back its panels.

pub mod config;
pub mod controller;
pub mod events;
pub mod notifier;
pub mod panels;


pub use config::{AppConfig, ConfigError, ExportConfig, GraphlensConfig};
pub use controller::{
    AppController, FinishedQuery, InFlightQuery, PendingQuery, QueryOutcome, QueryState,
};
pub use events::{Key, UiEvent};
pub use notifier::{LogNotifier, Notifier};
pub use panels::{InspectorPanel, RunButton, StatsView};

pub use graphlens_client::GraphBackend;
