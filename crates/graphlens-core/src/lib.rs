//! Snapshot model, graph store, layout and selection for Graphlens

pub mod error;
pub mod geometry;
pub mod graph;
pub mod inspector;
pub mod layout;
pub mod model;
pub mod renderer;
pub mod scene;
pub mod selection;
pub mod style;
pub mod viewport;


#[cfg(test)]
pub mod test_utils;

pub use error::StoreError;
pub use geometry::{Point, Rect};
pub use graph::{EdgePolicy, GraphStore, LoadSummary};
pub use inspector::{InspectorBody, InspectorView, PropertyRow, TargetKind};
pub use layout::{ForceLayout, LayoutConfig, LayoutResult};
pub use model::{ElementRef, GraphEdge, GraphNode, GraphSnapshot, NodeType, Properties};
pub use renderer::{Renderer, ViewConfig};
pub use scene::{EdgeGlyph, NodeGlyph, Scene};
pub use selection::{ElementState, Neighborhood, SelectionState};
pub use style::{Color, display_label};
pub use viewport::Viewport;
