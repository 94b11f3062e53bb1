//! Graph renderer: owns the snapshot, its layout, selection marks and viewport.

use crate::error::{Result, StoreError};
use crate::geometry::{Point, Rect};
use crate::graph::{EdgePolicy, GraphStore, LoadSummary};
use crate::layout::{ForceLayout, LayoutConfig};
use crate::model::{ElementRef, GraphSnapshot};
use crate::scene::{EdgeGlyph, NodeGlyph, Scene};
use crate::selection::{ElementState, Neighborhood, SelectionState};
use crate::style::{self, display_label};
use crate::viewport::Viewport;
use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Viewport and loading behaviour for a [`Renderer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub width: f64,
    pub height: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Padding for `fit_to_view` and neighbourhood fits.
    pub fit_padding: f64,
    pub edge_policy: EdgePolicy,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            min_zoom: crate::viewport::DEFAULT_MIN_ZOOM,
            max_zoom: crate::viewport::DEFAULT_MAX_ZOOM,
            fit_padding: 50.0,
            edge_policy: EdgePolicy::Reject,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selected {
    Node(NodeIndex),
    Edge(EdgeIndex),
}

/// The single rendering surface. Only its own methods mutate it.
pub struct Renderer {
    store: GraphStore,
    positions: HashMap<NodeIndex, Point>,
    selection: SelectionState,
    selected: Option<Selected>,
    viewport: Viewport,
    view: ViewConfig,
    layout: LayoutConfig,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("store", &self.store)
            .field("viewport", &self.viewport)
            .finish()
    }
}

impl Renderer {
    pub fn new(view: ViewConfig, layout: LayoutConfig) -> Self {
        let viewport =
            Viewport::new(view.width, view.height).with_zoom_limits(view.min_zoom, view.max_zoom);
        Self {
            store: GraphStore::new(),
            positions: HashMap::new(),
            selection: SelectionState::new(),
            selected: None,
            viewport,
            view,
            layout,
        }
    }

    /// Replace the snapshot, lay it out and fit the viewport around it.
    ///
    /// On error nothing changes: the previous snapshot stays rendered.
    pub fn load_graph(&mut self, snapshot: GraphSnapshot) -> Result<LoadSummary> {
        let summary = self.store.replace(snapshot, self.view.edge_policy)?;
        self.positions.clear();
        self.selection.reset();
        self.selected = None;

        let result = ForceLayout::new(&self.layout).run(&self.store);
        self.positions = result.positions;
        if let Some(bounds) = self.bounds() {
            self.viewport.fit(&bounds, self.layout.fit_padding);
        }

        tracing::info!(
            "Loaded {} nodes, {} edges ({} dropped)",
            summary.nodes,
            summary.edges,
            summary.dropped_edges
        );
        Ok(summary)
    }

    /// Remove every element and every mark.
    pub fn clear(&mut self) {
        self.store.clear();
        self.positions.clear();
        self.selection.reset();
        self.selected = None;
    }

    /// Fit the viewport around all elements. No-op when empty.
    pub fn fit_to_view(&mut self) {
        if let Some(bounds) = self.bounds() {
            self.viewport.fit(&bounds, self.view.fit_padding);
        }
    }

    /// Highlight the closed neighbourhood of `node_id`, fade the rest and fit
    /// the viewport around the neighbourhood.
    pub fn highlight_neighborhood(&mut self, node_id: &str) -> Result<Neighborhood> {
        let center = self.require_node(node_id)?;
        self.reset_highlight();

        let neighborhood = Neighborhood::closed(&self.store, center);
        self.selection.highlight(&self.store, &neighborhood);

        if let Some(bounds) = self.bounds_of(neighborhood.nodes.iter().copied()) {
            self.viewport.fit(&bounds, self.view.fit_padding);
        }
        tracing::debug!(
            "Highlighted neighbourhood of {}: {} nodes, {} edges",
            node_id,
            neighborhood.nodes.len(),
            neighborhood.edges.len()
        );
        Ok(neighborhood)
    }

    pub fn reset_highlight(&mut self) {
        self.selection.reset();
    }

    /// Make `element` the single selected element.
    pub fn select(&mut self, element: &ElementRef) -> Result<()> {
        self.selected = Some(match element {
            ElementRef::Node(id) => Selected::Node(self.require_node(id)?),
            ElementRef::Edge(id) => Selected::Edge(self.require_edge(id)?),
        });
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<ElementRef> {
        match self.selected? {
            Selected::Node(idx) => self.store.node_at(idx).map(|n| ElementRef::Node(n.id.clone())),
            Selected::Edge(idx) => self.store.edge_at(idx).map(|e| ElementRef::Edge(e.id.clone())),
        }
    }

    /// Mark on `element`, or `None` if it is not in the snapshot.
    pub fn element_state(&self, element: &ElementRef) -> Option<ElementState> {
        match element {
            ElementRef::Node(id) => self.store.node_index(id).map(|i| self.selection.node_state(i)),
            ElementRef::Edge(id) => self.store.edge_index(id).map(|i| self.selection.edge_state(i)),
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.selection.is_neutral()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn node_count(&self) -> usize {
        self.store.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.store.edge_count()
    }

    /// World position of a node's centre.
    pub fn position(&self, node_id: &str) -> Option<Point> {
        self.store
            .node_index(node_id)
            .and_then(|idx| self.positions.get(&idx).copied())
    }

    /// World-space bounds of every glyph.
    pub fn bounds(&self) -> Option<Rect> {
        Rect::bounding(self.positions.values().copied(), style::NODE_RADIUS)
    }

    /// World-space bounds of the glyphs of `nodes`.
    pub fn bounds_of(&self, nodes: impl IntoIterator<Item = NodeIndex>) -> Option<Rect> {
        Rect::bounding(
            nodes.into_iter().filter_map(|idx| self.positions.get(&idx).copied()),
            style::NODE_RADIUS,
        )
    }

    /// The current frame as seen through the viewport.
    pub fn scene(&self) -> Scene {
        self.scene_through(&self.viewport)
    }

    /// Every element at zoom 1 on a surface just large enough to hold it,
    /// ignoring the current pan/zoom.
    pub fn full_scene(&self, padding: f64) -> Scene {
        let Some(bounds) = self.bounds() else {
            return Scene::empty(2.0 * padding, 2.0 * padding);
        };
        let mut viewport = Viewport::new(
            bounds.width() + 2.0 * padding,
            bounds.height() + 2.0 * padding,
        );
        viewport.pan = Point::new(padding - bounds.min.x, padding - bounds.min.y);
        self.scene_through(&viewport)
    }

    fn scene_through(&self, viewport: &Viewport) -> Scene {
        let mut scene = Scene::empty(viewport.width, viewport.height);

        for (idx, edge) in self.store.all_edges() {
            let Some((a, b)) = self.store.endpoints(idx) else {
                continue;
            };
            let (Some(&pa), Some(&pb)) = (self.positions.get(&a), self.positions.get(&b)) else {
                continue;
            };
            let state = self.selection.edge_state(idx);
            let selected = self.selected == Some(Selected::Edge(idx));
            let (color, width) = if selected {
                (style::SELECTED_EDGE_COLOR, style::SELECTED_EDGE_WIDTH)
            } else {
                (style::EDGE_COLOR, style::EDGE_WIDTH)
            };
            scene.edges.push(EdgeGlyph {
                id: edge.id.clone(),
                from: viewport.to_screen(pa),
                to: viewport.to_screen(pb),
                color,
                width: width * viewport.zoom,
                opacity: opacity(state),
                label: (selected && state != ElementState::Faded).then(|| edge.kind.clone()),
            });
        }

        for (idx, node) in self.store.all_nodes() {
            let Some(&pos) = self.positions.get(&idx) else {
                continue;
            };
            let state = self.selection.node_state(idx);
            let selected = self.selected == Some(Selected::Node(idx));
            let (border, border_width) = match (state, selected) {
                (ElementState::Highlighted, _) => {
                    (style::HIGHLIGHT_BORDER, style::EMPHASIS_BORDER_WIDTH)
                }
                (_, true) => (style::NODE_BORDER, style::EMPHASIS_BORDER_WIDTH),
                _ => (style::NODE_BORDER, style::NODE_BORDER_WIDTH),
            };
            scene.nodes.push(NodeGlyph {
                id: node.id.clone(),
                center: viewport.to_screen(pos),
                radius: style::NODE_RADIUS * viewport.zoom,
                fill: node.node_type().color(),
                border,
                border_width: border_width * viewport.zoom,
                opacity: opacity(state),
                label: (state != ElementState::Faded).then(|| display_label(&node.label)),
            });
        }

        scene
    }

    fn require_node(&self, id: &str) -> Result<NodeIndex> {
        self.store
            .node_index(id)
            .ok_or_else(|| StoreError::UnknownNode { id: id.to_string() })
    }

    fn require_edge(&self, id: &str) -> Result<EdgeIndex> {
        self.store
            .edge_index(id)
            .ok_or_else(|| StoreError::UnknownEdge { id: id.to_string() })
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(ViewConfig::default(), LayoutConfig::default())
    }
}

fn opacity(state: ElementState) -> f64 {
    match state {
        ElementState::Faded => style::FADED_OPACITY,
        _ => 1.0,
    }
}
