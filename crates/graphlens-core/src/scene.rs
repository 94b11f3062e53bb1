//! Backend-agnostic description of what is on screen.
//!
//! The renderer resolves styling (palette, selection marks, truncated
//! labels) into screen-space glyphs; raster and text front-ends consume it.

use crate::geometry::Point;
use crate::style::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct NodeGlyph {
    pub id: String,
    /// Centre in screen pixels.
    pub center: Point,
    /// Radius in screen pixels.
    pub radius: f64,
    pub fill: Color,
    pub border: Color,
    pub border_width: f64,
    pub opacity: f64,
    /// Truncated display label, `None` when hidden.
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeGlyph {
    pub id: String,
    pub from: Point,
    pub to: Point,
    pub color: Color,
    pub width: f64,
    pub opacity: f64,
    /// Relationship type, shown only for the selected edge.
    pub label: Option<String>,
}

/// Everything needed to paint one frame. Edges are painted below nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub edges: Vec<EdgeGlyph>,
    pub nodes: Vec<NodeGlyph>,
}

impl Scene {
    pub fn empty(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            edges: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&NodeGlyph> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&EdgeGlyph> {
        self.edges.iter().find(|e| e.id == id)
    }
}
