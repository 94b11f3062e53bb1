//! Viewport transform: world coordinates to screen pixels.

use crate::geometry::{Point, Rect};

pub const DEFAULT_MIN_ZOOM: f64 = 0.1;
pub const DEFAULT_MAX_ZOOM: f64 = 3.0;

/// Pan/zoom state for a fixed-size drawing surface.
///
/// `screen = world * zoom + pan`
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Surface size in screen pixels.
    pub width: f64,
    pub height: f64,
    pub zoom: f64,
    pub pan: Point,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            zoom: 1.0,
            pan: Point::ORIGIN,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }

    /// Builder: override the zoom clamp.
    pub fn with_zoom_limits(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom.max(min_zoom);
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
        self
    }

    pub fn to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.zoom + self.pan.x, p.y * self.zoom + self.pan.y)
    }

    pub fn to_world(&self, p: Point) -> Point {
        Point::new((p.x - self.pan.x) / self.zoom, (p.y - self.pan.y) / self.zoom)
    }

    pub fn rect_to_screen(&self, r: &Rect) -> Rect {
        Rect::new(self.to_screen(r.min), self.to_screen(r.max))
    }

    /// World-space area currently on screen.
    pub fn visible_world(&self) -> Rect {
        Rect::new(
            self.to_world(Point::ORIGIN),
            self.to_world(Point::new(self.width, self.height)),
        )
    }

    /// Zoom and centre so `bounds` fills the surface minus `padding` pixels
    /// on every side. The zoom is clamped to the configured limits.
    pub fn fit(&mut self, bounds: &Rect, padding: f64) {
        let avail_w = (self.width - 2.0 * padding).max(1.0);
        let avail_h = (self.height - 2.0 * padding).max(1.0);
        let zoom = match (bounds.width() > 0.0, bounds.height() > 0.0) {
            (true, true) => (avail_w / bounds.width()).min(avail_h / bounds.height()),
            (true, false) => avail_w / bounds.width(),
            (false, true) => avail_h / bounds.height(),
            (false, false) => self.max_zoom,
        };
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        let center = bounds.center();
        self.pan = Point::new(
            self.width / 2.0 - center.x * self.zoom,
            self.height / 2.0 - center.y * self.zoom,
        );
    }

    /// Multiply zoom by `factor`, keeping the screen point `anchor` fixed.
    pub fn zoom_by(&mut self, factor: f64, anchor: Point) {
        let world = self.to_world(anchor);
        self.zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        self.pan = Point::new(anchor.x - world.x * self.zoom, anchor.y - world.y * self.zoom);
    }
}
