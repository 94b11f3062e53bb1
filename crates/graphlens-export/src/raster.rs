//! Software rasterizer for rendered scenes
//!
//! Shapes only: filled circles with a border ring, and straight line
//! segments. Every shape touches each pixel at most once, so translucent
//! strokes blend exactly once.

use crate::error::RasterError;
use graphlens_core::{Color, Point, Scene};
use image::{Rgba, RgbaImage};

/// Largest bitmap side we are willing to allocate.
pub const MAX_SIDE_PX: u64 = 8_192;

/// Anything that can paint itself onto a [`Canvas`].
pub trait CaptureRegion {
    /// Size in region units (screen pixels at scale 1).
    fn size(&self) -> (f64, f64);

    fn paint(&self, canvas: &mut Canvas);
}

/// RGBA bitmap addressed in region units.
pub struct Canvas {
    image: RgbaImage,
    scale: f64,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .field("scale", &self.scale)
            .finish()
    }
}

impl Canvas {
    pub fn new(width: u32, height: u32, scale: f64, background: Color) -> Self {
        let fill = Rgba([background.r, background.g, background.b, background.a]);
        Self {
            image: RgbaImage::from_pixel(width, height, fill),
            scale,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Filled disc with a border ring of `border_width` drawn inside the radius.
    pub fn circle(
        &mut self,
        center: Point,
        radius: f64,
        fill: Color,
        border: Color,
        border_width: f64,
        opacity: f64,
    ) {
        let (cx, cy, r) = (center.x * self.scale, center.y * self.scale, radius * self.scale);
        let inner = (r - border_width * self.scale).max(0.0);
        let Some((x0, y0, x1, y1)) = self.clip(cx - r, cy - r, cx + r, cy + r) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let d = ((x as f64 + 0.5 - cx).powi(2) + (y as f64 + 0.5 - cy).powi(2)).sqrt();
                if d > r {
                    continue;
                }
                let color = if d > inner { border } else { fill };
                self.blend(x, y, color, opacity);
            }
        }
    }

    /// Segment of `width` units, walked one pixel at a time along its
    /// major axis so the cost follows the stroke, not its bounding box.
    pub fn line(&mut self, from: Point, to: Point, width: f64, color: Color, opacity: f64) {
        let (ax, ay) = (from.x * self.scale, from.y * self.scale);
        let (bx, by) = (to.x * self.scale, to.y * self.scale);
        // at least one pixel wide so hairlines survive downscaling
        let half = (width * self.scale / 2.0).max(0.5);

        let steep = (by - ay).abs() > (bx - ax).abs();
        let (mut a, mut b) = if steep {
            ((ay, ax), (by, bx))
        } else {
            ((ax, ay), (bx, by))
        };
        if a.0 > b.0 {
            std::mem::swap(&mut a, &mut b);
        }
        let run = b.0 - a.0;
        if run <= 0.0 {
            return;
        }
        let slope = (b.1 - a.1) / run;
        // half thickness measured along the minor axis
        let reach = half * (1.0 + slope * slope).sqrt();

        let (major, minor) = if steep {
            (self.image.height() as f64, self.image.width() as f64)
        } else {
            (self.image.width() as f64, self.image.height() as f64)
        };
        let first = (a.0 - 0.5).ceil().max(0.0) as i64;
        let last = (b.0 - 0.5).floor().min(major - 1.0) as i64;
        for u in first..=last {
            let v = a.1 + (u as f64 + 0.5 - a.0) * slope;
            let lo = (v - reach - 0.5).ceil().max(0.0) as i64;
            let hi = (v + reach - 0.5).floor().min(minor - 1.0) as i64;
            for w in lo..=hi {
                let (x, y) = if steep { (w, u) } else { (u, w) };
                self.blend(x as u32, y as u32, color, opacity);
            }
        }
    }

    /// Pixel range covering a float box, or `None` if it misses the bitmap.
    fn clip(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Option<(u32, u32, u32, u32)> {
        let (w, h) = (self.image.width() as f64, self.image.height() as f64);
        let x0 = min_x.floor().max(0.0);
        let y0 = min_y.floor().max(0.0);
        let x1 = max_x.ceil().min(w);
        let y1 = max_y.ceil().min(h);
        (x0 < x1 && y0 < y1).then(|| (x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    fn blend(&mut self, x: u32, y: u32, color: Color, opacity: f64) {
        let pixel = self.image.get_pixel_mut(x, y);
        let src_a = (color.a as f64 / 255.0) * opacity.clamp(0.0, 1.0);
        let inv = 1.0 - src_a;
        let mix = |src: u8, dst: u8| (src as f64 * src_a + dst as f64 * inv).round() as u8;
        let [r, g, b, a] = pixel.0;
        let out_a = ((255.0 * src_a + a as f64 * inv).round() as u8).max(a);
        *pixel = Rgba([mix(color.r, r), mix(color.g, g), mix(color.b, b), out_a]);
    }
}

impl CaptureRegion for Scene {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn paint(&self, canvas: &mut Canvas) {
        for edge in &self.edges {
            canvas.line(edge.from, edge.to, edge.width, edge.color, edge.opacity);
        }
        for node in &self.nodes {
            canvas.circle(
                node.center,
                node.radius,
                node.fill,
                node.border,
                node.border_width,
                node.opacity,
            );
        }
    }
}

/// Capture `region` at `scale` onto a `background`-filled bitmap.
pub fn rasterize<R: CaptureRegion + ?Sized>(
    region: &R,
    scale: f64,
    background: Color,
) -> Result<RgbaImage, RasterError> {
    let (width, height) = region.size();
    if !(width > 0.0 && height > 0.0) {
        return Err(RasterError::EmptyRegion { width, height });
    }
    let px_w = (width * scale).ceil().max(1.0) as u64;
    let px_h = (height * scale).ceil().max(1.0) as u64;
    if px_w > MAX_SIDE_PX || px_h > MAX_SIDE_PX {
        return Err(RasterError::TooLarge {
            width: px_w,
            height: px_h,
            limit: MAX_SIDE_PX,
        });
    }

    let mut canvas = Canvas::new(px_w as u32, px_h as u32, scale, background);
    region.paint(&mut canvas);
    tracing::debug!("Rasterized {}x{} px at scale {}", px_w, px_h, scale);
    Ok(canvas.into_image())
}
