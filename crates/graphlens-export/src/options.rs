//! Export request options and the resolution heuristic

use graphlens_core::Color;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_QUALITY: f64 = 0.9;
pub const DEFAULT_SCALE: f64 = 2.0;
pub const DEFAULT_BACKGROUND: Color = Color::rgb(0x0f, 0x0f, 0x23);

/// Above this area a single pixel per unit is plenty.
const LARGE_AREA: f64 = 1_000_000.0;
/// Below this area the capture is upscaled for legibility.
const SMALL_AREA: f64 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpeg,
    Pdf,
    /// Accepted, but exported as PNG with a warning.
    Svg,
}

impl ExportFormat {
    /// File extension appended to the requested filename.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png | ExportFormat::Svg => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Pdf => "pdf",
        }
    }

    /// Format actually produced for a request.
    pub fn effective(self) -> ExportFormat {
        match self {
            ExportFormat::Svg => ExportFormat::Png,
            other => other,
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Jpeg => "JPEG",
            ExportFormat::Pdf => "PDF",
            ExportFormat::Svg => "SVG",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpeg" | "jpg" => Ok(ExportFormat::Jpeg),
            "pdf" => Ok(ExportFormat::Pdf),
            "svg" => Ok(ExportFormat::Svg),
            other => Err(format!("unknown export format '{other}'")),
        }
    }
}

/// One export action. Built per request and consumed once.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Base name; the extension is appended on delivery.
    pub filename: String,
    /// JPEG quality in `0.0..=1.0`. Ignored by other formats.
    pub quality: f64,
    /// Pixels per region unit.
    pub scale: f64,
    pub background: Color,
}

impl ExportOptions {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            filename: default_filename(),
            quality: DEFAULT_QUALITY,
            scale: DEFAULT_SCALE,
            background: DEFAULT_BACKGROUND,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Take scale (and quality, for JPEG) from [`optimal_export_settings`].
    pub fn with_settings(mut self, settings: ExportSettings) -> Self {
        self.scale = settings.scale;
        if let Some(quality) = settings.quality {
            self.quality = quality;
        }
        self
    }

    /// `<filename>.<ext>` for the effective format.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.filename, self.format.extension())
    }

    pub fn validate(&self) -> Result<(), crate::ExportError> {
        if self.filename.trim().is_empty() {
            return Err(crate::ExportError::invalid("filename is empty"));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(crate::ExportError::invalid(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        if !(0.0..=1.0).contains(&self.quality) {
            return Err(crate::ExportError::invalid(format!(
                "quality must be within 0.0..=1.0, got {}",
                self.quality
            )));
        }
        Ok(())
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::new(ExportFormat::Png)
    }
}

/// `graph-export-<unix millis>`
pub fn default_filename() -> String {
    format!("graph-export-{}", chrono::Utc::now().timestamp_millis())
}

/// Suggested capture settings for a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportSettings {
    pub scale: f64,
    /// Only set for JPEG.
    pub quality: Option<f64>,
}

/// Pick a scale from the region's pixel area: large regions stay at 1x to
/// bound memory, small ones go to 3x, everything else 2x.
pub fn optimal_export_settings(width: f64, height: f64, format: ExportFormat) -> ExportSettings {
    let area = width * height;
    let scale = if area > LARGE_AREA {
        1.0
    } else if area < SMALL_AREA {
        3.0
    } else {
        2.0
    };
    ExportSettings {
        scale,
        quality: (format == ExportFormat::Jpeg).then_some(DEFAULT_QUALITY),
    }
}
