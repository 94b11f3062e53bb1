//! Rasterize → encode → deliver

use crate::deliver::DownloadSink;
use crate::encode::{encode_jpeg, encode_png};
use crate::error::{ExportError, ExportStage, Result};
use crate::options::{ExportFormat, ExportOptions};
use crate::pdf::{fit_to_page, write_pdf};
use crate::raster::{CaptureRegion, rasterize};
use graphlens_core::{Color, Renderer};
use std::path::PathBuf;

/// Quick-export settings for the whole graph.
pub const FULL_PNG_NAME: &str = "codegraph";
pub const FULL_PNG_SCALE: f64 = 2.0;
pub const FULL_PNG_BACKGROUND: Color = Color::rgb(0x1a, 0x1a, 0x1a);

/// Non-fatal conditions raised while exporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportWarning {
    /// SVG was requested; a PNG was produced instead.
    SvgFallbackToPng,
}

impl std::fmt::Display for ExportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportWarning::SvgFallbackToPng => {
                f.write_str("SVG export is not supported for raster captures, saved as PNG")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub requested: ExportFormat,
    /// Format actually written.
    pub format: ExportFormat,
    pub width_px: u32,
    pub height_px: u32,
    pub bytes: usize,
    pub warnings: Vec<ExportWarning>,
}

/// Capture `region` and deliver it as `<filename>.<ext>` through `sink`.
///
/// Every stage failure comes back as [`ExportError::Failed`] carrying the
/// underlying cause.
pub fn export_element<R, S>(region: &R, options: &ExportOptions, sink: &mut S) -> Result<ExportReport>
where
    R: CaptureRegion + ?Sized,
    S: DownloadSink + ?Sized,
{
    options.validate()?;
    let requested = options.format;
    let format = requested.effective();

    let mut warnings = Vec::new();
    if requested == ExportFormat::Svg {
        tracing::warn!("SVG export requested, falling back to PNG");
        warnings.push(ExportWarning::SvgFallbackToPng);
    }

    let image = rasterize(region, options.scale, options.background)
        .map_err(|e| ExportError::failed(requested, ExportStage::Rasterize, e))?;

    let bytes = match format {
        ExportFormat::Png | ExportFormat::Svg => encode_png(&image)
            .map_err(|e| ExportError::failed(requested, ExportStage::Encode, e))?,
        ExportFormat::Jpeg => encode_jpeg(&image, options.quality)
            .map_err(|e| ExportError::failed(requested, ExportStage::Encode, e))?,
        ExportFormat::Pdf => {
            let placement = fit_to_page(image.width(), image.height());
            tracing::debug!(
                "PDF placement {:.2}x{:.2} mm at ({:.2}, {:.2}), {:?}",
                placement.width_mm,
                placement.height_mm,
                placement.x_mm,
                placement.y_mm,
                placement.orientation
            );
            write_pdf(&image, &placement)
                .map_err(|e| ExportError::failed(requested, ExportStage::Encode, e))?
        }
    };

    let file_name = options.file_name();
    let path = sink
        .deliver(&file_name, &bytes)
        .map_err(|e| ExportError::failed(requested, ExportStage::Deliver, e))?;

    tracing::info!("Exported {} ({} bytes) to {}", format, bytes.len(), path.display());
    Ok(ExportReport {
        path,
        requested,
        format,
        width_px: image.width(),
        height_px: image.height(),
        bytes: bytes.len(),
        warnings,
    })
}

/// Whole graph as `codegraph.png` at 2x on a dark background, regardless of
/// the current pan and zoom.
pub fn export_full_png<S: DownloadSink + ?Sized>(renderer: &Renderer, sink: &mut S) -> Result<ExportReport> {
    let scene = renderer.full_scene(0.0);
    let options = ExportOptions::new(ExportFormat::Png)
        .with_filename(FULL_PNG_NAME)
        .with_scale(FULL_PNG_SCALE)
        .with_background(FULL_PNG_BACKGROUND);
    export_element(&scene, &options, sink)
}
