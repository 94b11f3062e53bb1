//! Graphlens Export: rasterize the rendered graph and deliver it as a file
//!
//! Pipeline: [`raster`] captures a [`CaptureRegion`] into a bitmap,
//! [`encode`] turns it into PNG/JPEG bytes or [`pdf`] fits it onto an A4
//! page, and a [`DownloadSink`] stores the result under the requested name.

pub mod deliver;
pub mod encode;
pub mod error;
pub mod options;
pub mod pdf;
pub mod pipeline;
pub mod raster;

#[cfg(test)]
pub mod tests;

pub use deliver::{DirectorySink, DownloadSink, MemorySink};
pub use error::{ExportError, ExportStage, RasterError, Result};
pub use options::{ExportFormat, ExportOptions, ExportSettings, default_filename, optimal_export_settings};
pub use pdf::{Orientation, PdfPlacement, fit_to_page};
pub use pipeline::{ExportReport, ExportWarning, export_element, export_full_png};
pub use raster::{Canvas, CaptureRegion, rasterize};
