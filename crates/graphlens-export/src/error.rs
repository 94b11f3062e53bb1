use crate::options::ExportFormat;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExportError>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Step of the pipeline that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Rasterize,
    Encode,
    Deliver,
}

impl std::fmt::Display for ExportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExportStage::Rasterize => "rasterize",
            ExportStage::Encode => "encode",
            ExportStage::Deliver => "deliver",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    /// A pipeline stage failed. `format` is the format that was requested,
    /// even when a fallback was in effect.
    #[error("Failed to export as {format}: {source}")]
    Failed {
        format: ExportFormat,
        stage: ExportStage,
        #[source]
        source: BoxError,
    },

    #[error("Invalid export options: {reason}")]
    InvalidOptions { reason: String },
}

impl ExportError {
    pub fn failed(
        format: ExportFormat,
        stage: ExportStage,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Failed {
            format,
            stage,
            source: source.into(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidOptions {
            reason: reason.into(),
        }
    }

    pub fn stage(&self) -> Option<ExportStage> {
        match self {
            Self::Failed { stage, .. } => Some(*stage),
            Self::InvalidOptions { .. } => None,
        }
    }
}

/// Why a region could not be captured.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RasterError {
    #[error("region has no area ({width}x{height})")]
    EmptyRegion { width: f64, height: f64 },

    #[error("bitmap of {width}x{height} px exceeds the {limit} px side limit")]
    TooLarge { width: u64, height: u64, limit: u64 },
}
