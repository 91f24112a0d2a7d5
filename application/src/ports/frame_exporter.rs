//! Frame exporter port
//!
//! Consumes the ordered frame sequence from the animator's export mode;
//! the encoding format and timing-per-frame pass through unchanged.

use glyphcast_domain::{AnimationFrame, ArtworkDocument};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors from the export adapter.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export")]
    EmptyDocument,

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode frames: {0}")]
    Encoding(String),
}

/// Encodes an animated export of the document.
pub trait FrameExporter: Send + Sync {
    fn export(
        &self,
        document: &ArtworkDocument,
        frames: &[AnimationFrame],
        frame_delay: Duration,
        path: &Path,
    ) -> Result<(), ExportError>;
}
