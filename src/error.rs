//! Error type shared by the scanner pipeline.

use thiserror::Error;

/// Errors that abort a scan.
///
/// Per-pixel failures (undecodable codes, parallel rays, points outside the
/// volume) are not errors; they are counted in
/// [`ReconstructionStats`](crate::reconstruct::ReconstructionStats).
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScanError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        ScanError::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
