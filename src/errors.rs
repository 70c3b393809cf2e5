use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for manifest parsing, frame acquisition, and label persistence failures.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("unsupported manifest format '{}': {reason}", .path.display())]
    ManifestFormat { path: PathBuf, reason: String },
    #[error("failed parsing manifest '{}': {details}", .path.display())]
    ManifestParse { path: PathBuf, details: String },
    #[error("missing path '{}': {reason}", .path.display())]
    MissingPath { path: PathBuf, reason: String },
    #[error("failed scanning '{}': {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("expected exactly one '.{format}' video in '{}', found {found}", .folder.display())]
    VideoLookup {
        folder: PathBuf,
        format: String,
        found: usize,
    },
    #[error("image not found: {}", .path.display())]
    ImageNotFound { path: PathBuf },
    #[error("image decode error at {}: {source}", .path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("frame extraction failed for '{}': {reason}", .path.display())]
    FrameExtraction { path: PathBuf, reason: String },
    #[error("failed writing label index '{}': {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl AdapterError {
    /// True for image failures a tolerant adapter may log and skip.
    pub fn is_unreadable_image(&self) -> bool {
        matches!(
            self,
            AdapterError::ImageNotFound { .. } | AdapterError::ImageDecode { .. }
        )
    }
}
