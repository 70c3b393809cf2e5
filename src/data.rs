use serde::{Deserialize, Serialize};

pub use crate::types::{Label, LabelIdx, PathString, RecordId};

/// Decoded (and optionally resized) RGB frame.
pub type Frame = image::RgbImage;

/// One manifest entry exactly as parsed, before label indexing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRecord {
    /// Record identifier from the manifest.
    pub id: RecordId,
    /// Raw label string.
    pub label: Label,
    /// File or folder named by image-based manifests.
    pub path: Option<PathString>,
}

impl RawRecord {
    /// Create a record without a path.
    pub fn new(id: impl Into<RecordId>, label: impl Into<Label>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            path: None,
        }
    }

    /// Attach the file or folder path this record names.
    pub fn with_path(mut self, path: impl Into<PathString>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// A raw record enriched with its resolved label index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaRecord {
    /// Record identifier from the manifest.
    pub id: RecordId,
    /// Raw label string.
    pub label: Label,
    /// Index of `label` in the adapter's `LabelIndex`.
    pub idx: LabelIdx,
    /// Path carried over from the raw record, when the adapter keeps it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathString>,
}

impl MetaRecord {
    /// Copy of this record with the scan-time path removed.
    pub fn without_path(&self) -> Self {
        Self {
            path: None,
            ..self.clone()
        }
    }
}

/// Unit produced by dataset iteration: one record and its frames.
#[derive(Clone, Debug)]
pub struct IterationResult {
    /// Record identifier (same as `meta.id`).
    pub id: RecordId,
    /// Indexed metadata for the record.
    pub meta: MetaRecord,
    /// Ordered frames for the record.
    pub frames: Vec<Frame>,
}

impl IterationResult {
    /// Build a result whose id mirrors the metadata id.
    pub fn new(meta: MetaRecord, frames: Vec<Frame>) -> Self {
        Self {
            id: meta.id.clone(),
            meta,
            frames,
        }
    }
}
