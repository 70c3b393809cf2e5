#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Dataset adapter contract, lazy iterator, and concrete adapters.
pub mod adapter;
/// Per-adapter configuration builders.
pub mod config;
/// Centralized constants used across manifests, frames, and label persistence.
pub mod constants;
/// Record and iteration result types.
pub mod data;
/// Reusable CLI runner shared by the demos.
pub mod example_apps;
/// Frame decoding, resizing, and video bursting.
pub mod frames;
/// Label index construction and `label2idx.json` persistence.
pub mod labels;
/// Manifest parsers, one per dataset layout.
pub mod manifest;
/// Input transports used by adapters (filesystem today).
pub mod transport;
/// Shared type aliases.
pub mod types;

mod errors;

pub use adapter::adapters::{
    CsvJpegAdapter, ImageFolderAdapter, ImageListAdapter, JsonVideoAdapter,
};
pub use adapter::{DatasetAdapter, DatasetIter, ManifestState};
pub use config::{CsvJpegConfig, ImageFolderConfig, ImageListConfig, JsonVideoConfig, ShuffleMode};
pub use data::{Frame, IterationResult, MetaRecord, RawRecord};
pub use errors::AdapterError;
pub use frames::FrameExtractor;
pub use labels::LabelIndex;
pub use types::{Label, LabelIdx, PathString, RecordId};
