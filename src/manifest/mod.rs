//! Format-specific manifest readers that all converge on `Vec<RawRecord>`.
//!
//! - `json`: JSON or gzip-compressed JSON lists of `{id, template}` entries.
//! - `delimited`: header-less `;`-separated `id;label` rows.
//! - `image_list`: `image_path,label` lines.
//! - `image_folder`: `<root>/**/<label>/<image>` trees.

/// Plain and gzip-compressed JSON manifests.
pub mod json;
/// Header-less semicolon-delimited CSV manifests.
pub mod delimited;
/// Plain-text image list manifests.
pub mod image_list;
/// Label-per-subfolder image trees.
pub mod image_folder;

pub use delimited::read_csv_manifest;
pub use image_folder::scan_image_folder;
pub use image_list::read_image_list;
pub use json::read_json_manifest;
