use std::path::Path;

use tracing::debug;

use crate::data::RawRecord;
use crate::errors::AdapterError;
use crate::transport::fs::FileScan;

/// Scan `root` recursively for images whose extension is in `extensions`.
///
/// Each match becomes a record with the file name as id, the immediate parent
/// directory name as label, and the containing directory as path. Records are
/// ordered by full file path so the result does not depend on traversal order.
pub fn scan_image_folder<S: AsRef<str>>(
    root: &Path,
    extensions: &[S],
    follow_links: bool,
) -> Result<Vec<RawRecord>, AdapterError> {
    let paths = FileScan::new(root)
        .with_extensions(extensions)
        .with_follow_symlinks(follow_links)
        .sorted_paths()?;
    let mut records = Vec::with_capacity(paths.len());
    for image_path in paths {
        let (Some(file_name), Some(parent)) = (image_path.file_name(), image_path.parent())
        else {
            continue;
        };
        let label = parent
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| AdapterError::ManifestParse {
                path: image_path.clone(),
                details: "image has no parent directory name to use as label".into(),
            })?;
        records.push(
            RawRecord::new(file_name.to_string_lossy().into_owned(), label)
                .with_path(parent.to_string_lossy().into_owned()),
        );
    }
    debug!(root = %root.display(), records = records.len(), "scanned image folder");
    Ok(records)
}
