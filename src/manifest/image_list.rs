use std::fs;
use std::path::Path;

use crate::constants::manifest::IMAGE_LIST_DELIMITER;
use crate::data::RawRecord;
use crate::errors::AdapterError;

/// Read an image list with one `image_path,label` entry per line.
///
/// The id is the basename of `image_path` and the full `image_path` is kept as
/// the record path. Blank lines are skipped.
pub fn read_image_list(path: &Path) -> Result<Vec<RawRecord>, AdapterError> {
    let raw = fs::read_to_string(path).map_err(|err| AdapterError::MissingPath {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(line_no, line)| parse_line(path, line_no + 1, line.trim()))
        .collect()
}

fn parse_line(path: &Path, line_no: usize, line: &str) -> Result<RawRecord, AdapterError> {
    let fields: Vec<&str> = line.split(IMAGE_LIST_DELIMITER).collect();
    let [image_path, label] = fields.as_slice() else {
        return Err(AdapterError::ManifestParse {
            path: path.to_path_buf(),
            details: format!(
                "line {line_no}: expected 'image_path{IMAGE_LIST_DELIMITER}label', got {} fields",
                fields.len()
            ),
        });
    };
    let id = Path::new(image_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| AdapterError::ManifestParse {
            path: path.to_path_buf(),
            details: format!("line {line_no}: '{image_path}' has no file name"),
        })?;
    Ok(RawRecord::new(id, *label).with_path(*image_path))
}
