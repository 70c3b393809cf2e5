use std::path::Path;

use crate::constants::manifest::CSV_DELIMITER;
use crate::data::RawRecord;
use crate::errors::AdapterError;

/// Read a header-less `;`-delimited manifest: column 0 is the id, column 1 the label.
///
/// Extra columns are ignored; rows with fewer than two columns are fatal.
pub fn read_csv_manifest(path: &Path) -> Result<Vec<RawRecord>, AdapterError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(CSV_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|err| AdapterError::MissingPath {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|err| AdapterError::ManifestParse {
            path: path.to_path_buf(),
            details: format!("row {}: {err}", row + 1),
        })?;
        match (record.get(0), record.get(1)) {
            (Some(id), Some(label)) => records.push(RawRecord::new(id, label)),
            _ => {
                return Err(AdapterError::ManifestParse {
                    path: path.to_path_buf(),
                    details: format!("row {} has fewer than 2 columns", row + 1),
                });
            }
        }
    }
    Ok(records)
}
