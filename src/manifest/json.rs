use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::Deserialize;
use serde_json::Value;

use crate::constants::manifest::{JSON_GZ_SUFFIX, JSON_SUFFIX};
use crate::data::RawRecord;
use crate::errors::AdapterError;
use crate::types::RecordId;

/// Compression of a JSON manifest, chosen by file name suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JsonEncoding {
    /// `.json`
    Plain,
    /// `.json.gz`
    Gzip,
}

impl JsonEncoding {
    /// Select the reader for `path`; any other suffix is a format error.
    pub fn for_path(path: &Path) -> Result<Self, AdapterError> {
        let name = path.to_string_lossy();
        if name.ends_with(JSON_GZ_SUFFIX) {
            Ok(Self::Gzip)
        } else if name.ends_with(JSON_SUFFIX) {
            Ok(Self::Plain)
        } else {
            Err(AdapterError::ManifestFormat {
                path: path.to_path_buf(),
                reason: format!("expected {JSON_SUFFIX} or {JSON_GZ_SUFFIX}"),
            })
        }
    }
}

#[derive(Deserialize)]
struct JsonEntry {
    id: Value,
    template: String,
}

/// Read a JSON manifest whose entries carry `id` and a `template` label.
pub fn read_json_manifest(path: &Path) -> Result<Vec<RawRecord>, AdapterError> {
    let encoding = JsonEncoding::for_path(path)?;
    let file = File::open(path).map_err(|err| AdapterError::MissingPath {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let reader: Box<dyn Read> = match encoding {
        JsonEncoding::Plain => Box::new(BufReader::new(file)),
        JsonEncoding::Gzip => Box::new(GzDecoder::new(BufReader::new(file))),
    };
    let entries: Vec<JsonEntry> =
        serde_json::from_reader(reader).map_err(|err| AdapterError::ManifestParse {
            path: path.to_path_buf(),
            details: err.to_string(),
        })?;
    entries
        .into_iter()
        .enumerate()
        .map(|(position, entry)| {
            let id = record_id_from_value(&entry.id).ok_or_else(|| {
                AdapterError::ManifestParse {
                    path: path.to_path_buf(),
                    details: format!("entry {position} has a non-scalar id: {}", entry.id),
                }
            })?;
            Ok(RawRecord::new(id, entry.template))
        })
        .collect()
}

fn record_id_from_value(value: &Value) -> Option<RecordId> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use tempfile::tempdir;

    const MANIFEST: &str = r#"[
        {"id": "101", "template": "Pushing [something]", "label": "ignored"},
        {"id": 102, "template": "Dropping [something]"}
    ]"#;

    #[test]
    fn reads_plain_json_with_string_and_numeric_ids() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("train.json");
        std::fs::write(&path, MANIFEST).unwrap();

        let records = read_json_manifest(&path).unwrap();
        assert_eq!(
            records,
            vec![
                RawRecord::new("101", "Pushing [something]"),
                RawRecord::new("102", "Dropping [something]"),
            ]
        );
    }

    #[test]
    fn reads_gzip_json() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("train.json.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(MANIFEST.as_bytes()).unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let records = read_json_manifest(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, "102");
    }

    #[test]
    fn rejects_unknown_extension_before_reading() {
        let err = read_json_manifest(Path::new("does/not/matter.csv")).unwrap_err();
        assert!(matches!(err, AdapterError::ManifestFormat { .. }));
        assert!(err.to_string().contains("matter.csv"));
    }

    #[test]
    fn missing_template_is_a_parse_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bad.json");
        std::fs::write(&path, r#"[{"id": "1"}]"#).unwrap();
        let err = read_json_manifest(&path).unwrap_err();
        assert!(matches!(err, AdapterError::ManifestParse { .. }));
    }

    #[test]
    fn object_ids_are_rejected() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bad_id.json");
        std::fs::write(&path, r#"[{"id": {"x": 1}, "template": "t"}]"#).unwrap();
        let err = read_json_manifest(&path).unwrap_err();
        assert!(err.to_string().contains("entry 0"));
    }
}
