//! Deterministic label-to-index assignment and `label2idx.json` persistence.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::labels::{LABEL_INDEX_FILENAME, LABEL_INDEX_TMP_EXTENSION};
use crate::data::RawRecord;
use crate::errors::AdapterError;
use crate::types::{Label, LabelIdx};

/// Immutable mapping from label string to dense 0-based index.
///
/// Indices follow the lexicographic order of the distinct labels, so the same
/// label set always yields the same mapping regardless of manifest row order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelIndex {
    entries: BTreeMap<Label, LabelIdx>,
}

impl LabelIndex {
    /// Build the index from the distinct labels of `records`.
    pub fn build(records: &[RawRecord]) -> Self {
        Self::from_labels(records.iter().map(|record| record.label.as_str()))
    }

    /// Build the index from any label sequence (duplicates collapse).
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let distinct: BTreeSet<&str> = labels.into_iter().collect();
        let entries = distinct
            .into_iter()
            .enumerate()
            .map(|(idx, label)| (label.to_string(), idx))
            .collect();
        Self { entries }
    }

    /// Index for `label`, if it was observed in the manifest.
    pub fn get(&self, label: &str) -> Option<LabelIdx> {
        self.entries.get(label).copied()
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no labels were observed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels with their indices, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, LabelIdx)> {
        self.entries
            .iter()
            .map(|(label, idx)| (label.as_str(), *idx))
    }

    /// Path of the label file inside `folder`.
    pub fn file_path(folder: &Path) -> PathBuf {
        folder.join(LABEL_INDEX_FILENAME)
    }

    /// Write `label2idx.json` into `folder`, replacing any existing file.
    ///
    /// The folder must already exist; nothing is retried.
    pub fn persist(&self, folder: &Path) -> Result<PathBuf, AdapterError> {
        let path = Self::file_path(folder);
        let raw = serde_json::to_vec(&self.entries).map_err(|err| AdapterError::Persist {
            path: path.clone(),
            source: err.into(),
        })?;
        let tmp_path = path.with_extension(LABEL_INDEX_TMP_EXTENSION);
        fs::write(&tmp_path, raw).map_err(|source| AdapterError::Persist {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &path).map_err(|source| AdapterError::Persist {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Read a previously persisted `label2idx.json` from `folder`.
    pub fn load(folder: &Path) -> Result<Self, AdapterError> {
        let path = Self::file_path(folder);
        let raw = fs::read_to_string(&path).map_err(|err| AdapterError::MissingPath {
            path: path.clone(),
            reason: err.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|err| AdapterError::ManifestParse {
            path,
            details: err.to_string(),
        })
    }
}
