//! Dataset adapter contract and shared manifest state.
//!
//! Ownership model:
//! - `DatasetAdapter` is the consumer-facing interface every dataset kind implements.
//! - `ManifestState` owns the label index and the (optionally shuffled) record
//!   order built at construction; it is never mutated afterwards.
//! - `DatasetIter` walks a borrowed slice of that order, acquires frames one
//!   record at a time, and persists `label2idx.json` only on natural exhaustion.

use std::iter::FusedIterator;
use std::ops::Range;
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::config::ShuffleMode;
use crate::data::{IterationResult, MetaRecord, RawRecord};
use crate::errors::AdapterError;
use crate::labels::LabelIndex;

/// Concrete adapter implementations.
pub mod adapters;

/// Consumer-facing dataset interface.
///
/// Construction parses and indexes the full manifest; iteration is lazy.
pub trait DatasetAdapter {
    /// Number of manifest records (independent of slicing, shuffling, or skips).
    fn len(&self) -> usize;

    /// True if the manifest has no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lazily iterate the records in `slice` (the full range when `None`).
    ///
    /// Frames are acquired only as the iterator advances. `label2idx.json` is
    /// written once when the iterator is fully drained; dropping it early, or
    /// hitting a fatal error, skips the write.
    fn iter_data(&self, slice: Option<Range<usize>>) -> DatasetIter<'_>;

    /// Label index built at construction.
    fn label_index(&self) -> &LabelIndex;

    /// Record order fixed at construction (after any shuffle).
    fn all_meta(&self) -> &[MetaRecord];
}

/// Acquires the frames for one record; `Ok(None)` skips the record.
pub type RecordFetcher<'a> =
    Box<dyn FnMut(&MetaRecord) -> Result<Option<IterationResult>, AdapterError> + 'a>;

/// Runs once when the record sequence is exhausted without a fatal error.
pub type CompletionHook<'a> = Box<dyn FnOnce() -> Result<(), AdapterError> + 'a>;

/// Lazy, fused record iterator returned by `DatasetAdapter::iter_data`.
pub struct DatasetIter<'a> {
    metas: std::slice::Iter<'a, MetaRecord>,
    fetch: RecordFetcher<'a>,
    on_exhausted: Option<CompletionHook<'a>>,
    done: bool,
}

impl<'a> DatasetIter<'a> {
    /// Iterate `metas` with `fetch`, calling `on_exhausted` after the last record.
    pub fn new(
        metas: &'a [MetaRecord],
        fetch: RecordFetcher<'a>,
        on_exhausted: Option<CompletionHook<'a>>,
    ) -> Self {
        Self {
            metas: metas.iter(),
            fetch,
            on_exhausted,
            done: false,
        }
    }
}

impl Iterator for DatasetIter<'_> {
    type Item = Result<IterationResult, AdapterError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for meta in self.metas.by_ref() {
            match (self.fetch)(meta) {
                Ok(Some(result)) => return Some(Ok(result)),
                Ok(None) => continue,
                Err(err) => {
                    self.done = true;
                    self.on_exhausted = None;
                    return Some(Err(err));
                }
            }
        }
        self.done = true;
        let hook = self.on_exhausted.take()?;
        hook().err().map(Err)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            // One extra slot for a failed completion hook.
            (0, Some(self.metas.len() + 1))
        }
    }
}

impl FusedIterator for DatasetIter<'_> {}

/// Label index, record order, and output folder shared by every adapter.
#[derive(Clone, Debug)]
pub struct ManifestState {
    labels: LabelIndex,
    all_meta: Vec<MetaRecord>,
    output_folder: PathBuf,
}

impl ManifestState {
    /// Index `records`, resolve every record's label, and apply the one-time shuffle.
    pub fn build(
        records: Vec<RawRecord>,
        output_folder: impl Into<PathBuf>,
        shuffle: ShuffleMode,
    ) -> Self {
        let labels = LabelIndex::build(&records);
        let mut all_meta: Vec<MetaRecord> = records
            .into_iter()
            .map(|record| {
                // Every label was inserted by `LabelIndex::build` above.
                let idx = labels.get(&record.label).unwrap_or_default();
                MetaRecord {
                    id: record.id,
                    label: record.label,
                    idx,
                    path: record.path,
                }
            })
            .collect();
        if shuffle.enabled {
            match shuffle.seed {
                Some(seed) => all_meta.shuffle(&mut StdRng::seed_from_u64(seed)),
                None => all_meta.shuffle(&mut rand::rng()),
            }
        }
        let output_folder = output_folder.into();
        debug!(
            records = all_meta.len(),
            labels = labels.len(),
            shuffled = shuffle.enabled,
            output_folder = %output_folder.display(),
            "built manifest state"
        );
        Self {
            labels,
            all_meta,
            output_folder,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.all_meta.len()
    }

    /// True if there are no records.
    pub fn is_empty(&self) -> bool {
        self.all_meta.is_empty()
    }

    /// Label index.
    pub fn labels(&self) -> &LabelIndex {
        &self.labels
    }

    /// Record order fixed at construction.
    pub fn all_meta(&self) -> &[MetaRecord] {
        &self.all_meta
    }

    /// Folder that receives `label2idx.json`.
    pub fn output_folder(&self) -> &Path {
        &self.output_folder
    }

    /// Read-only view of the records in `slice`, clamped to `0..len()`.
    pub fn slice(&self, slice: Option<Range<usize>>) -> &[MetaRecord] {
        let len = self.all_meta.len();
        let range = slice.unwrap_or(0..len);
        let end = range.end.min(len);
        let start = range.start.min(end);
        &self.all_meta[start..end]
    }

    /// Write `label2idx.json` into the output folder.
    pub fn persist_labels(&self) -> Result<PathBuf, AdapterError> {
        let path = self.labels.persist(&self.output_folder)?;
        info!(
            path = %path.display(),
            labels = self.labels.len(),
            "wrote label index"
        );
        Ok(path)
    }

    /// Lazily iterate `slice` with `fetch`, persisting labels on exhaustion.
    pub fn iter_with<'a, F>(&'a self, slice: Option<Range<usize>>, fetch: F) -> DatasetIter<'a>
    where
        F: FnMut(&MetaRecord) -> Result<Option<IterationResult>, AdapterError> + 'a,
    {
        DatasetIter::new(
            self.slice(slice),
            Box::new(fetch),
            Some(Box::new(move || self.persist_labels().map(|_| ()))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::tempdir;

    fn raw(pairs: &[(&str, &str)]) -> Vec<RawRecord> {
        pairs
            .iter()
            .map(|(id, label)| RawRecord::new(*id, *label))
            .collect()
    }

    fn meta_only(meta: &MetaRecord) -> Result<Option<IterationResult>, AdapterError> {
        Ok(Some(IterationResult::new(meta.clone(), Vec::new())))
    }

    #[test]
    fn build_resolves_indices_in_manifest_order() {
        let temp = tempdir().unwrap();
        let state = ManifestState::build(
            raw(&[("1", "cat"), ("2", "dog"), ("3", "cat")]),
            temp.path(),
            ShuffleMode::default(),
        );
        let resolved: Vec<(&str, usize)> = state
            .all_meta()
            .iter()
            .map(|meta| (meta.id.as_str(), meta.idx))
            .collect();
        assert_eq!(resolved, vec![("1", 0), ("2", 1), ("3", 0)]);
    }

    #[test]
    fn seeded_shuffle_is_reproducible_and_a_permutation() {
        let temp = tempdir().unwrap();
        let records: Vec<RawRecord> = (0..32)
            .map(|idx| RawRecord::new(idx.to_string(), format!("l{}", idx % 4)))
            .collect();
        let shuffle = ShuffleMode {
            enabled: true,
            seed: Some(11),
        };
        let a = ManifestState::build(records.clone(), temp.path(), shuffle);
        let b = ManifestState::build(records.clone(), temp.path(), shuffle);
        assert_eq!(a.all_meta(), b.all_meta());

        let mut ids: Vec<String> = a.all_meta().iter().map(|meta| meta.id.clone()).collect();
        assert_ne!(ids, (0..32).map(|idx| idx.to_string()).collect::<Vec<_>>());
        ids.sort_by_key(|id| id.parse::<usize>().unwrap());
        assert_eq!(ids, (0..32).map(|idx| idx.to_string()).collect::<Vec<_>>());
        assert_eq!(a.labels(), &LabelIndex::build(&records));
    }

    #[test]
    fn slice_clamps_out_of_range_bounds() {
        let temp = tempdir().unwrap();
        let state = ManifestState::build(
            raw(&[("1", "a"), ("2", "b"), ("3", "c")]),
            temp.path(),
            ShuffleMode::default(),
        );
        assert_eq!(state.slice(None).len(), 3);
        assert_eq!(state.slice(Some(1..10)).len(), 2);
        assert_eq!(state.slice(Some(5..9)).len(), 0);
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = state.slice(Some(2..1));
        assert!(reversed.is_empty());
    }

    #[test]
    fn drained_iterator_persists_once() {
        let temp = tempdir().unwrap();
        let state = ManifestState::build(
            raw(&[("1", "b"), ("2", "a")]),
            temp.path(),
            ShuffleMode::default(),
        );
        let mut iter = state.iter_with(None, meta_only);
        assert!(iter.next().unwrap().is_ok());
        assert!(!LabelIndex::file_path(temp.path()).exists());
        assert!(iter.next().unwrap().is_ok());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
        assert_eq!(LabelIndex::load(temp.path()).unwrap(), *state.labels());
    }

    #[test]
    fn abandoned_iterator_does_not_persist() {
        let temp = tempdir().unwrap();
        let state = ManifestState::build(
            raw(&[("1", "b"), ("2", "a")]),
            temp.path(),
            ShuffleMode::default(),
        );
        let first = state.iter_with(None, meta_only).next();
        assert!(first.is_some());
        assert!(!LabelIndex::file_path(temp.path()).exists());
    }

    #[test]
    fn fatal_error_fuses_and_skips_persistence() {
        let temp = tempdir().unwrap();
        let state = ManifestState::build(
            raw(&[("1", "a"), ("2", "b"), ("3", "c")]),
            temp.path(),
            ShuffleMode::default(),
        );
        let calls = Cell::new(0);
        let iter = state.iter_with(None, |meta| {
            calls.set(calls.get() + 1);
            if meta.id == "2" {
                return Err(AdapterError::Configuration("boom".into()));
            }
            meta_only(meta)
        });
        let results: Vec<_> = iter.collect();
        assert_eq!(results.len(), 2);
        assert!(results[1].is_err());
        assert_eq!(calls.get(), 2);
        assert!(!LabelIndex::file_path(temp.path()).exists());
    }

    #[test]
    fn skipped_records_are_omitted_without_stopping() {
        let temp = tempdir().unwrap();
        let state = ManifestState::build(
            raw(&[("1", "a"), ("2", "b"), ("3", "c")]),
            temp.path(),
            ShuffleMode::default(),
        );
        let ids: Vec<String> = state
            .iter_with(None, |meta| {
                if meta.id == "2" {
                    Ok(None)
                } else {
                    meta_only(meta)
                }
            })
            .map(|result| result.unwrap().id)
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(LabelIndex::file_path(temp.path()).exists());
    }

    #[test]
    fn persistence_failure_is_yielded_last() {
        let temp = tempdir().unwrap();
        let state = ManifestState::build(
            raw(&[("1", "a")]),
            temp.path().join("missing_output"),
            ShuffleMode::default(),
        );
        let results: Vec<_> = state.iter_with(None, meta_only).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(AdapterError::Persist { .. })));
    }
}
