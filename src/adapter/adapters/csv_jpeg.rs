use std::ops::Range;

use crate::adapter::{DatasetAdapter, DatasetIter, ManifestState};
use crate::config::CsvJpegConfig;
use crate::constants::frames::JPEG_FRAME_FORMATS;
use crate::data::{Frame, IterationResult, MetaRecord};
use crate::errors::AdapterError;
use crate::frames::resize_many;
use crate::labels::LabelIndex;
use crate::manifest::read_csv_manifest;
use crate::transport::fs::find_images_in_folder;

/// Adapter for datasets described by a `id;label` CSV with JPEG frames
/// already extracted into `<folder>/<id>/`.
pub struct CsvJpegAdapter {
    config: CsvJpegConfig,
    state: ManifestState,
}

impl CsvJpegAdapter {
    /// Parse and index the CSV manifest.
    pub fn new(config: CsvJpegConfig) -> Result<Self, AdapterError> {
        let records = read_csv_manifest(&config.csv_file)?;
        let state = ManifestState::build(records, &config.output_folder, config.shuffle);
        Ok(Self { config, state })
    }

    /// Active configuration.
    pub fn config(&self) -> &CsvJpegConfig {
        &self.config
    }

    fn fetch(&self, meta: &MetaRecord) -> Result<Option<IterationResult>, AdapterError> {
        let frame_folder = self.config.folder.join(&meta.id);
        let frame_paths = find_images_in_folder(&frame_folder, &JPEG_FRAME_FORMATS)?;
        let frames = resize_many(&frame_paths, self.config.frame_size)
            .collect::<Result<Vec<Frame>, _>>()?;
        Ok(Some(IterationResult::new(meta.clone(), frames)))
    }
}

impl DatasetAdapter for CsvJpegAdapter {
    fn len(&self) -> usize {
        self.state.len()
    }

    fn iter_data(&self, slice: Option<Range<usize>>) -> DatasetIter<'_> {
        self.state.iter_with(slice, move |meta| self.fetch(meta))
    }

    fn label_index(&self) -> &LabelIndex {
        self.state.labels()
    }

    fn all_meta(&self) -> &[MetaRecord] {
        self.state.all_meta()
    }
}
