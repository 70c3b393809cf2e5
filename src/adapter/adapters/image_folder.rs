use std::ops::Range;
use std::path::Path;

use crate::adapter::{DatasetAdapter, DatasetIter, ManifestState};
use crate::config::ImageFolderConfig;
use crate::data::{IterationResult, MetaRecord};
use crate::errors::AdapterError;
use crate::frames::resize_by_short_edge;
use crate::labels::LabelIndex;
use crate::manifest::scan_image_folder;

/// Adapter for `<folder>/**/<label>/<image>` trees, one image per record.
pub struct ImageFolderAdapter {
    config: ImageFolderConfig,
    state: ManifestState,
}

impl ImageFolderAdapter {
    /// Scan the tree and index the subfolder labels.
    pub fn new(config: ImageFolderConfig) -> Result<Self, AdapterError> {
        let records = scan_image_folder(
            &config.folder,
            &config.file_extensions,
            config.follow_links,
        )?;
        let state = ManifestState::build(records, &config.output_folder, config.shuffle);
        Ok(Self { config, state })
    }

    /// Active configuration.
    pub fn config(&self) -> &ImageFolderConfig {
        &self.config
    }

    fn fetch(&self, meta: &MetaRecord) -> Result<Option<IterationResult>, AdapterError> {
        let parent = meta
            .path
            .as_deref()
            .map(Path::new)
            .unwrap_or(self.config.folder.as_path());
        let frame = resize_by_short_edge(&parent.join(&meta.id), self.config.img_size)?;
        Ok(Some(IterationResult::new(meta.clone(), vec![frame])))
    }
}

impl DatasetAdapter for ImageFolderAdapter {
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
