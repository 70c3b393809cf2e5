use std::ops::Range;

use tracing::debug;

use crate::adapter::{DatasetAdapter, DatasetIter, ManifestState};
use crate::config::JsonVideoConfig;
use crate::constants::frames::VIDEO_FORMAT;
use crate::data::{Frame, IterationResult, MetaRecord};
use crate::errors::AdapterError;
use crate::frames::{resize_many, temp_dir_for_bursting};
use crate::labels::LabelIndex;
use crate::manifest::read_json_manifest;
use crate::transport::fs::find_single_video_path;

/// Adapter for datasets described by a JSON manifest with one MP4 video per record.
///
/// Each record's video lives at `<folder>/<id>/*.mp4` and is burst into a
/// scoped directory under the configured shm root while that record is produced.
pub struct JsonVideoAdapter {
    config: JsonVideoConfig,
    state: ManifestState,
}

impl JsonVideoAdapter {
    /// Parse and index the manifest; the `template` field is the label.
    pub fn new(config: JsonVideoConfig) -> Result<Self, AdapterError> {
        let records = read_json_manifest(&config.json_file)?;
        let state = ManifestState::build(records, &config.output_folder, config.shuffle);
        Ok(Self { config, state })
    }

    /// Active configuration.
    pub fn config(&self) -> &JsonVideoConfig {
        &self.config
    }

    fn fetch(&self, meta: &MetaRecord) -> Result<Option<IterationResult>, AdapterError> {
        let video_folder = self.config.folder.join(&meta.id);
        let video_path = find_single_video_path(&video_folder, VIDEO_FORMAT)?;
        let frames = {
            let burst_dir = temp_dir_for_bursting(&self.config.shm_dir)?;
            let frame_paths = (self.config.frame_extractor)(
                &video_path,
                burst_dir.path(),
                self.config.frame_rate,
            )?;
            debug!(
                id = %meta.id,
                video = %video_path.display(),
                frames = frame_paths.len(),
                "burst video"
            );
            resize_many(&frame_paths, self.config.frame_size)
                .collect::<Result<Vec<Frame>, _>>()?
        };
        Ok(Some(IterationResult::new(meta.clone(), frames)))
    }
}

impl DatasetAdapter for JsonVideoAdapter {
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
