use std::ops::Range;

use tracing::warn;

use crate::adapter::{DatasetAdapter, DatasetIter, ManifestState};
use crate::config::ImageListConfig;
use crate::constants::frames::SKIP_UNREADABLE_MSG;
use crate::data::{IterationResult, MetaRecord};
use crate::errors::AdapterError;
use crate::frames::resize_by_short_edge;
use crate::labels::LabelIndex;
use crate::manifest::read_image_list;

/// Adapter for an `image_path,label` list, one image per record.
///
/// Unreadable or missing images are logged and skipped instead of failing the
/// pass. The listed path is used only to load the image and is stripped from
/// the emitted metadata.
pub struct ImageListAdapter {
    config: ImageListConfig,
    state: ManifestState,
}

impl ImageListAdapter {
    /// Parse and index the image list.
    pub fn new(config: ImageListConfig) -> Result<Self, AdapterError> {
        let records = read_image_list(&config.input_file)?;
        let state = ManifestState::build(records, &config.output_folder, config.shuffle);
        Ok(Self { config, state })
    }

    /// Active configuration.
    pub fn config(&self) -> &ImageListConfig {
        &self.config
    }

    fn fetch(&self, meta: &MetaRecord) -> Result<Option<IterationResult>, AdapterError> {
        let Some(path) = meta.path.as_deref() else {
            return Err(AdapterError::Configuration(format!(
                "image list record '{}' has no path",
                meta.id
            )));
        };
        let image_path = self.config.root_folder.join(path);
        match resize_by_short_edge(&image_path, self.config.img_size) {
            Ok(frame) => Ok(Some(IterationResult::new(meta.without_path(), vec![frame]))),
            Err(err) if err.is_unreadable_image() => {
                warn!(
                    id = %meta.id,
                    path = %image_path.display(),
                    error = %err,
                    SKIP_UNREADABLE_MSG
                );
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

impl DatasetAdapter for ImageListAdapter {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Frame;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn skips_missing_images_but_reports_manifest_length() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("images")).unwrap();
        Frame::from_pixel(10, 20, image::Rgb([1, 2, 3]))
            .save(root.join("images/a.png"))
            .unwrap();
        let list = root.join("list.txt");
        fs::write(&list, "images/a.png,cat\nimages/missing.png,dog\n").unwrap();

        let adapter = ImageListAdapter::new(
            ImageListConfig::new(&list, root)
                .with_root_folder(root)
                .with_img_size(5),
        )
        .unwrap();
        assert_eq!(adapter.len(), 2);

        let results: Vec<IterationResult> =
            adapter.iter_data(None).map(Result::unwrap).collect();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "a.png");
        assert_eq!(results[0].meta.path, None);
        assert_eq!(results[0].frames[0].dimensions(), (5, 10));
        assert!(LabelIndex::file_path(root).exists());
        // The adapter's own metadata still carries the scan path.
        assert!(adapter.all_meta()[0].path.is_some());
    }

    #[test]
    fn repeated_sliced_iteration_does_not_narrow_state() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let mut lines = String::new();
        for idx in 0..4 {
            let name = format!("{idx}.png");
            Frame::from_pixel(2, 2, image::Rgb([idx, 0, 0]))
                .save(root.join(&name))
                .unwrap();
            lines.push_str(&format!("{name},l{idx}\n"));
        }
        let list = root.join("list.txt");
        fs::write(&list, lines).unwrap();
        let adapter =
            ImageListAdapter::new(ImageListConfig::new(&list, root).with_root_folder(root))
                .unwrap();

        let first: Vec<String> = adapter
            .iter_data(Some(1..3))
            .map(|result| result.unwrap().id)
            .collect();
        assert_eq!(first, vec!["1.png", "2.png"]);
        let full: Vec<String> = adapter
            .iter_data(None)
            .map(|result| result.unwrap().id)
            .collect();
        assert_eq!(full, vec!["0.png", "1.png", "2.png", "3.png"]);
        assert_eq!(adapter.len(), 4);
    }
}
