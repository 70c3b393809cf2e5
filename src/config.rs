use std::path::PathBuf;

use crate::constants::frames::{DEFAULT_FRAME_RATE, DEFAULT_SHM_DIR, NATIVE_FRAME_SIZE};
use crate::constants::manifest::DEFAULT_IMAGE_EXTENSIONS;
use crate::frames::{FrameExtractor, ffmpeg_extractor};

/// How the record order is permuted once at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShuffleMode {
    /// Whether to shuffle at all.
    pub enabled: bool,
    /// Optional seed for a reproducible permutation (thread RNG otherwise).
    pub seed: Option<u64>,
}

impl ShuffleMode {
    /// Enabled shuffle with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            enabled: true,
            seed: Some(seed),
        }
    }
}

/// Configuration for the JSON manifest + per-record MP4 video adapter.
#[derive(Clone)]
pub struct JsonVideoConfig {
    /// Manifest path ending in `.json` or `.json.gz`.
    pub json_file: PathBuf,
    /// Folder holding one `<id>/` subfolder with a single video per record.
    pub folder: PathBuf,
    /// Folder that receives `label2idx.json`.
    pub output_folder: PathBuf,
    /// One-time shuffle of the record order.
    pub shuffle: ShuffleMode,
    /// Short-edge frame size (`<= 0` keeps native size).
    pub frame_size: i32,
    /// Frame rate handed to the burst collaborator.
    pub frame_rate: u32,
    /// Base directory for per-record burst directories.
    pub shm_dir: PathBuf,
    /// Video burst collaborator.
    pub frame_extractor: FrameExtractor,
}

impl JsonVideoConfig {
    /// Create a config with default frame size, frame rate, and burst root.
    pub fn new(
        json_file: impl Into<PathBuf>,
        folder: impl Into<PathBuf>,
        output_folder: impl Into<PathBuf>,
    ) -> Self {
        Self {
            json_file: json_file.into(),
            folder: folder.into(),
            output_folder: output_folder.into(),
            shuffle: ShuffleMode::default(),
            frame_size: NATIVE_FRAME_SIZE,
            frame_rate: DEFAULT_FRAME_RATE,
            shm_dir: PathBuf::from(DEFAULT_SHM_DIR),
            frame_extractor: ffmpeg_extractor(),
        }
    }

    /// Enable or disable the one-time shuffle.
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle.enabled = shuffle;
        self
    }

    /// Shuffle once with a reproducible permutation seeded by `seed`.
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle = ShuffleMode::seeded(seed);
        self
    }

    /// Override the short-edge frame size.
    pub fn with_frame_size(mut self, frame_size: i32) -> Self {
        self.frame_size = frame_size;
        self
    }

    /// Override the burst frame rate.
    pub fn with_frame_rate(mut self, frame_rate: u32) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /// Override the burst directory root.
    pub fn with_shm_dir(mut self, shm_dir: impl Into<PathBuf>) -> Self {
        self.shm_dir = shm_dir.into();
        self
    }

    /// Replace the video burst collaborator.
    pub fn with_frame_extractor(mut self, frame_extractor: FrameExtractor) -> Self {
        self.frame_extractor = frame_extractor;
        self
    }
}

/// Configuration for the CSV manifest + pre-extracted JPEG frame adapter.
#[derive(Clone, Debug)]
pub struct CsvJpegConfig {
    /// Header-less `id;label` manifest.
    pub csv_file: PathBuf,
    /// Folder holding one `<id>/` frame folder per record.
    pub folder: PathBuf,
    /// Folder that receives `label2idx.json`.
    pub output_folder: PathBuf,
    /// One-time shuffle of the record order.
    pub shuffle: ShuffleMode,
    /// Short-edge frame size (`<= 0` keeps native size).
    pub frame_size: i32,
}

impl CsvJpegConfig {
    /// Create a config that keeps native frame sizes.
    pub fn new(
        csv_file: impl Into<PathBuf>,
        folder: impl Into<PathBuf>,
        output_folder: impl Into<PathBuf>,
    ) -> Self {
        Self {
            csv_file: csv_file.into(),
            folder: folder.into(),
            output_folder: output_folder.into(),
            shuffle: ShuffleMode::default(),
            frame_size: NATIVE_FRAME_SIZE,
        }
    }

    /// Enable or disable the one-time shuffle.
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle.enabled = shuffle;
        self
    }

    /// Shuffle once with a reproducible permutation seeded by `seed`.
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle = ShuffleMode::seeded(seed);
        self
    }

    /// Override the short-edge frame size.
    pub fn with_frame_size(mut self, frame_size: i32) -> Self {
        self.frame_size = frame_size;
        self
    }
}

/// Configuration for the `image_path,label` list adapter.
#[derive(Clone, Debug)]
pub struct ImageListConfig {
    /// Plain-text list file.
    pub input_file: PathBuf,
    /// Folder that receives `label2idx.json`.
    pub output_folder: PathBuf,
    /// Prefix joined onto every listed image path.
    pub root_folder: PathBuf,
    /// One-time shuffle of the record order.
    pub shuffle: ShuffleMode,
    /// Short-edge image size (`<= 0` keeps native size).
    pub img_size: i32,
}

impl ImageListConfig {
    /// Create a config resolving listed paths relative to the working directory.
    pub fn new(input_file: impl Into<PathBuf>, output_folder: impl Into<PathBuf>) -> Self {
        Self {
            input_file: input_file.into(),
            output_folder: output_folder.into(),
            root_folder: PathBuf::new(),
            shuffle: ShuffleMode::default(),
            img_size: NATIVE_FRAME_SIZE,
        }
    }

    /// Resolve listed image paths under `root_folder`.
    pub fn with_root_folder(mut self, root_folder: impl Into<PathBuf>) -> Self {
        self.root_folder = root_folder.into();
        self
    }

    /// Enable or disable the one-time shuffle.
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle.enabled = shuffle;
        self
    }

    /// Shuffle once with a reproducible permutation seeded by `seed`.
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle = ShuffleMode::seeded(seed);
        self
    }

    /// Override the short-edge image size.
    pub fn with_img_size(mut self, img_size: i32) -> Self {
        self.img_size = img_size;
        self
    }
}

/// Configuration for the label-per-subfolder image tree adapter.
#[derive(Clone, Debug)]
pub struct ImageFolderConfig {
    /// Root of the `<label>/<image>` tree.
    pub folder: PathBuf,
    /// Folder that receives `label2idx.json`.
    pub output_folder: PathBuf,
    /// Extensions collected by the scan (leading `.` optional).
    pub file_extensions: Vec<String>,
    /// Whether the scan follows symlinks.
    pub follow_links: bool,
    /// One-time shuffle of the record order.
    pub shuffle: ShuffleMode,
    /// Short-edge image size (`<= 0` keeps native size).
    pub img_size: i32,
}

impl ImageFolderConfig {
    /// Create a config collecting `.jpg` and `.png` files.
    pub fn new(folder: impl Into<PathBuf>, output_folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            output_folder: output_folder.into(),
            file_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            follow_links: false,
            shuffle: ShuffleMode::default(),
            img_size: NATIVE_FRAME_SIZE,
        }
    }

    /// Replace the extension allowlist.
    pub fn with_file_extensions<S: Into<String>>(
        mut self,
        extensions: impl IntoIterator<Item = S>,
    ) -> Self {
        self.file_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Override whether the scan follows symlinks.
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Enable or disable the one-time shuffle.
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle.enabled = shuffle;
        self
    }

    /// Shuffle once with a reproducible permutation seeded by `seed`.
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle = ShuffleMode::seeded(seed);
        self
    }

    /// Override the short-edge image size.
    pub fn with_img_size(mut self, img_size: i32) -> Self {
        self.img_size = img_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_native_size_and_standard_burst_settings() {
        let config = JsonVideoConfig::new("train.json", "videos", "out");
        assert_eq!(config.frame_size, -1);
        assert_eq!(config.frame_rate, 8);
        assert_eq!(config.shm_dir, PathBuf::from("/dev/shm"));
        assert!(!config.shuffle.enabled);

        let folder = ImageFolderConfig::new("images", "out");
        assert_eq!(folder.file_extensions, vec![".jpg", ".png"]);
    }

    #[test]
    fn builders_override_fields() {
        let config = CsvJpegConfig::new("train.csv", "frames", "out")
            .with_shuffle(true)
            .with_shuffle_seed(7)
            .with_frame_size(128);
        assert_eq!(
            config.shuffle,
            ShuffleMode {
                enabled: true,
                seed: Some(7)
            }
        );
        assert_eq!(config.frame_size, 128);

        let list = ImageListConfig::new("list.txt", "out")
            .with_root_folder("data")
            .with_img_size(64);
        assert_eq!(list.root_folder, PathBuf::from("data"));
        assert_eq!(list.img_size, 64);

        let folder = ImageFolderConfig::new("images", "out").with_file_extensions(["bmp"]);
        assert_eq!(folder.file_extensions, vec!["bmp"]);
    }

    #[test]
    fn shuffle_seed_alone_enables_shuffling() {
        let seeded = ShuffleMode::seeded(3);
        assert_eq!(
            JsonVideoConfig::new("train.json", "videos", "out")
                .with_shuffle_seed(3)
                .shuffle,
            seeded
        );
        assert_eq!(
            CsvJpegConfig::new("train.csv", "frames", "out")
                .with_shuffle_seed(3)
                .shuffle,
            seeded
        );
        assert_eq!(
            ImageListConfig::new("list.txt", "out")
                .with_shuffle_seed(3)
                .shuffle,
            seeded
        );
        assert_eq!(
            ImageFolderConfig::new("images", "out")
                .with_shuffle_seed(3)
                .shuffle,
            seeded
        );

        // An explicit disable after seeding wins.
        let config = CsvJpegConfig::new("train.csv", "frames", "out")
            .with_shuffle_seed(3)
            .with_shuffle(false);
        assert!(!config.shuffle.enabled);
    }
}
