/// Constants used by label indexing and persistence.
pub mod labels {
    /// File name of the persisted label-to-index mapping inside the output folder.
    pub const LABEL_INDEX_FILENAME: &str = "label2idx.json";
    /// Extension used for the temporary file replaced into `label2idx.json`.
    pub const LABEL_INDEX_TMP_EXTENSION: &str = "json.tmp";
}

/// Constants used by manifest parsers.
pub mod manifest {
    /// Extension selecting the gzip-compressed JSON manifest reader.
    pub const JSON_GZ_SUFFIX: &str = ".json.gz";
    /// Extension selecting the plain JSON manifest reader.
    pub const JSON_SUFFIX: &str = ".json";
    /// Field delimiter of the header-less CSV manifest.
    pub const CSV_DELIMITER: u8 = b';';
    /// Separator between image path and label in an image-list line.
    pub const IMAGE_LIST_DELIMITER: char = ',';
    /// Default file extensions picked up by the image-folder scan.
    pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 2] = [".jpg", ".png"];
}

/// Constants used by frame acquisition.
pub mod frames {
    /// Default base directory for per-record burst directories.
    pub const DEFAULT_SHM_DIR: &str = "/dev/shm";
    /// Default frame rate passed to the video burst collaborator.
    pub const DEFAULT_FRAME_RATE: u32 = 8;
    /// Target size meaning "keep native size".
    pub const NATIVE_FRAME_SIZE: i32 = -1;
    /// Container format searched for in each video record folder.
    pub const VIDEO_FORMAT: &str = "mp4";
    /// Frame formats enumerated in pre-extracted frame folders.
    pub const JPEG_FRAME_FORMATS: [&str; 1] = ["jpg"];
    /// Prefix for per-record temporary burst directories.
    pub const BURST_DIR_PREFIX: &str = "burst-";
    /// Output pattern handed to `ffmpeg` inside a burst directory.
    pub const BURST_FRAME_PATTERN: &str = "%05d.jpg";
    /// Program spawned by the default frame extractor.
    pub const FFMPEG_PROGRAM: &str = "ffmpeg";
    /// Log message used when unreadable image records are skipped.
    pub const SKIP_UNREADABLE_MSG: &str = "skipping unreadable image record";
}
