/// JSON manifest + per-record MP4 video adapter.
pub mod json_video;
/// CSV manifest + pre-extracted JPEG frame folder adapter.
pub mod csv_jpeg;
/// `image_path,label` list adapter (skips unreadable images).
pub mod image_list;
/// Label-per-subfolder image tree adapter.
pub mod image_folder;

pub use csv_jpeg::CsvJpegAdapter;
pub use image_folder::ImageFolderAdapter;
pub use image_list::ImageListAdapter;
pub use json_video::JsonVideoAdapter;
