//! Frame acquisition collaborators: decoding, short-edge resizing, video
//! bursting, and per-record scoped burst directories.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use image::imageops::FilterType;
use tempfile::TempDir;
use tracing::debug;

use crate::constants::frames::{
    BURST_DIR_PREFIX, BURST_FRAME_PATTERN, FFMPEG_PROGRAM, JPEG_FRAME_FORMATS,
};
use crate::data::Frame;
use crate::errors::AdapterError;
use crate::transport::fs::find_images_in_folder;

/// Bursts a video into frame files inside a destination folder.
///
/// Arguments are `(video_path, destination_folder, frame_rate)`; the returned
/// paths must be in frame order.
pub type FrameExtractor =
    Arc<dyn Fn(&Path, &Path, u32) -> Result<Vec<PathBuf>, AdapterError> + Send + Sync + 'static>;

/// Default extractor backed by the `ffmpeg` binary.
pub fn ffmpeg_extractor() -> FrameExtractor {
    Arc::new(extract_frames)
}

/// Convert a signed size parameter into a resize target (`<= 0` keeps native size).
pub fn target_size(size: i32) -> Option<u32> {
    u32::try_from(size).ok().filter(|size| *size > 0)
}

/// Load one image and resize it so its shorter edge equals `size`.
///
/// Missing files surface as `ImageNotFound`, undecodable ones as `ImageDecode`.
pub fn resize_by_short_edge(path: &Path, size: i32) -> Result<Frame, AdapterError> {
    if !path.is_file() {
        return Err(AdapterError::ImageNotFound {
            path: path.to_path_buf(),
        });
    }
    let image = image::open(path)
        .map_err(|source| AdapterError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();
    Ok(match target_size(size) {
        Some(target) => resize_frame(&image, target),
        None => image,
    })
}

/// Lazily load and resize each path in order.
pub fn resize_many<'a, P>(
    paths: &'a [P],
    size: i32,
) -> impl Iterator<Item = Result<Frame, AdapterError>> + 'a
where
    P: AsRef<Path>,
{
    paths
        .iter()
        .map(move |path| resize_by_short_edge(path.as_ref(), size))
}

/// Resize an in-memory frame so its shorter edge equals `target`.
pub fn resize_frame(frame: &Frame, target: u32) -> Frame {
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return frame.clone();
    }
    let (new_w, new_h) = short_edge_dimensions(width, height, target);
    if (new_w, new_h) == (width, height) {
        return frame.clone();
    }
    image::imageops::resize(frame, new_w, new_h, FilterType::Triangle)
}

fn short_edge_dimensions(width: u32, height: u32, target: u32) -> (u32, u32) {
    let scale = |long: u32, short: u32| {
        ((long as f64 * target as f64 / short as f64).round() as u32).max(1)
    };
    if width <= height {
        (target, scale(height, width))
    } else {
        (scale(width, height), target)
    }
}

/// Create a uniquely named burst directory under `base`.
///
/// The directory and its contents are removed when the handle drops.
pub fn temp_dir_for_bursting(base: &Path) -> Result<TempDir, AdapterError> {
    let dir = tempfile::Builder::new()
        .prefix(BURST_DIR_PREFIX)
        .tempdir_in(base)
        .map_err(|err| AdapterError::MissingPath {
            path: base.to_path_buf(),
            reason: format!("cannot create burst directory: {err}"),
        })?;
    debug!(burst_dir = %dir.path().display(), "created burst directory");
    Ok(dir)
}

/// Burst `video` into JPEG frames under `destination` with `ffmpeg`.
pub fn extract_frames(
    video: &Path,
    destination: &Path,
    frame_rate: u32,
) -> Result<Vec<PathBuf>, AdapterError> {
    let output = Command::new(FFMPEG_PROGRAM)
        .arg("-nostdin")
        .arg("-loglevel")
        .arg("error")
        .arg("-i")
        .arg(video)
        .arg("-r")
        .arg(frame_rate.to_string())
        .arg("-q:v")
        .arg("1")
        .arg(destination.join(BURST_FRAME_PATTERN))
        .output()
        .map_err(|err| AdapterError::FrameExtraction {
            path: video.to_path_buf(),
            reason: format!("failed to spawn {FFMPEG_PROGRAM}: {err}"),
        })?;
    if !output.status.success() {
        return Err(AdapterError::FrameExtraction {
            path: video.to_path_buf(),
            reason: format!(
                "{FFMPEG_PROGRAM} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }
    find_images_in_folder(destination, &JPEG_FRAME_FORMATS)
}
