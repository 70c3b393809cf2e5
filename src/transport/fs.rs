use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::AdapterError;

/// Recursive, extension-filtered file walk under a root.
pub struct FileScan {
    root: PathBuf,
    extensions: Vec<String>,
    follow_links: bool,
    max_depth: Option<usize>,
}

impl FileScan {
    /// Create a scan rooted at `root` matching any extension.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: Vec::new(),
            follow_links: false,
            max_depth: None,
        }
    }

    /// Restrict matches to these extensions (leading `.` optional, case-insensitive).
    pub fn with_extensions<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
        self.extensions = extensions
            .iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Configure symlink traversal.
    pub fn with_follow_symlinks(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Limit how deep the walk descends (1 = direct children only).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Matching file paths sorted by full path.
    ///
    /// A missing root is reported as `MissingPath` rather than an empty list.
    /// Any entry the walk cannot read (permissions, symlink loops) is a `Scan` error.
    pub fn sorted_paths(&self) -> Result<Vec<PathBuf>, AdapterError> {
        if !self.root.is_dir() {
            return Err(AdapterError::MissingPath {
                path: self.root.clone(),
                reason: "directory does not exist".into(),
            });
        }
        let mut walker = WalkDir::new(&self.root).follow_links(self.follow_links);
        if let Some(max_depth) = self.max_depth {
            walker = walker.max_depth(max_depth);
        }
        let mut paths = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|err| self.walk_error(err))?;
            if entry.file_type().is_file() && self.matches(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn walk_error(&self, err: walkdir::Error) -> AdapterError {
        let path = err
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        AdapterError::Scan { path, source: err }
    }

    fn matches(&self, path: &Path) -> bool {
        self.extensions.is_empty()
            || self
                .extensions
                .iter()
                .any(|ext| has_extension(path, ext))
    }
}

/// True if `path` ends in `.ext` (case-insensitive, `ext` without the dot).
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|value| value.to_str())
        .map(|value| value.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// Locate the single `.{format}` file directly inside `folder`.
///
/// Zero or multiple matches are fatal.
pub fn find_single_video_path(folder: &Path, format: &str) -> Result<PathBuf, AdapterError> {
    let mut matches = FileScan::new(folder)
        .with_extensions(&[format])
        .with_max_depth(1)
        .sorted_paths()?;
    if matches.len() != 1 {
        return Err(AdapterError::VideoLookup {
            folder: folder.to_path_buf(),
            format: format.trim_start_matches('.').to_string(),
            found: matches.len(),
        });
    }
    Ok(matches.remove(0))
}

/// Image files directly inside `folder` with one of `formats`, in path order.
pub fn find_images_in_folder<S: AsRef<str>>(
    folder: &Path,
    formats: &[S],
) -> Result<Vec<PathBuf>, AdapterError> {
    FileScan::new(folder)
        .with_extensions(formats)
        .with_max_depth(1)
        .sorted_paths()
}
