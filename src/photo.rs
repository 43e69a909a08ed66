use crate::exif_parser::GpsTags;
use std::path::{Path, PathBuf};

/// A photo with a usable GPS position.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoRecord {
    pub path: PathBuf,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: Option<String>,
}

impl PhotoRecord {
    pub fn new(path: &Path, tags: GpsTags) -> Self {
        Self {
            path: path.to_path_buf(),
            latitude: tags.latitude,
            longitude: tags.longitude,
            timestamp: tags.timestamp,
        }
    }

    /// File name for display; falls back to the whole path if there is none.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

pub fn is_heif_path(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| matches!(ext.to_lowercase().as_str(), "heic" | "heif"))
}

/// Resized copies written for one photo, relative to the photos directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivatives {
    pub large: String,
    pub thumbnail: String,
}

impl Derivatives {
    /// `{index:04}_{stem}.jpg` and `{index:04}_{stem}_thumb.jpg` for a 1-based index.
    pub fn for_photo(index: usize, source: &Path) -> Self {
        let base = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let sanitized = sanitize_filename(&base);
        let stem = match Path::new(&sanitized).file_stem() {
            Some(stem) => stem.to_string_lossy().into_owned(),
            None => sanitized,
        };
        let stem = format!("{:04}_{}", index, stem);

        Self {
            large: format!("{stem}.jpg"),
            thumbnail: format!("{stem}{}.jpg", crate::constants::THUMB_SUFFIX),
        }
    }
}

/// Replaces characters that are unsafe in file names with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if crate::constants::UNSAFE_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect()
}
