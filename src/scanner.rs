use anyhow::{bail, Context, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::constants::SUPPORTED_EXTENSIONS;

/// True when the extension is on the supported list, ignoring case.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Recursively collects supported image files under `root`, sorted by name
/// within each directory.
///
/// `exclude` prunes one directory (and everything below it) from the walk.
pub fn scan_images(root: &Path, exclude: Option<&Path>) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("Photos directory not found: {}", root.display());
    }
    let root = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", root.display()))?;

    let mut builder = WalkBuilder::new(&root);
    builder
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    if let Some(excluded) = exclude.and_then(|p| p.canonicalize().ok()) {
        builder.filter_entry(move |entry| entry.path() != excluded);
    }

    let files = builder
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
        .map(|e| e.into_path())
        .filter(|path| is_supported(path))
        .collect();

    Ok(files)
}
