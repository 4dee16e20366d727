//! Plugin discovery - list source units in a plugin directory

use std::path::{Path, PathBuf};

use super::PRIVATE_MARKER;

/// List plugin source files directly inside `dir`
///
/// Only regular files with the given extension are returned; names
/// starting with [`PRIVATE_MARKER`] are excluded. The result is sorted by
/// file name so discovery order does not depend on the filesystem.
///
/// # Errors
///
/// Returns error if the directory cannot be read
pub fn discover_sources(dir: &Path, extension: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut sources = Vec::new();

    for entry in std::fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::warn!(path = %path.display(), "skipping plugin with non-UTF-8 file name");
            continue;
        };

        if file_name.starts_with(PRIVATE_MARKER) {
            tracing::trace!(file = file_name, "skipping private plugin file");
            continue;
        }

        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }

        sources.push(path);
    }

    sources.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(sources)
}
