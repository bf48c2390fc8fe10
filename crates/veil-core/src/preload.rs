//! Startup scan over a bundled asset tree.
//!
//! Every file carrying the encrypted suffix is registered under its path
//! relative to the scan root, suffix stripped, so nested assets keep their
//! directory prefix and two files with the same name cannot collide.

use std::fs;
use std::path::Path;

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::registry::ResourceRegistry;
use crate::ENCRYPTED_SUFFIX;

/// Walk `root` and register every encrypted asset found. Unreadable files
/// are logged and skipped, as is a missing root. Returns the number of
/// assets registered.
pub fn preload_directory(registry: &ResourceRegistry, root: impl AsRef<Path>) -> usize {
    let root = root.as_ref();
    let mut count = 0usize;
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%err, "walk error during preload");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if !entry.file_name().to_string_lossy().ends_with(ENCRYPTED_SUFFIX) {
            continue;
        }
        let file = entry.path();
        let bytes = match fs::read(file) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(file = %file.display(), %err, "skipping unreadable asset");
                continue;
            }
        };
        let virtual_path = match virtual_path_for(root, file) {
            Some(path) => path,
            None => continue,
        };
        registry.register(&virtual_path, bytes);
        count += 1;
    }
    info!(count, root = %root.display(), "preloaded encrypted assets");
    count
}

/// Root-relative path with forward-slash separators and the encrypted
/// suffix stripped.
fn virtual_path_for(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?;
    let joined = relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    joined.strip_suffix(ENCRYPTED_SUFFIX).map(str::to_string)
}
