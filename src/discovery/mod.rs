//! Image Discovery
//!
//! Expands command-line path arguments (files or directories) into the flat
//! list of image files the benchmark will process.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extensions accepted as image files (matched case-insensitively).
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "tiff"];

/// Check whether a path has a whitelisted image extension.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Collect image paths from the given file and directory arguments.
///
/// Directories are walked recursively; symlinks are not followed, so link
/// cycles cannot loop the walk. Arguments that are neither a directory nor a
/// whitelisted image file are skipped with a warning. Overlapping arguments
/// are not deduplicated. The result may be empty; callers treat that as a
/// usage error.
pub fn collect_images(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut images = Vec::new();

    for input in inputs {
        if input.is_dir() {
            collect_from_directory(input, &mut images);
        } else if input.is_file() && is_image_file(input) {
            images.push(input.clone());
        } else {
            warn!("Skipping invalid path: {}", input.display());
        }
    }

    debug!("Discovered {} image(s) from {} argument(s)", images.len(), inputs.len());
    images
}

/// Recursively collect whitelisted files under a directory.
fn collect_from_directory(dir: &Path, images: &mut Vec<PathBuf>) {
    for entry in WalkDir::new(dir).follow_links(false) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_image_file(entry.path()) {
                    images.push(entry.into_path());
                }
            }
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", dir.display(), e);
            }
        }
    }
}
