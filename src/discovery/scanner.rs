//! File system scanner for sprite files.
//!
//! Sprite files are recognised by name: a `.spr` extension, or the `,ff9`
//! filetype suffix used when RISC OS files are copied to other systems.

use std::path::{Path, PathBuf};

use log::trace;
use walkdir::WalkDir;

use super::manifest::Manifest;

/// RISC OS filetype of sprite files.
pub const SPRITE_FILETYPE: &str = "ff9";

/// Check whether a path names a sprite file.
pub fn is_sprite_file(path: &Path) -> bool {
    let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    if let Some((_, filetype)) = filename.rsplit_once(',') {
        return filetype.eq_ignore_ascii_case(SPRITE_FILETYPE);
    }

    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("spr"))
}

/// Recursively collect sprite files under a directory.
pub fn scan_directory(root: &Path, manifest: &Manifest) -> Vec<PathBuf> {
    let mut found = Vec::new();

    if !root.exists() {
        return found;
    }

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !entry.file_type().is_file() {
            continue;
        }

        if manifest.is_excluded(path) {
            trace!("excluded {}", path.display());
            continue;
        }

        if is_sprite_file(path) {
            found.push(path.to_path_buf());
        }
    }

    found
}

/// Collect sprite files from a mix of files and directories.
///
/// Files named directly are taken as-is whatever their name; directories
/// are scanned. The result is sorted and free of duplicates.
pub fn find_sprite_files(paths: &[PathBuf], manifest: &Manifest) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for path in paths {
        if path.is_dir() {
            found.extend(scan_directory(path, manifest));
        } else if path.is_file() {
            found.push(path.clone());
        }
    }

    found.sort();
    found.dedup();
    found
}

/// Scan the manifest's sources relative to a project root.
pub fn scan_sources(base_path: &Path, manifest: &Manifest) -> Vec<PathBuf> {
    let paths: Vec<PathBuf> = manifest
        .effective_sources()
        .iter()
        .map(|source| {
            if Path::new(source).is_absolute() {
                PathBuf::from(source)
            } else {
                base_path.join(source)
            }
        })
        .collect();

    find_sprite_files(&paths, manifest)
}
